// ⚖️ Categorization Reconciler - Map AI suggestions onto real categories
//
// The classifier answers with free text ("food", "Groceries", ...). Only a
// case-insensitive exact match against a registered label counts; anything
// else falls back to the "Other" sentinel and is reported as unmatched so
// the user can see what the classifier actually said.

use crate::entities::{CategoryId, CategoryRegistry};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// SUGGESTION (classifier output)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizationSuggestion {
    /// Free-text label proposed by the classifier
    pub category: String,

    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
}

// ============================================================================
// RECONCILIATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Registered category to select, None if not even "Other" exists
    pub category: Option<CategoryId>,

    /// Confidence rounded to a whole percent
    pub confidence_percent: u8,

    pub matched: bool,

    /// The classifier's literal label, kept for transparency
    pub suggested_label: String,
}

impl Reconciliation {
    /// User-facing description of the outcome
    pub fn message(&self, registry: &CategoryRegistry) -> String {
        let label = self.category.and_then(|id| registry.label_of(id));

        match (self.matched, label) {
            (true, Some(label)) => format!(
                "Expense categorized as {} with {}% confidence.",
                label, self.confidence_percent
            ),
            (_, Some(label)) => format!(
                "We weren't sure, so we suggested \"{}\". The AI suggested \"{}\".",
                label, self.suggested_label
            ),
            (_, None) => format!(
                "No matching category. The AI suggested \"{}\"; please pick one manually.",
                self.suggested_label
            ),
        }
    }
}

/// Map a classifier suggestion onto a concrete category
pub fn reconcile(suggestion: &CategorizationSuggestion, registry: &CategoryRegistry) -> Reconciliation {
    let confidence_percent = to_percent(suggestion.confidence);

    if let Some(category) = registry.find_by_label(&suggestion.category) {
        return Reconciliation {
            category: Some(category.id),
            confidence_percent,
            matched: true,
            suggested_label: suggestion.category.clone(),
        };
    }

    Reconciliation {
        category: registry.other().map(|c| c.id),
        confidence_percent,
        matched: false,
        suggested_label: suggestion.category.clone(),
    }
}

fn to_percent(confidence: f64) -> u8 {
    if !confidence.is_finite() {
        return 0;
    }
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

// ============================================================================
// PENDING EXPENSE DRAFT
// ============================================================================

/// Unsaved expense form state
///
/// Holds whatever the user (or the classifier) has filled in so far. Its
/// category must always point at a registered category or be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub name: String,
    pub category: Option<CategoryId>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
}

impl ExpenseDraft {
    /// Apply a reconciliation result to the draft's category
    ///
    /// An unset result leaves the current selection alone.
    pub fn apply(&mut self, reconciliation: &Reconciliation) {
        if let Some(id) = reconciliation.category {
            self.category = Some(id);
        }
    }

    /// Clear the category if the registry no longer has it
    ///
    /// Returns true when a selection was dropped.
    pub fn revalidate(&mut self, registry: &CategoryRegistry) -> bool {
        match self.category {
            Some(id) if !registry.contains(id) => {
                self.category = None;
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

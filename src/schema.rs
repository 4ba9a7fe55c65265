// 📐 Shape Layer - Form Validation
// Validates expense, income and category forms before anything touches state

use crate::entities::{CategoryId, CategoryRegistry, IconRef};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum characters for names, sources and labels
pub const MIN_TEXT_LEN: usize = 2;

/// Largest amount a single record may carry (one billion)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

// ============================================================================
// FORMS (raw user input)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeForm {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
}

// ============================================================================
// VALIDATED VALUES
// ============================================================================

/// An expense that passed validation and is ready to register
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub name: String,
    pub category: CategoryId,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub label: String,
    pub icon: IconRef,
}

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

/// Validates forms against the registry and a reference "today"
pub struct SchemaValidator<'a> {
    registry: &'a CategoryRegistry,
    today: NaiveDate,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(registry: &'a CategoryRegistry, today: NaiveDate) -> Self {
        SchemaValidator { registry, today }
    }

    pub fn validate_expense(&self, form: &ExpenseForm) -> ValidationResult<NewExpense> {
        let mut errors = Vec::new();

        let name = check_text(&mut errors, "name", &form.name, "Name must be at least 2 characters.");

        let category = match form.category {
            None => {
                errors.push(ValidationError::new("category", "Please select a category."));
                None
            }
            Some(id) if !self.registry.contains(id) => {
                errors.push(ValidationError::new("category", "Selected category does not exist."));
                None
            }
            Some(id) => Some(id),
        };

        let amount = check_amount(&mut errors, form.amount);
        let date = self.check_date(&mut errors, form.date);

        match (errors.is_empty(), category, amount, date) {
            (true, Some(category), Some(amount), Some(date)) => Ok(NewExpense {
                name,
                category,
                amount,
                date,
            }),
            _ => Err(errors),
        }
    }

    pub fn validate_income(&self, form: &IncomeForm) -> ValidationResult<NewIncome> {
        let mut errors = Vec::new();

        let source = check_text(&mut errors, "source", &form.source, "Source must be at least 2 characters.");
        let amount = check_amount(&mut errors, form.amount);
        let date = self.check_date(&mut errors, form.date);

        match (errors.is_empty(), amount, date) {
            (true, Some(amount), Some(date)) => Ok(NewIncome { source, amount, date }),
            _ => Err(errors),
        }
    }

    /// Shape check only; label uniqueness is the registry's job
    pub fn validate_category(&self, form: &CategoryForm) -> ValidationResult<NewCategory> {
        let mut errors = Vec::new();

        let label = check_text(&mut errors, "label", &form.label, "Name must be at least 2 characters.");

        let icon = match form.icon.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(IconRef::from_name(name)),
            _ => {
                errors.push(ValidationError::new("icon", "Please select an icon."));
                None
            }
        };

        match (errors.is_empty(), icon) {
            (true, Some(icon)) => Ok(NewCategory { label, icon }),
            _ => Err(errors),
        }
    }

    fn check_date(&self, errors: &mut Vec<ValidationError>, date: Option<NaiveDate>) -> Option<NaiveDate> {
        let Some(date) = date else {
            errors.push(ValidationError::new("date", "A date is required."));
            return None;
        };

        if date > self.today {
            errors.push(ValidationError::new("date", "Date cannot be in the future."));
            return None;
        }
        if date < earliest_date() {
            errors.push(ValidationError::new("date", "Date cannot be before 1900-01-01."));
            return None;
        }

        Some(date)
    }
}

fn check_text(errors: &mut Vec<ValidationError>, field: &str, value: &str, message: &str) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() < MIN_TEXT_LEN {
        errors.push(ValidationError::new(field, message));
    }
    trimmed.to_string()
}

fn check_amount(errors: &mut Vec<ValidationError>, amount: Option<Decimal>) -> Option<Decimal> {
    match amount {
        Some(amount) if amount > MAX_AMOUNT => {
            errors.push(ValidationError::new("amount", "Amount must not exceed 1,000,000,000."));
            None
        }
        Some(amount) if amount > Decimal::ZERO => Some(amount),
        _ => {
            errors.push(ValidationError::new("amount", "Amount must be a positive number."));
            None
        }
    }
}

fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn valid_expense() -> ExpenseForm {
        ExpenseForm {
            name: "Groceries".to_string(),
            category: Some(CategoryId(1)),
            amount: Some(Decimal::new(7550, 2)),
            date: NaiveDate::from_ymd_opt(2024, 6, 2),
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_expense() {
        let registry = CategoryRegistry::with_defaults();
        let validator = SchemaValidator::new(&registry, today());

        let expense = validator.validate_expense(&valid_expense()).unwrap();

        assert_eq!(expense.name, "Groceries");
        assert_eq!(expense.category, CategoryId(1));
        assert_eq!(expense.amount, Decimal::new(7550, 2));
    }

    #[test]
    fn test_expense_collects_every_error() {
        let registry = CategoryRegistry::with_defaults();
        let validator = SchemaValidator::new(&registry, today());

        let errors = validator.validate_expense(&ExpenseForm::default()).unwrap_err();

        assert_eq!(fields(&errors), vec!["name", "category", "amount", "date"]);
    }

    #[test]
    fn test_expense_rejects_unknown_category_and_non_positive_amount() {
        let registry = CategoryRegistry::with_defaults();
        let validator = SchemaValidator::new(&registry, today());

        let form = ExpenseForm {
            category: Some(CategoryId(404)),
            amount: Some(Decimal::ZERO),
            ..valid_expense()
        };
        let errors = validator.validate_expense(&form).unwrap_err();

        assert_eq!(fields(&errors), vec!["category", "amount"]);
    }

    #[test]
    fn test_expense_date_bounds() {
        let registry = CategoryRegistry::with_defaults();
        let validator = SchemaValidator::new(&registry, today());

        let future = ExpenseForm {
            date: NaiveDate::from_ymd_opt(2024, 7, 1),
            ..valid_expense()
        };
        assert_eq!(fields(&validator.validate_expense(&future).unwrap_err()), vec!["date"]);

        let ancient = ExpenseForm {
            date: NaiveDate::from_ymd_opt(1899, 12, 31),
            ..valid_expense()
        };
        assert_eq!(fields(&validator.validate_expense(&ancient).unwrap_err()), vec!["date"]);

        let on_today = ExpenseForm {
            date: Some(today()),
            ..valid_expense()
        };
        assert!(validator.validate_expense(&on_today).is_ok());
    }

    #[test]
    fn test_income_validation() {
        let registry = CategoryRegistry::with_defaults();
        let validator = SchemaValidator::new(&registry, today());

        let ok = validator
            .validate_income(&IncomeForm {
                source: " Salary ".to_string(),
                amount: Some(Decimal::new(5000, 0)),
                date: Some(today()),
            })
            .unwrap();
        assert_eq!(ok.source, "Salary");

        let errors = validator
            .validate_income(&IncomeForm {
                source: "x".to_string(),
                amount: Some(Decimal::new(-5, 0)),
                date: None,
            })
            .unwrap_err();
        assert_eq!(fields(&errors), vec!["source", "amount", "date"]);
    }

    #[test]
    fn test_amount_ceiling() {
        let registry = CategoryRegistry::with_defaults();
        let validator = SchemaValidator::new(&registry, today());
        let income = |amount: Decimal| IncomeForm {
            source: "Windfall".to_string(),
            amount: Some(amount),
            date: Some(today()),
        };

        assert!(validator.validate_income(&income(MAX_AMOUNT)).is_ok());

        let errors = validator
            .validate_income(&income(Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0)))
            .unwrap_err();
        assert_eq!(fields(&errors), vec!["amount"]);
        assert!(errors[0].message.contains("exceed"));

        let expense = ExpenseForm {
            amount: Some(MAX_AMOUNT + Decimal::new(1, 2)),
            ..valid_expense()
        };
        assert_eq!(fields(&validator.validate_expense(&expense).unwrap_err()), vec!["amount"]);
    }

    #[test]
    fn test_category_validation() {
        let registry = CategoryRegistry::with_defaults();
        let validator = SchemaValidator::new(&registry, today());

        let ok = validator
            .validate_category(&CategoryForm {
                label: "Travel".to_string(),
                icon: Some("Plane".to_string()),
            })
            .unwrap();
        assert_eq!(ok.icon, IconRef::Plane);

        let errors = validator
            .validate_category(&CategoryForm {
                label: "T".to_string(),
                icon: None,
            })
            .unwrap_err();
        assert_eq!(fields(&errors), vec!["label", "icon"]);
    }

    #[test]
    fn test_expense_form_from_json() {
        let form: ExpenseForm = serde_json::from_str(
            r#"{"name":"Gas","category":2,"amount":40,"date":"2024-06-05"}"#,
        )
        .unwrap();

        assert_eq!(form.category, Some(CategoryId(2)));
        assert_eq!(form.amount, Some(Decimal::new(40, 0)));
    }
}

// 🖥️ Dashboard - Per-user state and the derived view
//
// Owns the category registry, the record store and the pending expense
// draft. All derived numbers come from `aggregation` on every call; the
// dashboard never stores a total.

use crate::aggregation::{
    category_filtered, distinct_years, distribution, sum, time_filtered, CategoryFilter, CategorySlice,
    MonthFilter, TimeFilter, Totals, YearFilter,
};
use crate::entities::{Category, CategoryRegistry, Expense, Income};
use crate::errors::{AppError, AppResult};
use crate::reconciliation::{reconcile, CategorizationSuggestion, ExpenseDraft, Reconciliation};
use crate::remote::{AdvisorExpense, RecommendationRequest};
use crate::schema::{CategoryForm, ExpenseForm, IncomeForm, NewExpense, SchemaValidator};
use crate::store::RecordStore;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// QUERY & VIEW
// ============================================================================

/// Filter selections for one dashboard render
///
/// Expenses and incomes carry independent year/month selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    pub year: YearFilter,
    pub month: MonthFilter,
    pub category: CategoryFilter,
    pub income_year: YearFilter,
    pub income_month: MonthFilter,
}

impl DashboardQuery {
    pub fn expense_time(&self) -> TimeFilter {
        TimeFilter::new(self.year, self.month)
    }

    pub fn income_time(&self) -> TimeFilter {
        TimeFilter::new(self.income_year, self.income_month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub categories: Vec<Category>,
    /// Time- and category-filtered table rows
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub totals: Totals,
    pub distribution: Vec<CategorySlice>,
    pub expense_years: Vec<String>,
    pub income_years: Vec<String>,
}

/// User-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Destructive,
}

impl Notice {
    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn destructive(title: &str, description: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Destructive,
            title: title.to_string(),
            description: description.into(),
        }
    }

    /// Notification for a failed operation
    pub fn from_error(title: &str, err: &AppError) -> Self {
        Notice::destructive(title, err.to_string())
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[derive(Debug, Clone)]
pub struct Dashboard {
    registry: CategoryRegistry,
    store: RecordStore,
    draft: ExpenseDraft,
}

impl Dashboard {
    pub fn new(registry: CategoryRegistry) -> Self {
        Dashboard::with_store(registry, RecordStore::new())
    }

    pub fn with_store(registry: CategoryRegistry, store: RecordStore) -> Self {
        Dashboard {
            registry,
            store,
            draft: ExpenseDraft::default(),
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub fn create_category(&mut self, form: &CategoryForm, today: NaiveDate) -> AppResult<Category> {
        let new = SchemaValidator::new(&self.registry, today)
            .validate_category(form)
            .map_err(AppError::Validation)?;

        let category = self.registry.create(&new.label, new.icon).map_err(|e| {
            tracing::warn!("category creation rejected: {}", e);
            e
        })?;
        self.on_registry_changed();

        tracing::info!(id = %category.id, label = %category.label, "category created");
        Ok(category)
    }

    /// Replace the category list (a reload); returns true if the draft lost its category
    pub fn replace_categories(&mut self, categories: Vec<Category>) -> AppResult<bool> {
        self.registry.replace(categories)?;
        Ok(self.on_registry_changed())
    }

    fn on_registry_changed(&mut self) -> bool {
        let cleared = self.draft.revalidate(&self.registry);
        if cleared {
            tracing::info!("draft category no longer exists, selection cleared");
        }
        cleared
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    pub fn add_income(&mut self, form: &IncomeForm, today: NaiveDate) -> AppResult<Income> {
        let new = SchemaValidator::new(&self.registry, today)
            .validate_income(form)
            .map_err(AppError::Validation)?;

        let income = Income::new(new.source, new.amount, new.date);
        self.store.add_income(income.clone());

        tracing::info!(id = %income.id, "income added");
        Ok(income)
    }

    /// Validate an expense form ahead of the remote registration call
    pub fn validate_expense(&self, form: &ExpenseForm, today: NaiveDate) -> AppResult<NewExpense> {
        SchemaValidator::new(&self.registry, today)
            .validate_expense(form)
            .map_err(|errors| {
                tracing::warn!(count = errors.len(), "expense form rejected");
                AppError::Validation(errors)
            })
    }

    /// Record the server's echo of a registered expense and reset the form
    pub fn accept_registered(&mut self, expense: Expense) {
        tracing::info!(id = %expense.id, "expense registered");
        self.store.add_expense(expense);
        self.draft = ExpenseDraft::default();
    }

    // ------------------------------------------------------------------
    // Categorization
    // ------------------------------------------------------------------

    /// Reconcile a classifier answer into the pending draft
    pub fn apply_suggestion(&mut self, description: &str, suggestion: &CategorizationSuggestion) -> Reconciliation {
        let result = reconcile(suggestion, &self.registry);

        self.draft.name = description.to_string();
        self.draft.apply(&result);

        if !result.matched {
            tracing::info!(suggested = %result.suggested_label, "classifier label not registered");
        }
        result
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn view(&self, query: &DashboardQuery) -> AppResult<DashboardView> {
        let time_expenses = time_filtered(self.store.expenses(), query.expense_time());
        let time_incomes = time_filtered(self.store.incomes(), query.income_time());

        Ok(DashboardView {
            categories: self.registry.list_all().to_vec(),
            expenses: category_filtered(&time_expenses, query.category),
            totals: Totals::from_filtered(&time_expenses, &time_incomes)?,
            distribution: distribution(&time_expenses, self.registry.list_all())?,
            incomes: time_incomes,
            expense_years: distinct_years(self.store.expenses()),
            income_years: distinct_years(self.store.incomes()),
        })
    }

    /// Rows of the expense table (time + category filters)
    pub fn table_expenses(&self, query: &DashboardQuery) -> Vec<Expense> {
        let time_expenses = time_filtered(self.store.expenses(), query.expense_time());
        category_filtered(&time_expenses, query.category)
    }

    /// Input for the savings advisor over the time-filtered expenses
    ///
    /// Monthly income defaults to the income total under the income filter.
    pub fn advisor_request(
        &self,
        query: &DashboardQuery,
        monthly_income: Option<Decimal>,
        financial_goals: Option<String>,
    ) -> AppResult<RecommendationRequest> {
        let expenses = time_filtered(self.store.expenses(), query.expense_time())
            .into_iter()
            .map(|e| AdvisorExpense {
                category: self.registry.label_of(e.category).unwrap_or("").to_string(),
                name: e.name,
                amount: e.amount,
                date: e.date,
            })
            .collect();

        let monthly_income = match monthly_income {
            Some(income) => income,
            None => sum(&time_filtered(self.store.incomes(), query.income_time()))?,
        };

        Ok(RecommendationRequest {
            monthly_income,
            expenses,
            financial_goals: financial_goals.filter(|g| !g.trim().is_empty()),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

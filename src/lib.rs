// Expense Pilot - Core Library
// Exposes all modules for use in the dashboard server and tests

pub mod aggregation;    // Filters, totals and the category distribution
pub mod config;
pub mod dashboard;      // Per-user state and derived view
pub mod entities;       // Categories, expenses, incomes
pub mod errors;
pub mod export;         // CSV export of the expense table
pub mod guard;          // Session guard for protected pages
pub mod logging;
pub mod reconciliation; // AI suggestion -> registered category
pub mod remote;         // Auth, registration and AI flow clients
pub mod schema;         // Form validation
pub mod session;        // Busy flags and async orchestration
pub mod store;

// Re-export commonly used types
pub use aggregation::{
    CategoryFilter, CategorySlice, MonthFilter, TimeFilter, Totals, YearFilter,
};
pub use config::AppConfig;
pub use dashboard::{Dashboard, DashboardQuery, DashboardView, Notice, NoticeKind};
pub use entities::{
    Category, CategoryId, CategoryRegistry, Dated, Expense, IconRef, Income, OTHER_LABEL,
};
pub use errors::{AppError, AppResult};
pub use guard::{GuardOutcome, SessionGuard, TokenSource, LOGIN_PATH};
pub use reconciliation::{CategorizationSuggestion, ExpenseDraft, Reconciliation};
pub use remote::{
    AuthService, Credentials, ExpenseCategorizer, ExpenseRegistrar, HttpServices,
    RecommendationReport, SavingsAdvisor,
};
pub use schema::{CategoryForm, ExpenseForm, IncomeForm, SchemaValidator, ValidationError};
pub use session::{BusyFlag, Session, SessionStore};
pub use store::RecordStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

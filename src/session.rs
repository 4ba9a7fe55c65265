// 🧭 Session - One logged-in user's dashboard plus its in-flight guards
//
// Network-bound operations (registration, categorization, recommendations)
// each hold a busy flag for the duration of the call. A second trigger while
// the first is in flight is refused instead of queued. The dashboard lock is
// never held across an await: read inputs, drop the lock, call out, lock
// again to apply the result. A failed call applies nothing.

use crate::config::AppConfig;
use crate::dashboard::{Dashboard, DashboardQuery};
use crate::entities::Expense;
use crate::errors::{AppError, AppResult};
use crate::reconciliation::Reconciliation;
use crate::remote::{
    ExpenseCategorizer, ExpenseRegistrar, RecommendationReport, RegisterExpenseRequest,
    SavingsAdvisor,
};
use crate::schema::ExpenseForm;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

// ============================================================================
// BUSY FLAG
// ============================================================================

/// Re-entrancy guard for one triggering control
#[derive(Debug)]
pub struct BusyFlag {
    operation: &'static str,
    busy: AtomicBool,
}

/// Releases the flag when dropped, on success, error or cancellation alike
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl BusyFlag {
    pub const fn new(operation: &'static str) -> Self {
        BusyFlag {
            operation,
            busy: AtomicBool::new(false),
        }
    }

    pub fn try_acquire(&self) -> AppResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard { flag: self })
            .map_err(|_| AppError::Busy(self.operation))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::Release);
    }
}

// ============================================================================
// SESSION
// ============================================================================

pub struct Session {
    dashboard: Mutex<Dashboard>,
    registering: BusyFlag,
    categorizing: BusyFlag,
    advising: BusyFlag,
}

impl Session {
    pub fn new(dashboard: Dashboard) -> Self {
        Session {
            dashboard: Mutex::new(dashboard),
            registering: BusyFlag::new("expense registration"),
            categorizing: BusyFlag::new("categorization"),
            advising: BusyFlag::new("recommendation"),
        }
    }

    /// Lock the dashboard for a synchronous read or update
    pub fn dashboard(&self) -> MutexGuard<'_, Dashboard> {
        // a panic mid-update cannot leave Dashboard half-written: every
        // mutation is a single push or assignment
        self.dashboard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_registering(&self) -> bool {
        self.registering.is_busy()
    }

    /// Validate, register remotely, then prepend the server's echo
    pub async fn register_expense(
        &self,
        registrar: &dyn ExpenseRegistrar,
        token: &str,
        form: &ExpenseForm,
        today: NaiveDate,
    ) -> AppResult<Expense> {
        let _busy = self.registering.try_acquire()?;

        let new = self.dashboard().validate_expense(form, today)?;
        let request = RegisterExpenseRequest {
            name: new.name,
            category_id: new.category,
            amount: new.amount,
            date: new.date,
        };

        let expense = registrar.register(token, &request).await.map_err(|e| {
            tracing::error!("expense registration failed: {}", e);
            e
        })?;

        self.dashboard().accept_registered(expense.clone());
        Ok(expense)
    }

    /// Ask the classifier for a category and reconcile it into the draft
    pub async fn auto_categorize(
        &self,
        categorizer: &dyn ExpenseCategorizer,
        description: &str,
    ) -> AppResult<Reconciliation> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::invalid(
                "name",
                "Please enter a description for the expense first.",
            ));
        }

        let _busy = self.categorizing.try_acquire()?;

        let suggestion = categorizer.categorize(description).await.map_err(|e| {
            tracing::error!("AI categorization failed: {}", e);
            e
        })?;

        Ok(self.dashboard().apply_suggestion(description, &suggestion))
    }

    /// Savings recommendations over the currently filtered expenses
    pub async fn recommendations(
        &self,
        advisor: &dyn SavingsAdvisor,
        query: &DashboardQuery,
        monthly_income: Option<Decimal>,
        financial_goals: Option<String>,
    ) -> AppResult<RecommendationReport> {
        let _busy = self.advising.try_acquire()?;

        let request = self
            .dashboard()
            .advisor_request(query, monthly_income, financial_goals)?;

        advisor.recommend(&request).await.map_err(|e| {
            tracing::error!("recommendation flow failed: {}", e);
            e
        })
    }
}

// ============================================================================
// SESSION STORE
// ============================================================================

/// Live sessions keyed by credential token
///
/// A session starts when the auth service issues a token and ends on logout
/// or after `session_idle_secs` without a request. Records live exactly as
/// long as the session.
pub struct SessionStore {
    config: AppConfig,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

struct SessionEntry {
    session: Arc<Session>,
    last_seen: Instant,
}

impl SessionStore {
    pub fn new(config: AppConfig) -> Self {
        SessionStore {
            idle_timeout: Duration::from_secs(config.session_idle_secs),
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start the session for a freshly issued token (an existing one is kept)
    pub fn start(&self, token: &str) -> AppResult<Arc<Session>> {
        self.start_at(token, Instant::now())
    }

    fn start_at(&self, token: &str, now: Instant) -> AppResult<Arc<Session>> {
        let mut sessions = self.sessions();

        let before = sessions.len();
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= idle_timeout);
        if sessions.len() < before {
            tracing::info!(evicted = before - sessions.len(), "idle sessions evicted");
        }

        if let Some(entry) = sessions.get_mut(token) {
            entry.last_seen = now;
            return Ok(Arc::clone(&entry.session));
        }

        let registry = self.config.category_registry()?;
        let session = Arc::new(Session::new(Dashboard::new(registry)));
        sessions.insert(
            token.to_string(),
            SessionEntry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        tracing::info!(active = sessions.len(), "session started");
        Ok(session)
    }

    /// Live session for a token; None if it was never started or sat idle too long
    pub fn get(&self, token: &str) -> Option<Arc<Session>> {
        self.get_at(token, Instant::now())
    }

    fn get_at(&self, token: &str, now: Instant) -> Option<Arc<Session>> {
        let mut sessions = self.sessions();
        let entry = sessions.get_mut(token)?;

        if now.saturating_duration_since(entry.last_seen) <= self.idle_timeout {
            entry.last_seen = now;
            return Some(Arc::clone(&entry.session));
        }

        sessions.remove(token);
        tracing::info!("idle session expired");
        None
    }

    /// Drop a session and everything recorded in it
    pub fn end(&self, token: &str) -> bool {
        let removed = self.sessions().remove(token).is_some();
        if removed {
            tracing::info!("session ended");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// TESTS
// ============================================================================

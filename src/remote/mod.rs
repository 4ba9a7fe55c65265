// 🌐 Remote Services - Auth, expense registration and the two AI flows
//
// Each collaborator sits behind an async trait so session logic can run
// against in-memory doubles in tests. `http::HttpServices` is the real thing.

pub mod http;

use crate::entities::{CategoryId, Expense};
use crate::errors::AppResult;
use crate::reconciliation::CategorizationSuggestion;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use http::HttpServices;

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of the expense registration call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterExpenseRequest {
    pub name: String,
    pub category_id: CategoryId,
    pub amount: Decimal,
    /// ISO calendar date (YYYY-MM-DD)
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub description: String,
}

/// One expense line as the advisor sees it (category by label)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorExpense {
    pub name: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub monthly_income: Decimal,
    pub expenses: Vec<AdvisorExpense>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_goals: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    pub summary: String,
}

// ============================================================================
// SERVICE TRAITS
// ============================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for an opaque bearer token
    async fn login(&self, credentials: &Credentials) -> AppResult<String>;
}

#[async_trait]
pub trait ExpenseRegistrar: Send + Sync {
    /// Persist an expense remotely and return the server's echo
    async fn register(&self, token: &str, request: &RegisterExpenseRequest) -> AppResult<Expense>;
}

#[async_trait]
pub trait ExpenseCategorizer: Send + Sync {
    async fn categorize(&self, description: &str) -> AppResult<CategorizationSuggestion>;
}

#[async_trait]
pub trait SavingsAdvisor: Send + Sync {
    async fn recommend(&self, request: &RecommendationRequest) -> AppResult<RecommendationReport>;
}

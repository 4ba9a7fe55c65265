// 💵 Expense & Income Records
//
// Both record kinds are immutable once created. Expenses come back from the
// remote registration service with a server-assigned id; incomes are purely
// local and get a UUID.

use super::category::CategoryId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// DATED TRAIT
// ============================================================================

/// Anything that can be time-filtered and summed
pub trait Dated {
    fn date(&self) -> NaiveDate;
    fn amount(&self) -> Decimal;
}

// ============================================================================
// EXPENSE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Opaque id assigned by the registration service
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(alias = "categoryId")]
    pub category: CategoryId,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Registration backends echo ids either as strings or as integers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

// ============================================================================
// INCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl Income {
    /// Create a local income record with a fresh UUID
    pub fn new(source: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Income {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            amount,
            date,
        }
    }
}

impl Dated for Income {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

// 📊 Filter & Aggregation Engine
//
// Everything in this module is a pure function of (records, categories,
// filter selections). Nothing is cached, so a result can never go stale
// relative to the store it was computed from.
//
// Money is summed as Decimal; 0.1 + 0.2 is exactly 0.3 here. Every sum is
// checked: a total past Decimal's range is an error, never a panic.

use crate::entities::{Category, CategoryId, Dated, Expense};
use crate::errors::{AppError, AppResult};
use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Sentinel used by every filter for "no restriction"
pub const ALL: &str = "all";

// ============================================================================
// FILTER SELECTIONS
// ============================================================================

/// Calendar-year selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

/// Month selection, zero-based (0 = January)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(CategoryId),
}

impl YearFilter {
    pub fn matches(&self, date: impl Datelike) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(year) => date.year() == *year,
        }
    }
}

impl MonthFilter {
    pub fn matches(&self, date: impl Datelike) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(month) => date.month0() == *month,
        }
    }
}

impl CategoryFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(id) => expense.category == *id,
        }
    }
}

/// Error for a filter value that is neither "all" nor a valid number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid filter value: {}", self.0)
    }
}

impl std::error::Error for FilterParseError {}

impl FromStr for YearFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            return Ok(YearFilter::All);
        }
        s.parse()
            .map(YearFilter::Year)
            .map_err(|_| FilterParseError(s.to_string()))
    }
}

impl FromStr for MonthFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            return Ok(MonthFilter::All);
        }
        match s.parse::<u32>() {
            Ok(month) if month < 12 => Ok(MonthFilter::Month(month)),
            _ => Err(FilterParseError(s.to_string())),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            return Ok(CategoryFilter::All);
        }
        s.parse()
            .map(CategoryFilter::Category)
            .map_err(|_| FilterParseError(s.to_string()))
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str(ALL),
            YearFilter::Year(year) => write!(f, "{}", year),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(ALL),
            MonthFilter::Month(month) => write!(f, "{}", month),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL),
            CategoryFilter::Category(id) => write!(f, "{}", id),
        }
    }
}

macro_rules! string_conversions {
    ($($filter:ty),*) => {
        $(
            impl TryFrom<String> for $filter {
                type Error = FilterParseError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl From<$filter> for String {
                fn from(value: $filter) -> String {
                    value.to_string()
                }
            }
        )*
    };
}

string_conversions!(YearFilter, MonthFilter, CategoryFilter);

/// Year + month pair applied to a record list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeFilter {
    #[serde(default)]
    pub year: YearFilter,
    #[serde(default)]
    pub month: MonthFilter,
}

impl TimeFilter {
    pub fn new(year: YearFilter, month: MonthFilter) -> Self {
        TimeFilter { year, month }
    }

    pub fn matches<R: Dated>(&self, record: &R) -> bool {
        let date = record.date();
        self.year.matches(date) && self.month.matches(date)
    }
}

// ============================================================================
// FILTERS
// ============================================================================

/// Records whose date falls in the selected year and month
pub fn time_filtered<R: Dated + Clone>(records: &[R], filter: TimeFilter) -> Vec<R> {
    records
        .iter()
        .filter(|r| filter.matches(*r))
        .cloned()
        .collect()
}

/// Narrow an already time-filtered expense list to one category
pub fn category_filtered(expenses: &[Expense], filter: CategoryFilter) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Years present in the records, newest first, behind the "all" sentinel
pub fn distinct_years<R: Dated>(records: &[R]) -> Vec<String> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.date().year()).collect();

    std::iter::once(ALL.to_string())
        .chain(years.into_iter().rev().map(|y| y.to_string()))
        .collect()
}

// ============================================================================
// TOTALS
// ============================================================================

pub fn sum<R: Dated>(records: &[R]) -> AppResult<Decimal> {
    checked_total(records.iter().map(Dated::amount))
}

fn checked_total<I: IntoIterator<Item = Decimal>>(amounts: I) -> AppResult<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or(AppError::Overflow("total"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub balance: Decimal,
}

impl Totals {
    /// Totals over already time-filtered expense and income sets
    pub fn from_filtered<E: Dated, I: Dated>(expenses: &[E], incomes: &[I]) -> AppResult<Self> {
        let total_expenses = sum(expenses)?;
        let total_income = sum(incomes)?;
        let balance = total_income
            .checked_sub(total_expenses)
            .ok_or(AppError::Overflow("balance"))?;

        Ok(Totals {
            total_expenses,
            total_income,
            balance,
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "Income ${:.2}, expenses ${:.2}, balance ${:.2}",
            self.total_income, self.total_expenses, self.balance
        )
    }
}

/// Apply each side's time filter and total both
pub fn totals<E, I>(
    expenses: &[E],
    incomes: &[I],
    expense_filter: TimeFilter,
    income_filter: TimeFilter,
) -> AppResult<Totals>
where
    E: Dated + Clone,
    I: Dated + Clone,
{
    Totals::from_filtered(
        &time_filtered(expenses, expense_filter),
        &time_filtered(incomes, income_filter),
    )
}

// ============================================================================
// DISTRIBUTION
// ============================================================================

/// One chart slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: CategoryId,
    pub label: String,
    pub value: Decimal,
    /// Share of the total, rounded to a whole percent
    pub percent: u32,
}

/// Per-category spend in registry order, zero slices dropped
pub fn distribution(expenses: &[Expense], categories: &[Category]) -> AppResult<Vec<CategorySlice>> {
    let mut slices: Vec<(&Category, Decimal)> = Vec::new();
    for category in categories {
        let value = checked_total(
            expenses
                .iter()
                .filter(|e| e.category == category.id)
                .map(|e| e.amount),
        )?;
        if !value.is_zero() {
            slices.push((category, value));
        }
    }

    let total = checked_total(slices.iter().map(|(_, value)| *value))?;

    Ok(slices
        .into_iter()
        .map(|(category, value)| CategorySlice {
            category: category.id,
            label: category.label.clone(),
            value,
            percent: percent_of(value, total),
        })
        .collect())
}

// divide first: the ratio is at most 1, so scaling it by 100 cannot overflow
fn percent_of(value: Decimal, total: Decimal) -> u32 {
    value
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| percent.round().to_u32())
        .unwrap_or(0)
}

// ============================================================================
// TESTS
// ============================================================================

// 📤 CSV Export - The filtered expense table as a spreadsheet

use crate::entities::{CategoryRegistry, Expense};
use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ExpenseRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
}

/// Render expenses (already filtered) as CSV, amounts with two decimals
///
/// Expenses whose category has vanished from the registry export with an
/// empty category cell rather than failing the whole export.
pub fn expenses_to_csv(expenses: &[Expense], registry: &CategoryRegistry) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for expense in expenses {
        writer.serialize(ExpenseRow {
            date: expense.date.format("%Y-%m-%d").to_string(),
            name: &expense.name,
            category: registry.label_of(expense.category).unwrap_or(""),
            amount: format!("{:.2}", expense.amount),
        })?;
    }

    if expenses.is_empty() {
        writer.write_record(["Date", "Name", "Category", "Amount"])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Config(format!("export is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CategoryId;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_export_rows() {
        let registry = CategoryRegistry::with_defaults();
        let expenses = vec![
            Expense {
                id: "1".to_string(),
                name: "Dinner, downtown".to_string(),
                category: CategoryId(1),
                amount: Decimal::new(55, 0),
                date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            },
            Expense {
                id: "2".to_string(),
                name: "Mystery".to_string(),
                category: CategoryId(404),
                amount: Decimal::new(652, 1),
                date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            },
        ];

        let csv = expenses_to_csv(&expenses, &registry).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Date,Name,Category,Amount");
        assert_eq!(lines[1], "2024-06-15,\"Dinner, downtown\",Food,55.00");
        assert_eq!(lines[2], "2024-06-10,Mystery,,65.20");
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let registry = CategoryRegistry::with_defaults();
        let csv = expenses_to_csv(&[], &registry).unwrap();
        assert_eq!(csv.trim_end(), "Date,Name,Category,Amount");
    }
}

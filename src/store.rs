// 🗂️ Record Store - In-memory expenses and incomes for one session
//
// Newest record first, matching how the dashboard tables list them.
// Nothing here outlives the session; there is no delete.

use crate::entities::{Expense, Income};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    expenses: Vec<Expense>,
    incomes: Vec<Income>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store, e.g. with records loaded for a demo session
    pub fn with_records(expenses: Vec<Expense>, incomes: Vec<Income>) -> Self {
        RecordStore { expenses, incomes }
    }

    /// New expense becomes the head of the list
    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.insert(0, expense);
    }

    /// New income becomes the head of the list
    pub fn add_income(&mut self, income: Income) {
        self.incomes.insert(0, income);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn incomes(&self) -> &[Income] {
        &self.incomes
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.incomes.is_empty()
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Amount;

pub type ExpenseId = i64;

/// An operating cost (ice, milk, rent...). Recorded once, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    /// Always positive
    pub amount: Amount,
    pub timestamp: NaiveDateTime,
}

impl Expense {
    /// Create a new expense. The id must be assigned by the repository.
    pub fn new(description: impl Into<String>, amount: Amount, timestamp: NaiveDateTime) -> Self {
        Self {
            id: 0,
            description: description.into().trim().to_string(),
            amount,
            timestamp,
        }
    }
}

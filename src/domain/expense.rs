use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Amount;

pub type ExpenseId = i64;

/// A stored spending record.
///
/// `category` is a snapshot of the category label at entry time. It is not
/// tied to the `Categories` table, so deleting a category leaves existing
/// expenses untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub amount: Amount,
    pub payment_method: String,
    pub category: String,
    pub date: String,
}

/// An expense about to be recorded. Carries no id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub name: String,
    pub amount: Amount,
    pub payment_method: String,
    pub category: String,
    pub date: String,
}

impl NewExpense {
    pub fn new(
        name: impl Into<String>,
        amount: Amount,
        payment_method: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            payment_method: payment_method.into(),
            category: category.into(),
            date: date.into(),
        }
    }
}

/// The listing view of an expense: what the expense history shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub name: String,
    pub amount: Amount,
    pub date: String,
}

impl From<Expense> for ExpenseEntry {
    fn from(expense: Expense) -> Self {
        Self {
            name: expense.name,
            amount: expense.amount,
            date: expense.date,
        }
    }
}

/// Render a date the way expenses store it: `year-month-day` without zero
/// padding, e.g. `2024-3-7`.
pub fn format_entry_date(date: NaiveDate) -> String {
    date.format("%Y-%-m-%-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry_date_is_not_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_entry_date(date), "2024-3-7");
    }

    #[test]
    fn test_format_entry_date_two_digit_parts() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(format_entry_date(date), "2023-12-25");
    }

    #[test]
    fn test_entry_from_expense_keeps_listing_fields() {
        let expense = Expense {
            id: 4,
            name: "Coffee".into(),
            amount: 3.5,
            payment_method: "card".into(),
            category: "food".into(),
            date: "2024-1-2".into(),
        };

        let entry = ExpenseEntry::from(expense);
        assert_eq!(entry.name, "Coffee");
        assert_eq!(entry.amount, 3.5);
        assert_eq!(entry.date, "2024-1-2");
    }
}

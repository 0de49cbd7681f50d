use serde::{Deserialize, Serialize};

use crate::domain::{NewExpense, parse_amount};

use super::AppError;

/// Notification shown after an expense is recorded.
pub const EXPENSE_ADDED: &str = "Expense added!";

/// Raw input of the add-expense screen, exactly as the user typed it.
///
/// The ledger stores whatever it is given; this is where input gets checked
/// before it reaches [`LedgerService::insert_expense`](super::LedgerService::insert_expense).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub name: String,
    pub amount: String,
    pub payment_method: String,
    pub category: String,
    pub date: String,
}

impl ExpenseForm {
    /// Check the form and turn it into an expense ready to record.
    ///
    /// Amount text that is not a number counts as zero. Every text field must
    /// be non-empty (whitespace counts as content) and the amount must be
    /// positive. Accepted fields are passed through untouched.
    pub fn validate(&self) -> Result<NewExpense, AppError> {
        let amount = parse_amount(&self.amount).unwrap_or(0.0);

        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if amount <= 0.0 {
            missing.push("amount");
        }
        if self.payment_method.is_empty() {
            missing.push("payment method");
        }
        if self.category.is_empty() {
            missing.push("category");
        }
        if self.date.is_empty() {
            missing.push("date");
        }

        if !missing.is_empty() {
            tracing::warn!(?missing, "failed to add expense - missing input");
            return Err(AppError::IncompleteForm { missing });
        }

        Ok(NewExpense::new(
            self.name.clone(),
            amount,
            self.payment_method.clone(),
            self.category.clone(),
            self.date.clone(),
        ))
    }
}

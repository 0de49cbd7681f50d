// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use outlay::application::LedgerService;
use outlay::domain::NewExpense;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("budget.db");
    let service = LedgerService::open(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to build an expense with placeholder method and category
pub fn expense(name: &str, amount: f64, date: &str) -> NewExpense {
    NewExpense::new(name, amount, "card", "food", date)
}

/// Record several expenses in order
pub async fn record_all(service: &LedgerService, expenses: &[NewExpense]) -> Result<()> {
    for e in expenses {
        service.insert_expense(e.clone()).await?;
    }
    Ok(())
}

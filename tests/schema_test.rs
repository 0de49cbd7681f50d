mod common;

use anyhow::Result;
use common::test_service;
use outlay::application::{AppError, LedgerService};
use outlay::storage::{Repository, SCHEMA_VERSION};
use tempfile::TempDir;

#[tokio::test]
async fn test_new_database_is_stamped() -> Result<()> {
    let temp = TempDir::new()?;
    let url = format!("sqlite:{}?mode=rwc", temp.path().join("fresh.db").display());

    let repo = Repository::connect(&url).await?;
    assert_eq!(repo.schema_version().await?, 0);
    repo.migrate().await?;
    assert_eq!(repo.schema_version().await?, SCHEMA_VERSION);

    // Running again is a no-op
    repo.migrate().await?;
    assert_eq!(repo.schema_version().await?, SCHEMA_VERSION);
    repo.close().await;
    Ok(())
}

#[tokio::test]
async fn test_reopen_keeps_data() -> Result<()> {
    let (service, temp) = test_service().await?;
    assert!(service.insert_category("food").await);
    service.close().await;

    let path = temp.path().join("budget.db");
    let service = LedgerService::open(path.to_str().unwrap()).await?;
    assert_eq!(service.get_all_categories().await?, vec!["food"]);
    service.close().await;
    Ok(())
}

#[tokio::test]
async fn test_newer_schema_is_refused() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("future.db");
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let pool = sqlx::SqlitePool::connect(&url).await?;
    sqlx::query("PRAGMA user_version = 99").execute(&pool).await?;
    pool.close().await;

    match LedgerService::open(path.to_str().unwrap()).await {
        Err(AppError::UnsupportedSchema { found, supported }) => {
            assert_eq!(found, 99);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        Err(other) => panic!("expected UnsupportedSchema, got {:?}", other),
        Ok(_) => panic!("expected UnsupportedSchema, got an open ledger"),
    }
    Ok(())
}

#[tokio::test]
async fn test_unstamped_database_keeps_existing_rows() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("unstamped.db");
    let url = format!("sqlite:{}?mode=rwc", path.display());

    // Same layout, written before versions were stamped
    let pool = sqlx::SqlitePool::connect(&url).await?;
    sqlx::query(outlay::storage::MIGRATION_001_INITIAL)
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO Categories (name) VALUES ('food')")
        .execute(&pool)
        .await?;
    sqlx::query(
        "INSERT INTO expenses (name, amount, payment_method, category, date) \
         VALUES ('Lunch', 9.5, 'cash', 'food', '2024-1-5')",
    )
    .execute(&pool)
    .await?;
    pool.close().await;

    let service = LedgerService::open(path.to_str().unwrap()).await?;
    assert_eq!(service.get_all_categories().await?, vec!["food"]);
    assert_eq!(service.get_total_expenses().await?, 9.5);
    service.close().await;

    let repo = Repository::connect(&url).await?;
    assert_eq!(repo.schema_version().await?, SCHEMA_VERSION);
    repo.close().await;
    Ok(())
}

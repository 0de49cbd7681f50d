mod common;

use anyhow::Result;
use common::{expense, record_all, test_service};
use outlay::domain::{Category, Expense};
use outlay::io::{Exporter, LedgerSnapshot};

#[tokio::test]
async fn test_export_expenses_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    record_all(
        &service,
        &[
            expense("Lunch", 12.5, "2024-5-1"),
            expense("Taxi, late", 30.0, "2024-5-2"),
        ],
    )
    .await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service)
        .export_expenses_csv(&mut buffer)
        .await?;
    assert_eq!(count, 2);

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers()?.clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "name", "amount", "payment_method", "category", "date"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    // Newest first, embedded comma survives quoting
    assert_eq!(&rows[0][1], "Taxi, late");
    assert_eq!(&rows[0][2], "30");
    assert_eq!(&rows[1][1], "Lunch");
    assert_eq!(&rows[1][5], "2024-5-1");
    Ok(())
}

#[tokio::test]
async fn test_export_expenses_json() -> Result<()> {
    let (service, _temp) = test_service().await?;
    record_all(&service, &[expense("Lunch", 12.5, "2024-5-1")]).await?;

    let mut buffer = Vec::new();
    Exporter::new(&service)
        .export_expenses_json(&mut buffer)
        .await?;

    let expenses: Vec<Expense> = serde_json::from_slice(&buffer)?;
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].name, "Lunch");
    assert_eq!(expenses[0].payment_method, "card");
    Ok(())
}

#[tokio::test]
async fn test_export_categories() -> Result<()> {
    let (service, _temp) = test_service().await?;
    assert!(service.insert_category("Food").await);
    assert!(service.insert_category("Rent").await);

    let mut csv_buffer = Vec::new();
    let count = Exporter::new(&service)
        .export_categories_csv(&mut csv_buffer)
        .await?;
    assert_eq!(count, 2);
    let text = String::from_utf8(csv_buffer)?;
    assert!(text.starts_with("id,name\n"));
    assert!(text.contains(",food\n"));
    assert!(text.contains(",rent\n"));

    let mut json_buffer = Vec::new();
    Exporter::new(&service)
        .export_categories_json(&mut json_buffer)
        .await?;
    let categories: Vec<Category> = serde_json::from_slice(&json_buffer)?;
    assert_eq!(categories.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_export_full_snapshot() -> Result<()> {
    let (service, _temp) = test_service().await?;
    assert!(service.insert_category("food").await);
    record_all(&service, &[expense("Lunch", 12.5, "2024-5-1")]).await?;

    let mut buffer = Vec::new();
    let snapshot = Exporter::new(&service).export_full_json(&mut buffer).await?;
    assert_eq!(snapshot.categories.len(), 1);
    assert_eq!(snapshot.expenses.len(), 1);

    let parsed: LedgerSnapshot = serde_json::from_slice(&buffer)?;
    assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(parsed.expenses[0].amount, 12.5);
    Ok(())
}

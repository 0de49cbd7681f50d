use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Category, Expense};

/// Ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub categories: Vec<Category>,
    pub expenses: Vec<Expense>,
}

/// What to export and in which format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    ExpensesCsv,
    ExpensesJson,
    CategoriesCsv,
    CategoriesJson,
    /// Whole ledger snapshot, always JSON
    FullJson,
}

impl ExportTarget {
    /// Resolve an export type and optional format. The format defaults to
    /// csv for expenses and categories and to json for the full snapshot.
    pub fn parse(export_type: &str, format: Option<&str>) -> Result<Self> {
        match (export_type, format) {
            ("expenses", None | Some("csv")) => Ok(Self::ExpensesCsv),
            ("expenses", Some("json")) => Ok(Self::ExpensesJson),
            ("categories", None | Some("csv")) => Ok(Self::CategoriesCsv),
            ("categories", Some("json")) => Ok(Self::CategoriesJson),
            ("full", None | Some("json")) => Ok(Self::FullJson),
            ("full", Some(fmt)) => {
                anyhow::bail!("Invalid format '{}' for full export. Valid formats: json", fmt)
            }
            ("expenses" | "categories", Some(fmt)) => {
                anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", fmt)
            }
            (other, _) => anyhow::bail!(
                "Invalid export type '{}'. Valid types: expenses, categories, full",
                other
            ),
        }
    }
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Write the given target, returning the number of records exported.
    pub async fn export<W: Write>(&self, target: ExportTarget, writer: W) -> Result<usize> {
        match target {
            ExportTarget::ExpensesCsv => self.export_expenses_csv(writer).await,
            ExportTarget::ExpensesJson => self.export_expenses_json(writer).await,
            ExportTarget::CategoriesCsv => self.export_categories_csv(writer).await,
            ExportTarget::CategoriesJson => self.export_categories_json(writer).await,
            ExportTarget::FullJson => {
                let snapshot = self.export_full_json(writer).await?;
                Ok(snapshot.categories.len() + snapshot.expenses.len())
            }
        }
    }

    /// Export expenses to CSV format, most recently inserted first
    pub async fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let expenses = self.service.list_expenses().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "name",
            "amount",
            "payment_method",
            "category",
            "date",
        ])?;

        for expense in &expenses {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.name.clone(),
                expense.amount.to_string(),
                expense.payment_method.clone(),
                expense.category.clone(),
                expense.date.clone(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(expenses.len())
    }

    /// Export expenses as a JSON array
    pub async fn export_expenses_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let expenses = self.service.list_expenses().await?;
        serde_json::to_writer_pretty(&mut writer, &expenses)?;
        writer.flush()?;
        Ok(expenses.len())
    }

    /// Export categories to CSV format
    pub async fn export_categories_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let categories = self.service.list_categories().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "name"])?;
        for category in &categories {
            csv_writer.write_record([category.id.to_string(), category.name.clone()])?;
        }

        csv_writer.flush()?;
        Ok(categories.len())
    }

    /// Export categories as a JSON array
    pub async fn export_categories_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let categories = self.service.list_categories().await?;
        serde_json::to_writer_pretty(&mut writer, &categories)?;
        writer.flush()?;
        Ok(categories.len())
    }

    /// Export the whole ledger as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            categories: self.service.list_categories().await?,
            expenses: self.service.list_expenses().await?,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;

        Ok(snapshot)
    }
}

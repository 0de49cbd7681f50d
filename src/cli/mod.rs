use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::{AppError, EXPENSE_ADDED, ExpenseForm, LedgerService};
use crate::domain::{format_amount, format_entry_date};

/// Outlay - Expense Ledger
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Record expenses, manage categories and keep a running total")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "OUTLAY_DATABASE", default_value = "budget.db")]
    pub database: String,

    /// Append log lines to this file instead of stderr
    #[arg(long, env = "OUTLAY_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Show the sum of all expenses
    Total,

    /// Show the amount of the most recently added expense
    Latest,

    /// Export data to CSV or JSON
    Export {
        /// What to export: expenses, categories, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv; full is always json)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add a category (stored trimmed and lowercased)
    Add {
        /// Category name
        name: String,
    },

    /// List all categories
    List,

    /// Delete a category
    Delete {
        /// Category name (matched case-insensitively)
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What the money was spent on
        #[arg(short, long, default_value = "")]
        name: String,

        /// Amount spent (e.g., "12.50"), must be positive
        #[arg(short, long, default_value = "")]
        amount: String,

        /// Payment method (e.g., "cash", "card")
        #[arg(short, long, default_value = "")]
        method: String,

        /// Category label
        #[arg(short, long, default_value = "")]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List expenses, most recently added first
    List {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let service = LedgerService::open(&self.database).await?;
        // Close the ledger whether or not the command succeeded
        let result = run_command(&service, self.command, &self.database).await;
        service.close().await;
        result
    }
}

async fn run_command(service: &LedgerService, command: Commands, database: &str) -> Result<()> {
    match command {
        Commands::Init => println!("Database initialized: {}", database),
        Commands::Category(cmd) => run_category_command(service, cmd).await?,
        Commands::Expense(cmd) => run_expense_command(service, cmd).await?,
        Commands::Total => {
            let total = service.get_total_expenses().await?;
            println!("Total expenses: {}", format_amount(total));
        }
        Commands::Latest => {
            let latest = service.get_latest_expense().await?;
            println!("Latest expense: {}", format_amount(latest));
        }
        Commands::Export {
            export_type,
            output,
            format,
        } => {
            run_export_command(service, &export_type, output.as_deref(), format.as_deref())
                .await?
        }
    }
    Ok(())
}

async fn run_category_command(service: &LedgerService, cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::Add { name } => match service.add_category(&name).await {
            Ok(category) => println!("Added category: {}", category.name),
            Err(AppError::CategoryAlreadyExists(name)) => {
                println!("Category already exists: {}", name)
            }
            Err(AppError::InvalidCategoryName(_)) => println!("Category name cannot be blank"),
            Err(err) => return Err(err.into()),
        },
        CategoryCommands::List => {
            let categories = service.get_all_categories().await?;
            if categories.is_empty() {
                println!("No categories found.");
            } else {
                for name in categories {
                    println!("{}", name);
                }
            }
        }
        CategoryCommands::Delete { name } => {
            if service.delete_category(&name).await? {
                println!("Deleted category: {}", name.trim().to_lowercase());
            } else {
                println!("Category not found: {}", name);
            }
        }
    }
    Ok(())
}

async fn run_expense_command(service: &LedgerService, cmd: ExpenseCommands) -> Result<()> {
    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            method,
            category,
            date,
        } => {
            let date = match date {
                Some(d) => {
                    let parsed = NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                        .context("Invalid date format. Use YYYY-MM-DD")?;
                    format_entry_date(parsed)
                }
                None => format_entry_date(Local::now().date_naive()),
            };

            let form = ExpenseForm {
                name,
                amount,
                payment_method: method,
                category,
                date,
            };
            tracing::debug!(?form, "attempting to add expense");

            match form.validate() {
                Ok(expense) => {
                    service.insert_expense(expense).await?;
                    println!("{}", EXPENSE_ADDED);
                }
                Err(err @ AppError::IncompleteForm { .. }) => println!("{}", err),
                Err(err) => return Err(err.into()),
            }
        }
        ExpenseCommands::List { format } => {
            let expenses = service.get_all_expenses().await?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&expenses)?),
                "csv" => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    writer.write_record(["name", "amount", "date"])?;
                    for entry in &expenses {
                        writer.write_record([
                            entry.name.clone(),
                            entry.amount.to_string(),
                            entry.date.clone(),
                        ])?;
                    }
                    writer.flush()?;
                }
                "table" => {
                    if expenses.is_empty() {
                        println!("No expenses found.");
                    } else {
                        println!("{:<12} {:<30} {:>12}", "DATE", "NAME", "AMOUNT");
                        println!("{}", "-".repeat(56));
                        for entry in &expenses {
                            println!(
                                "{:<12} {:<30} {:>12}",
                                entry.date,
                                entry.name,
                                format_amount(entry.amount)
                            );
                        }
                    }
                }
                other => {
                    anyhow::bail!("Invalid format '{}'. Valid formats: table, json, csv", other)
                }
            }
        }
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::{ExportTarget, Exporter};
    use std::fs::File;
    use std::io::{Write, stdout};

    // Resolve the target before touching the output file
    let target = ExportTarget::parse(export_type, format)?;

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = Exporter::new(service).export(target, writer).await?;

    if output.is_some() {
        eprintln!("Exported {} {} records", count, export_type);
    }
    Ok(())
}

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::domain::{Amount, Category, CategoryId, Expense, ExpenseId, NewExpense};

use super::{MIGRATION_001_INITIAL, SCHEMA_VERSION};

/// Repository for persisting and querying categories and expenses.
///
/// Holds a pool capped at a single connection: every call borrows that
/// connection for one statement and hands it back when the call returns,
/// on error paths too. Concurrent callers queue on the pool.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL, e.g. `sqlite:budget.db?mode=rwc`
    /// or `sqlite::memory:`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        // The connection is never recycled: an in-memory database lives
        // exactly as long as its one connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Read the schema version stamped in the database file.
    pub async fn schema_version(&self) -> Result<i64> {
        let version: i64 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await
            .context("Failed to read schema version")?;
        Ok(version)
    }

    /// Run database migrations.
    ///
    /// Unstamped files get the schema and the current version. A file stamped
    /// with a newer version than this build knows is refused.
    pub async fn migrate(&self) -> Result<()> {
        let version = self.schema_version().await?;

        if version > SCHEMA_VERSION {
            anyhow::bail!(
                "Database schema version {} is newer than supported version {}",
                version,
                SCHEMA_VERSION
            );
        }

        if version == SCHEMA_VERSION {
            return Ok(());
        }

        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
            .execute(&self.pool)
            .await
            .context("Failed to stamp schema version")?;

        tracing::debug!(version = SCHEMA_VERSION, "schema ready");
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close the underlying connection. Pending calls finish first.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================
    // Category operations
    // ========================

    /// Save a category name as given; callers normalize it first.
    /// Returns `None` when the name is already taken.
    pub async fn insert_category(&self, name: &str) -> Result<Option<CategoryId>> {
        let result = sqlx::query("INSERT INTO Categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(Some(done.last_insert_rowid())),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(None),
            Err(err) => Err(err).context("Failed to save category"),
        }
    }

    /// List category names in storage order.
    pub async fn list_category_names(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM Categories")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")?;

        rows.iter()
            .map(|row| row.try_get("name").context("Invalid category name"))
            .collect()
    }

    /// List categories with their ids, in storage order.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM Categories")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")?;

        rows.iter().map(Self::row_to_category).collect()
    }

    /// Delete categories with exactly this name. Returns the number of rows removed.
    pub async fn delete_category(&self, name: &str) -> Result<u64> {
        let done = sqlx::query("DELETE FROM Categories WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;
        Ok(done.rows_affected())
    }

    fn row_to_category(row: &SqliteRow) -> Result<Category> {
        Ok(Category {
            id: row.try_get("id").context("Invalid category ID")?,
            name: row.try_get("name").context("Invalid category name")?,
        })
    }

    // ========================
    // Expense operations
    // ========================

    /// Save a new expense as given. Returns the assigned id.
    pub async fn insert_expense(&self, expense: &NewExpense) -> Result<ExpenseId> {
        let done = sqlx::query(
            r#"
            INSERT INTO expenses (name, amount, payment_method, category, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.name)
        .bind(expense.amount)
        .bind(&expense.payment_method)
        .bind(&expense.category)
        .bind(&expense.date)
        .execute(&self.pool)
        .await
        .context("Failed to save expense")?;

        Ok(done.last_insert_rowid())
    }

    /// List all expenses, most recently inserted first.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, amount, payment_method, category, date
            FROM expenses
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Amount of the most recently inserted expense, if any.
    pub async fn latest_expense_amount(&self) -> Result<Option<Amount>> {
        let amount: Option<Amount> =
            sqlx::query_scalar("SELECT amount FROM expenses ORDER BY id DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await
                .context("Failed to fetch latest expense")?;
        Ok(amount)
    }

    /// Sum of all expense amounts using SQL aggregation.
    /// `TOTAL` yields 0.0 on an empty table, where `SUM` would yield NULL.
    pub async fn total_expenses(&self) -> Result<Amount> {
        let total: Amount = sqlx::query_scalar("SELECT TOTAL(amount) FROM expenses")
            .fetch_one(&self.pool)
            .await
            .context("Failed to compute total expenses")?;
        Ok(total)
    }

    /// Count stored expenses.
    pub async fn count_expenses(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count expenses")?;
        Ok(count)
    }

    fn row_to_expense(row: &SqliteRow) -> Result<Expense> {
        Ok(Expense {
            id: row.try_get("id").context("Invalid expense ID")?,
            name: row.try_get("name").context("Invalid expense name")?,
            amount: row.try_get("amount").context("Invalid expense amount")?,
            payment_method: row
                .try_get("payment_method")
                .context("Invalid payment method")?,
            category: row.try_get("category").context("Invalid expense category")?,
            date: row.try_get("date").context("Invalid expense date")?,
        })
    }
}

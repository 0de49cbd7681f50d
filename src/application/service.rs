use crate::domain::{
    Amount, Category, Expense, ExpenseEntry, ExpenseId, NewExpense, normalize_category_name,
};
use crate::storage::{Repository, SCHEMA_VERSION};

use super::AppError;

/// Application service providing the expense ledger operations.
/// This is the primary interface for any client (CLI, UI screens, etc.).
///
/// One service owns the ledger's single database handle. Open it once with
/// [`LedgerService::open`], share it by reference, and [`close`](Self::close)
/// it on shutdown.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the ledger at the given path, creating the file and schema if
    /// needed.
    pub async fn open(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        Self::init(&db_url).await
    }

    /// Open a private, empty ledger that lives in memory.
    pub async fn open_in_memory() -> Result<Self, AppError> {
        Self::init("sqlite::memory:").await
    }

    async fn init(db_url: &str) -> Result<Self, AppError> {
        let repo = Repository::connect(db_url).await?;

        let found = repo.schema_version().await?;
        if found > SCHEMA_VERSION {
            repo.close().await;
            return Err(AppError::UnsupportedSchema {
                found,
                supported: SCHEMA_VERSION,
            });
        }

        repo.migrate().await?;
        tracing::debug!(url = db_url, "ledger opened");
        Ok(Self::new(repo))
    }

    /// Release the database handle.
    pub async fn close(self) {
        self.repo.close().await;
        tracing::debug!("ledger closed");
    }

    // ========================
    // Category operations
    // ========================

    /// Create a category. The name is trimmed and lowercased first.
    pub async fn add_category(&self, name: &str) -> Result<Category, AppError> {
        let normalized = normalize_category_name(name)
            .ok_or_else(|| AppError::InvalidCategoryName(name.to_string()))?;

        match self.repo.insert_category(&normalized).await? {
            Some(id) => {
                tracing::debug!(id, name = %normalized, "category added");
                Ok(Category {
                    id,
                    name: normalized,
                })
            }
            None => Err(AppError::CategoryAlreadyExists(normalized)),
        }
    }

    /// Insert a category, reporting only whether it was stored.
    ///
    /// Blank names and duplicates give `false`. Storage failures are logged
    /// and also give `false`; use [`add_category`](Self::add_category) to see
    /// them.
    pub async fn insert_category(&self, name: &str) -> bool {
        match self.add_category(name).await {
            Ok(_) => true,
            Err(AppError::CategoryAlreadyExists(name)) => {
                tracing::debug!(%name, "category already exists");
                false
            }
            Err(AppError::InvalidCategoryName(_)) => false,
            Err(err) => {
                tracing::error!("failed to insert category {:?}: {:#}", name, err);
                false
            }
        }
    }

    /// Every stored category name, in storage order.
    pub async fn get_all_categories(&self) -> Result<Vec<String>, AppError> {
        Ok(self.repo.list_category_names().await?)
    }

    /// Every stored category with its id, in storage order.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list_categories().await?)
    }

    /// Delete a category by name, normalized the same way as on insert.
    /// Returns whether anything was removed. Expenses filed under the
    /// category keep their label.
    pub async fn delete_category(&self, name: &str) -> Result<bool, AppError> {
        let Some(normalized) = normalize_category_name(name) else {
            return Ok(false);
        };

        let removed = self.repo.delete_category(&normalized).await?;
        tracing::debug!(name = %normalized, removed, "category delete");
        Ok(removed > 0)
    }

    // ========================
    // Expense operations
    // ========================

    /// Record an expense exactly as given. Input checks belong to the caller,
    /// see [`ExpenseForm`](super::ExpenseForm).
    pub async fn insert_expense(&self, expense: NewExpense) -> Result<ExpenseId, AppError> {
        let id = self.repo.insert_expense(&expense).await?;
        tracing::info!(
            id,
            name = %expense.name,
            amount = expense.amount,
            method = %expense.payment_method,
            category = %expense.category,
            date = %expense.date,
            "expense added"
        );
        Ok(id)
    }

    /// All expenses as listing entries, most recently inserted first.
    pub async fn get_all_expenses(&self) -> Result<Vec<ExpenseEntry>, AppError> {
        let expenses = self.repo.list_expenses().await?;
        Ok(expenses.into_iter().map(ExpenseEntry::from).collect())
    }

    /// All expenses as full records, most recently inserted first.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>, AppError> {
        Ok(self.repo.list_expenses().await?)
    }

    /// Amount of the most recently inserted expense, or 0.0 when there is
    /// none. The expense's own date plays no part.
    pub async fn get_latest_expense(&self) -> Result<Amount, AppError> {
        Ok(self.repo.latest_expense_amount().await?.unwrap_or(0.0))
    }

    /// Sum of all expense amounts, 0.0 for an empty ledger.
    pub async fn get_total_expenses(&self) -> Result<Amount, AppError> {
        Ok(self.repo.total_expenses().await?)
    }

    /// Number of recorded expenses.
    pub async fn count_expenses(&self) -> Result<i64, AppError> {
        Ok(self.repo.count_expenses().await?)
    }
}

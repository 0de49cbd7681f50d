use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// A user-defined label for classifying expenses.
/// Names are stored normalized, see [`normalize_category_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Normalize a category name for storage and comparison: surrounding
/// whitespace is trimmed and the result lowercased.
/// Returns `None` when nothing is left after trimming.
pub fn normalize_category_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

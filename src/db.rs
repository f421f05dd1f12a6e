// 🗄️ Expense Store - SQLite persistence
//
// One long-lived connection per store. Every insert is a single autocommit
// statement, so it is durable by the time `insert` returns.

use crate::category::Category;
use crate::error::StoreResult;
use crate::expense::{Expense, NewExpense};
use chrono::{Datelike, NaiveDate};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, Row};
use std::fs;
use std::path::Path;

/// Sentinel shown first in category selectors; selects every category
pub const ALL_CATEGORIES: &str = "All Categories";

/// Create the schema. Safe to run against an existing database.
pub fn setup_database(conn: &Connection) -> StoreResult<()> {
    // Enable WAL mode for crash recovery (in-memory databases report "memory")
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    tracing::debug!(journal_mode = %mode, "journal mode set");

    // ==========================================================================
    // Expenses Table
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            comment TEXT
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category)",
        [],
    )?;

    Ok(())
}

/// Register `iso_week(date)`: ISO-8601 week number of a `YYYY-MM-DD` text,
/// NULL when the text is not a date.
pub fn register_functions(conn: &Connection) -> StoreResult<()> {
    conn.create_scalar_function(
        "iso_week",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let raw: Option<String> = ctx.get(0)?;
            Ok(raw
                .and_then(|s| NaiveDate::parse_from_str(&s, crate::expense::DATE_FORMAT).ok())
                .map(|date| i64::from(date.iso_week().week())))
        },
    )?;

    Ok(())
}

/// Map a `SELECT id, description, category, date, amount, comment` row
pub(crate) fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let comment: Option<String> = row.get(5)?;

    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        category: row.get(2)?,
        date: row.get(3)?,
        amount: row.get(4)?,
        comment: comment.unwrap_or_default(),
    })
}

// ============================================================================
// EXPENSE STORE
// ============================================================================

/// Owns the connection to the expense database.
///
/// Construct once at startup and pass by reference; dropping it closes the
/// connection.
#[derive(Debug)]
pub struct ExpenseStore {
    conn: Connection,
}

impl ExpenseStore {
    /// Open (or create) the database file, creating its directory first
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let store = ExpenseStore {
            conn: Connection::open(path)?,
        };
        store.initialize()?;

        tracing::info!(path = %path.display(), "expense store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let store = ExpenseStore {
            conn: Connection::open_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create table, indexes and SQL functions if missing. Idempotent.
    pub fn initialize(&self) -> StoreResult<()> {
        setup_database(&self.conn)?;
        register_functions(&self.conn)?;
        Ok(())
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Validate and store one expense, returning its new id.
    ///
    /// Validation runs before any write; a rejected expense leaves the table
    /// untouched. Identical inserts are all kept as separate rows.
    pub fn insert(
        &self,
        description: &str,
        category: Category,
        date: &str,
        amount: &str,
        comment: &str,
    ) -> StoreResult<i64> {
        let expense = NewExpense::validate(description, category, date, amount, comment)?;
        self.insert_validated(&expense)
    }

    pub fn insert_validated(&self, expense: &NewExpense) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO expenses (description, category, date, amount, comment)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.description,
                expense.category.as_str(),
                expense.date_string(),
                expense.amount,
                expense.comment,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(
            id,
            category = expense.category.as_str(),
            amount = expense.amount,
            "expense added"
        );

        Ok(id)
    }

    /// Every stored category once, in SQLite's natural order (not sorted)
    pub fn distinct_categories(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT category FROM expenses")?;

        let categories = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(categories)
    }

    /// Category selector entries: the sentinel followed by stored categories
    pub fn category_options(&self) -> StoreResult<Vec<String>> {
        let mut options = vec![ALL_CATEGORIES.to_string()];
        options.extend(self.distinct_categories()?);
        Ok(options)
    }

    pub fn count(&self) -> StoreResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, ValidationError};

    fn store() -> ExpenseStore {
        ExpenseStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_returns_increasing_ids() {
        let store = store();

        let first = store
            .insert("Lunch", Category::Food, "2024-03-15", "12.50", "")
            .unwrap();
        let second = store
            .insert("Lunch", Category::Food, "2024-03-15", "12.50", "")
            .unwrap();

        assert!(second > first);
        // No duplicate detection
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_insert_rejects_empty_description() {
        let store = store();

        let err = store
            .insert("", Category::Food, "2024-03-15", "12.50", "")
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyDescription)
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_accepts_whitespace_description() {
        let store = store();

        let id = store
            .insert(" ", Category::Food, "2024-03-15", "1", "")
            .unwrap();

        let result = store
            .query(&crate::query::ExpenseFilter::new(
                crate::query::TimeFilter::day("2024-03-15").unwrap(),
            ))
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0].id, id);
        assert_eq!(result.rows[0].description, " ");
    }

    #[test]
    fn test_insert_rejects_bad_amount() {
        let store = store();

        let err = store
            .insert("Lunch", Category::Food, "2024-03-15", "twelve", "")
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::InvalidAmount(_))
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_rejects_bad_date() {
        let store = store();

        let err = store
            .insert("Lunch", Category::Food, "03/15/2024", "1", "")
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_initialize_twice_keeps_rows() {
        let store = store();
        store
            .insert("Lunch", Category::Food, "2024-03-15", "12.50", "")
            .unwrap();

        store.initialize().unwrap();
        store.initialize().unwrap();

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_reopen_file_store_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("expenses.db");

        {
            let store = ExpenseStore::open(&path).unwrap();
            store
                .insert("Train", Category::Transport, "2024-03-20", "8,00", "")
                .unwrap();
        }

        let store = ExpenseStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.distinct_categories().unwrap(), vec!["Transport"]);
    }

    #[test]
    fn test_distinct_categories_once_each() {
        let store = store();
        store.insert("a", Category::Food, "2024-01-01", "1", "").unwrap();
        store.insert("b", Category::Health, "2024-01-02", "1", "").unwrap();
        store.insert("c", Category::Food, "2024-01-03", "1", "").unwrap();

        let mut categories = store.distinct_categories().unwrap();
        categories.sort();

        assert_eq!(categories, vec!["Food", "Health"]);
    }

    #[test]
    fn test_distinct_categories_include_foreign_values() {
        let store = store();
        // Rows written by another tool may use categories outside the enum
        store
            .connection()
            .execute(
                "INSERT INTO expenses (description, category, date, amount, comment)
                 VALUES ('Book', 'Education', '2024-01-01', 20.0, NULL)",
                [],
            )
            .unwrap();

        assert_eq!(store.distinct_categories().unwrap(), vec!["Education"]);
        assert_eq!(
            store.category_options().unwrap(),
            vec![ALL_CATEGORIES, "Education"]
        );
    }

    #[test]
    fn test_iso_week_function() {
        let store = store();
        let week: Option<i64> = store
            .connection()
            .query_row("SELECT iso_week('2024-12-30')", [], |row| row.get(0))
            .unwrap();
        let bad: Option<i64> = store
            .connection()
            .query_row("SELECT iso_week('not a date')", [], |row| row.get(0))
            .unwrap();

        // 2024-12-30 is a Monday in ISO week 1 of 2025
        assert_eq!(week, Some(1));
        assert_eq!(bad, None);
    }
}

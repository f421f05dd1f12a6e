// sFinance - Core Library
// Expense store + filter/aggregation engine, shared by the CLI, TUI and API server

pub mod category;
pub mod config;
pub mod db;
pub mod error;
pub mod expense;
pub mod export;
pub mod query;

// Re-export commonly used types
pub use category::Category;
pub use config::{init_logging, Settings};
pub use db::{setup_database, ExpenseStore, ALL_CATEGORIES};
pub use error::{StoreError, StoreResult, ValidationError};
pub use expense::{parse_amount, parse_date, Expense, NewExpense};
pub use export::{export_csv, write_csv};
pub use query::{query, CategoryFilter, CompiledQuery, ExpenseFilter, QueryResult, TimeFilter};

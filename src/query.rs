// 🔎 Filter & Aggregation Engine
//
// A filter is a time window plus an optional category. It compiles to one
// parameterized SELECT; the total is summed while the rows are read.

use crate::db::{expense_from_row, ExpenseStore, ALL_CATEGORIES};
use crate::error::{StoreResult, ValidationError};
use crate::expense::{parse_date, round_cents, Expense, DATE_FORMAT};
use chrono::{Datelike, NaiveDate};
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

const SELECT_EXPENSES: &str =
    "SELECT id, description, category, date, amount, comment FROM expenses WHERE 1=1";

// ============================================================================
// TIME FILTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeFilter {
    /// Exactly this date
    Day { date: NaiveDate },

    /// Same ISO week number as `date`, in ANY year
    Week { date: NaiveDate },

    /// Calendar month of a given year
    Month { month: u32, year: i32 },

    /// `start..=end`; an inverted range matches nothing
    CustomRange { start: NaiveDate, end: NaiveDate },
}

impl TimeFilter {
    pub fn day(date: &str) -> Result<Self, ValidationError> {
        Ok(TimeFilter::Day {
            date: parse_date(date)?,
        })
    }

    pub fn week(date: &str) -> Result<Self, ValidationError> {
        Ok(TimeFilter::Week {
            date: parse_date(date)?,
        })
    }

    pub fn month(month: u32, year: i32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        Ok(TimeFilter::Month { month, year })
    }

    /// Parse `MM/YYYY` (the format of the month picker)
    pub fn month_from_str(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate(raw.to_string());

        let (month, year) = raw.trim().split_once('/').ok_or_else(invalid)?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;

        Self::month(month, year)
    }

    pub fn custom_range(start: &str, end: &str) -> Result<Self, ValidationError> {
        Ok(TimeFilter::CustomRange {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    fn push_predicate(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            TimeFilter::Day { date } => {
                sql.push_str(" AND date = ?");
                params.push(Value::Text(date.format(DATE_FORMAT).to_string()));
            }
            TimeFilter::Week { date } => {
                // Year is intentionally not compared
                sql.push_str(" AND iso_week(date) = ?");
                params.push(Value::Integer(i64::from(date.iso_week().week())));
            }
            TimeFilter::Month { month, year } => {
                sql.push_str(" AND strftime('%m', date) = ? AND strftime('%Y', date) = ?");
                params.push(Value::Text(format!("{:02}", month)));
                params.push(Value::Text(format!("{:04}", year)));
            }
            TimeFilter::CustomRange { start, end } => {
                sql.push_str(" AND date BETWEEN ? AND ?");
                params.push(Value::Text(start.format(DATE_FORMAT).to_string()));
                params.push(Value::Text(end.format(DATE_FORMAT).to_string()));
            }
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilter::Day { date } => write!(f, "day {}", date.format(DATE_FORMAT)),
            TimeFilter::Week { date } => {
                write!(f, "week {} (from {})", date.iso_week().week(), date.format(DATE_FORMAT))
            }
            TimeFilter::Month { month, year } => write!(f, "month {:02}/{:04}", month, year),
            TimeFilter::CustomRange { start, end } => write!(
                f,
                "range {} to {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
        }
    }
}

// ============================================================================
// CATEGORY FILTER
// ============================================================================

/// Open-ended category constraint. Any stored category string may be used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Map a selector entry; the "All Categories" sentinel means no constraint
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(selection.to_string())
        }
    }
}

impl From<Option<String>> for CategoryFilter {
    fn from(value: Option<String>) -> Self {
        value.map_or(CategoryFilter::All, |s| CategoryFilter::from_selection(&s))
    }
}

// ============================================================================
// EXPENSE FILTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub time: TimeFilter,
    #[serde(default)]
    pub category: CategoryFilter,
}

/// SQL text and positional parameters of a compiled filter
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl ExpenseFilter {
    pub fn new(time: TimeFilter) -> Self {
        ExpenseFilter {
            time,
            category: CategoryFilter::All,
        }
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Build the predicate. No ORDER BY: rows come back in storage order.
    pub fn compile(&self) -> CompiledQuery {
        let mut sql = String::from(SELECT_EXPENSES);
        let mut params = Vec::new();

        self.time.push_predicate(&mut sql, &mut params);

        if let CategoryFilter::Only(category) = &self.category {
            sql.push_str(" AND category = ?");
            params.push(Value::Text(category.clone()));
        }

        CompiledQuery { sql, params }
    }
}

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryResult {
    pub rows: Vec<Expense>,
    /// Sum of `rows[..].amount`, rounded to cents
    pub total: f64,
}

impl QueryResult {
    pub fn total_display(&self) -> String {
        format!("{:.2}", self.total)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Run a filter against the store
pub fn query(store: &ExpenseStore, filter: &ExpenseFilter) -> StoreResult<QueryResult> {
    let compiled = filter.compile();
    tracing::debug!(sql = %compiled.sql, params = ?compiled.params, "running expense query");

    let mut stmt = store.connection().prepare(&compiled.sql)?;
    let mut rows = stmt.query(params_from_iter(compiled.params.iter()))?;

    let mut result = QueryResult::default();
    let mut total = 0.0;

    while let Some(row) = rows.next()? {
        let expense = expense_from_row(row)?;
        total += expense.amount;
        result.rows.push(expense);
    }

    result.total = round_cents(total);
    tracing::debug!(matched = result.rows.len(), total = result.total, "expense query done");

    Ok(result)
}

impl ExpenseStore {
    pub fn query(&self, filter: &ExpenseFilter) -> StoreResult<QueryResult> {
        query(self, filter)
    }
}

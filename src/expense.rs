// 💶 Expense record + input normalization
//
// Core fields mirror the `expenses` table one-to-one. The category is kept as
// free text here because rows are read back by whatever value was stored.

use crate::category::Category;
use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage format for dates; lexicographic order equals chronological order
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub category: String,
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub comment: String,
}

impl Expense {
    /// Amount with two decimals, as shown in tables
    pub fn amount_display(&self) -> String {
        format!("{:.2}", self.amount)
    }
}

// ============================================================================
// VALIDATED INPUT
// ============================================================================

/// Expense that passed validation and is ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    pub amount: f64,
    pub comment: String,
}

impl NewExpense {
    /// Validate raw form input. Nothing is written here.
    pub fn validate(
        description: &str,
        category: Category,
        date: &str,
        amount: &str,
        comment: &str,
    ) -> Result<Self, ValidationError> {
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = parse_amount(amount)?;
        let date = parse_date(date)?;

        Ok(NewExpense {
            description: description.to_string(),
            category,
            date,
            amount,
            comment: comment.to_string(),
        })
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Parse a user-entered amount.
///
/// Both `.` and `,` are accepted as decimal separator. The result must be a
/// finite number >= 0.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let normalized = raw.trim().replace(',', ".");

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidAmount(raw.to_string())),
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Round to two decimal places
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

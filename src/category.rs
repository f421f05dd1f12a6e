// 🏷️ Category - closed set offered when recording an expense
//
// Filtering does NOT use this type: any category string ever stored can be
// filtered on, see `ExpenseStore::distinct_categories`.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Health,
    Utilities,
    Other,
}

impl Category {
    /// Every category, in the order the entry form lists them
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Health,
        Category::Utilities,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        }
    }

    /// Next category in form order, wrapping around
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Food
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_categories() {
        assert_eq!("Food".parse::<Category>(), Ok(Category::Food));
        assert_eq!(" transport ".parse::<Category>(), Ok(Category::Transport));
        assert_eq!("UTILITIES".parse::<Category>(), Ok(Category::Utilities));
    }

    #[test]
    fn test_parse_unknown_category() {
        assert_eq!(
            "Groceries".parse::<Category>(),
            Err(ValidationError::UnknownCategory("Groceries".to_string()))
        );
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Category::Other.next(), Category::Food);
        assert_eq!(Category::Food.previous(), Category::Other);
        assert_eq!(Category::Health.next(), Category::Utilities);
    }

    #[test]
    fn test_display_matches_stored_text() {
        for category in Category::ALL {
            assert_eq!(category.to_string(), category.as_str());
        }
    }
}

//! Common types used throughout Solidafy Paginator
//!
//! This module contains the sort order and scan direction enums shared by the
//! rule set, the query builder and the paginator.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Order
// ============================================================================

/// Sort direction of a single paging key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Order {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl Order {
    /// The opposite direction
    pub fn flip(self) -> Self {
        match self {
            Order::Asc => Order::Desc,
            Order::Desc => Order::Asc,
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Order {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Order::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Order::Desc)
        } else {
            Err(Error::invalid_order(s))
        }
    }
}

impl TryFrom<String> for Order {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Order> for String {
    fn from(order: Order) -> Self {
        order.as_sql().to_string()
    }
}

// ============================================================================
// Direction
// ============================================================================

/// Which token drives the current fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// No token: first page
    #[default]
    None,
    /// After token: page following the anchor
    Forward,
    /// Before token (and no after token): page preceding the anchor
    Backward,
}

impl Direction {
    /// Derive the direction from which tokens are present.
    ///
    /// An after token always wins over a before token.
    pub fn from_tokens(after: Option<&str>, before: Option<&str>) -> Self {
        match (after, before) {
            (Some(_), _) => Direction::Forward,
            (None, Some(_)) => Direction::Backward,
            (None, None) => Direction::None,
        }
    }

    /// Check if this is a backward fetch
    pub fn is_backward(self) -> bool {
        matches!(self, Direction::Backward)
    }

    /// Check if this is a forward fetch
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ASC", Order::Asc ; "upper asc")]
    #[test_case("desc", Order::Desc ; "lower desc")]
    #[test_case("Desc", Order::Desc ; "mixed desc")]
    fn test_order_parse(input: &str, expected: Order) {
        assert_eq!(input.parse::<Order>().unwrap(), expected);
    }

    #[test]
    fn test_order_parse_invalid() {
        let err = "up".parse::<Order>().unwrap_err();
        assert!(matches!(err, Error::InvalidOrder { ref value } if value == "up"));
        assert!("".parse::<Order>().is_err());
    }

    #[test]
    fn test_order_flip() {
        assert_eq!(Order::Asc.flip(), Order::Desc);
        assert_eq!(Order::Desc.flip(), Order::Asc);
        assert_eq!(Order::Asc.flip().flip(), Order::Asc);
    }

    #[test]
    fn test_order_serde() {
        let json = serde_json::to_string(&Order::Desc).unwrap();
        assert_eq!(json, "\"DESC\"");

        let order: Order = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order, Order::Asc);

        assert!(serde_json::from_str::<Order>("\"sideways\"").is_err());
    }

    #[test]
    fn test_direction_from_tokens() {
        assert_eq!(Direction::from_tokens(None, None), Direction::None);
        assert_eq!(Direction::from_tokens(Some("a"), None), Direction::Forward);
        assert_eq!(Direction::from_tokens(None, Some("b")), Direction::Backward);
        // after wins
        assert_eq!(
            Direction::from_tokens(Some("a"), Some("b")),
            Direction::Forward
        );
    }
}

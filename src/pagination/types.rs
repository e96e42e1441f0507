//! Pagination types and traits
//!
//! Defines the paging rule, cursor and page types, and the statement trait the
//! query engine implements.

use crate::error::{Error, Result};
use crate::model::Value;
use crate::types::Order;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Rules
// ============================================================================

/// One key's contribution to the total ordering
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    /// Logical field path (e.g. `createdAt` or `order.createdAt`)
    pub key: String,

    /// Sort order; the paginator's default order when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,

    /// Column reference used verbatim instead of the resolved `<table>.<column>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_repr: Option<String>,
}

impl Rule {
    /// Create a rule for a key with no explicit order
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Set the order
    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Set an explicit column reference
    #[must_use]
    pub fn with_sql_repr(mut self, sql_repr: impl Into<String>) -> Self {
        self.sql_repr = Some(sql_repr.into());
        self
    }
}

impl FromStr for Rule {
    type Err = Error;

    /// Parse `key` or `key:asc` / `key:desc`
    fn from_str(s: &str) -> Result<Self> {
        match s.rsplit_once(':') {
            Some((key, order)) if !key.is_empty() => Ok(Rule::new(key).with_order(order.parse()?)),
            Some(_) => Err(Error::config(format!("Invalid paging key: '{s}'"))),
            None if s.is_empty() => Err(Error::config("Paging key must not be empty")),
            None => Ok(Rule::new(s)),
        }
    }
}

/// A rule after resolution against a model: fixed order and column reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRule {
    /// Logical field path
    pub key: String,
    /// Effective order
    pub order: Order,
    /// Column reference used in generated SQL
    pub sql_repr: String,
}

// ============================================================================
// Cursor & Page
// ============================================================================

/// Tokens for continuing pagination in either direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Token for the page after this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,

    /// Token for the page before this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

impl Cursor {
    /// Create an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if neither token is set
    pub fn is_empty(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }
}

/// One page of records plus the tokens for the neighbouring pages
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records in the natural order of the paging rules
    pub items: Vec<T>,
    /// Continuation tokens
    pub cursor: Cursor,
}

// ============================================================================
// Statement
// ============================================================================

/// A query under construction, as offered by the query engine.
///
/// The paginator adds a row cap, an ORDER BY clause and, when an anchor is
/// present, one WHERE predicate with `?` placeholders bound positionally to
/// `args`. Any filter already on the statement must be AND-ed with it.
pub trait Statement: Sized {
    /// Row type produced by `fetch`
    type Row;

    /// Cap the number of rows returned
    #[must_use]
    fn limit(self, limit: usize) -> Self;

    /// Set the ORDER BY clause (without the keywords)
    #[must_use]
    fn order_by(self, clause: &str) -> Self;

    /// Add a WHERE predicate
    #[must_use]
    fn filter(self, predicate: &str, args: Vec<Value>) -> Self;

    /// Execute and return all rows
    fn fetch(self) -> Result<Vec<Self::Row>>;
}

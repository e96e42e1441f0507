//! Keyset query construction
//!
//! Builds the ORDER BY clause and the lexicographic "past the anchor" predicate.
//!
//! For rules `a, b, c` and anchor `(1, 2, 3)` scanning forward over ascending
//! keys the predicate is
//!
//! ```text
//! (a > ?) OR (a = ? AND b > ?) OR (a = ? AND b = ? AND c > ?)
//! ```
//!
//! with arguments `1, 1, 2, 1, 2, 3`: each clause consumes its own prefix of
//! the anchor, so the argument list has `n(n+1)/2` entries.

use super::types::{ResolvedRule, Statement};
use crate::model::Value;
use crate::types::{Direction, Order};

/// WHERE predicate plus its positional arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// SQL with `?` placeholders
    pub sql: String,
    /// Arguments, in placeholder order
    pub args: Vec<Value>,
}

/// Everything the paginator adds to a statement
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetQuery {
    /// ORDER BY clause in scan order
    pub order_by: String,
    /// Keyset predicate; absent on the first page
    pub predicate: Option<Predicate>,
    /// Row cap: page limit plus one lookahead row
    pub fetch_limit: usize,
}

impl KeysetQuery {
    /// Build the query parts for one fetch.
    ///
    /// `anchor` holds one value per rule, in rule order. An empty or absent
    /// anchor yields no predicate.
    pub fn build(
        rules: &[ResolvedRule],
        direction: Direction,
        anchor: Option<&[Value]>,
        limit: usize,
    ) -> Self {
        let predicate = anchor
            .filter(|values| !values.is_empty())
            .map(|values| Predicate {
                sql: predicate_sql(rules, direction),
                args: predicate_args(values),
            });

        Self {
            order_by: order_sql(rules, direction),
            predicate,
            fetch_limit: limit.saturating_add(1),
        }
    }

    /// Apply to a statement
    pub fn apply<S: Statement>(self, stmt: S) -> S {
        let stmt = stmt.limit(self.fetch_limit).order_by(&self.order_by);
        match self.predicate {
            Some(predicate) => stmt.filter(&predicate.sql, predicate.args),
            None => stmt,
        }
    }
}

/// ORDER BY clause; every order is flipped when scanning backward
pub fn order_sql(rules: &[ResolvedRule], direction: Direction) -> String {
    rules
        .iter()
        .map(|rule| {
            let order = if direction.is_backward() {
                rule.order.flip()
            } else {
                rule.order
            };
            format!("{} {}", rule.sql_repr, order)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strict lexicographic comparison against the anchor tuple.
///
/// A NULL anchor value is bound as-is, and SQL comparisons against NULL are
/// unknown, so every clause touching that key selects nothing. The page
/// after a row whose key is NULL can come back empty even when the previous
/// page reported more rows. Nullable keys page reliably only while the
/// anchor rows hold non-NULL values.
pub fn predicate_sql(rules: &[ResolvedRule], direction: Direction) -> String {
    let mut clauses = Vec::with_capacity(rules.len());
    let mut prefix = String::new();

    for rule in rules {
        let operator = comparison_operator(rule.order, direction);
        clauses.push(format!("({prefix}{} {operator} ?)", rule.sql_repr));
        prefix.push_str(&format!("{} = ? AND ", rule.sql_repr));
    }

    clauses.join(" OR ")
}

/// Arguments for `predicate_sql`: the anchor prefixes of length 1..=n, concatenated
pub fn predicate_args(anchor: &[Value]) -> Vec<Value> {
    (1..=anchor.len())
        .flat_map(|len| anchor[..len].iter().cloned())
        .collect()
}

fn comparison_operator(order: Order, direction: Direction) -> &'static str {
    match (direction, order) {
        (Direction::Forward, Order::Asc) | (Direction::Backward, Order::Desc) => ">",
        _ => "<",
    }
}

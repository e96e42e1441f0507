//! Paging rule validation and resolution

use super::types::{ResolvedRule, Rule};
use crate::error::{Error, Result};
use crate::model::ModelSchema;
use crate::types::Order;
use std::collections::HashSet;

/// Resolve rules against a model schema.
///
/// Every key must resolve to a scalar field. Keys without an explicit order
/// take `default_order`; keys without an explicit `sql_repr` get the owning
/// table's qualified column reference.
pub fn resolve_rules(
    rules: &[Rule],
    schema: &ModelSchema,
    default_order: Order,
) -> Result<Vec<ResolvedRule>> {
    if rules.is_empty() {
        return Err(Error::NoRule);
    }

    let mut seen = HashSet::with_capacity(rules.len());
    rules
        .iter()
        .map(|rule| {
            if !seen.insert(rule.key.as_str()) {
                return Err(Error::DuplicateKey {
                    key: rule.key.clone(),
                });
            }

            let field = schema
                .resolve(&rule.key)
                .ok_or_else(|| Error::invalid_model(&rule.key, schema.storage_name()))?;

            Ok(ResolvedRule {
                key: rule.key.clone(),
                order: rule.order.unwrap_or(default_order),
                sql_repr: rule
                    .sql_repr
                    .clone()
                    .unwrap_or_else(|| field.column_ref()),
            })
        })
        .collect()
}

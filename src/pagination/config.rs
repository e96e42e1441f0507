//! Paginator configuration
//!
//! A `Config` is a set of optional settings. `Paginator::new` lays it over
//! `Config::defaults()`: fields that are set override, unset fields keep the
//! default. Configs load from YAML:
//!
//! ```yaml
//! rules:
//!   - key: createdAt
//!   - key: id
//!     order: ASC
//! limit: 25
//! order: DESC
//! ```

use super::types::Rule;
use crate::error::{Error, Result};
use crate::types::Order;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Key used when none is configured
pub const DEFAULT_KEY: &str = "id";

/// Page size used when none is configured
pub const DEFAULT_LIMIT: usize = 10;

/// Order used for rules without their own
pub const DEFAULT_ORDER: Order = Order::Desc;

/// Paginator settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Paging rules; take precedence over `keys`
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Bare paging keys, used when `rules` is empty
    #[serde(default)]
    pub keys: Vec<String>,

    /// Page size
    #[serde(default)]
    pub limit: Option<usize>,

    /// Default order for rules without one
    #[serde(default)]
    pub order: Option<Order>,

    /// Token of the page to continue after
    #[serde(default)]
    pub after: Option<String>,

    /// Token of the page to continue before
    #[serde(default)]
    pub before: Option<String>,
}

impl Config {
    /// Create an empty config (every field unset)
    pub fn new() -> Self {
        Self::default()
    }

    /// The library defaults
    pub fn defaults() -> Self {
        Self {
            keys: vec![DEFAULT_KEY.to_string()],
            limit: Some(DEFAULT_LIMIT),
            order: Some(DEFAULT_ORDER),
            ..Default::default()
        }
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Set the rules
    #[must_use]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules = rules.into_iter().collect();
        self
    }

    /// Set the keys
    #[must_use]
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the limit
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the default order
    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the after token
    #[must_use]
    pub fn with_after(mut self, token: impl Into<String>) -> Self {
        self.after = Some(token.into());
        self
    }

    /// Set the before token
    #[must_use]
    pub fn with_before(mut self, token: impl Into<String>) -> Self {
        self.before = Some(token.into());
        self
    }

    /// Lay `other` over this config: whatever `other` sets wins
    #[must_use]
    pub fn merge(mut self, other: Config) -> Self {
        if !other.rules.is_empty() {
            self.rules = other.rules;
            self.keys.clear();
        } else if !other.keys.is_empty() {
            self.rules.clear();
            self.keys = other.keys;
        }
        if other.limit.is_some() {
            self.limit = other.limit;
        }
        if other.order.is_some() {
            self.order = other.order;
        }
        if other.after.is_some() {
            self.after = other.after;
        }
        if other.before.is_some() {
            self.before = other.before;
        }
        self
    }

    /// Rules to page by: `rules` when given, otherwise one rule per key
    pub fn effective_rules(&self) -> Vec<Rule> {
        if self.rules.is_empty() {
            self.keys.iter().map(Rule::new).collect()
        } else {
            self.rules.clone()
        }
    }
}

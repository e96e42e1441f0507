//! Paginator: drives one keyset page fetch
//!
//! 1. validate the rules and limit, resolve the rules against the model
//! 2. decode the driving token (after wins over before)
//! 3. fetch `limit + 1` rows past the anchor, in flipped order when backward
//! 4. drop the lookahead row, restore natural order, emit new tokens

use super::config::{Config, DEFAULT_LIMIT, DEFAULT_ORDER};
use super::query::KeysetQuery;
use super::rules::resolve_rules;
use super::types::{Cursor, Page, ResolvedRule, Rule, Statement};
use crate::cursor::{Decoder, Encoder};
use crate::error::{Error, Result};
use crate::model::{Model, ModelSchema, Record, Value};
use crate::types::{Direction, Order};

/// Keyset paginator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    rules: Vec<Rule>,
    limit: usize,
    order: Order,
    cursor: Cursor,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(Config::new())
    }
}

impl Paginator {
    /// Create a paginator from the defaults overlaid with `config`
    pub fn new(config: Config) -> Self {
        let config = Config::defaults().merge(config);
        Self {
            rules: config.effective_rules(),
            limit: config.limit.unwrap_or(DEFAULT_LIMIT),
            order: config.order.unwrap_or(DEFAULT_ORDER),
            cursor: Cursor {
                after: config.after,
                before: config.before,
            },
        }
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Replace the paging rules
    pub fn set_rules(&mut self, rules: impl IntoIterator<Item = Rule>) -> &mut Self {
        self.rules = rules.into_iter().collect();
        self
    }

    /// Replace the paging rules with bare keys
    pub fn set_keys(&mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.rules = keys.into_iter().map(Rule::new).collect();
        self
    }

    /// Set the page size
    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Set the default order
    pub fn set_order(&mut self, order: Order) -> &mut Self {
        self.order = order;
        self
    }

    /// Set the after token
    pub fn set_after_cursor(&mut self, token: impl Into<String>) -> &mut Self {
        self.cursor.after = Some(token.into());
        self
    }

    /// Set the before token
    pub fn set_before_cursor(&mut self, token: impl Into<String>) -> &mut Self {
        self.cursor.before = Some(token.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Configured rules
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Page size
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Default order
    pub fn order(&self) -> Order {
        self.order
    }

    /// Incoming tokens
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Direction of the next fetch
    pub fn direction(&self) -> Direction {
        Direction::from_tokens(self.cursor.after.as_deref(), self.cursor.before.as_deref())
    }

    // ========================================================================
    // Paginate
    // ========================================================================

    /// Fetch one page of a statically-shaped model
    pub fn paginate<S>(&self, stmt: S) -> Result<Page<S::Row>>
    where
        S: Statement,
        S::Row: Model,
    {
        self.paginate_with_schema(stmt, &S::Row::schema())
    }

    /// Fetch one page, resolving keys against an explicit schema
    pub fn paginate_with_schema<S>(&self, stmt: S, schema: &ModelSchema) -> Result<Page<S::Row>>
    where
        S: Statement,
        S::Row: Record,
    {
        let rules = self.resolve(schema)?;
        let direction = self.direction();
        let anchor = self.decode_cursor(direction, &rules, schema)?;

        tracing::debug!(
            "Paginating {} by [{}]: direction={:?}, limit={}",
            schema.storage_name(),
            rules
                .iter()
                .map(|r| format!("{} {}", r.sql_repr, r.order))
                .collect::<Vec<_>>()
                .join(", "),
            direction,
            self.limit
        );

        let query = KeysetQuery::build(&rules, direction, anchor.as_deref(), self.limit);
        let mut items = query.apply(stmt).fetch()?;

        let has_more = items.len() > self.limit;
        items.truncate(self.limit);
        if direction.is_backward() {
            items.reverse();
        }

        let cursor = self.encode_cursor(direction, &rules, &items, has_more)?;
        Ok(Page { items, cursor })
    }

    fn resolve(&self, schema: &ModelSchema) -> Result<Vec<ResolvedRule>> {
        if self.rules.is_empty() {
            return Err(Error::NoRule);
        }
        if self.limit == 0 {
            return Err(Error::InvalidLimit { limit: self.limit });
        }
        resolve_rules(&self.rules, schema, self.order)
    }

    fn decode_cursor(
        &self,
        direction: Direction,
        rules: &[ResolvedRule],
        schema: &ModelSchema,
    ) -> Result<Option<Vec<Value>>> {
        let token = match direction {
            Direction::Forward => {
                if self.cursor.before.is_some() {
                    tracing::warn!("Both after and before tokens given, ignoring before");
                }
                self.cursor.after.as_deref()
            }
            Direction::Backward => self.cursor.before.as_deref(),
            Direction::None => None,
        };

        token
            .map(|token| {
                Decoder::new(rules.iter().map(|r| r.key.as_str()))
                    .decode(token, schema)
                    .map_err(Error::InvalidCursor)
            })
            .transpose()
    }

    fn encode_cursor<R: Record>(
        &self,
        direction: Direction,
        rules: &[ResolvedRule],
        items: &[R],
        has_more: bool,
    ) -> Result<Cursor> {
        let (Some(first), Some(last)) = (items.first(), items.last()) else {
            return Ok(Cursor::new());
        };

        let encoder = Encoder::new(rules.iter().map(|r| r.key.as_str()));
        let mut cursor = Cursor::new();

        if direction.is_backward() || has_more {
            cursor.after = Some(encoder.encode(last).map_err(Error::CursorEncode)?);
        }
        if direction.is_forward() || (has_more && direction.is_backward()) {
            cursor.before = Some(encoder.encode(first).map_err(Error::CursorEncode)?);
        }

        Ok(cursor)
    }
}

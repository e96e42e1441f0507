//! Record model introspection
//!
//! Describes the shape of paginated records without runtime reflection.
//!
//! # Overview
//!
//! The model module provides:
//! - `ModelSchema` - Storage name plus field definitions, with dotted-path
//!   resolution through embedded (composed/joined) sub-schemas
//! - `FieldDef` / `FieldType` - Field metadata, including column overrides
//! - `Value` - The scalar values paging keys carry
//! - `Record` / `Model` - Traits paginated row types implement

mod naming;
mod types;

pub use naming::{quote_ident, to_column_name};
pub use types::{
    FieldDef, FieldKind, FieldType, Model, ModelSchema, Record, ResolvedField, Value,
};

//! Field name to column name transform

use convert_case::{Case, Casing};

/// Derive a storage column name from a logical field name.
///
/// `createdAt`, `CreatedAt` and `created_at` all map to `created_at`;
/// acronyms stay together (`OrderID` -> `order_id`).
pub fn to_column_name(field: &str) -> String {
    field.to_case(Case::Snake)
}

/// Quote a column name for SQL unless it is a plain identifier.
///
/// `created_at` stays as is; `display name` becomes `"display name"`.
pub fn quote_ident(column: &str) -> String {
    let mut chars = column.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if plain {
        column.to_string()
    } else {
        format!("\"{}\"", column.replace('"', "\"\""))
    }
}

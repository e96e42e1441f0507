//! Cursor codec
//!
//! Turns an ordered tuple of paging key values into an opaque token and back.
//!
//! # Overview
//!
//! A token is URL-safe base64 (no padding) over a JSON array holding one value
//! per paging key, in key order. Decoding needs the field types of the keys to
//! rebuild typed values, so it takes the model schema. The codec knows nothing
//! about paging direction or SQL.

mod codec;

pub use codec::{decode_values, encode_values, CursorError, Decoder, Encoder, MAX_TOKEN_LEN};

#[cfg(test)]
mod tests;

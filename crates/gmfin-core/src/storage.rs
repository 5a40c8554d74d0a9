//! # Stored Text Hooks
//!
//! The two narrow functions a persistence layer needs from a value type:
//! "decode from stored text" and "encode to stored text".
//!
//! ```text
//! ┌──────────────────┐   Option<&str>    ┌───────────────────────┐
//! │  column (TEXT)   │ ────────────────► │ T::decode_stored(..)  │
//! │  NULL → None     │                   └───────────────────────┘
//! │                  │ ◄──────────────── ┌───────────────────────┐
//! │                  │      String       │ value.encode_stored() │
//! └──────────────────┘                   └───────────────────────┘
//! ```
//!
//! gmfin-core knows nothing about connections or transactions; gmfin-db
//! (or any other collaborator) calls these hooks.

/// Conversion between a value and its stored text column form.
pub trait StoredText: Sized {
    type Error;

    /// Decodes a column value. `None` is a database NULL.
    fn decode_stored(text: Option<&str>) -> Result<Self, Self::Error>;

    /// Encodes the value for writing.
    fn encode_stored(&self) -> String;
}

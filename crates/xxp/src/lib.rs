//! Type-directed binary encoding of structured values.
//!
//! Values are written without type tags or field names. Integers take their
//! natural width, strings and collections carry an 8-byte size prefix and
//! records are their fields back to back. Reading requires the same shape
//! that was used for writing.
//!
//! Three ways in, all producing the same bytes:
//! - [Value]s with an explicit [Shape], through [encode] and [decode]
//! - `#[derive(Record)]` structs, through [encode_typed] and [decode_typed]
//! - serde types, through [to_bytes] and [from_bytes]

pub use xxp_core::*;
pub use xxp_macros::Record;

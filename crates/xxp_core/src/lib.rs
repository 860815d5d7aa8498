//! Values, shapes and the type-directed binary codec.
//!
//! A value is encoded without any type tags: the decoder is told the
//! [Shape] it should read and consumes the bytes in that order.
//!
//! ```
//! use xxp_core::{codec, BigEndian, RecordValue, Shape, Value};
//!
//! let user: Value = RecordValue::new("ts")
//!     .with_field("Id", 7758_u32)
//!     .with_field("Name", "Allen")
//!     .into();
//!
//! let bytes = codec::encode(&user, BigEndian).unwrap();
//! assert_eq!(bytes.len(), 4 + 8 + 5);
//!
//! let shape: Shape = "ts { Id: u32, Name: string }".parse().unwrap();
//! assert_eq!(codec::decode(&bytes, BigEndian, &shape).unwrap(), user);
//! ```

pub mod buffer;
pub mod byte_order;
pub mod codec;
pub mod config;
mod consts;
pub mod err;
pub mod record;
pub mod ser_de;
pub mod shape;
pub mod value;

pub use buffer::{ByteBuffer, ByteViewer};
pub use byte_order::{BigEndian, ByteOrder, Endian, LittleEndian};
pub use codec::{decode, decode_with, encode, encode_with, Decoder, Encoder};
pub use config::CodecConfig;
pub use err::{Error, Result};
pub use record::{decode_typed, encode_typed, FieldReader, FromValue, IntoValue, Record, Shaped};
pub use ser_de::{from_bytes, from_bytes_with, to_bytes, to_bytes_with};
pub use shape::{FieldShape, RecordShape, Shape};
pub use value::{Field, MapValue, RecordValue, SeqValue, Value};

/// Default limits used by encoders and decoders.
pub mod defaults {

    /// Deepest nesting of arrays, lists, maps and records
    pub const MAX_DEPTH: usize = 128;

    /// Largest element or pair count accepted by a decoder.
    ///
    /// Bounds the work done for elements that take no input bytes,
    /// such as records without fields.
    pub const MAX_LEN: usize = 1 << 24;
}

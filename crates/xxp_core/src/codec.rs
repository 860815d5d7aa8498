//! Type-directed encoding and decoding of [Value]s.
//!
//! # Format
//!
//! Under an agreed byte order B:
//!
//! - integers: their width in bytes, B-ordered
//! - strings: 8-byte B-ordered byte length, then the raw UTF-8 bytes
//! - arrays and lists: 8-byte B-ordered element count, then the elements
//! - maps: 8-byte B-ordered pair count, then key and value of each pair
//! - records: the fields in declaration order, no separators or outer length
//!
//! Only variable-size data is framed. Everything else has a size recoverable
//! from its shape.

mod decode;
mod encode;

pub use decode::Decoder;
pub use encode::Encoder;

use crate::byte_order::ByteOrder;
use crate::config::CodecConfig;
use crate::err::Result;
use crate::shape::Shape;
use crate::value::Value;

/// Encode a value to a vector of bytes
pub fn encode<O: ByteOrder>(value: &Value, order: O) -> Result<Vec<u8>> {
    encode_with(value, order, CodecConfig::default())
}

/// Encode a value to a vector of bytes, with custom limits
pub fn encode_with<O: ByteOrder>(value: &Value, order: O, config: CodecConfig) -> Result<Vec<u8>> {
    let mut encoder = Encoder::with_config(order, config);
    encoder.encode(value)?;

    let bytes = encoder.finish().into_vec();
    log::debug!("encoded {} into {} bytes", value.kind_name(), bytes.len());

    Ok(bytes)
}

/// Decode a value of the given shape from a byte-exact buffer
pub fn decode<O: ByteOrder>(bytes: &[u8], order: O, shape: &Shape) -> Result<Value> {
    decode_with(bytes, order, shape, CodecConfig::default())
}

/// Decode a value of the given shape from a byte-exact buffer, with custom limits
pub fn decode_with<O: ByteOrder>(
    bytes: &[u8],
    order: O,
    shape: &Shape,
    config: CodecConfig,
) -> Result<Value> {
    let mut decoder = Decoder::with_config(bytes, order, config);

    let value = decoder
        .decode(shape)
        .and_then(|value| decoder.finish().map(|_| value))
        .map_err(|e| {
            log::debug!("failed to decode {} bytes as {}: {}", bytes.len(), shape, e);
            e
        })?;

    log::debug!("decoded {} from {} bytes", shape.kind_name(), bytes.len());
    Ok(value)
}

//! Encoding rules for [Value]s.

use crate::buffer::ByteBuffer;
use crate::byte_order::{BigEndian, ByteOrder};
use crate::config::{CodecConfig, DepthCounter};
use crate::err::{Error, Result};
use crate::shape::{RecordShape, Shape};
use crate::value::{MapValue, RecordValue, SeqValue, Value};

/// Appends the encoding of values to an owned [ByteBuffer].
///
/// One encoder is meant for one message: encode, then [Encoder::finish].
pub struct Encoder<O: ByteOrder = BigEndian> {
    order: O,
    output: ByteBuffer,
    config: CodecConfig,
    depth: DepthCounter,
}

impl<O: ByteOrder> Encoder<O> {
    pub fn new(order: O) -> Self {
        Self::with_config(order, CodecConfig::default())
    }

    pub fn with_config(order: O, config: CodecConfig) -> Self {
        Self {
            order,
            output: ByteBuffer::new(),
            config,
            depth: DepthCounter::new(config.max_depth),
        }
    }

    /// Encodes a value by its own shape
    pub fn encode(&mut self, value: &Value) -> Result<()> {
        let shape = value.shape();
        self.encode_as(value, &shape)
    }

    /// Encodes a value, checking along the way that it conforms to `shape`.
    ///
    /// Fails with [Error::ShapeMismatch] at the first disagreement.
    pub fn encode_as(&mut self, value: &Value, shape: &Shape) -> Result<()> {
        self.encode_value(value, shape)
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Consume the encoder, returning the encoded bytes
    pub fn finish(self) -> ByteBuffer {
        self.output
    }

    fn encode_value(&mut self, value: &Value, shape: &Shape) -> Result<()> {
        log::trace!("encoding {} at offset {}", shape.kind_name(), self.output.len());

        match (value, shape) {
            (Value::I8(v), Shape::I8) => self.output.put_u8(*v as u8),
            (Value::U8(v), Shape::U8) => self.output.put_u8(*v),
            (Value::I16(v), Shape::I16) => self.output.put_u16(self.order, *v as u16),
            (Value::U16(v), Shape::U16) => self.output.put_u16(self.order, *v),
            (Value::I32(v), Shape::I32) => self.output.put_u32(self.order, *v as u32),
            (Value::U32(v), Shape::U32) => self.output.put_u32(self.order, *v),
            (Value::I64(v), Shape::I64) => self.output.put_u64(self.order, *v as u64),
            (Value::U64(v), Shape::U64) => self.output.put_u64(self.order, *v),

            (Value::String(s), Shape::String) => {
                self.output.put_sized_slice(self.order, s.as_bytes())
            }

            (Value::Array(seq), Shape::Array { element, len }) => {
                if seq.len() != *len {
                    return Err(Error::mismatch(
                        shape,
                        format!("array of {} elements", seq.len()),
                    ));
                }
                self.encode_seq(seq, element)?;
            }
            (Value::List(seq), Shape::List(element)) => self.encode_seq(seq, element)?,

            (Value::Map(map), Shape::Map { key, value }) => self.encode_map(map, key, value)?,

            (Value::Record(record), Shape::Record(fields)) => {
                self.encode_record(record, fields)?
            }

            (value, shape) => return Err(Error::mismatch(shape, value.kind_name())),
        }

        Ok(())
    }

    /// Element count, then each element in order
    fn encode_seq(&mut self, seq: &SeqValue, element: &Shape) -> Result<()> {
        if seq.element() != element {
            return Err(Error::mismatch(element, seq.element()));
        }

        self.config.check_len(seq.len() as u64)?;

        self.depth.enter()?;
        self.output.put_size(self.order, seq.len());
        for item in seq.items() {
            self.encode_value(item, element)?;
        }
        self.depth.leave();

        Ok(())
    }

    /// Pair count, then key and value of each pair
    fn encode_map(&mut self, map: &MapValue, key: &Shape, value: &Shape) -> Result<()> {
        if map.key_shape() != key || map.value_shape() != value {
            return Err(Error::mismatch(
                Shape::map(key.clone(), value.clone()),
                Shape::map(map.key_shape().clone(), map.value_shape().clone()),
            ));
        }

        self.config.check_len(map.len() as u64)?;

        self.depth.enter()?;
        self.output.put_size(self.order, map.len());
        for (k, v) in map.entries() {
            self.encode_value(k, key)?;
            self.encode_value(v, value)?;
        }
        self.depth.leave();

        Ok(())
    }

    /// Each field in declaration order, without any framing
    fn encode_record(&mut self, record: &RecordValue, shape: &RecordShape) -> Result<()> {
        if record.fields().len() != shape.len() {
            return Err(Error::mismatch(shape, record.shape()));
        }

        self.depth.enter()?;
        for (field, field_shape) in record.fields().iter().zip(shape.fields()) {
            if field.name != field_shape.name {
                return Err(Error::mismatch(
                    format!("field `{}`", field_shape.name),
                    format!("field `{}`", field.name),
                ));
            }
            self.encode_value(&field.value, &field_shape.shape)?;
        }
        self.depth.leave();

        Ok(())
    }
}

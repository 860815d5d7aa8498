//! Decoding rules, mirroring [super::Encoder].

use crate::buffer::ByteViewer;
use crate::byte_order::{BigEndian, ByteOrder};
use crate::config::{CodecConfig, DepthCounter};
use crate::err::{Error, Result};
use crate::shape::{RecordShape, Shape};
use crate::value::{MapValue, RecordValue, SeqValue, Value};

/// Rebuilds values from bytes, driven entirely by a caller-supplied [Shape].
///
/// Bytes are consumed strictly in the order the encoder produced them.
/// The decoder never inspects the input to guess a shape.
pub struct Decoder<'de, O: ByteOrder = BigEndian> {
    order: O,
    input: ByteViewer<'de>,
    config: CodecConfig,
    depth: DepthCounter,
}

impl<'de, O: ByteOrder> Decoder<'de, O> {
    pub fn new(bytes: &'de [u8], order: O) -> Self {
        Self::with_config(bytes, order, CodecConfig::default())
    }

    pub fn with_config(bytes: &'de [u8], order: O, config: CodecConfig) -> Self {
        Self {
            order,
            input: ByteViewer::from_slice(bytes),
            config,
            depth: DepthCounter::new(config.max_depth),
        }
    }

    /// Decodes the next value of the given shape
    pub fn decode(&mut self, shape: &Shape) -> Result<Value> {
        self.decode_value(shape)
    }

    /// Number of bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.input.distance_to_end()
    }

    /// Checks that the whole input was consumed
    pub fn finish(self) -> Result<()> {
        match self.input.distance_to_end() {
            0 => Ok(()),
            n => Err(Error::TrailingBytes(n)),
        }
    }

    fn decode_value(&mut self, shape: &Shape) -> Result<Value> {
        log::trace!("decoding {} at offset {}", shape.kind_name(), self.input.offset());

        let value = match shape {
            Shape::I8 => Value::I8(self.input.next_byte()? as i8),
            Shape::U8 => Value::U8(self.input.next_byte()?),
            Shape::I16 => Value::I16(self.input.pop_u16(self.order)? as i16),
            Shape::U16 => Value::U16(self.input.pop_u16(self.order)?),
            Shape::I32 => Value::I32(self.input.pop_u32(self.order)? as i32),
            Shape::U32 => Value::U32(self.input.pop_u32(self.order)?),
            Shape::I64 => Value::I64(self.input.pop_u64(self.order)? as i64),
            Shape::U64 => Value::U64(self.input.pop_u64(self.order)?),

            Shape::String => Value::String(self.decode_string()?),

            Shape::Array { element, len } => Value::Array(self.decode_seq(element, Some(*len))?),
            Shape::List(element) => Value::List(self.decode_seq(element, None)?),

            Shape::Map { key, value } => Value::Map(self.decode_map(key, value)?),

            Shape::Record(fields) => Value::Record(self.decode_record(fields)?),
        };

        Ok(value)
    }

    fn decode_string(&mut self) -> Result<String> {
        let bytes = self.input.next_sized_bytes(self.order)?;

        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| Error::InvalidUtf8)
    }

    /// Reads an element or pair count.
    ///
    /// Every element takes at least `min_len` bytes, so counts that cannot
    /// fit in the remaining input are rejected before anything is decoded.
    fn pop_count(&mut self, min_len: usize) -> Result<usize> {
        let count = self.input.pop_size(self.order)?;
        let count = self.config.check_len(count)?;

        let needed = count.saturating_mul(min_len);
        let available = self.input.distance_to_end();
        if needed > available {
            return Err(Error::TruncatedInput { needed, available });
        }

        Ok(count)
    }

    fn decode_seq(&mut self, element: &Shape, expected: Option<usize>) -> Result<SeqValue> {
        self.depth.enter()?;

        let count = self.pop_count(element.min_len())?;
        if let Some(len) = expected.filter(|len| *len != count) {
            return Err(Error::mismatch(
                Shape::array(element.clone(), len),
                format!("array of {} elements", count),
            ));
        }

        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(self.decode_value(element)?);
        }

        self.depth.leave();
        Ok(SeqValue::new(element.clone(), items))
    }

    fn decode_map(&mut self, key: &Shape, value: &Shape) -> Result<MapValue> {
        self.depth.enter()?;

        let count = self.pop_count(key.min_len().saturating_add(value.min_len()))?;
        let mut map = MapValue::new(key.clone(), value.clone());

        for _ in 0..count {
            let k = self.decode_value(key)?;
            let v = self.decode_value(value)?;

            if map.get(&k).is_some() {
                return Err(Error::DuplicateKey(k.to_string()));
            }
            map.insert(k, v);
        }

        self.depth.leave();
        Ok(map)
    }

    fn decode_record(&mut self, shape: &RecordShape) -> Result<RecordValue> {
        self.depth.enter()?;

        let mut record = RecordValue::new(shape.name());
        for field in shape.fields() {
            let value = self.decode_value(&field.shape)?;
            record.push(field.name.as_str(), value);
        }

        self.depth.leave();
        Ok(record)
    }
}

//! Implementation of [serde::de::Deserializer] for [XxpDeserializer]

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess};

use crate::buffer::ByteViewer;
use crate::byte_order::ByteOrder;
use crate::config::{CodecConfig, DepthCounter};
use crate::err::{Error, Result};

/// Deserializes data structures from a slice of bytes.
///
/// Structs to be deserialized need to derive [serde::Deserialize].
/// The format is not self-describing: the target type drives every read.
pub struct XxpDeserializer<'de, O: ByteOrder> {
    input: ByteViewer<'de>,
    order: O,
    config: CodecConfig,
    depth: DepthCounter,
}

impl<'de, O: ByteOrder> XxpDeserializer<'de, O> {
    pub fn from_slice(s: &'de [u8], order: O, config: CodecConfig) -> Self {
        Self {
            input: ByteViewer::from_slice(s),
            order,
            config,
            depth: DepthCounter::new(config.max_depth),
        }
    }

    /// Checks that the whole input was consumed
    pub fn finish(&self) -> Result<()> {
        match self.input.distance_to_end() {
            0 => Ok(()),
            n => Err(Error::TrailingBytes(n)),
        }
    }

    fn pop_count(&mut self) -> Result<usize> {
        let count = self.input.pop_size(self.order)?;
        self.config.check_len(count)
    }

    /// Go one level deeper and hand out `len` items
    fn items(&mut self, len: usize) -> Result<ItemsAccessor<'_, 'de, O>> {
        self.depth.enter()?;

        Ok(ItemsAccessor {
            des: self,
            len,
            remaining: len,
        })
    }
}

/// Impl deserialize for single byte integers
macro_rules! deserialize_byte {
    ($fn_name: ident => $visitor_fn: ident as $data_type: ty) => {
        fn $fn_name<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            let byte = self.input.next_byte()?;
            visitor.$visitor_fn(byte as $data_type)
        }
    };
}

/// Impl deserialize for multi-byte integers, through the byte order policy
macro_rules! deserialize_multibyte {
    ($fn_name: ident => $visitor_fn: ident, $pop_fn: ident as $data_type: ty) => {
        fn $fn_name<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            let bits = self.input.$pop_fn(self.order)?;
            visitor.$visitor_fn(bits as $data_type)
        }
    };
}

/// Impl deserialize for shapes the format does not have
macro_rules! deserialize_unsupported {
    ($($fn_name: ident => $shape: literal),+ $(,)?) => {
        $(
            fn $fn_name<V>(self, _visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                Err(Error::UnsupportedShape($shape.to_owned()))
            }
        )+
    };
}

impl<'de, 'a, O: ByteOrder> de::Deserializer<'de> for &'a mut XxpDeserializer<'de, O> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    deserialize_byte! {deserialize_i8 => visit_i8 as i8}
    deserialize_byte! {deserialize_u8 => visit_u8 as u8}

    deserialize_multibyte! {deserialize_i16 => visit_i16, pop_u16 as i16}
    deserialize_multibyte! {deserialize_i32 => visit_i32, pop_u32 as i32}
    deserialize_multibyte! {deserialize_i64 => visit_i64, pop_u64 as i64}

    deserialize_multibyte! {deserialize_u16 => visit_u16, pop_u16 as u16}
    deserialize_multibyte! {deserialize_u32 => visit_u32, pop_u32 as u32}
    deserialize_multibyte! {deserialize_u64 => visit_u64, pop_u64 as u64}

    // the decoder never guesses a shape from the bytes
    deserialize_unsupported! {
        deserialize_any => "any",
        deserialize_ignored_any => "any",
        deserialize_identifier => "identifier",
        deserialize_i128 => "i128",
        deserialize_u128 => "u128",
        deserialize_bool => "bool",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_option => "option",
        deserialize_unit => "unit",
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let bytes = self.input.next_sized_bytes(self.order)?;
        let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;

        visitor.visit_borrowed_str(s)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let len = self.pop_count()?;
        let bytes = self.input.next_bytes(len)?;

        visitor.visit_borrowed_bytes(bytes)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    // a record without fields
    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let count = self.pop_count()?;
        let mut items = self.items(count)?;
        let value = visitor.visit_seq(&mut items)?;
        items.finish()?;

        Ok(value)
    }

    // fixed-size array: the encoded count has to match
    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let count = self.pop_count()?;
        if count != len {
            return Err(Error::mismatch(
                format!("array of {} elements", len),
                format!("array of {} elements", count),
            ));
        }

        let mut items = self.items(count)?;
        let value = visitor.visit_seq(&mut items)?;
        items.finish()?;

        Ok(value)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut items = self.items(len)?;
        let value = visitor.visit_seq(&mut items)?;
        items.finish()?;

        Ok(value)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let count = self.pop_count()?;
        let mut items = self.items(count)?;
        let value = visitor.visit_map(&mut items)?;
        items.finish()?;

        Ok(value)
    }

    // fields are read positionally, in declaration order
    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut items = self.items(fields.len())?;
        let value = visitor.visit_seq(&mut items)?;
        items.finish()?;

        Ok(value)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::UnsupportedShape(format!("enum {}", name)))
    }
}

/// Hands out a known number of items to a visitor.
///
/// Used for sequences, maps and records.
struct ItemsAccessor<'a, 'de: 'a, O: ByteOrder> {
    des: &'a mut XxpDeserializer<'de, O>,
    len: usize,
    remaining: usize,
}

impl<'a, 'de, O: ByteOrder> ItemsAccessor<'a, 'de, O> {
    /// Checks that the visitor took every item, then come back up one level
    fn finish(self) -> Result<()> {
        if self.remaining != 0 {
            return Err(Error::mismatch(
                format!("{} items", self.len),
                format!("{} items read", self.len - self.remaining),
            ));
        }

        self.des.depth.leave();
        Ok(())
    }
}

impl<'a, 'de, O: ByteOrder> SeqAccess<'de> for ItemsAccessor<'a, 'de, O> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        seed.deserialize(&mut *self.des).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

impl<'a, 'de, O: ByteOrder> MapAccess<'de> for ItemsAccessor<'a, 'de, O> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        seed.deserialize(&mut *self.des).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.des)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

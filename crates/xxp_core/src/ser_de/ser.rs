//! Implementation of [serde::ser::Serializer] for [XxpSerializer]

use serde::ser::{self, Impossible, Serialize};

use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::config::{CodecConfig, DepthCounter};
use crate::err::{Error, Result};

/// This data structure contains the serialized bytes of any supported data structure.
///
/// Structs to be serialized need to derive [serde::Serialize].
/// The output is byte-identical to encoding the equivalent [crate::Value].
pub struct XxpSerializer<O: ByteOrder> {
    pub(crate) output: ByteBuffer,
    order: O,
    config: CodecConfig,
    depth: DepthCounter,
}

impl<O: ByteOrder> XxpSerializer<O> {
    pub fn new(order: O, config: CodecConfig) -> Self {
        Self {
            output: ByteBuffer::new(),
            order,
            config,
            depth: DepthCounter::new(config.max_depth),
        }
    }

    /// Consume the serializer, returning the bytes written
    pub fn into_buffer(self) -> ByteBuffer {
        self.output
    }
}

/// How the size of a compound value is written
enum Framing {
    /// Size prefix already written, the number of items must match it
    Counted(usize),
    /// Size prefix reserved at this position, patched once all items are in
    Patched(usize),
    /// Records have no size prefix
    Unframed,
}

/// Serializes the items of a sequence, map or record
pub struct Compound<'a, O: ByteOrder> {
    ser: &'a mut XxpSerializer<O>,
    framing: Framing,
    count: usize,
}

impl<'a, O: ByteOrder> Compound<'a, O> {
    fn open(ser: &'a mut XxpSerializer<O>, len: Option<usize>) -> Result<Self> {
        ser.depth.enter()?;

        let framing = match len {
            Some(len) => {
                ser.config.check_len(len as u64)?;
                ser.output.put_size(ser.order, len);
                Framing::Counted(len)
            }
            None => Framing::Patched(ser.output.reserve_size()),
        };

        Ok(Self {
            ser,
            framing,
            count: 0,
        })
    }

    fn open_unframed(ser: &'a mut XxpSerializer<O>) -> Result<Self> {
        ser.depth.enter()?;

        Ok(Self {
            ser,
            framing: Framing::Unframed,
            count: 0,
        })
    }

    fn item<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.count += 1;
        value.serialize(&mut *self.ser)
    }

    fn close(self) -> Result<()> {
        match self.framing {
            Framing::Counted(len) if len != self.count => {
                return Err(Error::mismatch(
                    format!("{} items", len),
                    format!("{} items", self.count),
                ))
            }
            Framing::Patched(pos) => {
                self.ser.config.check_len(self.count as u64)?;
                self.ser.output.patch_size(self.ser.order, pos, self.count)
            }
            _ => (),
        }

        self.ser.depth.leave();
        Ok(())
    }
}

/// Impl serialize for single byte integers
macro_rules! serialize_byte {
    ($fn_name: ident, $num_type: ty) => {
        fn $fn_name(self, v: $num_type) -> Result<Self::Ok> {
            self.output.put_u8(v as u8);
            Ok(())
        }
    };
}

/// Impl serialize for multi-byte integers, through the byte order policy
macro_rules! serialize_multibyte {
    ($fn_name: ident, $num_type: ty => $put_fn: ident as $conv_type: ty) => {
        fn $fn_name(self, v: $num_type) -> Result<Self::Ok> {
            self.output.$put_fn(self.order, v as $conv_type);
            Ok(())
        }
    };
}

/// Impl serialize for shapes the format does not have
macro_rules! serialize_unsupported {
    ($fn_name: ident ($($arg: ty),*) => $shape: literal) => {
        fn $fn_name(self, $(_: $arg),*) -> Result<Self::Ok> {
            Err(Error::UnsupportedShape($shape.to_owned()))
        }
    };
}

impl<'a, O: ByteOrder> ser::Serializer for &'a mut XxpSerializer<O> {
    type Ok = ();

    type Error = Error;

    type SerializeSeq = Compound<'a, O>;

    type SerializeTuple = Compound<'a, O>;

    type SerializeTupleStruct = Compound<'a, O>;

    type SerializeTupleVariant = Impossible<(), Error>;

    type SerializeMap = Compound<'a, O>;

    type SerializeStruct = Compound<'a, O>;

    type SerializeStructVariant = Impossible<(), Error>;

    fn is_human_readable(&self) -> bool {
        false
    }

    serialize_byte! {serialize_i8, i8}
    serialize_byte! {serialize_u8, u8}

    serialize_multibyte! {serialize_i16, i16 => put_u16 as u16}
    serialize_multibyte! {serialize_i32, i32 => put_u32 as u32}
    serialize_multibyte! {serialize_i64, i64 => put_u64 as u64}

    serialize_multibyte! {serialize_u16, u16 => put_u16 as u16}
    serialize_multibyte! {serialize_u32, u32 => put_u32 as u32}
    serialize_multibyte! {serialize_u64, u64 => put_u64 as u64}

    serialize_unsupported! {serialize_i128(i128) => "i128"}
    serialize_unsupported! {serialize_u128(u128) => "u128"}
    serialize_unsupported! {serialize_bool(bool) => "bool"}
    serialize_unsupported! {serialize_f32(f32) => "f32"}
    serialize_unsupported! {serialize_f64(f64) => "f64"}
    serialize_unsupported! {serialize_char(char) => "char"}
    serialize_unsupported! {serialize_unit() => "unit"}
    serialize_unsupported! {serialize_none() => "option"}
    serialize_unsupported! {serialize_unit_variant(&'static str, u32, &'static str) => "enum"}

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        self.output.put_sized_slice(self.order, v.as_bytes());
        Ok(())
    }

    // same wire format as a list of u8
    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        self.config.check_len(v.len() as u64)?;
        self.output.put_sized_slice(self.order, v);
        Ok(())
    }

    fn serialize_some<T: ?Sized>(self, _: &T) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        Err(Error::UnsupportedShape("option".to_owned()))
    }

    // a record without fields
    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        Ok(())
    }

    // serialize the inner value
    fn serialize_newtype_struct<T: ?Sized>(self, _: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        Err(Error::UnsupportedShape("enum".to_owned()))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Compound::open(self, len)
    }

    // tuples are fixed-size arrays, count prefixed like any sequence
    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Compound::open(self, Some(len))
    }

    // tuple structs are records with positional fields
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Compound::open_unframed(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::UnsupportedShape("enum".to_owned()))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Compound::open(self, len)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Compound::open_unframed(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::UnsupportedShape("enum".to_owned()))
    }
}

impl<'a, O: ByteOrder> ser::SerializeSeq for Compound<'a, O> {
    type Ok = ();

    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.item(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.close()
    }
}

impl<'a, O: ByteOrder> ser::SerializeTuple for Compound<'a, O> {
    type Ok = ();

    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.item(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.close()
    }
}

impl<'a, O: ByteOrder> ser::SerializeTupleStruct for Compound<'a, O> {
    type Ok = ();

    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.item(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.close()
    }
}

impl<'a, O: ByteOrder> ser::SerializeMap for Compound<'a, O> {
    type Ok = ();

    type Error = Error;

    // pairs are counted on their key
    fn serialize_key<T: ?Sized>(&mut self, key: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.item(key)
    }

    fn serialize_value<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<Self::Ok> {
        self.close()
    }
}

impl<'a, O: ByteOrder> ser::SerializeStruct for Compound<'a, O> {
    type Ok = ();

    type Error = Error;

    // field names are part of the shape, not the bytes
    fn serialize_field<T: ?Sized>(&mut self, _key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.item(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.close()
    }
}

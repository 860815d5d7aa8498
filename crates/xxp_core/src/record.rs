//! Statically shaped Rust types.
//!
//! Types implementing these traits know their [Shape] without looking at a
//! value, so they can be decoded straight from bytes. Structs get their
//! impls from `#[derive(Record)]`.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::byte_order::ByteOrder;
use crate::codec;
use crate::err::{Error, Result};
use crate::shape::{RecordShape, Shape};
use crate::value::{Field, MapValue, SeqValue, Value};

/// A type with a shape known at compile time
pub trait Shaped {
    fn shape() -> Shape;
}

/// Conversion into a [Value] of the type's shape
pub trait IntoValue: Shaped {
    fn into_value(self) -> Value;
}

/// Conversion from a [Value] of the type's shape
pub trait FromValue: Shaped + Sized {
    fn from_value(value: Value) -> Result<Self>;
}

/// A struct with a fixed, ordered field table.
///
/// ```ignore
/// #[derive(Record)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// let bytes = encode_typed(User { id: 7758, name: "Allen".into() }, BigEndian)?;
/// let user: User = decode_typed(&bytes, BigEndian)?;
/// ```
pub trait Record: IntoValue + FromValue {
    fn record_shape() -> RecordShape;
}

/// Encode a typed value to a vector of bytes
pub fn encode_typed<T: IntoValue, O: ByteOrder>(value: T, order: O) -> Result<Vec<u8>> {
    codec::encode(&value.into_value(), order)
}

/// Decode a typed value from a byte-exact buffer, using the type's own shape
pub fn decode_typed<T: FromValue, O: ByteOrder>(bytes: &[u8], order: O) -> Result<T> {
    codec::decode(bytes, order, &T::shape()).and_then(T::from_value)
}

/// Impl the shape traits for integers
macro_rules! shaped_int {
    ($($int: ty => $variant: ident),+) => {
        $(
            impl Shaped for $int {
                fn shape() -> Shape {
                    Shape::$variant
                }
            }

            impl IntoValue for $int {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }

            impl FromValue for $int {
                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::mismatch(Shape::$variant, other.kind_name())),
                    }
                }
            }
        )+
    };
}

shaped_int! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64
}

impl Shaped for String {
    fn shape() -> Shape {
        Shape::String
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::mismatch(Shape::String, other.kind_name())),
        }
    }
}

/// Unwraps the items of a sequence, checking its element shape
fn seq_items<T: Shaped>(seq: SeqValue) -> Result<Vec<Value>> {
    let expected = T::shape();
    if seq.element() != &expected {
        return Err(Error::mismatch(expected, seq.element()));
    }

    Ok(seq.into_items())
}

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> Shape {
        Shape::list(T::shape())
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::list(T::shape(), self.into_iter().map(IntoValue::into_value))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(seq) => seq_items::<T>(seq)?
                .into_iter()
                .map(T::from_value)
                .collect(),
            other => Err(Error::mismatch(Self::shape(), other.kind_name())),
        }
    }
}

impl<T: Shaped, const N: usize> Shaped for [T; N] {
    fn shape() -> Shape {
        Shape::array(T::shape(), N)
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Value {
        Value::array(T::shape(), self.into_iter().map(IntoValue::into_value))
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(seq) => seq_items::<T>(seq)?,
            other => return Err(Error::mismatch(Self::shape(), other.kind_name())),
        };

        items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<_>>>()?
            .try_into()
            .map_err(|items: Vec<T>| {
                Error::mismatch(Self::shape(), format!("array of {} elements", items.len()))
            })
    }
}

/// Unwraps the entries of a map, checking its key and value shapes
fn map_entries<K: Shaped, V: Shaped>(map: MapValue) -> Result<BTreeMap<Value, Value>> {
    let expected = Shape::map(K::shape(), V::shape());
    let found = Shape::map(map.key_shape().clone(), map.value_shape().clone());
    if expected != found {
        return Err(Error::mismatch(expected, found));
    }

    Ok(map.into_entries())
}

impl<K: Shaped, V: Shaped> Shaped for HashMap<K, V> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for HashMap<K, V> {
    fn into_value(self) -> Value {
        Value::map(
            K::shape(),
            V::shape(),
            self.into_iter().map(|(k, v)| (k.into_value(), v.into_value())),
        )
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(map) => map_entries::<K, V>(map)?
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(Error::mismatch(Self::shape(), other.kind_name())),
        }
    }
}

impl<K: Shaped, V: Shaped> Shaped for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::map(
            K::shape(),
            V::shape(),
            self.into_iter().map(|(k, v)| (k.into_value(), v.into_value())),
        )
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(map) => map_entries::<K, V>(map)?
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(Error::mismatch(Self::shape(), other.kind_name())),
        }
    }
}

/// Takes the fields of a record value apart, in declaration order.
///
/// Used by `#[derive(Record)]` to implement [FromValue].
pub struct FieldReader {
    record: &'static str,
    fields: std::vec::IntoIter<Field>,
}

impl FieldReader {
    pub fn new(value: Value, record: &'static str) -> Result<Self> {
        match value {
            Value::Record(r) if r.name() == record => Ok(Self {
                record,
                fields: r.into_fields().into_iter(),
            }),
            Value::Record(r) => Err(Error::mismatch(
                format!("record {}", record),
                format!("record {}", r.name()),
            )),
            other => Err(Error::mismatch(
                format!("record {}", record),
                other.kind_name(),
            )),
        }
    }

    /// Converts the next field, which must be called `name`
    pub fn next<T: FromValue>(&mut self, name: &str) -> Result<T> {
        match self.fields.next() {
            Some(field) if field.name == name => T::from_value(field.value),
            Some(field) => Err(Error::mismatch(
                format!("{}.{}", self.record, name),
                format!("{}.{}", self.record, field.name),
            )),
            None => Err(Error::mismatch(
                format!("{}.{}", self.record, name),
                format!("end of {}", self.record),
            )),
        }
    }

    /// Checks that every field was taken
    pub fn finish(mut self) -> Result<()> {
        match self.fields.next() {
            None => Ok(()),
            Some(field) => Err(Error::mismatch(
                format!("end of {}", self.record),
                format!("{}.{}", self.record, field.name),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::{BigEndian, LittleEndian};
    use crate::value::RecordValue;

    /// What `#[derive(Record)]` expands to for `struct User { id: u32, name: String }`
    #[derive(Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
    }

    impl Shaped for User {
        fn shape() -> Shape {
            Shape::Record(<Self as Record>::record_shape())
        }
    }

    impl IntoValue for User {
        fn into_value(self) -> Value {
            RecordValue::new("User")
                .with_field("id", self.id.into_value())
                .with_field("name", self.name.into_value())
                .into()
        }
    }

    impl FromValue for User {
        fn from_value(value: Value) -> Result<Self> {
            let mut reader = FieldReader::new(value, "User")?;
            let this = Self {
                id: reader.next("id")?,
                name: reader.next("name")?,
            };
            reader.finish()?;

            Ok(this)
        }
    }

    impl Record for User {
        fn record_shape() -> RecordShape {
            RecordShape::new("User")
                .field("id", <u32 as Shaped>::shape())
                .field("name", <String as Shaped>::shape())
        }
    }

    fn allen() -> User {
        User {
            id: 7758,
            name: "Allen".to_owned(),
        }
    }

    #[test]
    fn test_typed_record() {
        let bytes = encode_typed(allen(), BigEndian).unwrap();
        assert_eq!(&bytes[..4], &[0x00, 0x00, 0x1E, 0x4E]);
        assert_eq!(bytes.len(), 4 + 8 + 5);

        let user: User = decode_typed(&bytes, BigEndian).unwrap();
        assert_eq!(user, allen());
    }

    #[test]
    fn test_typed_collections() {
        let users = BTreeMap::from([(1_u32, allen()), (2, allen())]);
        let bytes = encode_typed(
            BTreeMap::from([(1_u32, allen()), (2, allen())]),
            LittleEndian,
        )
        .unwrap();
        assert_eq!(
            decode_typed::<BTreeMap<u32, User>, _>(&bytes, LittleEndian).unwrap(),
            users
        );

        let grid = [vec![1_i16, -1], vec![]];
        let bytes = encode_typed(grid.clone(), BigEndian).unwrap();
        assert_eq!(
            decode_typed::<[Vec<i16>; 2], _>(&bytes, BigEndian).unwrap(),
            grid
        );

        let counts = HashMap::from([("a".to_owned(), 1_u64), ("b".to_owned(), 2)]);
        let bytes = encode_typed(counts.clone(), BigEndian).unwrap();
        assert_eq!(
            decode_typed::<HashMap<String, u64>, _>(&bytes, BigEndian).unwrap(),
            counts
        );
    }

    #[test]
    fn test_shapes() {
        assert_eq!(<Vec<u8> as Shaped>::shape(), Shape::list(Shape::U8));
        assert_eq!(<[i64; 3] as Shaped>::shape(), Shape::array(Shape::I64, 3));
        assert_eq!(
            <HashMap<u32, String> as Shaped>::shape(),
            <BTreeMap<u32, String> as Shaped>::shape()
        );
        assert_eq!(
            User::shape().to_string(),
            "User { id: u32, name: string }"
        );
    }

    #[test]
    fn test_from_value_mismatch() {
        assert!(matches!(
            u16::from_value(Value::U32(1)),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            <Vec<u8>>::from_value(Value::list(Shape::U16, [])),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            <[u8; 2]>::from_value(Value::array(Shape::U8, [Value::U8(1)])),
            Err(Error::ShapeMismatch { .. })
        ));

        let renamed: Value = RecordValue::new("User")
            .with_field("uid", 1_u32)
            .with_field("name", "x")
            .into();
        assert_eq!(
            User::from_value(renamed),
            Err(Error::ShapeMismatch {
                expected: "User.id".to_owned(),
                found: "User.uid".to_owned()
            })
        );

        let extra: Value = RecordValue::new("User")
            .with_field("id", 1_u32)
            .with_field("name", "x")
            .with_field("age", 3_u8)
            .into();
        assert!(matches!(
            User::from_value(extra),
            Err(Error::ShapeMismatch { .. })
        ));

        let other: Value = RecordValue::new("Admin")
            .with_field("id", 1_u32)
            .with_field("name", "x")
            .into();
        assert!(matches!(
            User::from_value(other),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}

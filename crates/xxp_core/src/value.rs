//! The closed set of values the codec understands.
//!
//! Collections carry the shape of their elements, so [Value::shape] is
//! total even for empty collections.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::consts::SIZE_PREFIX_LEN;
use crate::shape::{RecordShape, Shape};

/// A structured in-memory value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    String(String),
    /// Fixed-size sequence
    Array(SeqValue),
    /// Variable-size sequence
    List(SeqValue),
    Map(MapValue),
    Record(RecordValue),
}

/// Elements of an array or list, all of the same shape
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeqValue {
    element: Shape,
    items: Vec<Value>,
}

/// Key-value pairs of a mapping.
///
/// Entries are kept ordered by key, so encoding the same map twice always
/// produces the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapValue {
    key: Shape,
    value: Shape,
    entries: BTreeMap<Value, Value>,
}

/// Named fields of a record, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordValue {
    name: String,
    fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl SeqValue {
    pub fn new(element: Shape, items: impl IntoIterator<Item = Value>) -> Self {
        Self {
            element,
            items: items.into_iter().collect(),
        }
    }

    pub fn element(&self) -> &Shape {
        &self.element
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: Value) {
        self.items.push(item);
    }
}

impl MapValue {
    pub fn new(key: Shape, value: Shape) -> Self {
        Self {
            key,
            value,
            entries: BTreeMap::new(),
        }
    }

    pub fn key_shape(&self) -> &Shape {
        &self.key
    }

    pub fn value_shape(&self) -> &Shape {
        &self.value
    }

    pub fn entries(&self) -> &BTreeMap<Value, Value> {
        &self.entries
    }

    pub fn into_entries(self) -> BTreeMap<Value, Value> {
        self.entries
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Inserts a pair, returning the previous value for the key
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    /// Looks up a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    /// The field table this record conforms to
    pub fn shape(&self) -> RecordShape {
        self.fields
            .iter()
            .fold(RecordShape::new(self.name.clone()), |shape, f| {
                shape.field(f.name.clone(), f.value.shape())
            })
    }
}

impl Value {
    /// A variable-size sequence of `element`-shaped items
    pub fn list(element: Shape, items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(SeqValue::new(element, items))
    }

    /// A fixed-size sequence of `element`-shaped items
    pub fn array(element: Shape, items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(SeqValue::new(element, items))
    }

    /// A mapping. Later duplicates of a key replace earlier ones.
    pub fn map(key: Shape, value: Shape, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut map = MapValue::new(key, value);
        map.entries.extend(entries);
        Self::Map(map)
    }

    /// Returns the shape of this value
    pub fn shape(&self) -> Shape {
        match self {
            Self::I8(_) => Shape::I8,
            Self::I16(_) => Shape::I16,
            Self::I32(_) => Shape::I32,
            Self::I64(_) => Shape::I64,
            Self::U8(_) => Shape::U8,
            Self::U16(_) => Shape::U16,
            Self::U32(_) => Shape::U32,
            Self::U64(_) => Shape::U64,
            Self::String(_) => Shape::String,
            Self::Array(seq) => Shape::array(seq.element.clone(), seq.len()),
            Self::List(seq) => Shape::list(seq.element.clone()),
            Self::Map(map) => Shape::map(map.key.clone(), map.value.clone()),
            Self::Record(record) => Shape::Record(record.shape()),
        }
    }

    /// Short name of the kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
        }
    }

    /// Exact number of bytes the encoder produces for this value
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::I8(_) | Self::U8(_) => 1,
            Self::I16(_) | Self::U16(_) => 2,
            Self::I32(_) | Self::U32(_) => 4,
            Self::I64(_) | Self::U64(_) => 8,
            Self::String(s) => SIZE_PREFIX_LEN + s.len(),
            Self::Array(seq) | Self::List(seq) => {
                SIZE_PREFIX_LEN + seq.items.iter().map(Value::encoded_len).sum::<usize>()
            }
            Self::Map(map) => {
                SIZE_PREFIX_LEN
                    + map
                        .entries
                        .iter()
                        .map(|(k, v)| k.encoded_len() + v.encoded_len())
                        .sum::<usize>()
            }
            Self::Record(record) => record.fields.iter().map(|f| f.value.encoded_len()).sum(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Items of an array or list
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::Array(seq) | Self::List(seq) => Some(seq.items()),
            _ => None,
        }
    }
}

/// Impl [From] for integer values
macro_rules! value_from_int {
    ($($int: ty => $variant: ident),+) => {
        $(
            impl From<$int> for Value {
                fn from(v: $int) -> Self {
                    Self::$variant(v)
                }
            }
        )+
    };
}

value_from_int! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<RecordValue> for Value {
    fn from(r: RecordValue) -> Self {
        Self::Record(r)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Array(seq) | Self::List(seq) => {
                write!(f, "[")?;
                for (idx, item) in seq.items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (idx, (k, v)) in map.entries.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Self::Record(record) => record.fmt(f),
        }
    }
}

impl Display for RecordValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{} ", self.name)?;
        }

        if self.fields.is_empty() {
            return write!(f, "{{}}");
        }

        write!(f, "{{ ")?;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field.name, field.value)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allen() -> Value {
        RecordValue::new("User")
            .with_field("Id", 7758_u32)
            .with_field("Name", "Allen")
            .into()
    }

    #[test]
    fn test_shape_of_record() {
        let expected = RecordShape::new("User")
            .field("Id", Shape::U32)
            .field("Name", Shape::String);

        assert_eq!(allen().shape(), Shape::Record(expected));
    }

    #[test]
    fn test_shape_of_empty_collections() {
        let list = Value::list(Shape::String, []);
        let map = Value::map(Shape::U32, allen().shape(), []);

        assert_eq!(list.shape(), Shape::list(Shape::String));
        assert_eq!(map.shape(), Shape::map(Shape::U32, allen().shape()));
        assert_eq!(
            Value::array(Shape::U8, [1_u8.into(), 2_u8.into()]).shape(),
            Shape::array(Shape::U8, 2)
        );
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(allen().encoded_len(), 4 + 8 + 5);

        let map = Value::map(
            Shape::U32,
            Shape::String,
            [(1_u32.into(), "Allen".into()), (2_u32.into(), "Alice".into())],
        );
        assert_eq!(map.encoded_len(), 8 + 2 * (4 + 8 + 5));
        assert_eq!(Value::list(Shape::U64, []).encoded_len(), 8);
    }

    #[test]
    fn test_map_orders_keys() {
        let map = Value::map(
            Shape::U32,
            Shape::String,
            [(2_u32.into(), "Alice".into()), (1_u32.into(), "Allen".into())],
        );

        let keys = map
            .as_map()
            .unwrap()
            .entries()
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(keys, vec![Value::U32(1), Value::U32(2)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(allen().to_string(), "User { Id: 7758, Name: \"Allen\" }");
        assert_eq!(
            Value::list(Shape::I8, [Value::I8(-1), Value::I8(2)]).to_string(),
            "[-1, 2]"
        );
        assert_eq!(
            Value::map(Shape::U8, Shape::U8, [(1_u8.into(), 2_u8.into())]).to_string(),
            "{1: 2}"
        );
    }
}

//! Shapes describe the structure of a value independently of any bytes.
//!
//! The decoder cannot discover a shape from the input, so the caller always
//! supplies one. Shapes can be built in code, derived from a type through
//! [crate::Shaped], or parsed from text:
//!
//! ```
//! use xxp_core::Shape;
//!
//! let shape: Shape = "User { id: u32, name: string, tags: [string] }".parse().unwrap();
//! assert_eq!(shape.to_string(), "User { id: u32, name: string, tags: [string] }");
//! ```

mod parse;

use std::fmt::Display;

/// The structural type of a value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shape {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    String,
    /// Fixed-size sequence. The element count is part of the shape.
    Array { element: Box<Shape>, len: usize },
    /// Variable-size sequence
    List(Box<Shape>),
    Map { key: Box<Shape>, value: Box<Shape> },
    Record(RecordShape),
}

/// Ordered field table of a record.
///
/// Fields are encoded in exactly this order with nothing between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordShape {
    name: String,
    fields: Vec<FieldShape>,
}

/// A single named field of a [RecordShape]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldShape {
    pub name: String,
    pub shape: Shape,
}

impl RecordShape {
    /// Creates a record shape with no fields. The name may be empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field to the table
    pub fn field(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.fields.push(FieldShape {
            name: name.into(),
            shape,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<RecordShape> for Shape {
    fn from(record: RecordShape) -> Self {
        Self::Record(record)
    }
}

impl Shape {
    pub fn array(element: Shape, len: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            len,
        }
    }

    pub fn list(element: Shape) -> Self {
        Self::List(Box::new(element))
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Short name of the kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::String => "string",
            Self::Array { .. } => "array",
            Self::List(_) => "list",
            Self::Map { .. } => "map",
            Self::Record(_) => "record",
        }
    }

    /// Width in bytes of an integer shape
    pub fn int_width(&self) -> Option<usize> {
        match self {
            Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 => Some(4),
            Self::I64 | Self::U64 => Some(8),
            _ => None,
        }
    }

    /// Encoded size of every value of this shape, if it is the same for all
    /// of them.
    pub fn fixed_len(&self) -> Option<usize> {
        match self {
            Self::String | Self::List(_) | Self::Map { .. } => None,
            Self::Array { element, len } => element
                .fixed_len()?
                .checked_mul(*len)?
                .checked_add(crate::consts::SIZE_PREFIX_LEN),
            Self::Record(record) => record
                .fields
                .iter()
                .try_fold(0_usize, |acc, f| acc.checked_add(f.shape.fixed_len()?)),
            int => int.int_width(),
        }
    }

    /// The fewest bytes any value of this shape can encode to.
    ///
    /// Saturates instead of overflowing for absurdly large arrays.
    pub fn min_len(&self) -> usize {
        match self {
            Self::String | Self::List(_) | Self::Map { .. } => crate::consts::SIZE_PREFIX_LEN,
            Self::Array { element, len } => element
                .min_len()
                .saturating_mul(*len)
                .saturating_add(crate::consts::SIZE_PREFIX_LEN),
            Self::Record(record) => record
                .fields
                .iter()
                .fold(0_usize, |acc, f| acc.saturating_add(f.shape.min_len())),
            int => int.int_width().unwrap_or_default(),
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Array { element, len } => write!(f, "[{}; {}]", element, len),
            Self::List(element) => write!(f, "[{}]", element),
            Self::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            Self::Record(record) => record.fmt(f),
            other => write!(f, "{}", other.kind_name()),
        }
    }
}

impl Display for RecordShape {
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
            write!(f, "{}: {}", field.name, field.shape)?;
        }
        write!(f, " }}")
    }
}

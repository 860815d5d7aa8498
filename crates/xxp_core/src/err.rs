//! Error implementations

use serde::{de, ser};

/// Result alias used throughout the codec
pub type Result<T> = std::result::Result<T, Error>;

/// Custom error object for this library.
///
/// Every variant aborts the encode or decode call that raised it.
/// There is no partial output on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The value or destination shape is outside the supported kinds.
    /// Carries the name of the offending shape.
    UnsupportedShape(String),

    /// The input ran out before a rule could complete.
    TruncatedInput { needed: usize, available: usize },

    /// A value or the encoded data disagrees with the expected shape.
    ShapeMismatch { expected: String, found: String },

    /// A decoded string is not valid UTF-8
    InvalidUtf8,

    /// A decoded map contains the same key twice
    DuplicateKey(String),

    /// The input holds more bytes than the decoded value used
    TrailingBytes(usize),

    /// Nesting went deeper than the configured maximum
    DepthLimitExceeded(usize),

    /// A length or count prefix is larger than the configured maximum
    LengthLimitExceeded { len: u64, max: usize },

    /// A textual shape description could not be parsed
    MalformedShape(String),

    /// Message from a serde `Serialize`/`Deserialize` impl
    Custom(String),
}

impl Error {
    /// Shorthand for [Error::ShapeMismatch]
    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

impl std::error::Error for Error {}

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Custom(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Custom(msg.to_string())
    }

    fn invalid_length(len: usize, exp: &dyn de::Expected) -> Self {
        Self::ShapeMismatch {
            expected: exp.to_string(),
            found: format!("{} elements", len),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedShape(shape) => write!(f, "unsupported shape: {}", shape),
            Self::TruncatedInput { needed, available } => write!(
                f,
                "truncated input: needed {} bytes, {} available",
                needed, available
            ),
            Self::ShapeMismatch { expected, found } => {
                write!(f, "shape mismatch: expected {}, found {}", expected, found)
            }
            Self::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            Self::DuplicateKey(key) => write!(f, "duplicate map key: {}", key),
            Self::TrailingBytes(n) => write!(f, "{} trailing bytes after decoded value", n),
            Self::DepthLimitExceeded(max) => write!(f, "nesting deeper than {} levels", max),
            Self::LengthLimitExceeded { len, max } => {
                write!(f, "length prefix {} exceeds the limit of {}", len, max)
            }
            Self::MalformedShape(msg) => write!(f, "malformed shape: {}", msg),
            Self::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

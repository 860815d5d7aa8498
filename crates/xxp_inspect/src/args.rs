//! CLI args

use std::{fmt::Display, path::PathBuf};

use clap::Parser;
use xxp::{CodecConfig, Endian, Shape};

/// Decodes a buffer against a shape and prints the value
#[derive(Parser, Debug)]
pub(crate) struct InspectArgs {
    /// Shape of the encoded value, e.g. `ts { Id: u32, Name: string }`
    #[clap(short, long)]
    pub shape: Shape,

    /// Byte order the value was encoded with
    #[clap(short, long)]
    #[clap(default_value_t = Order::Big)]
    pub order: Order,

    /// Deepest nesting of collections and records to accept
    #[clap(long)]
    #[clap(default_value_t = xxp::defaults::MAX_DEPTH)]
    pub max_depth: usize,

    /// Largest element or pair count to accept
    #[clap(long)]
    #[clap(default_value_t = xxp::defaults::MAX_LEN)]
    pub max_len: usize,

    /// The input is hex text instead of raw bytes
    #[clap(long)]
    pub hex: bool,

    /// File to read the buffer from. Reads stdin if absent.
    pub input: Option<PathBuf>,
}

impl InspectArgs {
    pub fn config(&self) -> CodecConfig {
        CodecConfig::default()
            .with_max_depth(self.max_depth)
            .with_max_len(self.max_len)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Order {
    /// Most significant byte first
    Big,

    /// Least significant byte first
    Little,
}

impl From<Order> for Endian {
    fn from(order: Order) -> Self {
        match order {
            Order::Big => Endian::Big,
            Order::Little => Endian::Little,
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Endian::from(*self))
    }
}

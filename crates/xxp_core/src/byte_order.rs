//! Byte order policies for multi-byte integers.
//!
//! The policy is the only environment-dependent axis of the wire format.
//! An encoder and the decoder that reads its output must use the same one.

use std::fmt::{Debug, Display};

/// Converts fixed-width unsigned integers to and from their wire bytes.
///
/// Signed integers go through the unsigned conversion of the same width,
/// so their two's-complement bit pattern is written unchanged.
/// Single bytes are order-independent and never reach the policy.
pub trait ByteOrder: Copy + Debug {
    fn u16_to_bytes(self, v: u16) -> [u8; 2];
    fn u32_to_bytes(self, v: u32) -> [u8; 4];
    fn u64_to_bytes(self, v: u64) -> [u8; 8];

    fn u16_from_bytes(self, bytes: [u8; 2]) -> u16;
    fn u32_from_bytes(self, bytes: [u8; 4]) -> u32;
    fn u64_from_bytes(self, bytes: [u8; 8]) -> u64;
}

/// Most significant byte first (network order).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BigEndian;

/// Least significant byte first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LittleEndian;

/// Impl [ByteOrder] for a zero-sized policy using the std conversions
macro_rules! impl_byte_order {
    ($policy: ty, $to_fn: ident, $from_fn: ident) => {
        impl ByteOrder for $policy {
            fn u16_to_bytes(self, v: u16) -> [u8; 2] {
                v.$to_fn()
            }

            fn u32_to_bytes(self, v: u32) -> [u8; 4] {
                v.$to_fn()
            }

            fn u64_to_bytes(self, v: u64) -> [u8; 8] {
                v.$to_fn()
            }

            fn u16_from_bytes(self, bytes: [u8; 2]) -> u16 {
                u16::$from_fn(bytes)
            }

            fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
                u32::$from_fn(bytes)
            }

            fn u64_from_bytes(self, bytes: [u8; 8]) -> u64 {
                u64::$from_fn(bytes)
            }
        }
    };
}

impl_byte_order! {BigEndian, to_be_bytes, from_be_bytes}
impl_byte_order! {LittleEndian, to_le_bytes, from_le_bytes}

/// Byte order selected at runtime, e.g. from a command line flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

/// Forward a conversion to the matching zero-sized policy
macro_rules! forward_endian {
    ($fn_name: ident, $arg: ident: $arg_ty: ty => $ret: ty) => {
        fn $fn_name(self, $arg: $arg_ty) -> $ret {
            match self {
                Self::Big => BigEndian.$fn_name($arg),
                Self::Little => LittleEndian.$fn_name($arg),
            }
        }
    };
}

impl ByteOrder for Endian {
    forward_endian! {u16_to_bytes, v: u16 => [u8; 2]}
    forward_endian! {u32_to_bytes, v: u32 => [u8; 4]}
    forward_endian! {u64_to_bytes, v: u64 => [u8; 8]}

    forward_endian! {u16_from_bytes, bytes: [u8; 2] => u16}
    forward_endian! {u32_from_bytes, bytes: [u8; 4] => u32}
    forward_endian! {u64_from_bytes, bytes: [u8; 8] => u64}
}

impl From<BigEndian> for Endian {
    fn from(_: BigEndian) -> Self {
        Self::Big
    }
}

impl From<LittleEndian> for Endian {
    fn from(_: LittleEndian) -> Self {
        Self::Little
    }
}

impl Display for Endian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Big => write!(f, "big"),
            Self::Little => write!(f, "little"),
        }
    }
}

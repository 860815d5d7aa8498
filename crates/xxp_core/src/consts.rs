//! Shared constants between encoding and decoding logic.

/// Strings, sequences and maps are prefixed with their size as this type,
/// written through the byte order policy.
pub type ByteSizePrefix = u64;

/// Number of bytes taken by a [ByteSizePrefix]
pub const SIZE_PREFIX_LEN: usize = std::mem::size_of::<ByteSizePrefix>();

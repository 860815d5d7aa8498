//! Byte buffers used by the codec.
//!
//! [ByteBuffer] is the owned, append-only output of an encoder.
//! [ByteViewer] consumes an input slice from the front for a decoder.

use crate::byte_order::ByteOrder;
use crate::consts::{ByteSizePrefix, SIZE_PREFIX_LEN};
use crate::err::{Error, Result};

/// An owned, growable sequence of bytes. Writes only ever append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Vec<u8>,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns a viewer that reads this buffer from the start
    pub fn viewer(&self) -> ByteViewer<'_> {
        ByteViewer::from_slice(&self.bytes)
    }

    pub fn put_u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    pub fn put_u16<O: ByteOrder>(&mut self, order: O, v: u16) {
        self.bytes.extend(order.u16_to_bytes(v));
    }

    pub fn put_u32<O: ByteOrder>(&mut self, order: O, v: u32) {
        self.bytes.extend(order.u32_to_bytes(v));
    }

    pub fn put_u64<O: ByteOrder>(&mut self, order: O, v: u64) {
        self.bytes.extend(order.u64_to_bytes(v));
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes a size prefix: a byte length or an element/pair count.
    pub fn put_size<O: ByteOrder>(&mut self, order: O, size: usize) {
        self.put_u64(order, size as ByteSizePrefix);
    }

    /// Writes the size prefix followed by the bytes themselves.
    pub fn put_sized_slice<O: ByteOrder>(&mut self, order: O, bytes: &[u8]) {
        self.put_size(order, bytes.len());
        self.put_slice(bytes);
    }

    /// Reserves room for a size prefix that is not known yet.
    ///
    /// Returns the position to hand to [ByteBuffer::patch_size] once the
    /// count is known.
    pub fn reserve_size(&mut self) -> usize {
        let pos = self.bytes.len();
        self.bytes.extend([0_u8; SIZE_PREFIX_LEN]);
        pos
    }

    /// Overwrites a size prefix previously reserved at `pos`.
    pub fn patch_size<O: ByteOrder>(&mut self, order: O, pos: usize, size: usize) {
        let bytes = order.u64_to_bytes(size as ByteSizePrefix);
        self.bytes[pos..pos + SIZE_PREFIX_LEN].copy_from_slice(&bytes);
    }
}

impl From<ByteBuffer> for Vec<u8> {
    fn from(buf: ByteBuffer) -> Self {
        buf.bytes
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// A reference into an existing slice of bytes.
///
/// Bytes are consumed from the front. Every read is bounds checked and
/// fails with [Error::TruncatedInput] without advancing when the slice
/// runs out.
#[derive(Debug, Clone)]
pub struct ByteViewer<'arr> {
    slice: &'arr [u8],
    offset: usize,
}

impl<'arr> ByteViewer<'arr> {
    /// Create a new viewer on a byte slice
    pub fn from_slice(s: &'arr [u8]) -> Self {
        Self {
            slice: s,
            offset: 0,
        }
    }

    /// Number of bytes consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes left to consume
    pub fn distance_to_end(&self) -> usize {
        self.slice.len() - self.offset
    }

    pub fn is_end(&self) -> bool {
        self.distance_to_end() == 0
    }

    /// Peek at the next byte in the slice
    pub fn peek(&self) -> Option<&u8> {
        self.slice.get(self.offset)
    }

    /// Return the next byte and advance the view
    pub fn next_byte(&mut self) -> Result<u8> {
        let [b] = self.next_bytes_fixed::<1>()?;
        Ok(b)
    }

    /// Returns the next slice of bytes and advances the view.
    pub fn next_bytes(&mut self, size: usize) -> Result<&'arr [u8]> {
        let available = self.distance_to_end();
        if size > available {
            return Err(Error::TruncatedInput {
                needed: size,
                available,
            });
        }

        let view = &self.slice[self.offset..self.offset + size];
        self.offset += size;

        Ok(view)
    }

    /// Returns a copy of the next slice of bytes as a fixed-size array.
    pub fn next_bytes_fixed<const ARR_SIZE: usize>(&mut self) -> Result<[u8; ARR_SIZE]> {
        let view = self.next_bytes(ARR_SIZE)?;
        let mut arr = [0_u8; ARR_SIZE];
        arr.copy_from_slice(view);

        Ok(arr)
    }

    pub fn pop_u16<O: ByteOrder>(&mut self, order: O) -> Result<u16> {
        Ok(order.u16_from_bytes(self.next_bytes_fixed()?))
    }

    pub fn pop_u32<O: ByteOrder>(&mut self, order: O) -> Result<u32> {
        Ok(order.u32_from_bytes(self.next_bytes_fixed()?))
    }

    pub fn pop_u64<O: ByteOrder>(&mut self, order: O) -> Result<u64> {
        Ok(order.u64_from_bytes(self.next_bytes_fixed()?))
    }

    /// Takes the next size prefix.
    ///
    /// Strings, sequences and maps store their size (in bytes, elements or
    /// pairs) at the start.
    pub fn pop_size<O: ByteOrder>(&mut self, order: O) -> Result<ByteSizePrefix> {
        self.pop_u64(order)
    }

    /// Takes a size prefix and then that many bytes.
    pub fn next_sized_bytes<O: ByteOrder>(&mut self, order: O) -> Result<&'arr [u8]> {
        let len = self.pop_size(order)?;
        let available = self.distance_to_end();
        let len = usize::try_from(len).map_err(|_| Error::TruncatedInput {
            needed: usize::MAX,
            available,
        })?;

        self.next_bytes(len)
    }
}

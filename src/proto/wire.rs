//! Primitive wire encodings.
//!
//! Every value is written little-endian with no padding. Strings are UTF-8
//! followed by a single `0x00`, vectors are a `u32` element count followed by
//! the elements back to back.

use super::error::{DecodeError, Result};
use byteorder::{ByteOrder, LittleEndian};
use bytes::{BufMut, BytesMut};

/// Bytes reserved up front for a decoded vector; larger vectors grow as
/// elements actually decode.
const MAX_PREALLOC_BYTES: usize = 64 * 1024;

/// Forward-only cursor over an immutable buffer.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::TruncatedInput {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let buf: &'a [u8] = self.buf;
        let bytes = &buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Read a NUL-terminated UTF-8 string, consuming the terminator.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let buf: &'a [u8] = self.buf;
        let start = self.pos;
        let rest = &buf[start..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::TruncatedInput {
                offset: start,
                needed: rest.len() + 1,
                available: rest.len(),
            })?;

        let s = std::str::from_utf8(&rest[..len])
            .map_err(|source| DecodeError::InvalidEncoding {
                offset: start,
                source,
            })?;
        self.pos += len + 1;
        Ok(s)
    }

    /// Upper bound on elements reserved up front for a `Vec<T>`: what the
    /// remaining bytes could hold at one byte per element, capped at
    /// `MAX_PREALLOC_BYTES` worth of `T`.
    fn prealloc_limit<T>(&self) -> usize {
        let by_size = MAX_PREALLOC_BYTES / std::mem::size_of::<T>().max(1);
        self.remaining().min(by_size)
    }

    /// Read a `u32` count followed by that many `T`.
    pub fn read_vec<T: Wire>(&mut self) -> Result<Vec<T>> {
        let count = self.read_u32()? as usize;
        let mut items = Vec::with_capacity(count.min(self.prealloc_limit::<T>()));
        for _ in 0..count {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }
}

pub fn write_str(buf: &mut BytesMut, s: &str) {
    debug_assert!(!s.as_bytes().contains(&0), "string carries an embedded NUL");
    buf.reserve(s.len() + 1);
    buf.put_slice(s.as_bytes());
    buf.put_u8(0);
}

pub fn write_vec<T: Wire>(buf: &mut BytesMut, items: &[T]) {
    buf.put_u32_le(items.len() as u32);
    for item in items {
        item.encode(buf);
    }
}

/// A value with a fixed position-independent wire encoding.
///
/// Implementors are the element codecs used by every `Vec<T>` field.
pub trait Wire: Sized {
    fn encode(&self, buf: &mut BytesMut);

    fn decode(reader: &mut Reader<'_>) -> Result<Self>;
}

impl Wire for u8 {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(*self);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_u8()
    }
}

impl Wire for u32 {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(*self);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_u32()
    }
}

impl Wire for u64 {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(*self);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_u64()
    }
}

impl Wire for f64 {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_f64_le(*self);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_f64()
    }
}

impl Wire for String {
    fn encode(&self, buf: &mut BytesMut) {
        write_str(buf, self);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_str().map(str::to_owned)
    }
}

impl<T: Wire> Wire for Vec<T> {
    fn encode(&self, buf: &mut BytesMut) {
        write_vec(buf, self);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_vec()
    }
}

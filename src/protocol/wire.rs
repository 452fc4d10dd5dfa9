//! Wire primitives: big-endian fixed-width integers, unsigned varints and the
//! two length-prefix forms (fixed and compact) for strings, bytes and arrays.
//!
//! Readers take `&mut &[u8]` and advance it; every read checks the remaining
//! length first so a truncated buffer surfaces as [`CodecError::UnexpectedEof`].

use crate::error::CodecError;
use bytes::{Buf, BufMut, BytesMut};

type Result<T> = std::result::Result<T, CodecError>;

const MAX_VARINT_BYTES: usize = 5;

fn ensure(src: &[u8], needed: usize) -> Result<()> {
    if src.len() < needed {
        return Err(CodecError::UnexpectedEof {
            needed,
            remaining: src.len(),
        });
    }
    Ok(())
}

pub fn read_i8(src: &mut &[u8]) -> Result<i8> {
    ensure(src, 1)?;
    Ok(src.get_i8())
}

pub fn read_i16(src: &mut &[u8]) -> Result<i16> {
    ensure(src, 2)?;
    Ok(src.get_i16())
}

pub fn read_i32(src: &mut &[u8]) -> Result<i32> {
    ensure(src, 4)?;
    Ok(src.get_i32())
}

pub fn read_i64(src: &mut &[u8]) -> Result<i64> {
    ensure(src, 8)?;
    Ok(src.get_i64())
}

/// Unsigned varint: 7 payload bits per byte, low group first, MSB = continuation.
pub fn put_unsigned_varint(dst: &mut BytesMut, mut value: u32) {
    while value > 0x7f {
        dst.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

pub fn read_unsigned_varint(src: &mut &[u8]) -> Result<u32> {
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT_BYTES {
        ensure(src, 1)?;
        let b = src.get_u8();
        // The fifth byte carries only the top four bits of a u32.
        if i == MAX_VARINT_BYTES - 1 && b > 0x0f {
            return Err(CodecError::VarintTooLong);
        }
        value |= ((b & 0x7f) as u32) << (7 * i);
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::VarintTooLong)
}

/// Number of bytes `put_unsigned_varint` emits for `value`.
pub fn unsigned_varint_len(mut value: u32) -> usize {
    let mut len = 1;
    while value > 0x7f {
        value >>= 7;
        len += 1;
    }
    len
}

fn compact_len(len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or(CodecError::LengthOverflow(len))
}

/// Write a length prefix for a string, byte array or array. `None` writes the null marker.
fn put_len(dst: &mut BytesMut, len: Option<usize>, compact: bool, width: LenWidth) -> Result<()> {
    match (len, compact) {
        (None, true) => put_unsigned_varint(dst, 0),
        (Some(n), true) => put_unsigned_varint(dst, compact_len(n)?),
        (None, false) => match width {
            LenWidth::Short => dst.put_i16(-1),
            LenWidth::Int => dst.put_i32(-1),
        },
        (Some(n), false) => match width {
            LenWidth::Short => {
                let n = i16::try_from(n).map_err(|_| CodecError::LengthOverflow(n))?;
                dst.put_i16(n);
            }
            LenWidth::Int => {
                let n = i32::try_from(n).map_err(|_| CodecError::LengthOverflow(n))?;
                dst.put_i32(n);
            }
        },
    }
    Ok(())
}

fn read_len(src: &mut &[u8], compact: bool, width: LenWidth) -> Result<Option<usize>> {
    let raw: i64 = if compact {
        read_unsigned_varint(src)? as i64 - 1
    } else {
        match width {
            LenWidth::Short => read_i16(src)? as i64,
            LenWidth::Int => read_i32(src)? as i64,
        }
    };
    match raw {
        -1 => Ok(None),
        n if n < 0 => Err(CodecError::InvalidLength(n)),
        n => Ok(Some(n as usize)),
    }
}

#[derive(Clone, Copy)]
enum LenWidth {
    Short,
    Int,
}

fn take(src: &mut &[u8], len: usize) -> Result<Vec<u8>> {
    ensure(src, len)?;
    let out = src[..len].to_vec();
    src.advance(len);
    Ok(out)
}

/// Fixed form: int16 length (-1 null). Compact form: varint(length + 1) (0 null).
pub fn put_string(dst: &mut BytesMut, value: Option<&str>, compact: bool) -> Result<()> {
    put_len(dst, value.map(str::len), compact, LenWidth::Short)?;
    if let Some(s) = value {
        dst.extend_from_slice(s.as_bytes());
    }
    Ok(())
}

pub fn read_string(src: &mut &[u8], compact: bool) -> Result<Option<String>> {
    match read_len(src, compact, LenWidth::Short)? {
        None => Ok(None),
        Some(len) => {
            let raw = take(src, len)?;
            String::from_utf8(raw)
                .map(Some)
                .map_err(|_| CodecError::InvalidUtf8)
        }
    }
}

/// Fixed form: int32 length (-1 null). Compact form as for strings.
pub fn put_bytes(dst: &mut BytesMut, value: Option<&[u8]>, compact: bool) -> Result<()> {
    put_len(dst, value.map(<[u8]>::len), compact, LenWidth::Int)?;
    if let Some(b) = value {
        dst.extend_from_slice(b);
    }
    Ok(())
}

pub fn read_bytes(src: &mut &[u8], compact: bool) -> Result<Option<Vec<u8>>> {
    match read_len(src, compact, LenWidth::Int)? {
        None => Ok(None),
        Some(len) => take(src, len).map(Some),
    }
}

/// Element count prefix: fixed int32 (-1 null) or compact varint(count + 1).
pub fn put_array_len(dst: &mut BytesMut, count: Option<usize>, compact: bool) -> Result<()> {
    put_len(dst, count, compact, LenWidth::Int)
}

pub fn read_array_len(src: &mut &[u8], compact: bool) -> Result<Option<usize>> {
    read_len(src, compact, LenWidth::Int)
}

/// Raw slice of `len` bytes, used for tagged-field payloads.
pub fn read_raw<'a>(src: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    ensure(src, len)?;
    let (head, tail) = src.split_at(len);
    *src = tail;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_boundaries() {
        for (value, expected) in [
            (0u32, vec![0x00]),
            (1, vec![0x01]),
            (127, vec![0x7f]),
            (128, vec![0x80, 0x01]),
            (300, vec![0xac, 0x02]),
            (u32::MAX, vec![0xff, 0xff, 0xff, 0xff, 0x0f]),
        ] {
            let mut buf = BytesMut::new();
            put_unsigned_varint(&mut buf, value);
            assert_eq!(&buf[..], &expected[..], "value {}", value);
            assert_eq!(unsigned_varint_len(value), expected.len());
            let mut src = &buf[..];
            assert_eq!(read_unsigned_varint(&mut src).unwrap(), value);
            assert!(src.is_empty());
        }
    }

    #[test]
    fn varint_rejects_six_byte_encoding() {
        let mut src: &[u8] = &[0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        assert_eq!(read_unsigned_varint(&mut src), Err(CodecError::VarintTooLong));
    }

    #[test]
    fn varint_rejects_bits_past_u32() {
        let mut src: &[u8] = &[0xff, 0xff, 0xff, 0xff, 0x7f];
        assert_eq!(read_unsigned_varint(&mut src), Err(CodecError::VarintTooLong));
        let mut src: &[u8] = &[0x80, 0x80, 0x80, 0x80, 0x10];
        assert_eq!(read_unsigned_varint(&mut src), Err(CodecError::VarintTooLong));
    }

    #[test]
    fn null_string_markers() {
        let mut fixed = BytesMut::new();
        put_string(&mut fixed, None, false).unwrap();
        assert_eq!(&fixed[..], &[0xff, 0xff]);

        let mut compact = BytesMut::new();
        put_string(&mut compact, None, true).unwrap();
        assert_eq!(&compact[..], &[0x00]);

        let mut empty = BytesMut::new();
        put_string(&mut empty, Some(""), true).unwrap();
        assert_eq!(&empty[..], &[0x01]);
    }

    #[test]
    fn bytes_use_int32_prefix_in_fixed_mode() {
        let mut buf = BytesMut::new();
        put_bytes(&mut buf, Some(b"ab"), false).unwrap();
        assert_eq!(&buf[..], &[0, 0, 0, 2, b'a', b'b']);
        let mut src = &buf[..];
        assert_eq!(read_bytes(&mut src, false).unwrap(), Some(b"ab".to_vec()));
    }

    #[test]
    fn truncated_string_is_eof() {
        let mut src: &[u8] = &[0x00, 0x05, b'a', b'b'];
        assert_eq!(
            read_string(&mut src, false),
            Err(CodecError::UnexpectedEof {
                needed: 5,
                remaining: 2
            })
        );
    }

    #[test]
    fn negative_length_other_than_null_is_invalid() {
        let mut src: &[u8] = &[0xff, 0xfe];
        assert_eq!(read_string(&mut src, false), Err(CodecError::InvalidLength(-2)));
    }

    #[test]
    fn oversized_fixed_string_is_rejected() {
        let long = "x".repeat(i16::MAX as usize + 1);
        let mut buf = BytesMut::new();
        assert_eq!(
            put_string(&mut buf, Some(&long), false),
            Err(CodecError::LengthOverflow(long.len()))
        );
    }
}

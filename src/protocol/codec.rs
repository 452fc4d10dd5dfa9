//! Versioned struct codec.
//!
//! Fields are walked in schema order. At flexible versions, strings, bytes and
//! arrays of fields that opt in use compact (varint) prefixes, tagged fields
//! move to a trailer `varint count, (varint tag, varint len, bytes)*`, and
//! unknown tags in that trailer are skipped.

use super::registry::{schema_of, Struct};
use super::schema::{Field, FieldType, StructSchema};
use super::value::{FieldReader, StructValue, Value};
use super::wire::{
    put_array_len, put_bytes, put_string, put_unsigned_varint, read_array_len, read_bytes,
    read_i16, read_i32, read_i64, read_i8, read_raw, read_string, read_unsigned_varint,
};
use crate::error::CodecError;
use bytes::{BufMut, BytesMut};
use tracing::debug;

type Result<T> = std::result::Result<T, CodecError>;

/// Encode `message` at `version`.
pub fn encode<T: Struct>(message: &T, version: i16) -> Result<BytesMut> {
    let mut dst = BytesMut::new();
    encode_value(schema_of::<T>(), &message.to_struct(), version, &mut dst)?;
    Ok(dst)
}

/// Decode a `T` from `src`, which must hold exactly one encoded struct.
pub fn decode<T: Struct>(src: &[u8], version: i16) -> Result<T> {
    let schema = schema_of::<T>();
    let mut cursor = src;
    let value = decode_value(schema, &mut cursor, version)?;
    if !cursor.is_empty() {
        return Err(CodecError::TrailingBytes(cursor.len()));
    }
    T::from_struct(&mut FieldReader::new(schema, value))
}

/// Append the encoding of `value` (laid out per `schema`) to `dst`.
pub fn encode_value(
    schema: &StructSchema,
    value: &StructValue,
    version: i16,
    dst: &mut BytesMut,
) -> Result<()> {
    let flexible = schema.is_flexible(version);
    let mut tagged: Vec<(u32, BytesMut)> = Vec::new();

    for (index, field) in schema.fields.iter().enumerate() {
        if !field.is_present(version) {
            continue;
        }
        let value = value
            .fields()
            .get(index)
            .ok_or(CodecError::MissingValue { field: field.name })?;
        match field.tag {
            Some(tag) if flexible && field.is_tagged(version) => {
                let mut buf = BytesMut::new();
                encode_field(field, value, version, flexible, &mut buf)?;
                tagged.push((tag, buf));
            }
            _ => encode_field(field, value, version, flexible, dst)?,
        }
    }

    if flexible {
        tagged.sort_by_key(|(tag, _)| *tag);
        put_unsigned_varint(dst, tagged.len() as u32);
        for (tag, buf) in tagged {
            let len = u32::try_from(buf.len()).map_err(|_| CodecError::LengthOverflow(buf.len()))?;
            put_unsigned_varint(dst, tag);
            put_unsigned_varint(dst, len);
            dst.extend_from_slice(&buf);
        }
    }
    Ok(())
}

/// Decode one struct laid out per `schema`, advancing `src` past it.
pub fn decode_value(schema: &StructSchema, src: &mut &[u8], version: i16) -> Result<StructValue> {
    let flexible = schema.is_flexible(version);
    let mut values: Vec<Value> = schema.fields.iter().map(Field::default_value).collect();

    for (index, field) in schema.fields.iter().enumerate() {
        if !field.is_present(version) || (flexible && field.is_tagged(version)) {
            continue;
        }
        values[index] = decode_field(field, src, version, flexible)?;
    }

    if flexible {
        let count = read_unsigned_varint(src)?;
        for _ in 0..count {
            let tag = read_unsigned_varint(src)?;
            let len = read_unsigned_varint(src)? as usize;
            let mut raw = read_raw(src, len)?;
            match schema.tagged_field(tag, version) {
                Some((index, field)) => {
                    values[index] = decode_field(field, &mut raw, version, flexible)?;
                    if !raw.is_empty() {
                        return Err(CodecError::InvalidLength(len as i64));
                    }
                }
                None => debug!(schema = schema.name, tag, len, "skipping unknown tagged field"),
            }
        }
    }
    Ok(StructValue::new(values))
}

fn is_compact(field: &Field, version: i16, flexible: bool) -> bool {
    flexible && field.flexible_versions.contains(version)
}

fn encode_field(
    field: &Field,
    value: &Value,
    version: i16,
    flexible: bool,
    dst: &mut BytesMut,
) -> Result<()> {
    let nullable = field.is_nullable(version);
    let compact = is_compact(field, version, flexible);
    if !field.repeated {
        return encode_element(field, value, nullable, compact, version, dst);
    }
    match value {
        Value::Null if nullable => put_array_len(dst, None, compact),
        Value::Null => Err(CodecError::MissingValue { field: field.name }),
        Value::Array(items) => {
            put_array_len(dst, Some(items.len()), compact)?;
            for item in items {
                encode_element(field, item, false, compact, version, dst)?;
            }
            Ok(())
        }
        _ => Err(CodecError::TypeMismatch {
            field: field.name,
            expected: "array",
        }),
    }
}

fn encode_element(
    field: &Field,
    value: &Value,
    nullable: bool,
    compact: bool,
    version: i16,
    dst: &mut BytesMut,
) -> Result<()> {
    match (field.ty, value) {
        (FieldType::String, Value::Null) if nullable => put_string(dst, None, compact),
        (FieldType::Bytes, Value::Null) if nullable => put_bytes(dst, None, compact),
        (_, Value::Null) => Err(CodecError::MissingValue { field: field.name }),
        (FieldType::Int8, Value::Int8(v)) => {
            dst.put_i8(*v);
            Ok(())
        }
        (FieldType::Int16, Value::Int16(v)) => {
            dst.put_i16(*v);
            Ok(())
        }
        (FieldType::Int32, Value::Int32(v)) => {
            dst.put_i32(*v);
            Ok(())
        }
        (FieldType::Int64, Value::Int64(v)) => {
            dst.put_i64(*v);
            Ok(())
        }
        (FieldType::String, Value::String(s)) => put_string(dst, Some(s), compact),
        (FieldType::Bytes, Value::Bytes(b)) => put_bytes(dst, Some(b), compact),
        (FieldType::Struct(nested), Value::Struct(inner)) => {
            encode_value(nested(), inner, version, dst)
        }
        (ty, _) => Err(CodecError::TypeMismatch {
            field: field.name,
            expected: ty.name(),
        }),
    }
}

fn decode_field(field: &Field, src: &mut &[u8], version: i16, flexible: bool) -> Result<Value> {
    let nullable = field.is_nullable(version);
    let compact = is_compact(field, version, flexible);
    if !field.repeated {
        return decode_element(field, src, nullable, compact, version);
    }
    match read_array_len(src, compact)? {
        None if nullable => Ok(Value::Null),
        None => Err(CodecError::MissingValue { field: field.name }),
        Some(count) => {
            // The count comes off the wire; never reserve past what the buffer could hold.
            let mut items = Vec::with_capacity(count.min(src.len()));
            for _ in 0..count {
                items.push(decode_element(field, src, false, compact, version)?);
            }
            Ok(Value::Array(items))
        }
    }
}

fn decode_element(
    field: &Field,
    src: &mut &[u8],
    nullable: bool,
    compact: bool,
    version: i16,
) -> Result<Value> {
    let value = match field.ty {
        FieldType::Int8 => Value::Int8(read_i8(src)?),
        FieldType::Int16 => Value::Int16(read_i16(src)?),
        FieldType::Int32 => Value::Int32(read_i32(src)?),
        FieldType::Int64 => Value::Int64(read_i64(src)?),
        FieldType::String => read_string(src, compact)?.map_or(Value::Null, Value::String),
        FieldType::Bytes => read_bytes(src, compact)?.map_or(Value::Null, Value::Bytes),
        FieldType::Struct(nested) => Value::Struct(decode_value(nested(), src, version)?),
    };
    if value.is_null() && !nullable {
        return Err(CodecError::MissingValue { field: field.name });
    }
    Ok(value)
}

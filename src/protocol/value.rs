//! Dynamic field values exchanged between typed structs and the codec.

use super::registry::{schema_of, Struct};
use super::schema::StructSchema;
use crate::error::CodecError;

/// One field value. Arrays and nested structs nest recursively.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    String(String),
    Bytes(Vec<u8>),
    Struct(StructValue),
    Array(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Struct(_) => "struct",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Array of primitives.
    pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn from_struct<T: Struct>(item: &T) -> Self {
        Value::Struct(item.to_struct())
    }

    /// Array of nested structs.
    pub fn structs<T: Struct>(items: &[T]) -> Self {
        Value::Array(items.iter().map(Value::from_struct).collect())
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value, field: &'static str) -> Result<Self, CodecError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        Value::Null => Err(CodecError::MissingValue { field }),
                        _ => Err(CodecError::TypeMismatch {
                            field,
                            expected: Value::$variant(Default::default()).type_name(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_from_primitive! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    String => String,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Field values of one struct, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructValue(Vec<Value>);

impl StructValue {
    pub fn new(fields: Vec<Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[Value] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for StructValue {
    fn from(fields: Vec<Value>) -> Self {
        Self(fields)
    }
}

/// Conversion from a decoded [`Value`] into a typed struct member.
pub trait FromValue: Sized {
    fn from_value(value: Value, field: &'static str) -> Result<Self, CodecError>;
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value, field: &'static str) -> Result<Self, CodecError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, field).map(Some),
        }
    }
}

/// Hands out a decoded struct's values in field order, converting each to
/// the member type the caller asks for.
pub struct FieldReader {
    schema: &'static StructSchema,
    values: std::vec::IntoIter<Value>,
    index: usize,
}

impl FieldReader {
    pub fn new(schema: &'static StructSchema, value: StructValue) -> Self {
        Self {
            schema,
            values: value.into_fields().into_iter(),
            index: 0,
        }
    }

    fn take(&mut self) -> Result<(&'static str, Value), CodecError> {
        let name = self
            .schema
            .fields
            .get(self.index)
            .map(|f| f.name)
            .unwrap_or(self.schema.name);
        self.index += 1;
        let value = self
            .values
            .next()
            .ok_or(CodecError::MissingValue { field: name })?;
        Ok((name, value))
    }

    pub fn next<T: FromValue>(&mut self) -> Result<T, CodecError> {
        let (name, value) = self.take()?;
        T::from_value(value, name)
    }

    pub fn next_struct<T: Struct>(&mut self) -> Result<T, CodecError> {
        let (name, value) = self.take()?;
        struct_from_value(value, name)
    }

    pub fn next_array<T: FromValue>(&mut self) -> Result<Vec<T>, CodecError> {
        let (name, value) = self.take()?;
        into_items(value, name)?
            .into_iter()
            .map(|item| T::from_value(item, name))
            .collect()
    }

    pub fn next_structs<T: Struct>(&mut self) -> Result<Vec<T>, CodecError> {
        let (name, value) = self.take()?;
        into_items(value, name)?
            .into_iter()
            .map(|item| struct_from_value(item, name))
            .collect()
    }
}

fn into_items(value: Value, field: &'static str) -> Result<Vec<Value>, CodecError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Err(CodecError::MissingValue { field }),
        _ => Err(CodecError::TypeMismatch {
            field,
            expected: "array",
        }),
    }
}

fn struct_from_value<T: Struct>(value: Value, field: &'static str) -> Result<T, CodecError> {
    match value {
        Value::Struct(inner) => T::from_struct(&mut FieldReader::new(schema_of::<T>(), inner)),
        Value::Null => Err(CodecError::MissingValue { field }),
        _ => Err(CodecError::TypeMismatch {
            field,
            expected: "struct",
        }),
    }
}

//! Process-wide schema registry.
//!
//! Each [`Struct`] type's schema is built the first time it is needed and then
//! shared for the lifetime of the process. Concurrent first use builds it once.

use super::schema::StructSchema;
use super::value::{FieldReader, StructValue};
use crate::error::CodecError;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A message struct with a versioned wire layout.
pub trait Struct: Sized + 'static {
    /// Field layout, in wire order. Called at most once per process, under
    /// the registry lock: nested structs are referenced as `schema_of::<T>`
    /// function pointers, never resolved here.
    fn describe() -> StructSchema;

    /// Member values in the order `describe` lists them.
    fn to_struct(&self) -> StructValue;

    fn from_struct(fields: &mut FieldReader) -> Result<Self, CodecError>;
}

type SchemaMap = HashMap<TypeId, &'static StructSchema>;

static REGISTRY: OnceLock<RwLock<SchemaMap>> = OnceLock::new();

fn registry() -> &'static RwLock<SchemaMap> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Schema for `T`, building and caching it on first use.
pub fn schema_of<T: Struct>() -> &'static StructSchema {
    let key = TypeId::of::<T>();
    if let Some(schema) = registry().read().get(&key).copied() {
        return schema;
    }
    let mut map = registry().write();
    *map.entry(key).or_insert_with(|| {
        let schema: &'static StructSchema = Box::leak(Box::new(T::describe()));
        tracing::trace!(schema = schema.name, fields = schema.fields.len(), "registered struct schema");
        schema
    })
}

/// Number of struct types registered so far.
pub fn registered_count() -> usize {
    registry().read().len()
}

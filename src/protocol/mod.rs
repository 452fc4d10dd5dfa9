//! Versioned Kafka-style wire protocol.
//!
//! Structs describe their field layout once ([`Struct::describe`]); the codec
//! walks that layout for a negotiated version. Flexible versions switch opted-in
//! fields to compact prefixes and append a tagged-field trailer.

mod codec;
pub mod messages;
mod registry;
mod schema;
mod value;
pub mod wire;

pub use codec::{decode, decode_value, encode, encode_value};
pub use registry::{registered_count, schema_of, Struct};
pub use schema::{Field, FieldType, SchemaRef, StructSchema, Versions};
pub use value::{FieldReader, FromValue, StructValue, Value};

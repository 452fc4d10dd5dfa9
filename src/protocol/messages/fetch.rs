use crate::error::CodecError;
use crate::protocol::{
    schema_of, Field, FieldReader, FieldType, Struct, StructSchema, StructValue, Value, Versions,
};

const FETCH_VERSIONS: Versions = Versions::range(0, 11);

/// A topic and the partitions to fetch from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchableTopic {
    pub topic_name: String,
    pub fetch_partitions: Vec<FetchPartition>,
}

impl Struct for FetchableTopic {
    fn describe() -> StructSchema {
        StructSchema::new("FetchableTopic", Versions::NONE)
            .field(Field::new("topic_name", FieldType::String, FETCH_VERSIONS))
            .field(
                Field::new(
                    "fetch_partitions",
                    FieldType::Struct(schema_of::<FetchPartition>),
                    FETCH_VERSIONS,
                )
                .array(),
            )
    }

    fn to_struct(&self) -> StructValue {
        StructValue::new(vec![
            self.topic_name.clone().into(),
            Value::structs(&self.fetch_partitions),
        ])
    }

    fn from_struct(fields: &mut FieldReader) -> Result<Self, CodecError> {
        Ok(Self {
            topic_name: fields.next()?,
            fetch_partitions: fields.next_structs()?,
        })
    }
}

/// Per-partition fetch position.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPartition {
    pub partition: i32,
    /// Leader epoch known to the fetcher (v9+), -1 when unknown.
    pub current_leader_epoch: i32,
    pub fetch_offset: i64,
    /// Earliest available offset of the follower (v5+), -1 for consumers.
    pub log_start_offset: i64,
    pub partition_max_bytes: i32,
}

impl Default for FetchPartition {
    fn default() -> Self {
        Self {
            partition: 0,
            current_leader_epoch: -1,
            fetch_offset: 0,
            log_start_offset: -1,
            partition_max_bytes: 0,
        }
    }
}

impl Struct for FetchPartition {
    fn describe() -> StructSchema {
        StructSchema::new("FetchPartition", Versions::NONE)
            .field(Field::new("partition", FieldType::Int32, FETCH_VERSIONS))
            .field(
                Field::new("current_leader_epoch", FieldType::Int32, Versions::range(9, 11))
                    .with_default(Value::Int32(-1)),
            )
            .field(Field::new("fetch_offset", FieldType::Int64, FETCH_VERSIONS))
            .field(
                Field::new("log_start_offset", FieldType::Int64, Versions::range(5, 11))
                    .with_default(Value::Int64(-1)),
            )
            .field(Field::new("partition_max_bytes", FieldType::Int32, FETCH_VERSIONS))
    }

    fn to_struct(&self) -> StructValue {
        StructValue::new(vec![
            self.partition.into(),
            self.current_leader_epoch.into(),
            self.fetch_offset.into(),
            self.log_start_offset.into(),
            self.partition_max_bytes.into(),
        ])
    }

    fn from_struct(fields: &mut FieldReader) -> Result<Self, CodecError> {
        Ok(Self {
            partition: fields.next()?,
            current_leader_epoch: fields.next()?,
            fetch_offset: fields.next()?,
            log_start_offset: fields.next()?,
            partition_max_bytes: fields.next()?,
        })
    }
}

use crate::error::CodecError;
use crate::protocol::{
    schema_of, Field, FieldReader, FieldType, Struct, StructSchema, StructValue, Value, Versions,
};

const VERSIONS: Versions = Versions::range(0, 8);
const FLEXIBLE: Versions = Versions::since(8);

/// Commit results for one topic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetCommitResponseTopic {
    pub topic_name: String,
    pub partitions: Vec<OffsetCommitResponsePartition>,
}

impl Struct for OffsetCommitResponseTopic {
    fn describe() -> StructSchema {
        StructSchema::new("OffsetCommitResponseTopic", FLEXIBLE)
            .field(Field::new("topic_name", FieldType::String, VERSIONS).flexible(FLEXIBLE))
            .field(
                Field::new(
                    "partitions",
                    FieldType::Struct(schema_of::<OffsetCommitResponsePartition>),
                    VERSIONS,
                )
                .array()
                .flexible(FLEXIBLE),
            )
    }

    fn to_struct(&self) -> StructValue {
        StructValue::new(vec![
            self.topic_name.clone().into(),
            Value::structs(&self.partitions),
        ])
    }

    fn from_struct(fields: &mut FieldReader) -> Result<Self, CodecError> {
        Ok(Self {
            topic_name: fields.next()?,
            partitions: fields.next_structs()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetCommitResponsePartition {
    pub partition_index: i32,
    /// Zero when the commit succeeded.
    pub error_code: i16,
}

impl Struct for OffsetCommitResponsePartition {
    fn describe() -> StructSchema {
        StructSchema::new("OffsetCommitResponsePartition", FLEXIBLE)
            .field(Field::new("partition_index", FieldType::Int32, VERSIONS).flexible(FLEXIBLE))
            .field(Field::new("error_code", FieldType::Int16, VERSIONS).flexible(FLEXIBLE))
    }

    fn to_struct(&self) -> StructValue {
        StructValue::new(vec![self.partition_index.into(), self.error_code.into()])
    }

    fn from_struct(fields: &mut FieldReader) -> Result<Self, CodecError> {
        Ok(Self {
            partition_index: fields.next()?,
            error_code: fields.next()?,
        })
    }
}

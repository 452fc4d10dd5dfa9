use crate::error::CodecError;
use crate::protocol::{Field, FieldReader, FieldType, Struct, StructSchema, StructValue, Versions};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatePartitionsTopicResult {
    pub topic_name: String,
    pub error_code: i16,
    /// Error message, or `None` if there was no error.
    pub error_message: Option<String>,
}

impl Struct for CreatePartitionsTopicResult {
    fn describe() -> StructSchema {
        let all = Versions::range(0, 2);
        let flexible = Versions::since(2);
        StructSchema::new("CreatePartitionsTopicResult", flexible)
            .field(Field::new("topic_name", FieldType::String, all).flexible(flexible))
            .field(Field::new("error_code", FieldType::Int16, all).flexible(flexible))
            .field(
                Field::new("error_message", FieldType::String, all)
                    .nullable(all)
                    .flexible(flexible),
            )
    }

    fn to_struct(&self) -> StructValue {
        StructValue::new(vec![
            self.topic_name.clone().into(),
            self.error_code.into(),
            self.error_message.clone().into(),
        ])
    }

    fn from_struct(fields: &mut FieldReader) -> Result<Self, CodecError> {
        Ok(Self {
            topic_name: fields.next()?,
            error_code: fields.next()?,
            error_message: fields.next()?,
        })
    }
}

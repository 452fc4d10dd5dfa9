use crate::error::CodecError;
use crate::protocol::{Field, FieldReader, FieldType, Struct, StructSchema, StructValue, Value, Versions};

/// Pattern type used when the filter predates pattern types (v0): LITERAL.
const DEFAULT_PATTERN_TYPE: i8 = 3;

/// One filter of a DeleteAcls request.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteAclsFilter {
    pub resource_type_filter: i8,
    pub resource_name_filter: Option<String>,
    pub pattern_type_filter: i8,
    /// Principal filter, or `None` to accept all principals.
    pub principal_filter: Option<String>,
    /// Host filter, or `None` to accept all hosts.
    pub host_filter: Option<String>,
    pub operation: i8,
    pub permission_type: i8,
}

impl Default for DeleteAclsFilter {
    fn default() -> Self {
        Self {
            resource_type_filter: 0,
            resource_name_filter: None,
            pattern_type_filter: DEFAULT_PATTERN_TYPE,
            principal_filter: None,
            host_filter: None,
            operation: 0,
            permission_type: 0,
        }
    }
}

impl Struct for DeleteAclsFilter {
    fn describe() -> StructSchema {
        let all = Versions::range(0, 2);
        let flexible = Versions::since(2);
        StructSchema::new("DeleteAclsFilter", flexible)
            .field(Field::new("resource_type_filter", FieldType::Int8, all).flexible(flexible))
            .field(
                Field::new("resource_name_filter", FieldType::String, all)
                    .nullable(all)
                    .flexible(flexible),
            )
            .field(
                Field::new("pattern_type_filter", FieldType::Int8, Versions::range(1, 2))
                    .flexible(flexible)
                    .with_default(Value::Int8(DEFAULT_PATTERN_TYPE)),
            )
            .field(
                Field::new("principal_filter", FieldType::String, all)
                    .nullable(all)
                    .flexible(flexible),
            )
            .field(
                Field::new("host_filter", FieldType::String, all)
                    .nullable(all)
                    .flexible(flexible),
            )
            .field(Field::new("operation", FieldType::Int8, all).flexible(flexible))
            .field(Field::new("permission_type", FieldType::Int8, all).flexible(flexible))
    }

    fn to_struct(&self) -> StructValue {
        StructValue::new(vec![
            self.resource_type_filter.into(),
            self.resource_name_filter.clone().into(),
            self.pattern_type_filter.into(),
            self.principal_filter.clone().into(),
            self.host_filter.clone().into(),
            self.operation.into(),
            self.permission_type.into(),
        ])
    }

    fn from_struct(fields: &mut FieldReader) -> Result<Self, CodecError> {
        Ok(Self {
            resource_type_filter: fields.next()?,
            resource_name_filter: fields.next()?,
            pattern_type_filter: fields.next()?,
            principal_filter: fields.next()?,
            host_filter: fields.next()?,
            operation: fields.next()?,
            permission_type: fields.next()?,
        })
    }
}

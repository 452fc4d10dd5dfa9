//! Declarative field layout for versioned structs.

use super::value::Value;

/// Contiguous range of protocol versions. Empty when `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Versions {
    min: i16,
    max: i16,
}

impl Versions {
    pub const NONE: Versions = Versions { min: 0, max: -1 };
    pub const ALL: Versions = Versions {
        min: 0,
        max: i16::MAX,
    };

    /// `min..=max`.
    pub const fn range(min: i16, max: i16) -> Self {
        Versions { min, max }
    }

    /// `min` and every later version.
    pub const fn since(min: i16) -> Self {
        Versions { min, max: i16::MAX }
    }

    pub const fn only(version: i16) -> Self {
        Versions {
            min: version,
            max: version,
        }
    }

    pub fn contains(&self, version: i16) -> bool {
        self.min <= version && version <= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn intersect(&self, other: Versions) -> Versions {
        Versions {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }
}

/// Reference to a nested struct's schema, resolved through the registry on use.
pub type SchemaRef = fn() -> &'static StructSchema;

/// Element type of a field.
#[derive(Clone, Copy)]
pub enum FieldType {
    Int8,
    Int16,
    Int32,
    Int64,
    String,
    Bytes,
    Struct(SchemaRef),
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Int8 => "int8",
            FieldType::Int16 => "int16",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
            FieldType::Struct(_) => "struct",
        }
    }

    fn zero(&self) -> Value {
        match self {
            FieldType::Int8 => Value::Int8(0),
            FieldType::Int16 => Value::Int16(0),
            FieldType::Int32 => Value::Int32(0),
            FieldType::Int64 => Value::Int64(0),
            FieldType::String => Value::String(String::new()),
            FieldType::Bytes => Value::Bytes(Vec::new()),
            FieldType::Struct(_) => Value::Null,
        }
    }
}

impl std::fmt::Debug for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Struct(schema) => write!(f, "Struct({})", schema().name),
            other => f.write_str(other.name()),
        }
    }
}

/// Field descriptor: one positional (or tagged) member of a struct.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub repeated: bool,
    pub versions: Versions,
    pub nullable_versions: Versions,
    pub flexible_versions: Versions,
    pub tag: Option<u32>,
    pub tagged_versions: Versions,
    pub default: Option<Value>,
}

impl Field {
    pub fn new(name: &'static str, ty: FieldType, versions: Versions) -> Self {
        Self {
            name,
            ty,
            repeated: false,
            versions,
            nullable_versions: Versions::NONE,
            flexible_versions: Versions::NONE,
            tag: None,
            tagged_versions: Versions::NONE,
            default: None,
        }
    }

    /// Array of `ty`.
    pub fn array(mut self) -> Self {
        self.repeated = true;
        self
    }

    pub fn nullable(mut self, versions: Versions) -> Self {
        self.nullable_versions = versions;
        self
    }

    pub fn flexible(mut self, versions: Versions) -> Self {
        self.flexible_versions = versions;
        self
    }

    /// Carry the field in the tagged trailer under `tag` at `versions`.
    pub fn tagged(mut self, tag: u32, versions: Versions) -> Self {
        self.tag = Some(tag);
        self.tagged_versions = versions;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn is_present(&self, version: i16) -> bool {
        self.versions.contains(version)
    }

    pub fn is_nullable(&self, version: i16) -> bool {
        self.nullable_versions.contains(version)
    }

    pub fn is_tagged(&self, version: i16) -> bool {
        self.tag.is_some() && self.tagged_versions.contains(version)
    }

    /// Value used when the field is not on the wire at the active version.
    pub fn default_value(&self) -> Value {
        if let Some(value) = &self.default {
            return value.clone();
        }
        if !self.nullable_versions.is_empty() {
            return Value::Null;
        }
        if self.repeated {
            return Value::Array(Vec::new());
        }
        self.ty.zero()
    }
}

/// Ordered field list plus the versions at which the struct uses compact
/// encodings and a tagged-field trailer. Field order is wire order.
#[derive(Debug, Clone)]
pub struct StructSchema {
    pub name: &'static str,
    pub fields: Vec<Field>,
    pub flexible_versions: Versions,
}

impl StructSchema {
    pub fn new(name: &'static str, flexible_versions: Versions) -> Self {
        Self {
            name,
            fields: Vec::new(),
            flexible_versions,
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        debug_assert!(
            self.fields.iter().all(|f| f.name != field.name),
            "duplicate field {} in {}",
            field.name,
            self.name
        );
        debug_assert!(
            field.tag.is_none() || self.fields.iter().all(|f| f.tag != field.tag),
            "duplicate tag on {} in {}",
            field.name,
            self.name
        );
        self.fields.push(field);
        self
    }

    pub fn is_flexible(&self, version: i16) -> bool {
        self.flexible_versions.contains(version)
    }

    /// Position and descriptor of the field carried under `tag` at `version`.
    pub fn tagged_field(&self, tag: u32, version: i16) -> Option<(usize, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.tag == Some(tag) && f.is_present(version) && f.is_tagged(version))
    }
}

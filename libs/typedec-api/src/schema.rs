use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════
//  Schema Kind
// ════════════════════════════════════════════════════════════════

/// Structural type of an output value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaKind {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    Array { items: Box<Schema> },
    Map { keys: Box<Schema>, values: Box<Schema> },
    Struct { fields: Vec<Field> },
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaKind::Boolean => write!(f, "boolean"),
            SchemaKind::Int8 => write!(f, "int8"),
            SchemaKind::Int16 => write!(f, "int16"),
            SchemaKind::Int32 => write!(f, "int32"),
            SchemaKind::Int64 => write!(f, "int64"),
            SchemaKind::Float32 => write!(f, "float32"),
            SchemaKind::Float64 => write!(f, "float64"),
            SchemaKind::String => write!(f, "string"),
            SchemaKind::Bytes => write!(f, "bytes"),
            SchemaKind::Array { items } => write!(f, "array<{}>", items.kind),
            SchemaKind::Map { keys, values } => write!(f, "map<{}, {}>", keys.kind, values.kind),
            SchemaKind::Struct { fields } => {
                f.write_str("struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.schema.kind)?;
                }
                f.write_str(">")
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Field & Schema
// ════════════════════════════════════════════════════════════════

/// One named member of a struct schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self { name: name.into(), schema }
    }
}

/// Output schema. Mirrors the nesting of the descriptor it was built from.
///
/// `name` carries the logical meaning of a scalar (`"date"`, `"decimal"`) or
/// the declared name of a user-defined type; the binder does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(flatten)]
    pub kind: SchemaKind,
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self { kind, optional: false, name: None }
    }

    pub fn array(items: Schema) -> Self {
        Self::new(SchemaKind::Array { items: Box::new(items) })
    }

    pub fn map(keys: Schema, values: Schema) -> Self {
        Self::new(SchemaKind::Map { keys: Box::new(keys), values: Box::new(values) })
    }

    pub fn structure(fields: Vec<Field>) -> Self {
        Self::new(SchemaKind::Struct { fields })
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<SchemaKind> for Schema {
    fn from(kind: SchemaKind) -> Self {
        Schema::new(kind)
    }
}

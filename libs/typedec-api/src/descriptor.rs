use std::fmt;

// ════════════════════════════════════════════════════════════════
//  Primitive Kind
// ════════════════════════════════════════════════════════════════

/// Scalar column types understood by a primitive codec.
///
/// Kinds for which [`PrimitiveKind::is_logical`] is true decode into a
/// [`Logical`](crate::value::Logical) wrapper that must be formatted before it
/// can appear in bound output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Ascii,
    Text,
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Counter,
    Float,
    Double,
    Blob,
    Uuid,
    TimeUuid,
    Inet,
    Timestamp,
    Date,
    Time,
    Decimal,
    VarInt,
    Duration,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 20] = [
        PrimitiveKind::Ascii,
        PrimitiveKind::Text,
        PrimitiveKind::Boolean,
        PrimitiveKind::TinyInt,
        PrimitiveKind::SmallInt,
        PrimitiveKind::Int,
        PrimitiveKind::BigInt,
        PrimitiveKind::Counter,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Blob,
        PrimitiveKind::Uuid,
        PrimitiveKind::TimeUuid,
        PrimitiveKind::Inet,
        PrimitiveKind::Timestamp,
        PrimitiveKind::Date,
        PrimitiveKind::Time,
        PrimitiveKind::Decimal,
        PrimitiveKind::VarInt,
        PrimitiveKind::Duration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Ascii => "ascii",
            PrimitiveKind::Text => "text",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::TinyInt => "tinyint",
            PrimitiveKind::SmallInt => "smallint",
            PrimitiveKind::Int => "int",
            PrimitiveKind::BigInt => "bigint",
            PrimitiveKind::Counter => "counter",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Blob => "blob",
            PrimitiveKind::Uuid => "uuid",
            PrimitiveKind::TimeUuid => "timeuuid",
            PrimitiveKind::Inet => "inet",
            PrimitiveKind::Timestamp => "timestamp",
            PrimitiveKind::Date => "date",
            PrimitiveKind::Time => "time",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::VarInt => "varint",
            PrimitiveKind::Duration => "duration",
        }
    }

    /// Case-insensitive lookup by CQL name. `varchar` is an alias of `text`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "varchar" {
            return Some(PrimitiveKind::Text);
        }
        Self::ALL.into_iter().find(|k| k.name() == lower)
    }

    /// Whether the natural decoded form needs a formatting step.
    pub fn is_logical(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Uuid
                | PrimitiveKind::TimeUuid
                | PrimitiveKind::Inet
                | PrimitiveKind::Timestamp
                | PrimitiveKind::Date
                | PrimitiveKind::Time
                | PrimitiveKind::Decimal
                | PrimitiveKind::VarInt
                | PrimitiveKind::Duration
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════
//  Type Descriptor
// ════════════════════════════════════════════════════════════════

/// One declared field of a user-defined type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UdtField {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// A user-defined type: a name plus fields in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserType {
    pub name: String,
    pub fields: Vec<UdtField>,
}

impl UserType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(UdtField { name: name.into(), ty });
        self
    }
}

/// Logical type of a column, possibly nested.
///
/// Built once per column definition and shared by every decode of that
/// column. Nothing in the engine mutates a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    List(Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Tuple(Vec<TypeDescriptor>),
    UserDefined(UserType),
    /// A type class the system has no knowledge of. Never registered.
    Custom(String),
}

/// Dispatch key of a descriptor: the outermost constructor only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Primitive(PrimitiveKind),
    List,
    Set,
    Map,
    Tuple,
    UserDefined,
    Custom(String),
}

impl TypeTag {
    /// Tags with a fixed set of members, i.e. everything except `Custom`.
    pub fn known() -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = PrimitiveKind::ALL.into_iter().map(TypeTag::Primitive).collect();
        tags.extend([TypeTag::List, TypeTag::Set, TypeTag::Map, TypeTag::Tuple, TypeTag::UserDefined]);
        tags
    }

    /// Inverse of `Display` for the known tags.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        match name.to_ascii_lowercase().as_str() {
            "list" => Some(TypeTag::List),
            "set" => Some(TypeTag::Set),
            "map" => Some(TypeTag::Map),
            "tuple" => Some(TypeTag::Tuple),
            "udt" => Some(TypeTag::UserDefined),
            other => PrimitiveKind::from_name(other).map(TypeTag::Primitive),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Primitive(kind) => write!(f, "{kind}"),
            TypeTag::List => f.write_str("list"),
            TypeTag::Set => f.write_str("set"),
            TypeTag::Map => f.write_str("map"),
            TypeTag::Tuple => f.write_str("tuple"),
            TypeTag::UserDefined => f.write_str("udt"),
            TypeTag::Custom(class) => f.write_str(class),
        }
    }
}

impl TypeDescriptor {
    pub fn list(elem: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(elem))
    }

    pub fn set(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Set(Box::new(elem))
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(key), Box::new(value))
    }

    pub fn tuple(fields: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Tuple(fields.into_iter().collect())
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            TypeDescriptor::Primitive(kind) => TypeTag::Primitive(*kind),
            TypeDescriptor::List(_) => TypeTag::List,
            TypeDescriptor::Set(_) => TypeTag::Set,
            TypeDescriptor::Map(_, _) => TypeTag::Map,
            TypeDescriptor::Tuple(_) => TypeTag::Tuple,
            TypeDescriptor::UserDefined(_) => TypeTag::UserDefined,
            TypeDescriptor::Custom(class) => TypeTag::Custom(class.clone()),
        }
    }

    /// Nested descriptors in declared order. Map yields `[key, value]`.
    pub fn children(&self) -> Vec<&TypeDescriptor> {
        match self {
            TypeDescriptor::Primitive(_) | TypeDescriptor::Custom(_) => Vec::new(),
            TypeDescriptor::List(elem) | TypeDescriptor::Set(elem) => vec![elem.as_ref()],
            TypeDescriptor::Map(key, value) => vec![key.as_ref(), value.as_ref()],
            TypeDescriptor::Tuple(fields) => fields.iter().collect(),
            TypeDescriptor::UserDefined(udt) => udt.fields.iter().map(|f| &f.ty).collect(),
        }
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => write!(f, "{kind}"),
            TypeDescriptor::List(elem) => write!(f, "list<{elem}>"),
            TypeDescriptor::Set(elem) => write!(f, "set<{elem}>"),
            TypeDescriptor::Map(key, value) => write!(f, "map<{key}, {value}>"),
            TypeDescriptor::Tuple(fields) => {
                f.write_str("tuple<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str(">")
            }
            TypeDescriptor::UserDefined(udt) => {
                write!(f, "{}{{", udt.name)?;
                for (i, field) in udt.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.ty)?;
                }
                f.write_str("}")
            }
            TypeDescriptor::Custom(class) => write!(f, "'{class}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nested() {
        let ty = TypeDescriptor::map(
            PrimitiveKind::Decimal.into(),
            TypeDescriptor::tuple([PrimitiveKind::Int.into(), PrimitiveKind::Text.into()]),
        );
        assert_eq!(ty.to_string(), "map<decimal, tuple<int, text>>");
        assert_eq!(ty.tag(), TypeTag::Map);
        assert_eq!(ty.children().len(), 2);
    }

    #[test]
    fn udt_display_and_children() {
        let ty = TypeDescriptor::UserDefined(
            UserType::new("address")
                .field("street", PrimitiveKind::Text.into())
                .field("zip", PrimitiveKind::Int.into()),
        );
        assert_eq!(ty.to_string(), "address{street: text, zip: int}");
        assert_eq!(ty.children(), vec![&TypeDescriptor::Primitive(PrimitiveKind::Text), &TypeDescriptor::Primitive(PrimitiveKind::Int)]);
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
            assert_eq!(TypeTag::from_name(&TypeTag::Primitive(kind).to_string()), Some(TypeTag::Primitive(kind)));
        }
        assert_eq!(PrimitiveKind::from_name("VARCHAR"), Some(PrimitiveKind::Text));
        assert_eq!(TypeTag::from_name("udt"), Some(TypeTag::UserDefined));
        assert_eq!(TypeTag::from_name("frobnicate"), None);
    }

    #[test]
    fn logical_kinds() {
        assert!(PrimitiveKind::Date.is_logical());
        assert!(PrimitiveKind::Decimal.is_logical());
        assert!(!PrimitiveKind::Int.is_logical());
        assert!(!PrimitiveKind::Blob.is_logical());
    }
}

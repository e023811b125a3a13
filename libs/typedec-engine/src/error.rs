use typedec_api::{CodecError, ErrorKind, TypeDescriptor};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// No handler is registered for the tag, or a collaborator does not know it.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("malformed column data for {ty}: {reason}")]
    MalformedColumnData { ty: String, reason: String },

    /// The binder rejected a value the engine produced for its own schema.
    #[error("schema mismatch for {ty}: {reason}")]
    SchemaMismatch { ty: String, reason: String },

    #[error("config error: {0}")]
    Config(String),
}

impl DecodeError {
    pub fn malformed(ty: &TypeDescriptor, reason: impl Into<String>) -> Self {
        DecodeError::MalformedColumnData { ty: ty.to_string(), reason: reason.into() }
    }

    /// Map a collaborator error onto the engine variant of the same kind.
    pub fn from_codec(ty: &TypeDescriptor, err: CodecError) -> Self {
        match err.kind {
            ErrorKind::Unsupported => DecodeError::UnsupportedType(err.message),
            ErrorKind::Malformed => DecodeError::MalformedColumnData { ty: ty.to_string(), reason: err.message },
            ErrorKind::Mismatch => DecodeError::SchemaMismatch { ty: ty.to_string(), reason: err.message },
        }
    }

    /// Add context to the error.
    ///
    /// For data errors the context is prepended to the reason; the type name
    /// of `UnsupportedType` is left as is.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            DecodeError::MalformedColumnData { ty, reason } => {
                DecodeError::MalformedColumnData { ty, reason: format!("{ctx}: {reason}") }
            }
            DecodeError::SchemaMismatch { ty, reason } => {
                DecodeError::SchemaMismatch { ty, reason: format!("{ctx}: {reason}") }
            }
            DecodeError::Config(msg) => DecodeError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typedec_api::PrimitiveKind;

    #[test]
    fn codec_kinds_map_onto_variants() {
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Int);
        assert!(matches!(
            DecodeError::from_codec(&ty, CodecError::unsupported("x")),
            DecodeError::UnsupportedType(_)
        ));
        let err = DecodeError::from_codec(&ty, CodecError::malformed("expected 4 bytes, got 3"));
        assert_eq!(err.to_string(), "malformed column data for int: expected 4 bytes, got 3");
        assert!(matches!(
            DecodeError::from_codec(&ty, CodecError::mismatch("x")),
            DecodeError::SchemaMismatch { .. }
        ));
    }

    #[test]
    fn context_is_prepended() {
        let ty = TypeDescriptor::Primitive(PrimitiveKind::Int);
        let err = DecodeError::malformed(&ty, "too short").with_context("value 3");
        assert_eq!(err.to_string(), "malformed column data for int: value 3: too short");

        let err = DecodeError::UnsupportedType("udt".into()).with_context("value 3");
        assert_eq!(err.to_string(), "unsupported type: udt");
    }
}

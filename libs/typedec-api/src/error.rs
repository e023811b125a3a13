use std::fmt;

/// Category of a collaborator error. The engine maps each kind onto its own
/// error variant, so the category is never lost between layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The type tag is not known to this collaborator.
    Unsupported,
    /// The bytes do not match the declared type (width, framing, UTF-8, arity).
    Malformed,
    /// A value does not conform to the schema it is bound against.
    Mismatch,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unsupported => f.write_str("unsupported"),
            ErrorKind::Malformed => f.write_str("malformed"),
            ErrorKind::Mismatch => f.write_str("mismatch"),
        }
    }
}

/// Error returned by the primitive codec, the collection decoder and the binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CodecError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Unsupported, message: msg.into() }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Malformed, message: msg.into() }
    }

    pub fn mismatch(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Mismatch, message: msg.into() }
    }

    /// Add context to the error, preserving the original ErrorKind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for CodecError {}

impl From<std::str::Utf8Error> for CodecError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::malformed(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind() {
        let err = CodecError::malformed("expected 4 bytes, got 3").with_context("int");
        assert_eq!(err.kind, ErrorKind::Malformed);
        assert_eq!(err.message, "int: expected 4 bytes, got 3");
        assert_eq!(err.to_string(), "[malformed] int: expected 4 bytes, got 3");
    }
}

use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::CodecError;
use crate::schema::Schema;
use crate::value::Value;

/// Encoded form of one column value.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// A single self-delimiting buffer holding the whole value.
    Flat(&'a [u8]),
    /// A multi-cell column, already split into raw cell fragments.
    Cells(&'a [&'a [u8]]),
}

/// Decodes fixed scalar buffers and describes their output schema.
///
/// - `decode()`: returns the natural decoded value. Logical kinds come back as
///   [`Value::Logical`]; an empty buffer for a non-text kind is `Value::Null`.
/// - `schema()`: the schema of the *formatted* value, i.e. what the binder
///   expects after logical values are converted.
///
/// Both are pure and fail with `ErrorKind::Unsupported` for unknown kinds.
pub trait PrimitiveCodec: Send + Sync {
    fn decode(&self, kind: PrimitiveKind, bytes: &[u8]) -> Result<Value, CodecError>;
    fn schema(&self, kind: PrimitiveKind) -> Result<Schema, CodecError>;
}

/// Decodes a whole composite value from one flat buffer.
///
/// Elements come back at whatever resolution is natural for the decoder:
/// non-logical primitives decoded, logical primitives wrapped, tuple and
/// user-defined elements left as [`Value::Raw`], nested collections decoded
/// under the same policy. Tuples and user-defined types come back as
/// [`Value::Tuple`] with one entry per declared field.
pub trait CollectionDecoder: Send + Sync {
    fn decode(&self, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, CodecError>;
}

/// Checks a fully resolved value against its schema and coerces it into the
/// output model. Fails with `ErrorKind::Mismatch` if the shapes disagree.
pub trait ValueBinder: Send + Sync {
    fn bind(&self, value: Value, schema: &Schema) -> Result<Value, CodecError>;
}

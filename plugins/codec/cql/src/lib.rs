//! Reference codec for Cassandra native-protocol value encodings.
//!
//! [`CqlCodec`] decodes scalar buffers, [`CqlCollectionDecoder`] decodes whole
//! flat composite payloads, and [`frame`] builds the framing for tests and tools.

mod collection;
pub mod frame;
mod primitive;
mod vint;

use typedec_api::{CodecError, PrimitiveCodec, PrimitiveKind, Schema, Value};

pub use collection::CqlCollectionDecoder;

// ═══════════════════════════════════════════════════════════════
//  CqlCodec
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
pub struct CqlCodec;

impl CqlCodec {
    /// Inverse of [`PrimitiveCodec::decode`]: logical kinds take the wrapped
    /// [`Logical`](typedec_api::Logical) value, `Null` encodes as an empty buffer.
    pub fn encode(&self, kind: PrimitiveKind, value: &Value) -> Result<Vec<u8>, CodecError> {
        primitive::encode(kind, value).map_err(|e| e.with_context(kind))
    }
}

impl PrimitiveCodec for CqlCodec {
    fn decode(&self, kind: PrimitiveKind, bytes: &[u8]) -> Result<Value, CodecError> {
        primitive::decode(kind, bytes).map_err(|e| e.with_context(kind))
    }

    fn schema(&self, kind: PrimitiveKind) -> Result<Schema, CodecError> {
        Ok(primitive::schema(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn errors_name_the_kind() {
        let err = CqlCodec.decode(PrimitiveKind::BigInt, &[1, 2]).unwrap_err();
        assert_eq!(err.message, "bigint: expected 8 bytes, got 2");
    }

    proptest! {
        #[test]
        fn text_survives(s in ".*") {
            let bytes = CqlCodec.encode(PrimitiveKind::Text, &Value::String(s.clone())).unwrap();
            prop_assert_eq!(CqlCodec.decode(PrimitiveKind::Text, &bytes).unwrap(), Value::String(s));
        }

        #[test]
        fn bigint_survives(v in any::<i64>()) {
            let bytes = CqlCodec.encode(PrimitiveKind::BigInt, &Value::Int64(v)).unwrap();
            prop_assert_eq!(CqlCodec.decode(PrimitiveKind::BigInt, &bytes).unwrap(), Value::Int64(v));
        }
    }
}

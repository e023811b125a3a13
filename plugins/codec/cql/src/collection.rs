use typedec_api::{CodecError, CollectionDecoder, PrimitiveCodec, TypeDescriptor, Value};

use crate::CqlCodec;
use crate::frame::FrameReader;

/// Combined-payload decoder for flat composite values.
///
/// Decodes eagerly where that is free: non-logical primitives come back final,
/// logical primitives come back wrapped, nested collections are decoded under
/// the same policy. Tuple and user-type elements are left as
/// [`Value::Raw`] for the caller to resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct CqlCollectionDecoder {
    codec: CqlCodec,
}

impl CqlCollectionDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn composite(&self, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, CodecError> {
        let mut r = FrameReader::new(bytes);
        let value = match ty {
            TypeDescriptor::List(elem) | TypeDescriptor::Set(elem) => {
                let n = r.read_count(1)?;
                let mut items = Vec::with_capacity(n);
                for i in 0..n {
                    let item = self.element(elem, r.read_value()?).map_err(|e| e.with_context(format!("[{i}]")))?;
                    items.push(item);
                }
                Value::Array(items)
            }
            TypeDescriptor::Map(key, value) => {
                let n = r.read_count(2)?;
                let mut entries = Vec::with_capacity(n);
                for _ in 0..n {
                    let k = self.element(key, r.read_value()?).map_err(|e| e.with_context("map key"))?;
                    let v = self.element(value, r.read_value()?).map_err(|e| e.with_context("map value"))?;
                    entries.push((k, v));
                }
                Value::Map(entries)
            }
            TypeDescriptor::Tuple(_) | TypeDescriptor::UserDefined(_) => {
                let declared = ty.children();
                let mut fields = Vec::with_capacity(declared.len());
                for (i, field_ty) in declared.into_iter().enumerate() {
                    // Values written before a type gained trailing fields stop early.
                    if r.is_empty() {
                        fields.push(Value::Null);
                        continue;
                    }
                    let field = self.element(field_ty, r.read_value()?).map_err(|e| e.with_context(format!("field {}", i + 1)))?;
                    fields.push(field);
                }
                Value::Tuple(fields)
            }
            TypeDescriptor::Primitive(_) | TypeDescriptor::Custom(_) => {
                return Err(CodecError::unsupported(format!("{ty} is not a composite type")));
            }
        };
        r.finish()?;
        Ok(value)
    }

    fn element(&self, ty: &TypeDescriptor, bytes: Option<&[u8]>) -> Result<Value, CodecError> {
        let Some(bytes) = bytes else {
            return Ok(Value::Null);
        };
        match ty {
            TypeDescriptor::Primitive(kind) => self.codec.decode(*kind, bytes),
            TypeDescriptor::Tuple(_) | TypeDescriptor::UserDefined(_) => Ok(Value::Raw(bytes.to_vec())),
            TypeDescriptor::List(_) | TypeDescriptor::Set(_) | TypeDescriptor::Map(_, _) => self.composite(ty, bytes),
            TypeDescriptor::Custom(class) => Err(CodecError::unsupported(format!("unknown type '{class}'"))),
        }
    }
}

impl CollectionDecoder for CqlCollectionDecoder {
    fn decode(&self, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, CodecError> {
        self.composite(ty, bytes).map_err(|e| e.with_context(ty))
    }
}

use typedec_api::{MapBuilder, Schema, TypeDescriptor, Value};

use super::{TypeHandler, decode_flat, wrong_descriptor};
use crate::error::DecodeError;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, Default)]
pub struct MapHandler;

fn entry_types(ty: &TypeDescriptor) -> Result<(&TypeDescriptor, &TypeDescriptor), DecodeError> {
    match ty {
        TypeDescriptor::Map(key, value) => Ok((key.as_ref(), value.as_ref())),
        other => Err(wrong_descriptor("map", other)),
    }
}

impl TypeHandler for MapHandler {
    fn decode(&self, registry: &Registry, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError> {
        entry_types(ty)?;
        decode_flat(self, registry, ty, bytes)
    }

    /// Fragments alternate key, value. A repeated key keeps the later value.
    fn decode_cells(&self, registry: &Registry, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError> {
        let (key_ty, value_ty) = entry_types(ty)?;
        if cells.len() % 2 != 0 {
            return Err(DecodeError::malformed(
                ty,
                format!("odd number of fragments ({}) for key/value pairs", cells.len()),
            ));
        }
        tracing::trace!(ty = %ty, entries = cells.len() / 2, "decoding multi-cell map");

        let mut entries = MapBuilder::with_capacity(cells.len() / 2);
        for (i, pair) in cells.chunks_exact(2).enumerate() {
            let key = registry.decode(key_ty, pair[0]).map_err(|e| e.with_context(format!("{ty} key {i}")))?;
            let value = registry.decode(value_ty, pair[1]).map_err(|e| e.with_context(format!("{ty} value {i}")))?;
            entries.insert(key, value);
        }
        registry.bind(ty, entries.finish(), &self.schema(registry, ty)?)
    }

    fn schema(&self, registry: &Registry, ty: &TypeDescriptor) -> Result<Schema, DecodeError> {
        let (key_ty, value_ty) = entry_types(ty)?;
        Ok(Schema::map(registry.schema_for(key_ty)?, registry.schema_for(value_ty)?).optional())
    }
}

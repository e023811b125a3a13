use typedec_api::{PrimitiveKind, Schema, TypeDescriptor, Value};

use super::{TypeHandler, wrong_descriptor};
use crate::error::DecodeError;
use crate::registry::Registry;

/// Scalars whose decoded form is already final.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveHandler;

pub(super) fn kind_of(handler: &str, ty: &TypeDescriptor) -> Result<PrimitiveKind, DecodeError> {
    match ty {
        TypeDescriptor::Primitive(kind) => Ok(*kind),
        other => Err(wrong_descriptor(handler, other)),
    }
}

/// A scalar column only ever has a single cell.
pub(super) fn single_cell<'c>(ty: &TypeDescriptor, cells: &[&'c [u8]]) -> Result<&'c [u8], DecodeError> {
    match cells {
        [cell] => Ok(*cell),
        _ => Err(DecodeError::malformed(ty, format!("{} fragments for a single-cell type", cells.len()))),
    }
}

impl TypeHandler for PrimitiveHandler {
    fn decode(&self, registry: &Registry, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError> {
        let kind = kind_of("primitive", ty)?;
        let value = registry.codec().decode(kind, bytes).map_err(|e| DecodeError::from_codec(ty, e))?;
        registry.bind(ty, value, &self.schema(registry, ty)?)
    }

    fn decode_cells(&self, registry: &Registry, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError> {
        self.decode(registry, ty, single_cell(ty, cells)?)
    }

    fn schema(&self, registry: &Registry, ty: &TypeDescriptor) -> Result<Schema, DecodeError> {
        let kind = kind_of("primitive", ty)?;
        registry.codec().schema(kind).map_err(|e| DecodeError::from_codec(ty, e))
    }
}

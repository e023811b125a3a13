use typedec_api::{Schema, TypeDescriptor, Value};

use super::TypeHandler;
use super::decode_flat;
use super::list::{decode_elements, element_of};
use crate::error::DecodeError;
use crate::registry::Registry;

/// Sets decode and bind exactly like lists; element order is storage order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetHandler;

impl TypeHandler for SetHandler {
    fn decode(&self, registry: &Registry, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError> {
        element_of("set", ty)?;
        decode_flat(self, registry, ty, bytes)
    }

    fn decode_cells(&self, registry: &Registry, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError> {
        let elem = element_of("set", ty)?;
        let value = decode_elements(registry, ty, elem, cells)?;
        registry.bind(ty, value, &self.schema(registry, ty)?)
    }

    fn schema(&self, registry: &Registry, ty: &TypeDescriptor) -> Result<Schema, DecodeError> {
        let elem = element_of("set", ty)?;
        Ok(Schema::array(registry.schema_for(elem)?).optional())
    }
}

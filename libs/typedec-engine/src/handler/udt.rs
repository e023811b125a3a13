use typedec_api::{Field, Schema, TypeDescriptor, UserType, Value};

use super::{TypeHandler, decode_fields, decode_flat, wrong_descriptor};
use crate::error::DecodeError;
use crate::registry::Registry;

/// User-defined types. Bound as structs carrying the type's name and its
/// declared field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserTypeHandler;

fn user_type(ty: &TypeDescriptor) -> Result<&UserType, DecodeError> {
    match ty {
        TypeDescriptor::UserDefined(udt) => Ok(udt),
        other => Err(wrong_descriptor("udt", other)),
    }
}

impl TypeHandler for UserTypeHandler {
    fn decode(&self, registry: &Registry, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError> {
        user_type(ty)?;
        decode_flat(self, registry, ty, bytes)
    }

    fn decode_cells(&self, registry: &Registry, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError> {
        user_type(ty)?;
        let fields = decode_fields(registry, ty, cells)?;
        registry.bind(ty, Value::Tuple(fields), &self.schema(registry, ty)?)
    }

    fn schema(&self, registry: &Registry, ty: &TypeDescriptor) -> Result<Schema, DecodeError> {
        let udt = user_type(ty)?;
        let fields = udt
            .fields
            .iter()
            .map(|f| Ok(Field::new(f.name.clone(), registry.schema_for(&f.ty)?)))
            .collect::<Result<Vec<_>, DecodeError>>()?;
        Ok(Schema::structure(fields).optional().named(udt.name.clone()))
    }
}

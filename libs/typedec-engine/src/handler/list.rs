use typedec_api::{Schema, TypeDescriptor, Value};

use super::{TypeHandler, decode_flat, wrong_descriptor};
use crate::error::DecodeError;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListHandler;

pub(super) fn element_of<'t>(handler: &str, ty: &'t TypeDescriptor) -> Result<&'t TypeDescriptor, DecodeError> {
    match ty {
        TypeDescriptor::List(elem) | TypeDescriptor::Set(elem) => Ok(elem.as_ref()),
        other => Err(wrong_descriptor(handler, other)),
    }
}

/// One fragment per element, decoded in storage order.
pub(super) fn decode_elements(
    registry: &Registry,
    ty: &TypeDescriptor,
    elem: &TypeDescriptor,
    cells: &[&[u8]],
) -> Result<Value, DecodeError> {
    tracing::trace!(ty = %ty, elements = cells.len(), "decoding multi-cell elements");
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| registry.decode(elem, cell).map_err(|e| e.with_context(format!("{ty} element {i}"))))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

impl TypeHandler for ListHandler {
    fn decode(&self, registry: &Registry, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError> {
        element_of("list", ty)?;
        decode_flat(self, registry, ty, bytes)
    }

    fn decode_cells(&self, registry: &Registry, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError> {
        let elem = element_of("list", ty)?;
        let value = decode_elements(registry, ty, elem, cells)?;
        registry.bind(ty, value, &self.schema(registry, ty)?)
    }

    fn schema(&self, registry: &Registry, ty: &TypeDescriptor) -> Result<Schema, DecodeError> {
        let elem = element_of("list", ty)?;
        Ok(Schema::array(registry.schema_for(elem)?).optional())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::registry;
    use typedec_api::SchemaKind;

    fn ty(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    #[test]
    fn cells_are_elements() {
        let ty = ty("list<int>");
        let one = 1i32.to_be_bytes();
        let two = 2i32.to_be_bytes();
        assert_eq!(
            registry().decode_cells(&ty, &[&one[..], &two[..]]).unwrap(),
            Value::Array(vec![Value::Int32(1), Value::Int32(2)])
        );
    }

    #[test]
    fn no_cells_is_empty_list() {
        assert_eq!(registry().decode_cells(&ty("list<text>"), &[]).unwrap(), Value::Array(Vec::new()));
    }

    #[test]
    fn element_errors_name_the_position() {
        let err = registry().decode_cells(&ty("list<int>"), &[&[0, 0, 0, 1][..], &[9][..]]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed column data for int: list<int> element 1: int: expected 4 bytes, got 1"
        );
    }

    #[test]
    fn schema_wraps_element_schema() {
        let schema = registry().schema_for(&ty("list<bigint>")).unwrap();
        assert!(schema.optional);
        let SchemaKind::Array { items } = schema.kind else { panic!("expected array") };
        assert_eq!(items.kind, SchemaKind::Int64);
    }
}

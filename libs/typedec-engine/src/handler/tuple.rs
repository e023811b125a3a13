use typedec_api::{Field, Schema, TypeDescriptor, Value};

use super::{TypeHandler, decode_fields, decode_flat, wrong_descriptor};
use crate::error::DecodeError;
use crate::registry::Registry;

/// Positional tuples. Bound as structs with fields `field1`, `field2`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleHandler;

fn field_types(ty: &TypeDescriptor) -> Result<&[TypeDescriptor], DecodeError> {
    match ty {
        TypeDescriptor::Tuple(fields) => Ok(fields.as_slice()),
        other => Err(wrong_descriptor("tuple", other)),
    }
}

impl TypeHandler for TupleHandler {
    fn decode(&self, registry: &Registry, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError> {
        field_types(ty)?;
        decode_flat(self, registry, ty, bytes)
    }

    fn decode_cells(&self, registry: &Registry, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError> {
        field_types(ty)?;
        let fields = decode_fields(registry, ty, cells)?;
        registry.bind(ty, Value::Tuple(fields), &self.schema(registry, ty)?)
    }

    fn schema(&self, registry: &Registry, ty: &TypeDescriptor) -> Result<Schema, DecodeError> {
        let fields = field_types(ty)?
            .iter()
            .enumerate()
            .map(|(i, field_ty)| Ok(Field::new(format!("field{}", i + 1), registry.schema_for(field_ty)?)))
            .collect::<Result<Vec<_>, DecodeError>>()?;
        Ok(Schema::structure(fields).optional())
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
    fn schema_names_fields_by_position() {
        let schema = registry().schema_for(&ty("tuple<int, text>")).unwrap();
        let SchemaKind::Struct { fields } = schema.kind else { panic!("expected struct") };
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["field1", "field2"]);
        assert!(schema.optional);
        assert_eq!(schema.name, None);
    }

    #[test]
    fn cells_bind_to_struct() {
        let n = 5i32.to_be_bytes();
        let Value::Struct(s) = registry().decode_cells(&ty("tuple<int, text>"), &[&n[..], &b"x"[..]]).unwrap() else {
            panic!("expected struct");
        };
        assert_eq!(s.get("field1"), Some(&Value::Int32(5)));
        assert_eq!(s.get("field2"), Some(&Value::String("x".into())));
    }

    #[test]
    fn fragment_count_must_match_arity() {
        let n = 5i32.to_be_bytes();
        let err = registry().decode_cells(&ty("tuple<int, text>"), &[&n[..]]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed column data for tuple<int, text>: 1 fragments for 2 declared fields"
        );
    }
}

//! Property checks over generated descriptors and payloads.

use std::collections::BTreeMap;
use std::sync::Arc;

use codec_cql::frame::{encode_collection, encode_map};
use codec_cql::{CqlCodec, CqlCollectionDecoder};
use proptest::prelude::*;
use typedec_api::{PrimitiveCodec, PrimitiveKind, Schema, SchemaBinder, SchemaKind, TypeDescriptor, UserType, Value};
use typedec_engine::Registry;
use typedec_engine::handler::LogicalHandler;

fn registry() -> Registry {
    Registry::builder(Arc::new(CqlCodec), Arc::new(CqlCollectionDecoder::new()), Arc::new(SchemaBinder))
        .with_standard_handlers(LogicalHandler::default())
        .build()
}

fn descriptor() -> impl Strategy<Value = TypeDescriptor> {
    let leaf = prop::sample::select(PrimitiveKind::ALL.to_vec()).prop_map(TypeDescriptor::Primitive);
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeDescriptor::list),
            inner.clone().prop_map(TypeDescriptor::set),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| TypeDescriptor::map(k, v)),
            prop::collection::vec(inner.clone(), 1..4).prop_map(TypeDescriptor::tuple),
            prop::collection::vec(inner, 1..4).prop_map(|fields| {
                let udt = fields
                    .into_iter()
                    .enumerate()
                    .fold(UserType::new("generated"), |udt, (i, ty)| udt.field(format!("f{i}"), ty));
                TypeDescriptor::UserDefined(udt)
            }),
        ]
    })
}

/// The schema has the same shape as the descriptor, node for node.
fn assert_mirrors(ty: &TypeDescriptor, schema: &Schema) -> Result<(), TestCaseError> {
    prop_assert!(schema.optional, "{ty} schema is required");
    match (ty, &schema.kind) {
        (TypeDescriptor::Primitive(kind), _) => {
            prop_assert_eq!(schema, &CqlCodec.schema(*kind).unwrap());
        }
        (TypeDescriptor::List(elem) | TypeDescriptor::Set(elem), SchemaKind::Array { items }) => {
            assert_mirrors(elem, items)?;
        }
        (TypeDescriptor::Map(k, v), SchemaKind::Map { keys, values }) => {
            assert_mirrors(k, keys)?;
            assert_mirrors(v, values)?;
        }
        (TypeDescriptor::Tuple(elems), SchemaKind::Struct { fields }) => {
            prop_assert_eq!(elems.len(), fields.len());
            for (i, (elem, field)) in elems.iter().zip(fields).enumerate() {
                prop_assert_eq!(&field.name, &format!("field{}", i + 1));
                assert_mirrors(elem, &field.schema)?;
            }
        }
        (TypeDescriptor::UserDefined(udt), SchemaKind::Struct { fields }) => {
            prop_assert_eq!(schema.name.as_deref(), Some(udt.name.as_str()));
            prop_assert_eq!(udt.fields.len(), fields.len());
            for (declared, field) in udt.fields.iter().zip(fields) {
                prop_assert_eq!(&declared.name, &field.name);
                assert_mirrors(&declared.ty, &field.schema)?;
            }
        }
        (ty, kind) => return Err(TestCaseError::fail(format!("{ty} produced {kind}"))),
    }
    Ok(())
}

proptest! {
    #[test]
    fn schema_mirrors_descriptor(ty in descriptor()) {
        let registry = registry();
        let schema = registry.schema_for(&ty).unwrap();
        assert_mirrors(&ty, &schema)?;
        prop_assert_eq!(schema, registry.schema_for(&ty).unwrap());
    }

    #[test]
    fn descriptor_text_survives(ty in descriptor()) {
        prop_assert_eq!(ty.to_string().parse::<TypeDescriptor>().unwrap(), ty);
    }

    #[test]
    fn text_int_map_on_both_paths(entries in prop::collection::btree_map("[a-z]{0,6}", any::<i32>(), 0..8)) {
        let registry = registry();
        let ty: TypeDescriptor = "map<text, int>".parse().unwrap();
        let encoded: BTreeMap<&str, [u8; 4]> = entries.iter().map(|(k, v)| (k.as_str(), v.to_be_bytes())).collect();
        let expected = Value::Map(
            entries.iter().map(|(k, v)| (Value::String(k.clone()), Value::Int32(*v))).collect(),
        );

        let flat = encode_map(encoded.iter().map(|(k, v)| (Some(k.as_bytes()), Some(&v[..]))));
        prop_assert_eq!(&registry.decode(&ty, &flat).unwrap(), &expected);

        let cells: Vec<&[u8]> = encoded.iter().flat_map(|(k, v)| [k.as_bytes(), &v[..]]).collect();
        prop_assert_eq!(&registry.decode_cells(&ty, &cells).unwrap(), &expected);
    }

    #[test]
    fn bigint_list_on_both_paths(items in prop::collection::vec(any::<i64>(), 0..16)) {
        let registry = registry();
        let ty: TypeDescriptor = "list<bigint>".parse().unwrap();
        let encoded: Vec<[u8; 8]> = items.iter().map(|v| v.to_be_bytes()).collect();
        let expected = Value::Array(items.iter().copied().map(Value::Int64).collect());

        let flat = encode_collection(encoded.iter().map(|v| Some(&v[..])));
        prop_assert_eq!(&registry.decode(&ty, &flat).unwrap(), &expected);

        let cells: Vec<&[u8]> = encoded.iter().map(|v| &v[..]).collect();
        prop_assert_eq!(&registry.decode_cells(&ty, &cells).unwrap(), &expected);
    }
}

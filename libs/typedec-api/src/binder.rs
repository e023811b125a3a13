use crate::codec::ValueBinder;
use crate::error::CodecError;
use crate::schema::{Field, Schema, SchemaKind};
use crate::value::{Struct, Value};

/// Reference binder for the output model.
///
/// Scalars must match their schema kind exactly; no numeric widening. Positional
/// tuples are turned into structs named by the schema fields. Binding an already
/// bound value is a no-op apart from the checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaBinder;

impl ValueBinder for SchemaBinder {
    fn bind(&self, value: Value, schema: &Schema) -> Result<Value, CodecError> {
        bind_value(value, schema)
    }
}

fn bind_value(value: Value, schema: &Schema) -> Result<Value, CodecError> {
    match (value, &schema.kind) {
        (Value::Null, _) if schema.optional => Ok(Value::Null),
        (Value::Null, kind) => Err(CodecError::mismatch(format!("null for required {kind}"))),

        (v @ Value::Boolean(_), SchemaKind::Boolean)
        | (v @ Value::Int8(_), SchemaKind::Int8)
        | (v @ Value::Int16(_), SchemaKind::Int16)
        | (v @ Value::Int32(_), SchemaKind::Int32)
        | (v @ Value::Int64(_), SchemaKind::Int64)
        | (v @ Value::Float32(_), SchemaKind::Float32)
        | (v @ Value::Float64(_), SchemaKind::Float64)
        | (v @ Value::String(_), SchemaKind::String)
        | (v @ Value::Bytes(_), SchemaKind::Bytes) => Ok(v),

        (Value::Array(items), SchemaKind::Array { items: item_schema }) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| bind_value(item, item_schema).map_err(|e| e.with_context(format!("[{i}]"))))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),

        (Value::Map(entries), SchemaKind::Map { keys, values }) => {
            let mut bound = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                let k = bind_value(k, keys).map_err(|e| e.with_context("map key"))?;
                let v = bind_value(v, values).map_err(|e| e.with_context("map value"))?;
                bound.push((k, v));
            }
            Ok(Value::Map(bound))
        }

        (Value::Tuple(items), SchemaKind::Struct { fields }) => {
            if items.len() != fields.len() {
                return Err(CodecError::mismatch(format!(
                    "{} positional values for a struct of {} fields",
                    items.len(),
                    fields.len()
                )));
            }
            bind_fields(items.into_iter().zip(fields), schema)
        }

        (Value::Struct(s), SchemaKind::Struct { fields }) => {
            if s.fields.len() != fields.len()
                || s.fields.iter().zip(fields).any(|((name, _), field)| *name != field.name)
            {
                return Err(CodecError::mismatch("struct fields do not match schema fields"));
            }
            bind_fields(s.fields.into_iter().map(|(_, v)| v).zip(fields), schema)
        }

        (Value::Logical(l), kind) => {
            Err(CodecError::mismatch(format!("unformatted logical value {l:?} for {kind}")))
        }
        (Value::Raw(bytes), kind) => Err(CodecError::mismatch(format!(
            "undecoded fragment of {} bytes for {kind}",
            bytes.len()
        ))),
        (v, kind) => Err(CodecError::mismatch(format!("{} does not conform to {kind}", v.variant_name()))),
    }
}

fn bind_fields<'s>(
    values: impl Iterator<Item = (Value, &'s Field)>,
    schema: &Schema,
) -> Result<Value, CodecError> {
    let mut fields = Vec::new();
    for (value, field) in values {
        let value = bind_value(value, &field.schema).map_err(|e| e.with_context(&field.name))?;
        fields.push((field.name.clone(), value));
    }
    Ok(Value::Struct(Struct { name: schema.name.clone(), fields }))
}

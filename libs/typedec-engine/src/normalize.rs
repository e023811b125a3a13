//! Bridges the collection decoder's output to the binder's input.
//!
//! The external decoder returns primitives final, logical primitives wrapped,
//! nested collections decoded and tuple/user-type elements as undecoded
//! fragments. Normalization resolves each element by the kind of handler
//! registered for its declared type, so the result binds against the
//! registry's schema without further work.

use typedec_api::{MapBuilder, TypeDescriptor, Value};

use crate::error::DecodeError;
use crate::registry::{HandlerKind, Registry};

/// Resolve one element against its declared type.
///
/// - null stays null;
/// - logical kinds go through the handler's formatter;
/// - composite kinds holding an undecoded fragment are decoded through the
///   registry, eagerly decoded containers are normalized recursively;
/// - plain primitives pass through.
pub fn normalize_element(registry: &Registry, ty: &TypeDescriptor, value: Value) -> Result<Value, DecodeError> {
    if value.is_null() {
        return Ok(value);
    }
    let handler = registry.handler_for(ty)?;
    match handler.kind {
        HandlerKind::Logical => handler.handler.format(ty, value),
        kind if kind.is_composite() => match value {
            Value::Raw(bytes) => registry.decode(ty, &bytes),
            other => normalize_container(registry, ty, other),
        },
        _ => Ok(value),
    }
}

/// Normalize every element of a decoded container, one level deep per call.
///
/// Map entries are rebuilt with last-write-wins, since keys that differ as
/// wrapped values can coincide once formatted.
pub fn normalize_container(registry: &Registry, ty: &TypeDescriptor, value: Value) -> Result<Value, DecodeError> {
    match (ty, value) {
        (_, Value::Null) => Ok(Value::Null),

        (TypeDescriptor::List(elem) | TypeDescriptor::Set(elem), Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                normalize_element(registry, elem, item).map_err(|e| e.with_context(format!("{ty} element {i}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),

        (TypeDescriptor::Map(key_ty, value_ty), Value::Map(entries)) => {
            let mut out = MapBuilder::with_capacity(entries.len());
            for (k, v) in entries {
                let k = normalize_element(registry, key_ty, k).map_err(|e| e.with_context(format!("{ty} key")))?;
                let v = normalize_element(registry, value_ty, v).map_err(|e| e.with_context(format!("{ty} value")))?;
                out.insert(k, v);
            }
            Ok(out.finish())
        }

        (TypeDescriptor::Tuple(_) | TypeDescriptor::UserDefined(_), Value::Tuple(fields)) => {
            let declared = ty.children();
            if fields.len() != declared.len() {
                return Err(DecodeError::malformed(
                    ty,
                    format!("{} values for {} declared fields", fields.len(), declared.len()),
                ));
            }
            declared
                .into_iter()
                .zip(fields)
                .enumerate()
                .map(|(i, (field_ty, field))| {
                    normalize_element(registry, field_ty, field)
                        .map_err(|e| e.with_context(format!("{ty} field {}", i + 1)))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Tuple)
        }

        // Already resolved by a nested decode.
        (TypeDescriptor::Tuple(_) | TypeDescriptor::UserDefined(_), v @ Value::Struct(_)) => Ok(v),

        (_, other) => Err(DecodeError::malformed(
            ty,
            format!("collection decoder returned {} for a {} value", other.variant_name(), ty.tag()),
        )),
    }
}

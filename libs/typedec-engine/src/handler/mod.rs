//! Type handlers: one per dispatch tag family.
//!
//! Every handler answers three questions for the descriptors it is
//! registered for: how to decode a flat payload, how to decode a multi-cell
//! payload, and what the output schema is. Composite handlers recurse through
//! the [`Registry`] they are handed; none of them holds state.

mod list;
mod logical;
mod map;
mod primitive;
mod set;
mod tuple;
mod udt;

pub use list::ListHandler;
pub use logical::LogicalHandler;
pub use map::MapHandler;
pub use primitive::PrimitiveHandler;
pub use set::SetHandler;
pub use tuple::TupleHandler;
pub use udt::UserTypeHandler;

use typedec_api::{Schema, TypeDescriptor, Value};

use crate::error::DecodeError;
use crate::normalize::normalize_container;
use crate::registry::Registry;

pub trait TypeHandler: Send + Sync {
    fn decode(&self, registry: &Registry, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError>;

    fn decode_cells(&self, registry: &Registry, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError>;

    /// Pure: depends on the descriptor alone.
    fn schema(&self, registry: &Registry, ty: &TypeDescriptor) -> Result<Schema, DecodeError>;

    /// Turn a decoded logical wrapper into the scalar the schema declares.
    /// Only logical handlers change anything here.
    fn format(&self, _ty: &TypeDescriptor, value: Value) -> Result<Value, DecodeError> {
        Ok(value)
    }
}

/// Flat path shared by every composite handler: external decode, normalize
/// one level, bind against the synthesized schema.
fn decode_flat(
    handler: &dyn TypeHandler,
    registry: &Registry,
    ty: &TypeDescriptor,
    bytes: &[u8],
) -> Result<Value, DecodeError> {
    let raw = registry
        .collections()
        .decode(ty, bytes)
        .map_err(|e| DecodeError::from_codec(ty, e))?;
    let value = normalize_container(registry, ty, raw)?;
    let schema = handler.schema(registry, ty)?;
    registry.bind(ty, value, &schema)
}

/// Decode one fragment per declared child, in order. Used by the fixed-arity
/// composites, where the fragment count must equal the declared field count.
fn decode_fields(
    registry: &Registry,
    ty: &TypeDescriptor,
    cells: &[&[u8]],
) -> Result<Vec<Value>, DecodeError> {
    let declared = ty.children();
    if cells.len() != declared.len() {
        return Err(DecodeError::malformed(
            ty,
            format!("{} fragments for {} declared fields", cells.len(), declared.len()),
        ));
    }
    tracing::trace!(ty = %ty, fields = cells.len(), "decoding multi-cell fields");
    declared
        .into_iter()
        .zip(cells)
        .enumerate()
        .map(|(i, (field_ty, cell))| {
            registry.decode(field_ty, cell).map_err(|e| e.with_context(format!("{ty} field {}", i + 1)))
        })
        .collect()
}

fn wrong_descriptor(handler: &str, ty: &TypeDescriptor) -> DecodeError {
    DecodeError::UnsupportedType(format!("{handler} handler cannot decode {ty}"))
}

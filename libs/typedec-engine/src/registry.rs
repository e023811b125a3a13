use std::collections::HashMap;
use std::sync::Arc;

use typedec_api::{
    CollectionDecoder, Payload, PrimitiveCodec, PrimitiveKind, Schema, TypeDescriptor, TypeTag, Value,
    ValueBinder,
};

use crate::config::EngineConfig;
use crate::error::DecodeError;
use crate::handler::{
    ListHandler, LogicalHandler, MapHandler, PrimitiveHandler, SetHandler, TupleHandler, TypeHandler,
    UserTypeHandler,
};

/// What a registered handler is, independent of which tag it serves.
///
/// The normalizer decides how to treat an element by matching on this, never
/// by inspecting the handler itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Primitive,
    Logical,
    List,
    Set,
    Map,
    Tuple,
    UserDefined,
}

impl HandlerKind {
    pub fn is_composite(self) -> bool {
        !matches!(self, HandlerKind::Primitive | HandlerKind::Logical)
    }
}

struct Entry {
    kind: HandlerKind,
    handler: Arc<dyn TypeHandler>,
}

/// A handler looked up for one descriptor.
#[derive(Clone, Copy)]
pub struct HandlerRef<'r> {
    pub kind: HandlerKind,
    pub handler: &'r dyn TypeHandler,
}

// ════════════════════════════════════════════════════════════════
//  Registry
// ════════════════════════════════════════════════════════════════

/// Dispatch table from type tag to handler, plus the collaborators every
/// handler needs.
///
/// Built once and read-only afterwards; share it by reference (or `Arc`)
/// across threads. Handlers get `&Registry` on every call and recurse through
/// it for nested descriptors.
pub struct Registry {
    handlers: HashMap<TypeTag, Entry>,
    codec: Arc<dyn PrimitiveCodec>,
    collections: Arc<dyn CollectionDecoder>,
    binder: Arc<dyn ValueBinder>,
}

impl Registry {
    pub fn builder(
        codec: Arc<dyn PrimitiveCodec>,
        collections: Arc<dyn CollectionDecoder>,
        binder: Arc<dyn ValueBinder>,
    ) -> RegistryBuilder {
        RegistryBuilder { handlers: HashMap::new(), codec, collections, binder }
    }

    /// Standard handlers minus the types listed in `config.registry.exclude`.
    pub fn from_config(
        config: &EngineConfig,
        codec: Arc<dyn PrimitiveCodec>,
        collections: Arc<dyn CollectionDecoder>,
        binder: Arc<dyn ValueBinder>,
    ) -> Result<Self, DecodeError> {
        let logical = LogicalHandler::new(&config.logical.date_format)?;
        let mut builder = Self::builder(codec, collections, binder).with_standard_handlers(logical);
        for name in &config.registry.exclude {
            let tag = TypeTag::from_name(name)
                .ok_or_else(|| DecodeError::Config(format!("registry.exclude: unknown type '{name}'")))?;
            builder = builder.without(&tag);
        }
        Ok(builder.build())
    }

    pub fn handler_for(&self, ty: &TypeDescriptor) -> Result<HandlerRef<'_>, DecodeError> {
        let tag = ty.tag();
        match self.handlers.get(&tag) {
            Some(entry) => Ok(HandlerRef { kind: entry.kind, handler: entry.handler.as_ref() }),
            None => Err(DecodeError::UnsupportedType(tag.to_string())),
        }
    }

    /// Output schema for a descriptor. Never looks at a payload.
    pub fn schema_for(&self, ty: &TypeDescriptor) -> Result<Schema, DecodeError> {
        self.handler_for(ty)?.handler.schema(self, ty)
    }

    /// Decode a flat payload.
    pub fn decode(&self, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, DecodeError> {
        self.handler_for(ty)?.handler.decode(self, ty, bytes)
    }

    /// Decode a multi-cell column from its fragments.
    pub fn decode_cells(&self, ty: &TypeDescriptor, cells: &[&[u8]]) -> Result<Value, DecodeError> {
        self.handler_for(ty)?.handler.decode_cells(self, ty, cells)
    }

    pub fn decode_payload(&self, ty: &TypeDescriptor, payload: Payload<'_>) -> Result<Value, DecodeError> {
        match payload {
            Payload::Flat(bytes) => self.decode(ty, bytes),
            Payload::Cells(cells) => self.decode_cells(ty, cells),
        }
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self.handlers.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn codec(&self) -> &dyn PrimitiveCodec {
        self.codec.as_ref()
    }

    pub fn collections(&self) -> &dyn CollectionDecoder {
        self.collections.as_ref()
    }

    /// Bind through the configured binder. A rejection means the engine
    /// produced a value that does not fit its own schema.
    pub(crate) fn bind(&self, ty: &TypeDescriptor, value: Value, schema: &Schema) -> Result<Value, DecodeError> {
        self.binder.bind(value, schema).map_err(|e| {
            let err = DecodeError::from_codec(ty, e);
            if matches!(err, DecodeError::SchemaMismatch { .. }) {
                tracing::error!(ty = %ty, error = %err, "decoded value rejected by its schema");
            }
            err
        })
    }
}

// ════════════════════════════════════════════════════════════════
//  Builder
// ════════════════════════════════════════════════════════════════

pub struct RegistryBuilder {
    handlers: HashMap<TypeTag, Entry>,
    codec: Arc<dyn PrimitiveCodec>,
    collections: Arc<dyn CollectionDecoder>,
    binder: Arc<dyn ValueBinder>,
}

impl RegistryBuilder {
    /// Register `handler` for `tag`, replacing any earlier registration.
    pub fn register(mut self, tag: TypeTag, kind: HandlerKind, handler: Arc<dyn TypeHandler>) -> Self {
        self.handlers.insert(tag, Entry { kind, handler });
        self
    }

    pub fn without(mut self, tag: &TypeTag) -> Self {
        self.handlers.remove(tag);
        self
    }

    /// Every primitive kind plus List, Set, Map, Tuple and UserDefined.
    /// Logical kinds go to `logical`, the rest to the plain primitive handler.
    pub fn with_standard_handlers(mut self, logical: LogicalHandler) -> Self {
        let primitive: Arc<dyn TypeHandler> = Arc::new(PrimitiveHandler);
        let logical: Arc<dyn TypeHandler> = Arc::new(logical);
        for kind in PrimitiveKind::ALL {
            self = if kind.is_logical() {
                self.register(TypeTag::Primitive(kind), HandlerKind::Logical, logical.clone())
            } else {
                self.register(TypeTag::Primitive(kind), HandlerKind::Primitive, primitive.clone())
            };
        }
        self.register(TypeTag::List, HandlerKind::List, Arc::new(ListHandler))
            .register(TypeTag::Set, HandlerKind::Set, Arc::new(SetHandler))
            .register(TypeTag::Map, HandlerKind::Map, Arc::new(MapHandler))
            .register(TypeTag::Tuple, HandlerKind::Tuple, Arc::new(TupleHandler))
            .register(TypeTag::UserDefined, HandlerKind::UserDefined, Arc::new(UserTypeHandler))
    }

    pub fn build(self) -> Registry {
        tracing::debug!(handlers = self.handlers.len(), "type registry built");
        Registry {
            handlers: self.handlers,
            codec: self.codec,
            collections: self.collections,
            binder: self.binder,
        }
    }
}

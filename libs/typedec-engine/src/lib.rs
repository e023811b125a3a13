//! Type-directed decoding of column payloads into the output value model.
//!
//! A [`Registry`] maps each type tag to a [`TypeHandler`]. Handlers decode
//! flat payloads through the external collection decoder and multi-cell
//! payloads fragment by fragment, recursing through the registry for nested
//! types, and bind every result against the schema synthesized for its
//! descriptor.

pub mod config;
pub mod error;
pub mod handler;
pub mod normalize;
pub mod registry;

pub use config::EngineConfig;
pub use error::DecodeError;
pub use handler::TypeHandler;
pub use registry::{HandlerKind, HandlerRef, Registry, RegistryBuilder};

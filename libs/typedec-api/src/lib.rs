pub mod binder;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod json;
pub mod parse;
pub mod schema;
pub mod value;

pub use binder::SchemaBinder;
pub use codec::{CollectionDecoder, Payload, PrimitiveCodec, ValueBinder};
pub use descriptor::{PrimitiveKind, TypeDescriptor, TypeTag, UdtField, UserType};
pub use error::{CodecError, ErrorKind};
pub use parse::ParseError;
pub use schema::{Field, Schema, SchemaKind};
pub use value::{Logical, MapBuilder, Struct, Value};

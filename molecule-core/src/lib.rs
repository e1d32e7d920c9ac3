//! # Molecule Core
//!
//! Schema-driven binary serialization in the molecule format: composable
//! codecs that pack canonical values into bytes, unpack them back with
//! exact-length validation, and validate untyped JSON input.
//!
//! ## Modules
//!
//! - `error`: Issue trees, codec errors and construction errors
//! - `writer`: Growable output buffer
//! - `codec`: The `Codec` contract and the `AnyCodec` handle
//! - `byte`, `array`, `option`, `fixvec`, `dynvec`, `vector`: Primitive and sequence codecs
//! - `structure`, `table`, `union`: Record and variant codecs
//! - `schema`: Whole-schema emission
//! - `builtins`, `registry`: CKB core types and name lookup
//!
//! ```
//! use molecule_core::{byte, table, Codec, Value};
//!
//! let point = table("Point", [("x", byte()), ("y", byte())], &["x", "y"]).unwrap();
//! let packed = point.pack(&Value::object([("x", 1u8), ("y", 2u8)])).unwrap();
//! assert_eq!(packed.as_ref(), &[14, 0, 0, 0, 12, 0, 0, 0, 13, 0, 0, 0, 1, 2]);
//! ```

#![warn(missing_docs)]

extern crate alloc;

pub mod array;
pub mod builtins;
pub mod byte;
pub mod codec;
pub mod constants;
pub mod dynvec;
pub mod error;
pub mod fixvec;
pub mod hex_string;
pub mod option;
pub mod registry;
pub mod schema;
mod shape;
pub mod structure;
pub mod table;
pub mod union;
pub mod value;
pub mod vector;
pub mod writer;

// Re-export commonly used types
pub use array::{array, byte_array, ArrayCodec, ByteArrayCodec};
pub use byte::{byte, ByteCodec};
pub use codec::{AnyCodec, Codec, FixedSizeCodec};
pub use dynvec::{dynvec, DynvecCodec};
pub use error::{CodecError, CodecIssue, PackError, PathSegment, SafeParseResult, ShapeError};
pub use fixvec::{byte_fixvec, fixvec, ByteFixvecCodec, FixvecCodec};
pub use option::{option, OptionCodec};
pub use registry::Registry;
pub use schema::emit_schema;
pub use structure::{structure, StructCodec};
pub use table::{table, TableCodec};
pub use union::{union, union_with_tags, UnionCodec};
pub use value::{UnionValue, Value};
pub use vector::vector;
pub use writer::BinaryWriter;

/// Result type alias for molecule decoding operations
pub type Result<T> = core::result::Result<T, CodecError>;

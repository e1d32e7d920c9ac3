//! CKB blockchain core types
//!
//! ```text
//! array Uint32 [byte; 4];
//! array Uint64 [byte; 8];
//! array Uint128 [byte; 16];
//! array Byte32 [byte; 32];
//! vector Bytes <byte>;
//! option BytesOpt (Bytes);
//! vector BytesVec <Bytes>;
//! vector Byte32Vec <Byte32>;
//! table Script { code_hash: Byte32, hash_type: byte, args: Bytes }
//! option ScriptOpt (Script);
//! struct OutPoint { tx_hash: Byte32, index: Uint32 }
//! struct CellInput { since: Uint64, previous_output: OutPoint }
//! table CellOutput { capacity: Uint64, lock: Script, type_: ScriptOpt }
//! vector CellOutputVec <CellOutput>;
//! struct CellDep { out_point: OutPoint, dep_type: byte }
//! vector CellDepVec <CellDep>;
//! table WitnessArgs { lock: BytesOpt, input_type: BytesOpt, output_type: BytesOpt }
//! ```
//!
//! Integers are little-endian byte arrays; their canonical value is raw bytes.

use crate::array::{byte_array, ByteArrayCodec};
use crate::byte::byte;
use crate::codec::AnyCodec;
use crate::error::ShapeError;
use crate::fixvec::{byte_fixvec, fixvec, ByteFixvecCodec, FixvecCodec};
use crate::option::{option, OptionCodec};
use crate::registry::Registry;
use crate::structure::{structure, StructCodec};
use crate::table::{table, TableCodec};
use crate::vector::vector;

/// `array Uint32 [byte; 4];`
pub fn uint32() -> ByteArrayCodec {
    byte_array("Uint32", 4)
}

/// `array Uint64 [byte; 8];`
pub fn uint64() -> ByteArrayCodec {
    byte_array("Uint64", 8)
}

/// `array Uint128 [byte; 16];`
pub fn uint128() -> ByteArrayCodec {
    byte_array("Uint128", 16)
}

/// `array Byte32 [byte; 32];`
pub fn byte32() -> ByteArrayCodec {
    byte_array("Byte32", 32)
}

/// `vector Bytes <byte>;`
pub fn bytes() -> ByteFixvecCodec {
    byte_fixvec("Bytes")
}

/// `option BytesOpt (Bytes);`
pub fn bytes_opt() -> OptionCodec {
    option("BytesOpt", bytes())
}

/// `vector BytesVec <Bytes>;`
pub fn bytes_vec() -> Result<AnyCodec, ShapeError> {
    vector("BytesVec", bytes())
}

/// `vector Byte32Vec <Byte32>;`
pub fn byte32_vec() -> Result<FixvecCodec, ShapeError> {
    fixvec("Byte32Vec", byte32())
}

/// `table Script`
pub fn script() -> Result<TableCodec, ShapeError> {
    table(
        "Script",
        [
            ("code_hash", AnyCodec::from(byte32())),
            ("hash_type", AnyCodec::from(byte())),
            ("args", AnyCodec::from(bytes())),
        ],
        &["code_hash", "hash_type", "args"],
    )
}

/// `option ScriptOpt (Script);`
pub fn script_opt() -> Result<OptionCodec, ShapeError> {
    Ok(option("ScriptOpt", script()?))
}

/// `struct OutPoint`
pub fn out_point() -> Result<StructCodec, ShapeError> {
    structure(
        "OutPoint",
        [("tx_hash", byte32()), ("index", uint32())],
        &["tx_hash", "index"],
    )
}

/// `struct CellInput`
pub fn cell_input() -> Result<StructCodec, ShapeError> {
    structure(
        "CellInput",
        [
            ("since", AnyCodec::from(uint64())),
            ("previous_output", AnyCodec::from(out_point()?)),
        ],
        &["since", "previous_output"],
    )
}

/// `table CellOutput`
///
/// The type script field is named `type_` as in the CKB schema.
pub fn cell_output() -> Result<TableCodec, ShapeError> {
    table(
        "CellOutput",
        [
            ("capacity", AnyCodec::from(uint64())),
            ("lock", AnyCodec::from(script()?)),
            ("type_", AnyCodec::from(script_opt()?)),
        ],
        &["capacity", "lock", "type_"],
    )
}

/// `vector CellOutputVec <CellOutput>;`
pub fn cell_output_vec() -> Result<AnyCodec, ShapeError> {
    vector("CellOutputVec", cell_output()?)
}

/// `struct CellDep`
pub fn cell_dep() -> Result<StructCodec, ShapeError> {
    structure(
        "CellDep",
        [
            ("out_point", AnyCodec::from(out_point()?)),
            ("dep_type", AnyCodec::from(byte())),
        ],
        &["out_point", "dep_type"],
    )
}

/// `vector CellDepVec <CellDep>;`
pub fn cell_dep_vec() -> Result<FixvecCodec, ShapeError> {
    fixvec("CellDepVec", cell_dep()?)
}

/// `table WitnessArgs`
pub fn witness_args() -> Result<TableCodec, ShapeError> {
    table(
        "WitnessArgs",
        [
            ("lock", bytes_opt()),
            ("input_type", bytes_opt()),
            ("output_type", bytes_opt()),
        ],
        &["lock", "input_type", "output_type"],
    )
}

impl Registry {
    /// Registry of every CKB core type
    pub fn builtin() -> Result<Self, ShapeError> {
        let mut registry = Registry::new();
        registry.register(uint32());
        registry.register(uint64());
        registry.register(uint128());
        registry.register(byte32());
        registry.register(bytes());
        registry.register(bytes_opt());
        registry.register(bytes_vec()?);
        registry.register(byte32_vec()?);
        registry.register(script()?);
        registry.register(script_opt()?);
        registry.register(out_point()?);
        registry.register(cell_input()?);
        registry.register(cell_output()?);
        registry.register(cell_output_vec()?);
        registry.register(cell_dep()?);
        registry.register(cell_dep_vec()?);
        registry.register(witness_args()?);
        Ok(registry)
    }
}

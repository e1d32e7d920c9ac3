//! Fuzz targets for molecule-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Call these functions from `fuzz_target!` bodies

use molecule_core::{Codec, Registry};

/// Unpack `data` as every builtin type, strict and non-strict
///
/// Must never panic. Whatever unpacks must pack back to the same bytes.
pub fn fuzz_unpack(data: &[u8]) {
    let Ok(registry) = Registry::builtin() else {
        return;
    };

    for codec in registry.iter() {
        for strict in [false, true] {
            if let Ok(value) = codec.unpack_with(data, strict) {
                if strict {
                    let packed = codec.pack(&value);
                    assert!(
                        matches!(&packed, Ok(bytes) if bytes.as_ref() == data),
                        "{} does not re-pack to its input",
                        codec.name()
                    );
                }
            }
        }
    }
}

/// Parse `data` as JSON and run it through every builtin type
///
/// Anything `safe_parse` accepts must survive a pack/unpack round trip.
pub fn fuzz_parse(data: &[u8]) {
    let Ok(input) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(registry) = Registry::builtin() else {
        return;
    };

    for codec in registry.iter() {
        if let Ok(value) = codec.parse(&input) {
            let packed = codec.pack(&value);
            assert!(packed.is_ok(), "{} failed to pack a parsed value", codec.name());
            if let Ok(packed) = packed {
                assert_eq!(codec.unpack_strict(&packed).ok(), Some(value));
            }
        }
    }
}

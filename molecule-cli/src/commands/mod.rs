//! Subcommand implementations

pub mod list;
pub mod pack;
pub mod schema;
pub mod unpack;

use anyhow::{anyhow, Context, Result};
use molecule_core::{AnyCodec, CodecError, Registry};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Registry of every type the CLI knows
pub fn registry() -> Result<Registry> {
    Registry::builtin().context("Failed to build the builtin registry")
}

/// Look up a type by name
pub fn lookup(registry: &Registry, name: &str) -> Result<AnyCodec> {
    registry.get(name).cloned().ok_or_else(|| {
        anyhow!(
            "Unknown type {}; run `molecule list` for the known types",
            name
        )
    })
}

/// Read `-` from stdin, or a file
pub(crate) fn read_source(source: &str) -> Result<Vec<u8>> {
    if source == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read(source).with_context(|| format!("Failed to read input file: {}", source))
    }
}

/// Whether `input` names something to read rather than literal text
pub(crate) fn is_source(input: &str) -> bool {
    input == "-" || Path::new(input).is_file()
}

/// Write `data` to `output`
pub(crate) fn write_output(output: &str, data: &[u8]) -> Result<()> {
    fs::write(output, data).with_context(|| format!("Failed to write output file: {}", output))
}

/// One line per issue, addressed by its path
///
/// Wrapped causes are already part of the issue tree.
pub fn describe_error(error: &CodecError) -> Vec<String> {
    error.collect_messages()
}

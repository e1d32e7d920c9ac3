use anyhow::{bail, Context, Result};
use colored::*;
use molecule_core::{hex_string, Codec};
use serde_json::Value;
use tracing::info;

use super::{describe_error, lookup, read_source, registry, write_output};

/// Resolve `input` to the bytes to unpack
///
/// A `0x` string is decoded directly. Anything else is read as a file (or
/// stdin for `-`) holding hex text, or raw binary when `raw` is set.
pub fn load_bytes(input: &str, raw: bool) -> Result<Vec<u8>> {
    if input.starts_with(hex_string::HEX_PREFIX) {
        return hex_string::decode(input).context("Invalid hex input");
    }

    let data = read_source(input)?;
    if raw {
        return Ok(data);
    }
    let text = String::from_utf8(data).context("Input file is not hex text; use --raw for binary")?;
    hex_string::decode(text.trim()).context("Invalid hex input")
}

/// Unpack `bytes` as `type_name` into JSON
pub fn unpack_bytes(type_name: &str, bytes: &[u8], strict: bool) -> Result<Value> {
    let registry = registry()?;
    let codec = lookup(&registry, type_name)?;

    match codec.unpack_with(bytes, strict) {
        Ok(value) => Ok(value.to_json()),
        Err(error) => {
            for line in describe_error(&error) {
                eprintln!("{} {}", "✗".red(), line);
            }
            bail!("Failed to unpack {}: {}", type_name, error.root_cause());
        }
    }
}

pub fn execute(
    type_name: &str,
    input: &str,
    raw: bool,
    strict: bool,
    output: Option<&str>,
) -> Result<()> {
    let bytes = load_bytes(input, raw)?;
    info!(
        "Unpacking {} bytes as {} (strict: {})",
        bytes.len(),
        type_name,
        strict
    );

    let json = unpack_bytes(type_name, &bytes, strict)?;
    let text = serde_json::to_string_pretty(&json).context("Failed to render JSON")?;

    match output {
        Some(path) => {
            write_output(path, text.as_bytes())?;
            println!("{} Wrote {} to {}", "✓".green(), type_name, path);
        }
        None => println!("{}", text),
    }

    Ok(())
}

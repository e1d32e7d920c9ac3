use anyhow::{bail, Context, Result};
use colored::*;
use molecule_core::{hex_string, Codec};
use serde_json::Value;
use tracing::info;

use super::{describe_error, is_source, lookup, read_source, registry, write_output};

/// Validate JSON `input` against `type_name` and pack it
pub fn pack_json(type_name: &str, input: &Value) -> Result<Vec<u8>> {
    let registry = registry()?;
    let codec = lookup(&registry, type_name)?;

    let value = match codec.parse(input) {
        Ok(value) => value,
        Err(error) => {
            for line in describe_error(&error) {
                eprintln!("{} {}", "✗".red(), line);
            }
            bail!("Input is not a valid {}: {}", type_name, error);
        }
    };

    let packed = codec
        .pack(&value)
        .with_context(|| format!("Failed to pack {}", type_name))?;
    Ok(packed.to_vec())
}

pub fn execute(type_name: &str, input: &str, output: Option<&str>) -> Result<()> {
    let text = if is_source(input) {
        let data = read_source(input)?;
        String::from_utf8(data).context("Input is not UTF-8")?
    } else {
        input.to_string()
    };
    let json: Value = serde_json::from_str(&text).context("Failed to parse JSON input")?;

    let packed = pack_json(type_name, &json)?;
    info!("Packed {} into {} bytes", type_name, packed.len());

    match output {
        Some(path) => {
            write_output(path, &packed)?;
            println!(
                "{} Wrote {} bytes to {}",
                "✓".green(),
                packed.len(),
                path
            );
        }
        None => println!("{}", hex_string::encode(&packed)),
    }

    Ok(())
}

use anyhow::Result;
use colored::*;
use molecule_core::Codec;

/// One `(name, layout)` row per known type
pub fn entries() -> Result<Vec<(String, String)>> {
    let registry = super::registry()?;
    Ok(registry
        .iter()
        .map(|codec| {
            let layout = match codec.byte_length() {
                Some(len) => format!("fixed, {} bytes", len),
                None => "dynamic".to_string(),
            };
            (codec.name().to_string(), layout)
        })
        .collect())
}

pub fn execute() -> Result<()> {
    let entries = entries()?;

    println!("\n=== Known Types ===");
    for (name, layout) in &entries {
        println!("{:<16} {}", name.bold(), layout.dimmed());
    }
    println!("\n{} types", entries.len());

    Ok(())
}

use anyhow::Result;
use molecule_core::{emit_schema, Codec};
use tracing::debug;

/// Schema text of `type_name`, with its dependencies when `all` is set
pub fn render(type_name: &str, all: bool) -> Result<String> {
    let registry = super::registry()?;
    let codec = super::lookup(&registry, type_name)?;

    debug!("Rendering schema of {} (all: {})", type_name, all);
    Ok(if all {
        emit_schema(&codec)
    } else {
        codec.schema()
    })
}

pub fn execute(type_name: &str, all: bool) -> Result<()> {
    println!("{}", render(type_name, all)?);
    Ok(())
}

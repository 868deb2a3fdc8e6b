use std::fs;

use anyhow::Context;
use libquadra::{Config, assemble};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    debug!(?config, "assembly stage");

    let ir = fs::read_to_string(&config.ir)
        .with_context(|| format!("failed to open {}", config.ir.display()))?;
    let asm = assemble(&ir).with_context(|| format!("failed to assemble {}", config.ir.display()))?;

    fs::write(&config.asm, &asm)
        .with_context(|| format!("failed to write {}", config.asm.display()))?;
    info!(lines = asm.lines().count(), path = %config.asm.display(), "wrote assembly");

    println!("Assembly code written to {}", config.asm.display());
    Ok(())
}

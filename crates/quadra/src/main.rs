use std::fs;

use libquadra::Config;
use miette::{IntoDiagnostic, NamedSource, Report, WrapErr};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    debug!(?config, "front stage");

    let source = fs::read_to_string(&config.source)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to open {}", config.source.display()))?;

    let program = quadra_syntax::compile(&source).map_err(|err| {
        Report::new(err).with_source_code(NamedSource::new(
            config.source.display().to_string(),
            source,
        ))
    })?;
    debug!("intermediate code:\n{program}");

    fs::write(&config.ir, program.to_string())
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {}", config.ir.display()))?;
    info!(quads = program.len(), path = %config.ir.display(), "wrote intermediate code");

    println!("Parsing and semantic analysis successful!");
    println!("Intermediate code written to {}", config.ir.display());
    Ok(())
}

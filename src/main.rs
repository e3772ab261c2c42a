//! Kiln's application entry point.
//! Parses arguments, loads the site configuration and runs one build.

use std::path::PathBuf;

use kiln::{
    builder::{build, BuildSession},
    classifier::PathClassifier,
    cli::{get_args, Args},
    config::get_config,
    constants::DEFAULT_OUTPUT_DIR,
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the site configuration from the working directory
/// 2. Validates the source and output roots
/// 3. Clears the output root and mirrors the source tree into it
fn run(args: Args) -> Result<()> {
    let base_dir = std::env::current_dir()
        .map_err(|e| Error::ConfigError(format!("cannot read working directory: {e}")))?;
    let config = get_config(&base_dir, args.config.as_deref())?;

    let output = args
        .output
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let session = BuildSession::new(&base_dir, &args.source, &output)?;

    let patterns = config.templated_patterns();
    let classifier = PathClassifier::new(patterns.as_slice())?;
    let engine =
        MiniJinjaRenderer::with_options(session.base_dir(), config.encoding()?, &config.globals);

    build(&session, &engine, &classifier)?;
    log::info!("Build finished successfully in {}.", session.output_root().display());
    Ok(())
}

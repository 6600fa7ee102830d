mod args;
mod run;

use tracing_subscriber::EnvFilter;

pub use args::Arguments;
pub use run::{run, RunSummary};

use crate::config::Settings;
use crate::error::RunError;
use crate::services::registry;

/// Logs go to stderr. `RUST_LOG` overrides the level chosen here.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "info,sekai_po=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolves the arguments, builds the registries and runs.
pub async fn run_cli(args: Arguments) -> Result<RunSummary, RunError> {
    let settings = Settings::resolve(args);

    if !settings.input.exists() {
        return Err(RunError::InputNotFound(settings.input));
    }

    let api_key = settings.api_key.as_deref().ok_or(RunError::MissingApiKey)?;

    let extractors = registry::extractors();
    let translators = registry::translators(api_key, &settings.base_url, &settings.target_language)?;

    run(&settings, &extractors, &translators).await
}

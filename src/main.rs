use std::process::ExitCode;

use clap::Parser;
use sekai_po::cli::{self, Arguments};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Arguments::parse();
    cli::init_logging(args.verbose);

    match cli::run_cli(args).await {
        Ok(summary) => {
            tracing::info!(
                translated = summary.translated,
                failed = summary.failed,
                output = %summary.output.display(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

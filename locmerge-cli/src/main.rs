use std::process::ExitCode;

use clap::Parser;
use locmerge::Error;
use locmerge_cli::{Cli, logging::init_logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Run `locmerge --help` for usage.");
            return ExitCode::from(2);
        }
    };

    match locmerge::run(&config) {
        Ok(summary) => {
            for path in &summary.written {
                tracing::info!(path = %path.display(), "written");
            }
            if summary.has_failures() {
                tracing::warn!(
                    directories = summary.walk_failures.len(),
                    groups = summary.conversion_failures.len(),
                    "finished with skipped input, see errors above"
                );
            }
            ExitCode::SUCCESS
        }
        Err(e @ Error::Config(_)) => {
            tracing::error!("{e}");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

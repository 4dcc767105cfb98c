use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use scanreport_cli::cli::Cli;
use scanreport_cli::output::OutputWriter;
use scanreport_cli::{load_config, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_code(e.exit_code());
        }
    };

    if let Err(e) = logging::init_tracing(&config.general) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    let writer = OutputWriter::new(cli.format);
    let result = match run(&cli, &config).await {
        Ok(summary) => writer
            .render(&summary)
            .and_then(|()| summary.ensure_complete()),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "scanreport failed");
            eprintln!("error: {e}");
            exit_code(e.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

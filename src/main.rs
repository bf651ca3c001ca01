use clap::Parser;
use std::process::ExitCode;
use tidyfolder::cli::{CliArgs, run};
use tidyfolder::output::OutputFormatter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tidyfolder=warn".into()),
        )
        .init();

    let args = CliArgs::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            OutputFormatter::error(&format!("Error: cannot read current directory: {}", e));
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &cwd) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

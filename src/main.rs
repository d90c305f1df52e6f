use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use tracing::{debug, error};
use pshell::config::{Config, ConfigError, ConfigLoader};
use pshell::logging;
use pshell::repl::Repl;

/// A small interactive shell with filesystem built-ins.
#[derive(Debug, Parser)]
#[command(name = "pshell", version)]
struct Cli {
    /// Configuration file; defaults to ~/.pshellrc when it exists
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    if let Some(path) = &cli.config {
        return ConfigLoader::load_from_file(path);
    }
    match ConfigLoader::default_path() {
        Some(path) if path.is_file() => ConfigLoader::load_from_file(path),
        _ => Ok(ConfigLoader::default_config()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pshell: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!(?config, "configuration loaded");

    let mut repl = Repl::new(config, io::stdin().lock(), io::stdout());
    match repl.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "cannot write to terminal");
            ExitCode::FAILURE
        }
    }
}

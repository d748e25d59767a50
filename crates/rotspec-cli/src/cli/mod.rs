mod commands;
mod helpers;

use clap::Parser;
use rotspec_core::domain::RotspecError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().collect();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let core_error = error.as_rotspec_error();
            eprintln!("{}", core_error.diagnostic_line());
            if let Some(summary_line) = core_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            core_error.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(name = "rotspec-rs", about = "Rotational spectra temperature analysis engine")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Synthesize a line spectrum at one rotational temperature
    Synth(commands::SynthArgs),
    /// Collapse a spectral image to a background-subtracted spectrum
    Collapse(commands::CollapseArgs),
    /// Fit rotational temperatures across an ordered image sequence
    Fit(commands::FitArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Synth(args) => commands::run_synth_command(args),
        CliCommand::Collapse(args) => commands::run_collapse_command(args),
        CliCommand::Fit(args) => commands::run_fit_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(RotspecError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_rotspec_error(&self) -> RotspecError {
        match self {
            Self::Usage(message) => {
                RotspecError::input_validation("INPUT.CLI_USAGE", message.clone())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => RotspecError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

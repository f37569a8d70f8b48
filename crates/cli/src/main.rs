//! Grader CLI
//!
//! `grader <SUBMISSION> <GROUND_TRUTH> <METRIC>` prints one JSON line.

use clap::error::ErrorKind;
use clap::Parser;
use grader_cli::{render, run, Cli, MISSING_ARGUMENTS};
use grader_domain::ScoreResult;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            return emit(&ScoreResult::error(MISSING_ARGUMENTS), ExitCode::FAILURE);
        }
        // --help, --version and malformed options
        Err(e) => e.exit(),
    };

    match run(&cli) {
        Ok(result) => emit(&result, ExitCode::SUCCESS),
        Err(e) => emit(&ScoreResult::error(format!("{:#}", e)), ExitCode::FAILURE),
    }
}

fn emit(result: &ScoreResult, code: ExitCode) -> ExitCode {
    match render(result) {
        Ok(line) => {
            println!("{}", line);
            code
        }
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

//! Binary entrypoint for castrank.
use std::process::ExitCode;

use castrank_cli::{error_document, run, usage_error, Cli};
use castrank_core::CastrankError;
use clap::error::ErrorKind;
use clap::Parser;

fn fail(err: &CastrankError) -> ExitCode {
    eprintln!("{}", error_document(err));
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => return fail(&usage_error(&err)),
    };

    match run(&cli) {
        Ok(document) => {
            println!("{}", document);
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

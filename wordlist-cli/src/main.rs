use clap::Parser;
use std::process::ExitCode;
use wordlist_cli::commands::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

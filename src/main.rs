use lingua_report::cli;
use lingua_report::models::ExitStatus;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(ExitStatus::UsageError.code())
        }
    }
}

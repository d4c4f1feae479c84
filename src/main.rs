use clap::Parser;
use std::process::ExitCode;
use tidyup::cli::{Cli, run_cli};
use tidyup::logging::init_logger;
use tidyup::output::OutputFormatter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logger(cli.verbose);

    let result = cli.into_options().and_then(|options| run_cli(&options));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

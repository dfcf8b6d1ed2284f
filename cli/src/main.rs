mod chart;
mod commands;
mod export;
mod terminal;

use std::process::ExitCode;
use std::time::Duration;

use commands::{CommandLine, Commands, diagnose, ping, range};
use terminal::{print, spinner};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    spinner::init_logging(commands.verbose);

    let result = match commands.command {
        Commands::Diagnose(args) => diagnose::diagnose(args).await,
        Commands::Ping { address, timeout } => {
            ping::ping(address, Duration::from_millis(timeout)).await
        }
        Commands::Range { prefix } => {
            range::range(prefix);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            spinner::finish();
            error!("{e:#}");
            print::end_of_program();
            ExitCode::FAILURE
        }
    }
}

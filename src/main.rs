//! tsrig CLI - build, watch and run TypeScript projects
//!
//! Usage: tsrig <COMMAND>
//!
//! Commands:
//!   build   Type check and compile the project into the output directory
//!   dev     Run the application and restart it on every change
//!   run     Run a command or script with the project's loader and environment

mod cli;
mod commands;

use clap::Parser;

use tsrig::config::EnvOverrides;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    let env = EnvOverrides::from_env();
    let logger = commands::logger_for(&cli, &env);

    let code = match commands::dispatch(cli, env, logger) {
        Ok(code) => code,
        Err(err) => {
            logger.error(format!("{:#}", err));
            1
        }
    };
    std::process::exit(code);
}

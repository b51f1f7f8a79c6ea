//! Binary entry point for `provision`.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use mac_provision::{cli, commands, error, logging, resources::helpers::scratch};

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, "provision");
    let log = Arc::new(logging::Logger::new("provision"));

    if let Err(e) = scratch::install_interrupt_cleanup() {
        log.debug(&format!("interrupt cleanup not installed: {e:#}"));
    }

    match commands::provision::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::from(error::exit_code_for(&e))
        }
    }
}

#[allow(clippy::print_stderr)]
fn report(err: &anyhow::Error) {
    eprintln!("ERROR: {err:#}");
}

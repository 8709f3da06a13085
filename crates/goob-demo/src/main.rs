//! goob demo binary.
//!
//! ```text
//! goob-demo window                 # print input events until closed
//! goob-demo bounce [--texture P]   # click to spawn bouncing dots
//! goob-demo ink [--script P]       # click to add Ink-driven sprites
//! ```

mod assets;
mod bounce_demo;
mod cli;
mod ink_demo;
mod window_demo;

use std::process::ExitCode;

use clap::Parser;
use goob_engine::logging::init_logging;

use crate::cli::{Cli, Demo};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.logging_config());

    let result = match &cli.demo {
        Demo::Window => window_demo::run(&cli.window),
        Demo::Bounce(args) => bounce_demo::run(&cli.window, args),
        Demo::Ink(args) => ink_demo::run(&cli.window, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

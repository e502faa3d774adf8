//! Function for running the command line program.

use super::{build, evaluate::run_evaluate_subcommand, sweep::run_sweep_subcommand};
use crate::exit_on_error;
use clap::ArgMatches;
use std::{
    io::{self, Write},
    time::Instant,
};

/// Runs the `bunchfield` command line program.
pub fn run() {
    let arguments = build::build().get_matches();
    run_with_args(arguments, &mut io::stdout().lock());
}

/// Runs the `bunchfield` command line program with the given arguments,
/// writing results to `output`.
pub fn run_with_args<W: Write>(arguments: ArgMatches, output: &mut W) {
    let start_instant = Instant::now();

    if let Some(evaluate_arguments) = arguments.subcommand_matches("evaluate") {
        run_evaluate_subcommand(evaluate_arguments, output);
    }
    if let Some(sweep_arguments) = arguments.subcommand_matches("sweep") {
        run_sweep_subcommand(sweep_arguments, output);
    }

    if arguments.get_flag("timing") {
        exit_on_error!(
            writeln!(
                output,
                "Elapsed time: {} s",
                start_instant.elapsed().as_secs_f64()
            ),
            "Error: Could not write timing: {}"
        );
    }
}

//! Command line interface for evaluating field components at a single point.

use super::utils::{
    add_bunch_arguments_to_subcommand, add_evaluator_config_arguments_to_subcommand,
    construct_evaluator_from_arguments, create_point_argument, create_verbose_argument,
    parse_point, parse_value_string, parse_verbosity,
};
use crate::{exit_on_error, field::FieldComponent};
use clap::{builder::PossibleValuesParser, Arg, ArgMatches, Command};
use std::io::Write;

pub const COMPONENT_NAMES: [&str; 10] = [
    "ex", "ey", "ez", "dex", "dey", "dez", "bx", "by", "dbx", "dby",
];

/// Creates a subcommand for evaluating field components at a point.
pub fn create_evaluate_subcommand() -> Command {
    let command = Command::new("evaluate")
        .about("Evaluate field components at a single point")
        .long_about(
            "Evaluate field components at a single point.\n\
             Each component is printed on a separate line together with its unit\n\
             and whether the underlying integrals converged.",
        )
        .arg(
            Arg::new("components")
                .value_name("COMPONENTS")
                .num_args(1..)
                .required(true)
                .value_parser(PossibleValuesParser::new(COMPONENT_NAMES))
                .help("Field components to evaluate"),
        )
        .arg(create_point_argument())
        .arg(create_verbose_argument());
    add_evaluator_config_arguments_to_subcommand(add_bunch_arguments_to_subcommand(command))
}

/// Runs the actions for the `evaluate` subcommand using the given arguments.
pub fn run_evaluate_subcommand<W: Write>(arguments: &ArgMatches, output: &mut W) {
    let verbosity = parse_verbosity(arguments, false);
    let evaluator = construct_evaluator_from_arguments(arguments);
    let point = parse_point(arguments, "point");

    let components: Vec<FieldComponent> = arguments
        .get_many::<String>("components")
        .expect("No values for required argument")
        .map(|name| parse_value_string("components", name))
        .collect();

    if verbosity.print_messages() {
        println!(
            "Evaluating {} component(s) at {} for gamma = {:.4}",
            components.len(),
            point,
            evaluator.bunch().gamma()
        );
    }

    for component in components {
        let result = exit_on_error!(
            evaluator.evaluate_at(component, &point),
            "Error: Could not evaluate {0}: {1}",
            component
        );
        if verbosity.print_messages() && !result.is_converged() {
            eprintln!("Warning: {} is flagged as {}", component, result.status());
        }
        exit_on_error!(
            writeln!(output, "{}", result),
            "Error: Could not write result: {}"
        );
    }
}

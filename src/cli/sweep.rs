//! Command line interface for evaluating a field component along an axis.

use super::{
    evaluate::COMPONENT_NAMES,
    utils::{
        add_bunch_arguments_to_subcommand, add_evaluator_config_arguments_to_subcommand,
        construct_evaluator_from_arguments, create_point_argument, create_verbose_argument,
        get_finite_float_values_from_required_parseable_argument,
        get_value_from_required_parseable_argument, parse_point, parse_verbosity,
    },
};
use crate::{
    exit_on_error, exit_on_false,
    field::{ffl, FieldComponent},
    geometry::Dim3,
    sweep::{evaluate_sweep, evaluate_sweep_parallel, Sweep, SweepSample},
};
use clap::{builder::PossibleValuesParser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;

/// Creates a subcommand for evaluating a field component along an axis.
pub fn create_sweep_subcommand() -> Command {
    let command = Command::new("sweep")
        .about("Evaluate a field component at evenly spaced points along an axis")
        .long_about(
            "Evaluate a field component at evenly spaced points along an axis.\n\
             The coordinate range is given in standard deviations of the bunch along\n\
             the axis. Results are printed as CSV with the columns\n\
             coordinate,coordinate_over_sigma,value,status.",
        )
        .arg(
            Arg::new("component")
                .value_name("COMPONENT")
                .required(true)
                .value_parser(PossibleValuesParser::new(COMPONENT_NAMES))
                .help("Field component to evaluate"),
        )
        .arg(
            Arg::new("axis")
                .long("axis")
                .value_name("AXIS")
                .value_parser(PossibleValuesParser::new(["x", "y", "z"]))
                .default_value("y")
                .help("Axis to vary the coordinate along"),
        )
        .arg(
            Arg::new("range")
                .long("range")
                .require_equals(true)
                .value_delimiter(',')
                .value_name("START,STOP")
                .default_value("0,10")
                .help("Coordinate range along the axis in standard deviations"),
        )
        .arg(
            Arg::new("n-points")
                .short('n')
                .long("n-points")
                .value_name("NUMBER")
                .default_value("300")
                .help("Number of points in the sweep"),
        )
        .arg(create_point_argument().help(
            "Coordinates of the observation point [m]; the coordinate along the axis is replaced",
        ))
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .action(ArgAction::SetTrue)
                .help("Evaluate the points one at a time instead of in parallel"),
        )
        .arg(create_verbose_argument())
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .action(ArgAction::SetTrue)
                .help("Show progress bar for the sweep (implies `verbose`)"),
        );

    #[cfg(feature = "json")]
    let command = command.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print each sample as a line of JSON instead of CSV"),
    );

    add_evaluator_config_arguments_to_subcommand(add_bunch_arguments_to_subcommand(command))
}

/// Runs the actions for the `sweep` subcommand using the given arguments.
pub fn run_sweep_subcommand<W: Write>(arguments: &ArgMatches, output: &mut W) {
    let verbosity = parse_verbosity(arguments, true);
    let evaluator = construct_evaluator_from_arguments(arguments);
    let component: FieldComponent = get_value_from_required_parseable_argument(arguments, "component");
    let axis: Dim3 = get_value_from_required_parseable_argument(arguments, "axis");
    let range = get_finite_float_values_from_required_parseable_argument(arguments, "range", 2);
    let n_points: usize = get_value_from_required_parseable_argument(arguments, "n-points");
    let fixed_point = parse_point(arguments, "point");

    exit_on_false!(n_points > 0, "Error: n-points must be larger than zero");

    let sigma = evaluator.bunch().sigmas()[axis.num()];
    let sweep = exit_on_error!(
        Sweep::new(axis, range[0] * sigma, range[1] * sigma, n_points, fixed_point),
        "Error: Invalid sweep: {}"
    );

    if verbosity.print_messages() {
        println!(
            "Evaluating {} at {} points along {} from {:e} m to {:e} m",
            component, n_points, axis, sweep.start, sweep.stop
        );
    }

    let samples = exit_on_error!(
        if arguments.get_flag("sequential") {
            evaluate_sweep(&evaluator, component, &sweep)
        } else {
            evaluate_sweep_parallel(&evaluator, component, &sweep, &verbosity)
        },
        "Error: Could not evaluate sweep: {}"
    );

    if verbosity.print_messages() {
        let n_flagged = samples
            .iter()
            .filter(|sample| !sample.result.is_converged())
            .count();
        if n_flagged > 0 {
            eprintln!("Warning: {} of {} samples are flagged", n_flagged, n_points);
        }
    }

    #[cfg(feature = "json")]
    if arguments.get_flag("json") {
        for sample in &samples {
            let line = exit_on_error!(
                serde_json::to_string(sample),
                "Error: Could not serialize sample: {}"
            );
            exit_on_error!(writeln!(output, "{}", line), "Error: Could not write sample: {}");
        }
        return;
    }

    write_samples_as_csv(output, &samples, sigma);
}

fn write_samples_as_csv<W: Write>(output: &mut W, samples: &[SweepSample], sigma: ffl) {
    exit_on_error!(
        writeln!(output, "coordinate,coordinate_over_sigma,value,status"),
        "Error: Could not write header: {}"
    );
    for sample in samples {
        exit_on_error!(
            writeln!(
                output,
                "{:e},{},{:e},{}",
                sample.coordinate,
                sample.coordinate / sigma,
                sample.result.value(),
                sample.result.status()
            ),
            "Error: Could not write sample: {}"
        );
    }
}

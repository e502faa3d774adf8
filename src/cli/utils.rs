//! Utilities for creating the command line interface.

use crate::{
    bunch::BunchParameters,
    exit_on_error, exit_on_false,
    field::{
        config::{EvaluatorConfig, EzBoundPolicy},
        ffl, FieldEvaluator,
    },
    geometry::Point3,
    io::{Verbosity, DEFAULT_PROGRESS_STYLE},
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::str::FromStr;

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn verify_finite_float_value(argument_name: &str, value: ffl) {
    exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
}

fn verify_argument_value_count<T>(argument_name: &str, values: &[T], required_count: usize) {
    let count = values.len();
    exit_on_false!(
        count == required_count,
        "Error: {} must have {} values, got {}",
        argument_name,
        required_count,
        count
    );
}

pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_string(
        argument_name,
        arguments
            .get_one::<String>(argument_name)
            .expect("No value for required argument"),
    )
}

pub fn get_finite_float_value_from_required_parseable_argument(
    arguments: &ArgMatches,
    argument_name: &str,
) -> ffl {
    let value: ffl = get_value_from_required_parseable_argument(arguments, argument_name);
    verify_finite_float_value(argument_name, value);
    value
}

pub fn get_finite_float_values_from_required_parseable_argument(
    arguments: &ArgMatches,
    argument_name: &str,
    required_count: usize,
) -> Vec<ffl> {
    let values: Vec<ffl> = arguments
        .get_many::<String>(argument_name)
        .expect("No values for required argument")
        .map(|value_string| parse_value_string(argument_name, value_string))
        .collect();
    verify_argument_value_count(argument_name, &values, required_count);
    values
        .iter()
        .for_each(|&value| verify_finite_float_value(argument_name, value));
    values
}

/// Overwrites the given value with the value of the argument if it is present.
pub fn assign_value_from_parseable_argument<T>(
    value: &mut T,
    arguments: &ArgMatches,
    argument_name: &str,
) where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    if let Some(value_string) = arguments.get_one::<String>(argument_name) {
        *value = parse_value_string(argument_name, value_string);
    }
}

pub fn parse_point(arguments: &ArgMatches, argument_name: &str) -> Point3 {
    let coords = get_finite_float_values_from_required_parseable_argument(arguments, argument_name, 3);
    exit_on_error!(
        Point3::new(coords[0], coords[1], coords[2]),
        "Error: Invalid value for {0}: {1}",
        argument_name
    )
}

pub fn parse_verbosity(arguments: &ArgMatches, support_progress: bool) -> Verbosity {
    if support_progress && arguments.get_flag("progress") {
        Verbosity::Progress(DEFAULT_PROGRESS_STYLE.clone())
    } else if arguments.get_flag("verbose") {
        Verbosity::Messages
    } else {
        Verbosity::Quiet
    }
}

pub fn create_point_argument() -> Arg {
    Arg::new("point")
        .long("point")
        .require_equals(true)
        .value_delimiter(',')
        .value_name("X,Y,Z")
        .default_value("0,0,0")
        .help("Coordinates of the observation point in the lab frame [m]")
}

pub fn create_verbose_argument() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue)
        .help("Print status messages and warnings about flagged results")
}

/// Adds arguments for the parameters of the bunch.
pub fn add_bunch_arguments_to_subcommand(command: Command) -> Command {
    command
        .arg(
            Arg::new("energy")
                .long("energy")
                .value_name("VALUE")
                .default_value("0.4e9")
                .help("Energy of the bunch particles [eV]"),
        )
        .arg(
            Arg::new("sigma-x")
                .long("sigma-x")
                .value_name("VALUE")
                .default_value("1e-4")
                .help("Standard deviation of the bunch along x [m]"),
        )
        .arg(
            Arg::new("sigma-y")
                .long("sigma-y")
                .value_name("VALUE")
                .default_value("1e-4")
                .help("Standard deviation of the bunch along y [m]"),
        )
        .arg(
            Arg::new("sigma-z")
                .long("sigma-z")
                .value_name("VALUE")
                .default_value("1e-7")
                .help("Standard deviation of the bunch along z [m]"),
        )
        .arg(
            Arg::new("particle-count")
                .long("particle-count")
                .value_name("NUMBER")
                .default_value("2e4")
                .help("Number of elementary charges in the bunch"),
        )
}

/// Constructs bunch parameters from the bunch arguments.
pub fn construct_bunch_from_arguments(arguments: &ArgMatches) -> BunchParameters {
    let energy = get_finite_float_value_from_required_parseable_argument(arguments, "energy");
    let sigma_x = get_finite_float_value_from_required_parseable_argument(arguments, "sigma-x");
    let sigma_y = get_finite_float_value_from_required_parseable_argument(arguments, "sigma-y");
    let sigma_z = get_finite_float_value_from_required_parseable_argument(arguments, "sigma-z");
    let particle_count =
        get_finite_float_value_from_required_parseable_argument(arguments, "particle-count");
    exit_on_error!(
        BunchParameters::new(energy, sigma_x, sigma_y, sigma_z, particle_count),
        "Error: Invalid bunch parameters: {}"
    )
}

/// Adds arguments for the parameters of the field evaluator.
pub fn add_evaluator_config_arguments_to_subcommand(command: Command) -> Command {
    command
        .arg(
            Arg::new("quadrature-absolute-tolerance")
                .long("quadrature-absolute-tolerance")
                .value_name("VALUE")
                .default_value("1.49e-8")
                .help("Absolute error tolerance for each quadrature"),
        )
        .arg(
            Arg::new("quadrature-relative-tolerance")
                .long("quadrature-relative-tolerance")
                .value_name("VALUE")
                .default_value("1.49e-8")
                .help("Relative error tolerance for each quadrature"),
        )
        .arg(
            Arg::new("max-subdivisions")
                .long("max-subdivisions")
                .value_name("NUMBER")
                .default_value("50")
                .help("Maximum number of sub-intervals in each quadrature"),
        )
        .arg(
            Arg::new("bound-tolerance")
                .long("bound-tolerance")
                .value_name("VALUE")
                .default_value("0.05")
                .help("Largest accepted relative difference between an integral and its comparison"),
        )
        .arg(
            Arg::new("far-threshold")
                .long("far-threshold")
                .value_name("VALUE")
                .default_value("50")
                .help("Distance from the bunch in standard deviations beyond which a coordinate is far"),
        )
        .arg(
            Arg::new("initial-comparison-factor")
                .long("initial-comparison-factor")
                .value_name("VALUE")
                .default_value("10")
                .help("Ratio of comparison bound to integration bound in the first comparison"),
        )
        .arg(
            Arg::new("refinement-comparison-factor")
                .long("refinement-comparison-factor")
                .value_name("VALUE")
                .default_value("5")
                .help("Ratio of comparison bound to integration bound after enlarging the bound"),
        )
        .arg(
            Arg::new("shrink-factor")
                .long("shrink-factor")
                .value_name("VALUE")
                .default_value("5")
                .help("Factor to divide the bound by when the quadrature is unstable"),
        )
        .arg(
            Arg::new("growth-factor")
                .long("growth-factor")
                .value_name("VALUE")
                .default_value("5")
                .help("Factor to multiply the bound by when the comparison disagrees"),
        )
        .arg(
            Arg::new("max-shrink-attempts")
                .long("max-shrink-attempts")
                .value_name("NUMBER")
                .default_value("50")
                .help("Maximum number of bound reductions for a single integral"),
        )
        .arg(
            Arg::new("max-growth-attempts")
                .long("max-growth-attempts")
                .value_name("NUMBER")
                .default_value("50")
                .help("Maximum number of bound enlargements"),
        )
        .arg(
            Arg::new("derivative-step")
                .long("derivative-step")
                .value_name("VALUE")
                .default_value("1e-3")
                .help("Length of the derivative sampling range in standard deviations"),
        )
        .arg(
            Arg::new("derivative-samples")
                .long("derivative-samples")
                .value_name("NUMBER")
                .default_value("10")
                .help("Number of field samples used for each derivative"),
        )
        .arg(
            Arg::new("legacy-ez")
                .long("legacy-ez")
                .action(ArgAction::SetTrue)
                .help("Integrate Ez up to a fixed bound and flag disagreement instead of searching for a bound"),
        )
        .arg(
            Arg::new("fixed-ez-bound-scale")
                .long("fixed-ez-bound-scale")
                .value_name("VALUE")
                .default_value("60")
                .help("Fixed Ez integration bound in units of sigma_z"),
        )
}

/// Sets field evaluator parameters based on present arguments.
pub fn configure_evaluator_from_arguments(config: &mut EvaluatorConfig, arguments: &ArgMatches) {
    assign_value_from_parseable_argument(
        &mut config.quadrature.absolute_tolerance,
        arguments,
        "quadrature-absolute-tolerance",
    );
    assign_value_from_parseable_argument(
        &mut config.quadrature.relative_tolerance,
        arguments,
        "quadrature-relative-tolerance",
    );
    assign_value_from_parseable_argument(
        &mut config.quadrature.max_subdivisions,
        arguments,
        "max-subdivisions",
    );
    assign_value_from_parseable_argument(
        &mut config.bound_search.relative_tolerance,
        arguments,
        "bound-tolerance",
    );
    assign_value_from_parseable_argument(
        &mut config.bound_search.far_threshold,
        arguments,
        "far-threshold",
    );
    assign_value_from_parseable_argument(
        &mut config.bound_search.initial_comparison_factor,
        arguments,
        "initial-comparison-factor",
    );
    assign_value_from_parseable_argument(
        &mut config.bound_search.refinement_comparison_factor,
        arguments,
        "refinement-comparison-factor",
    );
    assign_value_from_parseable_argument(
        &mut config.bound_search.shrink_factor,
        arguments,
        "shrink-factor",
    );
    assign_value_from_parseable_argument(
        &mut config.bound_search.growth_factor,
        arguments,
        "growth-factor",
    );
    assign_value_from_parseable_argument(
        &mut config.bound_search.max_shrink_attempts,
        arguments,
        "max-shrink-attempts",
    );
    assign_value_from_parseable_argument(
        &mut config.bound_search.max_growth_attempts,
        arguments,
        "max-growth-attempts",
    );
    assign_value_from_parseable_argument(
        &mut config.derivative.relative_step,
        arguments,
        "derivative-step",
    );
    assign_value_from_parseable_argument(
        &mut config.derivative.n_samples,
        arguments,
        "derivative-samples",
    );
    if arguments.get_flag("legacy-ez") {
        config.ez_bound_policy = EzBoundPolicy::Fixed;
    }
    assign_value_from_parseable_argument(
        &mut config.fixed_ez_bound_scale,
        arguments,
        "fixed-ez-bound-scale",
    );
}

/// Constructs a field evaluator from the bunch and evaluator arguments.
pub fn construct_evaluator_from_arguments(arguments: &ArgMatches) -> FieldEvaluator {
    let bunch = construct_bunch_from_arguments(arguments);
    let mut config = EvaluatorConfig::default();
    configure_evaluator_from_arguments(&mut config, arguments);
    exit_on_error!(
        FieldEvaluator::new(bunch, config),
        "Error: Invalid evaluator configuration: {}"
    )
}

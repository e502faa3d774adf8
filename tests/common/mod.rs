#![allow(dead_code)]

use bunchfield::{
    bunch::BunchParameters,
    field::{config::EvaluatorConfig, ffl, FieldEvaluator},
};

pub const ENERGY: ffl = 0.4e9;
pub const SIGMA_X: ffl = 1e-4;
pub const SIGMA_Y: ffl = 1e-4;
pub const SIGMA_Z: ffl = 1e-7;
pub const PARTICLE_COUNT: ffl = 2e4;

/// Bunch with the parameters of the reference profile: 0.4 GeV electrons in a
/// bunch that is round in the transverse plane and short along z.
pub fn reference_bunch() -> BunchParameters {
    BunchParameters::new(ENERGY, SIGMA_X, SIGMA_Y, SIGMA_Z, PARTICLE_COUNT).unwrap()
}

pub fn reference_evaluator() -> FieldEvaluator {
    FieldEvaluator::with_default_config(reference_bunch())
}

pub fn reference_evaluator_with(config: EvaluatorConfig) -> FieldEvaluator {
    FieldEvaluator::new(reference_bunch(), config).unwrap()
}

#[cfg(feature = "cli")]
pub fn run<I, T>(args: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let command = bunchfield::cli::build::build().no_binary_name(true);
    let mut output = Vec::new();
    bunchfield::cli::run::run_with_args(command.get_matches_from(args), &mut output);
    String::from_utf8(output).unwrap()
}

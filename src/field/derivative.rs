//! Finite-difference derivatives of the electric field.

use super::{ffl, FieldComponent, FieldEvaluator, FieldResult, FieldStatus};
use crate::{
    error::FieldError,
    geometry::{Dim3, Point3},
    math::linspace,
};

/// Estimates the derivative of the electric field component along `dim`,
/// taken along the same dimension, at the given point.
///
/// The field is sampled at evenly spaced coordinates from the point and a
/// small fraction of the bunch width forward, and the difference quotients
/// of consecutive samples are averaged. The status of the result is the most
/// severe status among the samples.
///
/// # Errors
///
/// Any error from evaluating a field sample is returned as is. Returns
/// `FieldError::InvalidParameter` if the coordinate is so large that the
/// samples cannot be told apart.
pub fn electric_field_derivative(
    evaluator: &FieldEvaluator,
    dim: Dim3,
    point: &Point3,
) -> Result<FieldResult, FieldError> {
    let config = &evaluator.config().derivative;
    let start = point[dim];
    let stop = start + config.relative_step * evaluator.bunch().sigmas()[dim.num()];
    let coords = linspace(start, stop, config.n_samples);

    if coords.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(FieldError::InvalidParameter {
            name: "coordinate",
            value: start,
            reason: "too large for the derivative step to resolve",
        });
    }

    let samples = coords
        .iter()
        .map(|&coord| evaluator.electric_field(dim, &point.with_coord(dim, coord)))
        .collect::<Result<Vec<_>, _>>()?;

    let status = samples
        .iter()
        .fold(FieldStatus::Converged, |status, sample| {
            status.most_severe(sample.status())
        });

    let summed_quotients: ffl = coords
        .windows(2)
        .zip(samples.windows(2))
        .map(|(coord_pair, sample_pair)| {
            (sample_pair[1].value() - sample_pair[0].value()) / (coord_pair[1] - coord_pair[0])
        })
        .sum();
    let derivative = summed_quotients / ((coords.len() - 1) as ffl);

    Ok(FieldResult::new(
        FieldComponent::electric_derivative(dim),
        derivative,
        status,
    ))
}

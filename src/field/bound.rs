//! Selection of the upper bound for the field integrals.
//!
//! The effective support of an integrand grows with the distance of the
//! observation point from the bunch, so a fixed bound either truncates the
//! tail or makes the quadrature unstable. The bound is therefore searched for
//! by shrinking it whenever the quadrature reports a warning and enlarging it
//! until a comparison integral with a larger bound agrees.

use super::{
    config::BoundSearchConfig,
    ffl, FieldStatus,
};
use crate::{
    error::FieldError,
    geometry::{
        Dim3::{self, X, Y, Z},
        Point3,
    },
    math::{integrate_adaptive, QuadratureConfig, QuadratureEstimate},
};

/// An integral accepted by the bound search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcceptedIntegral {
    /// Value of the integral from zero to the accepted bound.
    pub value: ffl,
    /// The accepted upper bound.
    pub bound: ffl,
    /// How much the value can be trusted.
    pub status: FieldStatus,
}

/// Outcome of comparing a primary integral with an integral over a larger range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Assessment {
    Accepted(FieldStatus),
    Rejected { relative_difference: ffl },
}

/// Estimates a suitable upper integration bound from how far the observation
/// point is from the bunch center along each axis.
pub fn initial_bound(point: &Point3, sigmas: [ffl; 3], far_threshold: ffl) -> ffl {
    let is_far = |dim: Dim3| ffl::abs(point[dim]) / sigmas[dim.num()] > far_threshold;
    let (abs_x, abs_y, abs_z) = (
        ffl::abs(point[X]),
        ffl::abs(point[Y]),
        ffl::abs(point[Z]),
    );
    let with_far_z = |transverse: ffl| {
        let scaled_transverse = 1000.0 * transverse;
        let scaled_z = 1000.0 * abs_z;
        scaled_transverse * scaled_transverse * scaled_z * scaled_z
    };

    match (is_far(X), is_far(Y), is_far(Z)) {
        (false, false, _) => ffl::min(
            1000.0 * sigmas[0] * sigmas[0],
            1000.0 * sigmas[1] * sigmas[1],
        ),
        (true, false, false) => 40.0 * abs_x,
        (false, true, false) => 40.0 * abs_y,
        (true, true, false) => 40.0 * ffl::max(abs_x, abs_y),
        (true, false, true) => with_far_z(abs_x),
        (false, true, true) => with_far_z(abs_y),
        (true, true, true) => with_far_z(ffl::max(abs_x, abs_y)),
    }
}

/// Compares a primary integral with a comparison integral over a larger range.
///
/// An exactly zero primary value is accepted but flagged, since the relative
/// difference is undefined, unless `zero_is_exact` says the integrand vanishes
/// identically. Matching zeros are flagged too, as both integrals may have
/// underflowed.
pub fn assess(
    primary: ffl,
    comparison: ffl,
    relative_tolerance: ffl,
    zero_is_exact: bool,
) -> Assessment {
    if primary == 0.0 {
        return Assessment::Accepted(if zero_is_exact {
            FieldStatus::Converged
        } else {
            FieldStatus::LowConfidenceZero
        });
    }
    if comparison == primary {
        return Assessment::Accepted(FieldStatus::Converged);
    }
    let relative_difference = ffl::abs(primary - comparison) / ffl::abs(primary);
    if relative_difference <= relative_tolerance {
        Assessment::Accepted(FieldStatus::Converged)
    } else {
        Assessment::Rejected {
            relative_difference,
        }
    }
}

/// Integrates from zero to `bound`, dividing the bound by the shrink factor
/// for as long as the quadrature reports a warning.
///
/// Returns the reliable estimate together with the bound that produced it.
pub fn integrate_with_shrinking_bound<E>(
    evaluate_integrand: &E,
    bound: ffl,
    quadrature_config: &QuadratureConfig,
    search_config: &BoundSearchConfig,
) -> Result<(QuadratureEstimate, ffl), FieldError>
where
    E: Fn(ffl) -> ffl,
{
    let mut bound = bound;
    let mut n_reductions = 0;
    loop {
        let estimate = integrate_adaptive(evaluate_integrand, 0.0, bound, quadrature_config)?;
        if estimate.is_reliable() {
            return Ok((estimate, bound));
        }
        if n_reductions == search_config.max_shrink_attempts {
            return Err(FieldError::IntegrationUnstable {
                bound,
                attempts: n_reductions,
            });
        }
        bound /= search_config.shrink_factor;
        n_reductions += 1;
    }
}

/// Searches for an upper bound where the integral from zero agrees with the
/// integral over a larger range, starting from `initial_bound`.
///
/// `zero_is_exact` tells whether the integrand is known to vanish everywhere,
/// in which case a zero integral is trusted.
///
/// # Errors
///
/// `IntegrationUnstable` if the quadrature keeps warning after the maximum
/// number of bound reductions, and `IntegrationDivergent` if the comparison
/// still disagrees after the maximum number of bound enlargements.
pub fn search_bound<E>(
    evaluate_integrand: &E,
    initial_bound: ffl,
    quadrature_config: &QuadratureConfig,
    search_config: &BoundSearchConfig,
    zero_is_exact: bool,
) -> Result<AcceptedIntegral, FieldError>
where
    E: Fn(ffl) -> ffl,
{
    let mut bound = initial_bound;
    let mut comparison_factor = search_config.initial_comparison_factor;
    let mut n_enlargements = 0;
    loop {
        let (primary, primary_bound) = integrate_with_shrinking_bound(
            evaluate_integrand,
            bound,
            quadrature_config,
            search_config,
        )?;
        bound = primary_bound;

        let (comparison, _) = integrate_with_shrinking_bound(
            evaluate_integrand,
            comparison_factor * bound,
            quadrature_config,
            search_config,
        )?;

        match assess(
            primary.value,
            comparison.value,
            search_config.relative_tolerance,
            zero_is_exact,
        ) {
            Assessment::Accepted(status) => {
                return Ok(AcceptedIntegral {
                    value: primary.value,
                    bound,
                    status,
                })
            }
            Assessment::Rejected {
                relative_difference,
            } => {
                if n_enlargements == search_config.max_growth_attempts {
                    return Err(FieldError::IntegrationDivergent {
                        bound,
                        attempts: n_enlargements,
                        relative_difference,
                    });
                }
            }
        }

        bound *= search_config.growth_factor;
        comparison_factor = search_config.refinement_comparison_factor;
        n_enlargements += 1;
    }
}

/// Integrates from zero to a fixed bound and checks the result once against
/// the integral up to `comparison_factor` times the bound.
///
/// Disagreement is not retried but reported through
/// `FieldStatus::BoundTooSmall`. Any quadrature warning is fatal.
pub fn integrate_with_fixed_bound<E>(
    evaluate_integrand: &E,
    bound: ffl,
    comparison_factor: ffl,
    quadrature_config: &QuadratureConfig,
    relative_tolerance: ffl,
    zero_is_exact: bool,
) -> Result<AcceptedIntegral, FieldError>
where
    E: Fn(ffl) -> ffl,
{
    let integrate_reliably = |bound: ffl| -> Result<ffl, FieldError> {
        let estimate = integrate_adaptive(evaluate_integrand, 0.0, bound, quadrature_config)?;
        if estimate.is_reliable() {
            Ok(estimate.value)
        } else {
            Err(FieldError::IntegrationUnstable { bound, attempts: 0 })
        }
    };

    let primary = integrate_reliably(bound)?;
    let comparison = integrate_reliably(comparison_factor * bound)?;

    let status = match assess(primary, comparison, relative_tolerance, zero_is_exact) {
        Assessment::Accepted(status) => status,
        Assessment::Rejected {
            relative_difference,
        } => FieldStatus::BoundTooSmall {
            relative_difference,
        },
    };
    Ok(AcceptedIntegral {
        value: primary,
        bound,
        status,
    })
}

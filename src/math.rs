//! Math utilities.

use crate::error::FieldError;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Floating-point precision to use for integration.
#[allow(non_camel_case_types)]
pub type fin = f64;

/// Number of integrand evaluations used by one application of the
/// 21-point Gauss-Kronrod rule.
pub const KRONROD_21_EVALUATIONS: usize = 21;

/// Abscissae of the 21-point Kronrod rule on [-1, 1] (non-negative half).
/// Odd indices are the abscissae of the embedded 10-point Gauss rule.
const KRONROD_21_COORDS: [fin; 11] = [
    0.995_657_163_025_808_080_735_527_280_689_003,
    0.973_906_528_517_171_720_077_964_012_084_452,
    0.930_157_491_355_708_226_001_207_180_059_508,
    0.865_063_366_688_984_510_732_096_688_423_493,
    0.780_817_726_586_416_897_063_717_578_345_042,
    0.679_409_568_299_024_406_234_327_365_114_874,
    0.562_757_134_668_604_683_339_000_099_272_694,
    0.433_395_394_129_247_190_799_265_943_165_784,
    0.294_392_862_701_460_198_131_126_603_103_866,
    0.148_874_338_981_631_210_884_826_001_129_720,
    0.0,
];

/// Weights of the 21-point Kronrod rule, matching `KRONROD_21_COORDS`.
const KRONROD_21_WEIGHTS: [fin; 11] = [
    0.011_694_638_867_371_874_278_064_396_062_192,
    0.032_558_162_307_964_727_478_818_972_459_390,
    0.054_755_896_574_351_996_031_381_300_244_580,
    0.075_039_674_810_919_952_767_043_140_916_190,
    0.093_125_454_583_697_605_535_065_465_083_366,
    0.109_387_158_802_297_641_899_210_590_325_805,
    0.123_491_976_262_065_851_077_208_980_957_809,
    0.134_709_217_311_473_325_928_054_001_771_707,
    0.142_775_938_577_060_080_797_094_273_138_717,
    0.147_739_104_901_338_491_374_841_515_972_068,
    0.149_445_554_002_916_905_664_936_468_389_821,
];

/// Weights of the embedded 10-point Gauss rule, for the odd-indexed
/// abscissae in `KRONROD_21_COORDS`.
const GAUSS_10_WEIGHTS: [fin; 5] = [
    0.066_671_344_308_688_137_593_568_809_893_332,
    0.149_451_349_150_580_593_145_776_339_657_697,
    0.219_086_362_515_982_043_995_534_934_228_163,
    0.269_266_719_309_996_355_091_226_921_569_469,
    0.295_524_224_714_752_870_173_892_994_651_338,
];

/// Configuration parameters for adaptive quadrature.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadratureConfig {
    /// Absolute error tolerance for the integral.
    pub absolute_tolerance: fin,
    /// Relative error tolerance for the integral.
    pub relative_tolerance: fin,
    /// Maximum number of sub-intervals the integration interval may be split into.
    pub max_subdivisions: usize,
}

impl QuadratureConfig {
    pub const DEFAULT_ABSOLUTE_TOLERANCE: fin = 1.49e-8;
    pub const DEFAULT_RELATIVE_TOLERANCE: fin = 1.49e-8;
    pub const DEFAULT_MAX_SUBDIVISIONS: usize = 50;

    /// Checks that all parameters are in their valid ranges.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.absolute_tolerance >= 0.0) {
            return Err(FieldError::InvalidConfig(
                "Absolute quadrature tolerance must be larger than or equal to zero.".to_string(),
            ));
        }
        if !(self.relative_tolerance >= 0.0) {
            return Err(FieldError::InvalidConfig(
                "Relative quadrature tolerance must be larger than or equal to zero.".to_string(),
            ));
        }
        if self.absolute_tolerance == 0.0 && self.relative_tolerance == 0.0 {
            return Err(FieldError::InvalidConfig(
                "At least one of the quadrature tolerances must be larger than zero.".to_string(),
            ));
        }
        if self.max_subdivisions == 0 {
            return Err(FieldError::InvalidConfig(
                "Maximum number of quadrature subdivisions must be larger than zero.".to_string(),
            ));
        }
        Ok(())
    }

    fn error_bound(&self, value: fin) -> fin {
        fin::max(
            self.absolute_tolerance,
            self.relative_tolerance * fin::abs(value),
        )
    }
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        QuadratureConfig {
            absolute_tolerance: Self::DEFAULT_ABSOLUTE_TOLERANCE,
            relative_tolerance: Self::DEFAULT_RELATIVE_TOLERANCE,
            max_subdivisions: Self::DEFAULT_MAX_SUBDIVISIONS,
        }
    }
}

/// Reason why an adaptive quadrature estimate may not be trustworthy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum QuadratureWarning {
    /// The maximum number of subdivisions was reached before the tolerance was met.
    SubdivisionLimit,
    /// Round-off error prevents the requested tolerance from being reached.
    RoundOff,
    /// A sub-interval became too small to be split further.
    BadIntegrandBehavior,
}

impl fmt::Display for QuadratureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::SubdivisionLimit => "maximum number of subdivisions reached",
                Self::RoundOff => "round-off error detected",
                Self::BadIntegrandBehavior => "bad integrand behavior",
            }
        )
    }
}

/// Hard failures of the quadrature primitive.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum QuadratureError {
    #[error("invalid integration interval [{start:e}, {end:e}]")]
    InvalidInterval { start: fin, end: fin },
    #[error("integrand is not finite at {at:e}")]
    NonFiniteIntegrand { at: fin },
}

/// Result of an adaptive quadrature.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadratureEstimate {
    /// Estimated value of the integral.
    pub value: fin,
    /// Estimated absolute error of `value`.
    pub abs_error: fin,
    /// Number of integrand evaluations performed.
    pub n_evaluations: usize,
    /// Number of sub-intervals the interval ended up split into.
    pub n_subdivisions: usize,
    /// Set if the estimate did not satisfy the requested tolerance.
    pub warning: Option<QuadratureWarning>,
}

impl QuadratureEstimate {
    /// Whether the estimate was obtained without any warning.
    pub fn is_reliable(&self) -> bool {
        self.warning.is_none()
    }
}

/// Result of a single application of the 21-point Gauss-Kronrod rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KronrodEstimate {
    /// Kronrod approximation of the integral.
    pub value: fin,
    /// Estimated absolute error of `value`.
    pub abs_error: fin,
    /// Approximation of the integral of the absolute integrand.
    pub abs_integral: fin,
    /// Approximation of the integral of the absolute deviation of the
    /// integrand from its mean over the interval.
    pub abs_deviation: fin,
}

/// Estimates the integral of the given function over the given interval using a
/// 21-point Gauss-Kronrod rule, with the difference to the embedded 10-point
/// Gauss rule as error estimate.
pub fn integrate_21_point_gauss_kronrod<E>(
    evaluate_integrand: E,
    start: fin,
    end: fin,
) -> Result<KronrodEstimate, QuadratureError>
where
    E: Fn(fin) -> fin,
{
    let interval_scale = 0.5 * (end - start);
    let interval_offset = 0.5 * (end + start);

    let evaluate = |coord: fin| {
        let value = evaluate_integrand(coord);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(QuadratureError::NonFiniteIntegrand { at: coord })
        }
    };

    let mut lower_values = [0.0; 10];
    let mut upper_values = [0.0; 10];

    let center_value = evaluate(interval_offset)?;
    let mut gauss_sum = 0.0;
    let mut kronrod_sum = KRONROD_21_WEIGHTS[10] * center_value;
    let mut abs_sum = fin::abs(kronrod_sum);

    for (idx, &coord) in KRONROD_21_COORDS[..10].iter().enumerate() {
        let offset = interval_scale * coord;
        let lower_value = evaluate(interval_offset - offset)?;
        let upper_value = evaluate(interval_offset + offset)?;
        lower_values[idx] = lower_value;
        upper_values[idx] = upper_value;

        let weight = KRONROD_21_WEIGHTS[idx];
        kronrod_sum += weight * (lower_value + upper_value);
        abs_sum += weight * (fin::abs(lower_value) + fin::abs(upper_value));
        if idx % 2 == 1 {
            gauss_sum += GAUSS_10_WEIGHTS[idx / 2] * (lower_value + upper_value);
        }
    }

    let mean = 0.5 * kronrod_sum;
    let deviation_sum = KRONROD_21_WEIGHTS[10] * fin::abs(center_value - mean)
        + lower_values
            .iter()
            .zip(upper_values.iter())
            .zip(KRONROD_21_WEIGHTS[..10].iter())
            .map(|((lower_value, upper_value), weight)| {
                weight * (fin::abs(lower_value - mean) + fin::abs(upper_value - mean))
            })
            .sum::<fin>();

    let abs_scale = fin::abs(interval_scale);
    let value = kronrod_sum * interval_scale;
    let abs_integral = abs_sum * abs_scale;
    let abs_deviation = deviation_sum * abs_scale;

    let mut abs_error = fin::abs((kronrod_sum - gauss_sum) * interval_scale);
    if abs_deviation != 0.0 && abs_error != 0.0 {
        abs_error = abs_deviation * fin::min(1.0, fin::powf(200.0 * abs_error / abs_deviation, 1.5));
    }
    if abs_integral > fin::MIN_POSITIVE / (50.0 * fin::EPSILON) {
        abs_error = fin::max(50.0 * fin::EPSILON * abs_integral, abs_error);
    }

    Ok(KronrodEstimate {
        value,
        abs_error,
        abs_integral,
        abs_deviation,
    })
}

#[derive(Clone, Copy, Debug)]
struct SubInterval {
    start: fin,
    end: fin,
    value: fin,
    abs_error: fin,
}

/// Estimates the integral of the given function over the given interval by
/// globally adaptive bisection with the 21-point Gauss-Kronrod rule.
///
/// The sub-interval with the largest error estimate is bisected until the total
/// error estimate satisfies the tolerances in `config`. If that does not happen,
/// the best available estimate is returned with a `QuadratureWarning` describing
/// why. Non-finite limits and integrand values are hard errors.
pub fn integrate_adaptive<E>(
    evaluate_integrand: E,
    start: fin,
    end: fin,
    config: &QuadratureConfig,
) -> Result<QuadratureEstimate, QuadratureError>
where
    E: Fn(fin) -> fin,
{
    if !start.is_finite() || !end.is_finite() || end < start {
        return Err(QuadratureError::InvalidInterval { start, end });
    }

    let initial = integrate_21_point_gauss_kronrod(&evaluate_integrand, start, end)?;
    let mut n_evaluations = KRONROD_21_EVALUATIONS;

    let error_bound = config.error_bound(initial.value);
    if initial.abs_error <= 50.0 * fin::EPSILON * initial.abs_integral
        && initial.abs_error > error_bound
    {
        return Ok(QuadratureEstimate {
            value: initial.value,
            abs_error: initial.abs_error,
            n_evaluations,
            n_subdivisions: 1,
            warning: Some(QuadratureWarning::RoundOff),
        });
    }
    if (initial.abs_error <= error_bound && initial.abs_error != initial.abs_integral)
        || initial.abs_error == 0.0
    {
        return Ok(QuadratureEstimate {
            value: initial.value,
            abs_error: initial.abs_error,
            n_evaluations,
            n_subdivisions: 1,
            warning: None,
        });
    }
    if config.max_subdivisions == 1 {
        return Ok(QuadratureEstimate {
            value: initial.value,
            abs_error: initial.abs_error,
            n_evaluations,
            n_subdivisions: 1,
            warning: Some(QuadratureWarning::SubdivisionLimit),
        });
    }

    let mut intervals = Vec::with_capacity(config.max_subdivisions);
    intervals.push(SubInterval {
        start,
        end,
        value: initial.value,
        abs_error: initial.abs_error,
    });

    let mut total_value = initial.value;
    let mut total_error = initial.abs_error;
    let mut n_stagnant_bisections = 0;
    let mut n_worsening_bisections = 0;
    let mut warning = None;

    loop {
        let worst_idx = intervals
            .iter()
            .enumerate()
            .fold(0, |worst_idx, (idx, interval)| {
                if interval.abs_error > intervals[worst_idx].abs_error {
                    idx
                } else {
                    worst_idx
                }
            });
        let worst = intervals.swap_remove(worst_idx);

        let midpoint = 0.5 * (worst.start + worst.end);
        let lower = integrate_21_point_gauss_kronrod(&evaluate_integrand, worst.start, midpoint)?;
        let upper = integrate_21_point_gauss_kronrod(&evaluate_integrand, midpoint, worst.end)?;
        n_evaluations += 2 * KRONROD_21_EVALUATIONS;

        let combined_value = lower.value + upper.value;
        let combined_error = lower.abs_error + upper.abs_error;
        total_value += combined_value - worst.value;
        total_error += combined_error - worst.abs_error;

        if lower.abs_deviation != lower.abs_error && upper.abs_deviation != upper.abs_error {
            if fin::abs(worst.value - combined_value) <= 1e-5 * fin::abs(combined_value)
                && combined_error >= 0.99 * worst.abs_error
            {
                n_stagnant_bisections += 1;
            }
            if intervals.len() + 2 > 10 && combined_error > worst.abs_error {
                n_worsening_bisections += 1;
            }
        }

        intervals.push(SubInterval {
            start: worst.start,
            end: midpoint,
            value: lower.value,
            abs_error: lower.abs_error,
        });
        intervals.push(SubInterval {
            start: midpoint,
            end: worst.end,
            value: upper.value,
            abs_error: upper.abs_error,
        });

        if total_error <= config.error_bound(total_value) {
            break;
        }
        if n_stagnant_bisections >= 6 || n_worsening_bisections >= 20 {
            warning = Some(QuadratureWarning::RoundOff);
            break;
        }
        if intervals.len() >= config.max_subdivisions {
            warning = Some(QuadratureWarning::SubdivisionLimit);
            break;
        }
        if fin::max(fin::abs(worst.start), fin::abs(worst.end))
            <= (1.0 + 100.0 * fin::EPSILON) * (fin::abs(midpoint) + 1000.0 * fin::MIN_POSITIVE)
        {
            warning = Some(QuadratureWarning::BadIntegrandBehavior);
            break;
        }
    }

    // Resum to avoid accumulated cancellation in the running totals
    let value = intervals.iter().map(|interval| interval.value).sum();
    let abs_error = intervals.iter().map(|interval| interval.abs_error).sum();

    Ok(QuadratureEstimate {
        value,
        abs_error,
        n_evaluations,
        n_subdivisions: intervals.len(),
        warning,
    })
}

/// Returns `n_values` evenly spaced values from `start` to `stop`, both included.
///
/// The last value is set to exactly `stop`.
pub fn linspace(start: fin, stop: fin, n_values: usize) -> Vec<fin> {
    match n_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / ((n_values - 1) as fin);
            let mut values: Vec<fin> = (0..n_values)
                .map(|idx| start + (idx as fin) * step)
                .collect();
            values[n_values - 1] = stop;
            values
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kronrod_rule_is_exact_for_polynomials() {
        let estimate =
            integrate_21_point_gauss_kronrod(|x| 3.0 * x * x - 2.0 * x + 1.0, -1.0, 2.0).unwrap();
        // x^3 - x^2 + x from -1 to 2
        assert_relative_eq!(estimate.value, 9.0, max_relative = 1e-14);
        assert!(estimate.abs_error < 1e-10);
    }

    #[test]
    fn adaptive_quadrature_integrates_gaussian() {
        let estimate = integrate_adaptive(
            |x| fin::exp(-x * x),
            0.0,
            10.0,
            &QuadratureConfig::default(),
        )
        .unwrap();
        assert!(estimate.is_reliable());
        assert_relative_eq!(
            estimate.value,
            0.5 * crate::constants::SQRT_PI,
            max_relative = 1e-10
        );
    }

    #[test]
    fn adaptive_quadrature_handles_sharply_peaked_integrand() {
        // Integrand with support concentrated near zero, like the field kernels
        let scale = 1e-8;
        let estimate = integrate_adaptive(
            |q| fin::powf(q + scale, -1.5),
            0.0,
            1e-4,
            &QuadratureConfig::default(),
        )
        .unwrap();
        let exact = 2.0 * (fin::powf(scale, -0.5) - fin::powf(1e-4 + scale, -0.5));
        assert!(estimate.is_reliable());
        assert_relative_eq!(estimate.value, exact, max_relative = 1e-7);
    }

    #[test]
    fn zero_integrand_converges_immediately() {
        let estimate = integrate_adaptive(|_| 0.0, 0.0, 1.0, &QuadratureConfig::default()).unwrap();
        assert_eq!(estimate.value, 0.0);
        assert_eq!(estimate.n_subdivisions, 1);
        assert!(estimate.is_reliable());
    }

    #[test]
    fn subdivision_limit_is_reported_as_warning() {
        let config = QuadratureConfig {
            max_subdivisions: 2,
            ..QuadratureConfig::default()
        };
        let estimate = integrate_adaptive(|q| fin::powf(q + 1e-12, -0.9), 0.0, 1.0, &config).unwrap();
        assert_eq!(estimate.warning, Some(QuadratureWarning::SubdivisionLimit));
        assert!(estimate.value.is_finite());
    }

    #[test]
    fn invalid_interval_is_an_error() {
        let result = integrate_adaptive(|x| x, 1.0, 0.0, &QuadratureConfig::default());
        assert!(matches!(
            result,
            Err(QuadratureError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn non_finite_integrand_is_an_error() {
        let result = integrate_adaptive(
            |x| if x > 0.5 { fin::NAN } else { x },
            0.0,
            1.0,
            &QuadratureConfig::default(),
        );
        assert!(matches!(
            result,
            Err(QuadratureError::NonFiniteIntegrand { .. })
        ));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(QuadratureConfig::default().validate().is_ok());
        let config = QuadratureConfig {
            max_subdivisions: 0,
            ..QuadratureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn linspace_includes_both_ends() {
        let values = linspace(-1.0, 2.0, 4);
        assert_eq!(values, vec![-1.0, 0.0, 1.0, 2.0]);
        let values = linspace(0.0, 0.1, 7);
        assert_eq!(values.len(), 7);
        assert_eq!(values[6], 0.1);
        assert!(values.windows(2).all(|pair| pair[1] > pair[0]));
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(3.0, 4.0, 0).is_empty());
    }
}

//! Configuration parameters for field evaluation.

use super::ffl;
use crate::{error::FieldError, math::QuadratureConfig};
use std::{fmt, str::FromStr};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for the adaptive search for an upper integration bound.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct BoundSearchConfig {
    /// Largest accepted relative difference between the primary and comparison integrals.
    pub relative_tolerance: ffl,
    /// Displacement from the bunch center, in standard deviations, beyond which
    /// a coordinate is considered far from the bunch.
    pub far_threshold: ffl,
    /// Ratio of the comparison bound to the primary bound for the first comparison.
    pub initial_comparison_factor: ffl,
    /// Ratio of the comparison bound to the primary bound after the bound has been enlarged.
    pub refinement_comparison_factor: ffl,
    /// Factor to divide the bound by when the quadrature reports a warning.
    pub shrink_factor: ffl,
    /// Factor to multiply the bound by when the comparison integral disagrees.
    pub growth_factor: ffl,
    /// Maximum number of bound reductions for a single integral.
    pub max_shrink_attempts: u32,
    /// Maximum number of bound enlargements.
    pub max_growth_attempts: u32,
}

impl BoundSearchConfig {
    pub const DEFAULT_RELATIVE_TOLERANCE: ffl = 0.05;
    pub const DEFAULT_FAR_THRESHOLD: ffl = 50.0;
    pub const DEFAULT_INITIAL_COMPARISON_FACTOR: ffl = 10.0;
    pub const DEFAULT_REFINEMENT_COMPARISON_FACTOR: ffl = 5.0;
    pub const DEFAULT_SHRINK_FACTOR: ffl = 5.0;
    pub const DEFAULT_GROWTH_FACTOR: ffl = 5.0;
    pub const DEFAULT_MAX_SHRINK_ATTEMPTS: u32 = 50;
    pub const DEFAULT_MAX_GROWTH_ATTEMPTS: u32 = 50;

    /// Checks that all parameters are in their valid ranges.
    pub fn validate(&self) -> Result<(), FieldError> {
        let require = |valid: bool, message: &str| {
            if valid {
                Ok(())
            } else {
                Err(FieldError::InvalidConfig(message.to_string()))
            }
        };
        require(
            self.relative_tolerance > 0.0 && self.relative_tolerance.is_finite(),
            "Relative bound search tolerance must be larger than zero.",
        )?;
        require(
            self.far_threshold > 0.0 && self.far_threshold.is_finite(),
            "Far threshold must be larger than zero.",
        )?;
        require(
            self.initial_comparison_factor > 1.0 && self.initial_comparison_factor.is_finite(),
            "Initial comparison factor must be larger than one.",
        )?;
        require(
            self.refinement_comparison_factor > 1.0
                && self.refinement_comparison_factor.is_finite(),
            "Refinement comparison factor must be larger than one.",
        )?;
        require(
            self.shrink_factor > 1.0 && self.shrink_factor.is_finite(),
            "Bound shrink factor must be larger than one.",
        )?;
        require(
            self.growth_factor > 1.0 && self.growth_factor.is_finite(),
            "Bound growth factor must be larger than one.",
        )?;
        require(
            self.max_shrink_attempts > 0,
            "Maximum number of bound reductions must be larger than zero.",
        )?;
        require(
            self.max_growth_attempts > 0,
            "Maximum number of bound enlargements must be larger than zero.",
        )
    }
}

impl Default for BoundSearchConfig {
    fn default() -> Self {
        BoundSearchConfig {
            relative_tolerance: Self::DEFAULT_RELATIVE_TOLERANCE,
            far_threshold: Self::DEFAULT_FAR_THRESHOLD,
            initial_comparison_factor: Self::DEFAULT_INITIAL_COMPARISON_FACTOR,
            refinement_comparison_factor: Self::DEFAULT_REFINEMENT_COMPARISON_FACTOR,
            shrink_factor: Self::DEFAULT_SHRINK_FACTOR,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
            max_shrink_attempts: Self::DEFAULT_MAX_SHRINK_ATTEMPTS,
            max_growth_attempts: Self::DEFAULT_MAX_GROWTH_ATTEMPTS,
        }
    }
}

/// Configuration parameters for finite-difference field derivatives.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct DerivativeConfig {
    /// Length of the sampled coordinate range in units of the bunch standard
    /// deviation along the differentiation axis.
    pub relative_step: ffl,
    /// Number of evenly spaced field samples over the coordinate range.
    pub n_samples: usize,
}

impl DerivativeConfig {
    pub const DEFAULT_RELATIVE_STEP: ffl = 1e-3;
    pub const DEFAULT_N_SAMPLES: usize = 10;

    /// Checks that all parameters are in their valid ranges.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.relative_step > 0.0 && self.relative_step.is_finite()) {
            return Err(FieldError::InvalidConfig(
                "Relative derivative step must be larger than zero.".to_string(),
            ));
        }
        if self.n_samples < 2 {
            return Err(FieldError::InvalidConfig(
                "Number of derivative samples must be at least two.".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        DerivativeConfig {
            relative_step: Self::DEFAULT_RELATIVE_STEP,
            n_samples: Self::DEFAULT_N_SAMPLES,
        }
    }
}

/// How the upper integration bound for the z-component is determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum EzBoundPolicy {
    /// Same adaptive bound search as for the transverse components.
    Adaptive,
    /// Fixed bound proportional to `sigma_z`, checked once against a larger
    /// bound. Disagreement is flagged on the result instead of retried.
    Fixed,
}

impl fmt::Display for EzBoundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Adaptive => "adaptive",
                Self::Fixed => "fixed",
            }
        )
    }
}

impl FromStr for EzBoundPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adaptive" => Ok(Self::Adaptive),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!("unknown Ez bound policy {}", other)),
        }
    }
}

/// Complete set of configuration parameters for a field evaluator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct EvaluatorConfig {
    pub quadrature: QuadratureConfig,
    pub bound_search: BoundSearchConfig,
    pub derivative: DerivativeConfig,
    pub ez_bound_policy: EzBoundPolicy,
    /// Fixed z-component bound in units of `sigma_z`, used with `EzBoundPolicy::Fixed`.
    pub fixed_ez_bound_scale: ffl,
}

impl EvaluatorConfig {
    pub const DEFAULT_EZ_BOUND_POLICY: EzBoundPolicy = EzBoundPolicy::Adaptive;
    pub const DEFAULT_FIXED_EZ_BOUND_SCALE: ffl = 60.0;

    /// Checks that all parameters are in their valid ranges.
    pub fn validate(&self) -> Result<(), FieldError> {
        self.quadrature.validate()?;
        self.bound_search.validate()?;
        self.derivative.validate()?;
        if !(self.fixed_ez_bound_scale > 0.0 && self.fixed_ez_bound_scale.is_finite()) {
            return Err(FieldError::InvalidConfig(
                "Fixed Ez bound scale must be larger than zero.".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            quadrature: QuadratureConfig::default(),
            bound_search: BoundSearchConfig::default(),
            derivative: DerivativeConfig::default(),
            ez_bound_policy: Self::DEFAULT_EZ_BOUND_POLICY,
            fixed_ez_bound_scale: Self::DEFAULT_FIXED_EZ_BOUND_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EvaluatorConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_sub_configs_are_caught() {
        let mut config = EvaluatorConfig::default();
        config.bound_search.shrink_factor = 1.0;
        assert!(matches!(
            config.validate(),
            Err(FieldError::InvalidConfig(_))
        ));

        let mut config = EvaluatorConfig::default();
        config.derivative.n_samples = 1;
        assert!(config.validate().is_err());

        let mut config = EvaluatorConfig::default();
        config.fixed_ez_bound_scale = -60.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn ez_bound_policy_parses() {
        assert_eq!("Fixed".parse::<EzBoundPolicy>().unwrap(), EzBoundPolicy::Fixed);
        assert_eq!(
            EzBoundPolicy::Adaptive.to_string().parse::<EzBoundPolicy>().unwrap(),
            EzBoundPolicy::Adaptive
        );
        assert!("legacy".parse::<EzBoundPolicy>().is_err());
    }
}

//! Electromagnetic field of a relativistic Gaussian bunch.

pub mod bound;
pub mod config;
pub mod derivative;
pub mod kernel;
pub mod magnetic;

use self::{
    bound::{initial_bound, integrate_with_fixed_bound, search_bound},
    config::{EvaluatorConfig, EzBoundPolicy},
    kernel::Kernel,
};
use crate::{
    bunch::BunchParameters,
    constants::{COULOMB_CONSTANT, ELEMENTARY_CHARGE, SQRT_PI},
    error::FieldError,
    geometry::{
        Dim3::{self, X, Y, Z},
        Point3,
    },
};
use std::{fmt, str::FromStr};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "for-testing")]
use approx::{AbsDiffEq, RelativeEq};

/// Floating-point precision to use for field computations.
#[allow(non_camel_case_types)]
pub type ffl = f64;

/// A quantity that can be evaluated for a bunch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FieldComponent {
    Ex,
    Ey,
    Ez,
    /// Derivative of `Ex` along x.
    ExDerivative,
    /// Derivative of `Ey` along y.
    EyDerivative,
    /// Derivative of `Ez` along z.
    EzDerivative,
    Bx,
    By,
    /// Derivative of `Bx` along y.
    BxDerivative,
    /// Derivative of `By` along x.
    ByDerivative,
}

impl FieldComponent {
    /// Creates an array with every component.
    pub fn all() -> [Self; 10] {
        [
            Self::Ex,
            Self::Ey,
            Self::Ez,
            Self::ExDerivative,
            Self::EyDerivative,
            Self::EzDerivative,
            Self::Bx,
            Self::By,
            Self::BxDerivative,
            Self::ByDerivative,
        ]
    }

    /// Returns the electric field component along the given dimension.
    pub fn electric(dim: Dim3) -> Self {
        match dim {
            X => Self::Ex,
            Y => Self::Ey,
            Z => Self::Ez,
        }
    }

    /// Returns the derivative of the electric field component along the given
    /// dimension, taken along the same dimension.
    pub fn electric_derivative(dim: Dim3) -> Self {
        match dim {
            X => Self::ExDerivative,
            Y => Self::EyDerivative,
            Z => Self::EzDerivative,
        }
    }

    /// Whether the component is a spatial derivative.
    pub fn is_derivative(&self) -> bool {
        matches!(
            self,
            Self::ExDerivative
                | Self::EyDerivative
                | Self::EzDerivative
                | Self::BxDerivative
                | Self::ByDerivative
        )
    }

    /// Whether the component belongs to the magnetic field.
    pub fn is_magnetic(&self) -> bool {
        matches!(
            self,
            Self::Bx | Self::By | Self::BxDerivative | Self::ByDerivative
        )
    }

    /// Returns the SI unit of the component.
    pub fn unit(&self) -> &'static str {
        match (self.is_magnetic(), self.is_derivative()) {
            (false, false) => "V/m",
            (false, true) => "V/m^2",
            (true, false) => "T",
            (true, true) => "T/m",
        }
    }
}

impl fmt::Display for FieldComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ex => "ex",
                Self::Ey => "ey",
                Self::Ez => "ez",
                Self::ExDerivative => "dex",
                Self::EyDerivative => "dey",
                Self::EzDerivative => "dez",
                Self::Bx => "bx",
                Self::By => "by",
                Self::BxDerivative => "dbx",
                Self::ByDerivative => "dby",
            }
        )
    }
}

impl FromStr for FieldComponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|component| component.to_string() == name)
            .ok_or_else(|| format!("unknown field component {}", name))
    }
}

/// How much an evaluated field value can be trusted.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FieldStatus {
    /// The integral agreed with the integral over a larger range.
    Converged,
    /// The accepted integral was exactly zero while the comparison integral was not.
    LowConfidenceZero,
    /// The integral with a fixed bound disagreed with the integral over a larger range.
    BoundTooSmall { relative_difference: ffl },
}

impl FieldStatus {
    fn severity(&self) -> u8 {
        match self {
            Self::Converged => 0,
            Self::LowConfidenceZero => 1,
            Self::BoundTooSmall { .. } => 2,
        }
    }

    pub fn is_converged(&self) -> bool {
        *self == Self::Converged
    }

    /// Returns whichever of the two statuses is the most severe.
    ///
    /// Between two `BoundTooSmall` statuses the one with the largest relative
    /// difference is picked.
    pub fn most_severe(self, other: Self) -> Self {
        match (self, other) {
            (
                Self::BoundTooSmall {
                    relative_difference: own,
                },
                Self::BoundTooSmall {
                    relative_difference: others,
                },
            ) => Self::BoundTooSmall {
                relative_difference: ffl::max(own, others),
            },
            _ if other.severity() > self.severity() => other,
            _ => self,
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => write!(f, "converged"),
            Self::LowConfidenceZero => write!(f, "low-confidence-zero"),
            Self::BoundTooSmall {
                relative_difference,
            } => write!(f, "bound-too-small({:.3e})", relative_difference),
        }
    }
}

/// A single evaluated field quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FieldResult {
    component: FieldComponent,
    value: ffl,
    status: FieldStatus,
}

impl FieldResult {
    pub(crate) fn new(component: FieldComponent, value: ffl, status: FieldStatus) -> Self {
        FieldResult {
            component,
            value,
            status,
        }
    }

    pub fn component(&self) -> FieldComponent {
        self.component
    }

    /// Returns the value of the quantity in SI units.
    pub fn value(&self) -> ffl {
        self.value
    }

    pub fn status(&self) -> FieldStatus {
        self.status
    }

    /// Whether the value is fully trusted.
    pub fn is_converged(&self) -> bool {
        self.status.is_converged()
    }
}

impl fmt::Display for FieldResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {:e} {} [{}]",
            self.component,
            self.value,
            self.component.unit(),
            self.status
        )
    }
}

#[cfg(feature = "for-testing")]
impl AbsDiffEq for FieldResult {
    type Epsilon = ffl;

    fn default_epsilon() -> Self::Epsilon {
        ffl::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.component == other.component
            && std::mem::discriminant(&self.status) == std::mem::discriminant(&other.status)
            && self.value.abs_diff_eq(&other.value, epsilon)
    }
}

#[cfg(feature = "for-testing")]
impl RelativeEq for FieldResult {
    fn default_max_relative() -> Self::Epsilon {
        ffl::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.component == other.component
            && std::mem::discriminant(&self.status) == std::mem::discriminant(&other.status)
            && self.value.relative_eq(&other.value, epsilon, max_relative)
    }
}

/// Evaluates field quantities of a single bunch.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldEvaluator {
    bunch: BunchParameters,
    config: EvaluatorConfig,
}

impl FieldEvaluator {
    /// Creates a new evaluator for the given bunch.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::InvalidConfig` if the configuration fails validation.
    pub fn new(bunch: BunchParameters, config: EvaluatorConfig) -> Result<Self, FieldError> {
        config.validate()?;
        Ok(FieldEvaluator { bunch, config })
    }

    /// Creates a new evaluator with the default configuration.
    pub fn with_default_config(bunch: BunchParameters) -> Self {
        FieldEvaluator {
            bunch,
            config: EvaluatorConfig::default(),
        }
    }

    pub fn bunch(&self) -> &BunchParameters {
        &self.bunch
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates the given component at the lab-frame point `(x, y, z)`.
    pub fn evaluate(
        &self,
        component: FieldComponent,
        x: ffl,
        y: ffl,
        z: ffl,
    ) -> Result<FieldResult, FieldError> {
        self.evaluate_at(component, &Point3::new(x, y, z)?)
    }

    /// Evaluates the given component at the given lab-frame point.
    pub fn evaluate_at(
        &self,
        component: FieldComponent,
        point: &Point3,
    ) -> Result<FieldResult, FieldError> {
        match component {
            FieldComponent::Ex => self.electric_field(X, point),
            FieldComponent::Ey => self.electric_field(Y, point),
            FieldComponent::Ez => self.electric_field(Z, point),
            FieldComponent::ExDerivative => derivative::electric_field_derivative(self, X, point),
            FieldComponent::EyDerivative => derivative::electric_field_derivative(self, Y, point),
            FieldComponent::EzDerivative => derivative::electric_field_derivative(self, Z, point),
            FieldComponent::Bx => magnetic::magnetic_field_x(self, point),
            FieldComponent::By => magnetic::magnetic_field_y(self, point),
            FieldComponent::BxDerivative => magnetic::magnetic_field_x_derivative(self, point),
            FieldComponent::ByDerivative => magnetic::magnetic_field_y_derivative(self, point),
        }
    }

    /// Computes the electric field component along `dim` at the given point.
    pub fn electric_field(&self, dim: Dim3, point: &Point3) -> Result<FieldResult, FieldError> {
        let kernel = Kernel::new(dim, point, &self.bunch);
        let integrand = |q: ffl| kernel.evaluate(q);

        let quadrature_config = &self.config.quadrature;
        let search_config = &self.config.bound_search;

        let accepted = match (dim, self.config.ez_bound_policy) {
            (Z, EzBoundPolicy::Fixed) => integrate_with_fixed_bound(
                &integrand,
                self.config.fixed_ez_bound_scale * self.bunch.sigma_z(),
                search_config.initial_comparison_factor,
                quadrature_config,
                search_config.relative_tolerance,
                kernel.vanishes_identically(),
            )?,
            _ => search_bound(
                &integrand,
                initial_bound(point, self.bunch.sigmas(), search_config.far_threshold),
                quadrature_config,
                search_config,
                kernel.vanishes_identically(),
            )?,
        };

        Ok(FieldResult::new(
            FieldComponent::electric(dim),
            accepted.value * self.field_scale(),
            accepted.status,
        ))
    }

    /// Factor converting a field integral to a field strength [V/m].
    fn field_scale(&self) -> ffl {
        ELEMENTARY_CHARGE * self.bunch.particle_count() / SQRT_PI * COULOMB_CONSTANT
    }

    pub fn ex(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::Ex, x, y, z)
    }

    pub fn ey(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::Ey, x, y, z)
    }

    pub fn ez(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::Ez, x, y, z)
    }

    pub fn ex_derivative(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::ExDerivative, x, y, z)
    }

    pub fn ey_derivative(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::EyDerivative, x, y, z)
    }

    pub fn ez_derivative(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::EzDerivative, x, y, z)
    }

    pub fn bx(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::Bx, x, y, z)
    }

    pub fn by(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::By, x, y, z)
    }

    pub fn bx_derivative(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::BxDerivative, x, y, z)
    }

    pub fn by_derivative(&self, x: ffl, y: ffl, z: ffl) -> Result<FieldResult, FieldError> {
        self.evaluate(FieldComponent::ByDerivative, x, y, z)
    }
}

/// Evaluates a field component of the given bunch at `(x, y, z)` with the
/// default configuration.
pub fn evaluate_field(
    bunch: &BunchParameters,
    component: FieldComponent,
    x: ffl,
    y: ffl,
    z: ffl,
) -> Result<FieldResult, FieldError> {
    FieldEvaluator::with_default_config(bunch.clone()).evaluate(component, x, y, z)
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    fn reference_evaluator() -> FieldEvaluator {
        FieldEvaluator::with_default_config(
            BunchParameters::new(0.4e9, 1e-4, 1e-4, 1e-7, 2e4).unwrap(),
        )
    }

    #[test]
    fn components_round_trip_through_names() {
        for component in FieldComponent::all() {
            assert_eq!(
                component.to_string().parse::<FieldComponent>().unwrap(),
                component
            );
        }
        assert_eq!(" DBY ".parse::<FieldComponent>().unwrap(), FieldComponent::ByDerivative);
        assert!("bz".parse::<FieldComponent>().is_err());
    }

    #[test]
    fn component_units_are_consistent() {
        assert_eq!(FieldComponent::Ez.unit(), "V/m");
        assert_eq!(FieldComponent::EyDerivative.unit(), "V/m^2");
        assert_eq!(FieldComponent::By.unit(), "T");
        assert_eq!(FieldComponent::BxDerivative.unit(), "T/m");
    }

    #[test]
    fn most_severe_status_is_selected() {
        let converged = FieldStatus::Converged;
        let zero = FieldStatus::LowConfidenceZero;
        let small = |relative_difference| FieldStatus::BoundTooSmall {
            relative_difference,
        };
        assert_eq!(converged.most_severe(converged), converged);
        assert_eq!(converged.most_severe(zero), zero);
        assert_eq!(small(0.1).most_severe(zero), small(0.1));
        assert_eq!(small(0.1).most_severe(small(0.3)), small(0.3));
        assert!(!zero.is_converged());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bunch = BunchParameters::new(0.4e9, 1e-4, 1e-4, 1e-7, 2e4).unwrap();
        let mut config = EvaluatorConfig::default();
        config.bound_search.relative_tolerance = 0.0;
        assert!(matches!(
            FieldEvaluator::new(bunch, config),
            Err(FieldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_finite_query_point_is_rejected() {
        let evaluator = reference_evaluator();
        assert!(matches!(
            evaluator.ey(0.0, ffl::NAN, 0.0),
            Err(FieldError::InvalidParameter { name: "y", .. })
        ));
    }

    #[test]
    fn transverse_field_points_away_from_axis() {
        let evaluator = reference_evaluator();
        let above = evaluator.ey(0.0, 1e-4, 0.0).unwrap();
        let below = evaluator.ey(0.0, -1e-4, 0.0).unwrap();
        assert!(above.is_converged());
        assert!(above.value() > 0.0);
        assert_relative_eq!(above.value(), -below.value(), max_relative = 1e-12);
    }

    #[test]
    fn fixed_ez_bound_policy_produces_a_result() {
        let bunch = BunchParameters::new(0.4e9, 1e-4, 1e-4, 1e-7, 2e4).unwrap();
        let config = EvaluatorConfig {
            ez_bound_policy: EzBoundPolicy::Fixed,
            ..EvaluatorConfig::default()
        };
        let evaluator = FieldEvaluator::new(bunch, config).unwrap();
        let result = evaluator.ez(1e-5, 0.0, 1e-7).unwrap();
        assert_eq!(result.component(), FieldComponent::Ez);
        assert!(result.value().is_finite());
    }

    #[test]
    fn free_function_matches_evaluator() {
        let evaluator = reference_evaluator();
        let direct = evaluate_field(evaluator.bunch(), FieldComponent::Ex, 5e-5, 2e-5, 1e-8).unwrap();
        assert_eq!(direct, evaluator.ex(5e-5, 2e-5, 1e-8).unwrap());
    }
}

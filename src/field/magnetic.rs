//! Magnetic field of the bunch, obtained from the electric field.
//!
//! For a bunch moving along z with speed `beta*c`, `Bx = (beta/c)*Ey` and
//! `By = -(beta/c)*Ex`.

use super::{derivative::electric_field_derivative, ffl, FieldComponent, FieldEvaluator, FieldResult};
use crate::{
    constants::SPEED_OF_LIGHT,
    error::FieldError,
    geometry::{
        Dim3::{X, Y},
        Point3,
    },
};

/// Scales an electric field quantity by `sign*beta/c`, keeping its status.
fn project(
    evaluator: &FieldEvaluator,
    electric: FieldResult,
    component: FieldComponent,
    sign: ffl,
) -> FieldResult {
    let factor = sign * (evaluator.bunch().beta() / SPEED_OF_LIGHT);
    FieldResult::new(component, factor * electric.value(), electric.status())
}

/// Computes `Bx` at the given point.
pub fn magnetic_field_x(
    evaluator: &FieldEvaluator,
    point: &Point3,
) -> Result<FieldResult, FieldError> {
    let ey = evaluator.electric_field(Y, point)?;
    Ok(project(evaluator, ey, FieldComponent::Bx, 1.0))
}

/// Computes `By` at the given point.
pub fn magnetic_field_y(
    evaluator: &FieldEvaluator,
    point: &Point3,
) -> Result<FieldResult, FieldError> {
    let ex = evaluator.electric_field(X, point)?;
    Ok(project(evaluator, ex, FieldComponent::By, -1.0))
}

/// Computes the derivative of `Bx` along y at the given point.
pub fn magnetic_field_x_derivative(
    evaluator: &FieldEvaluator,
    point: &Point3,
) -> Result<FieldResult, FieldError> {
    let dey = electric_field_derivative(evaluator, Y, point)?;
    Ok(project(evaluator, dey, FieldComponent::BxDerivative, 1.0))
}

/// Computes the derivative of `By` along x at the given point.
pub fn magnetic_field_y_derivative(
    evaluator: &FieldEvaluator,
    point: &Point3,
) -> Result<FieldResult, FieldError> {
    let dex = electric_field_derivative(evaluator, X, point)?;
    Ok(project(evaluator, dex, FieldComponent::ByDerivative, -1.0))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::bunch::BunchParameters;

    #[test]
    fn magnetic_field_is_perpendicular_to_electric_field() {
        let evaluator = FieldEvaluator::with_default_config(
            BunchParameters::new(1e9, 1e-4, 2e-4, 1e-7, 1e4).unwrap(),
        );
        let point = Point3::new(3e-5, 0.0, 0.0).unwrap();
        let bx = magnetic_field_x(&evaluator, &point).unwrap();
        let by = magnetic_field_y(&evaluator, &point).unwrap();
        assert_eq!(bx.value(), 0.0);
        assert!(by.value() < 0.0);
        assert_eq!(by.component(), FieldComponent::By);
        assert!(by.is_converged());
    }
}

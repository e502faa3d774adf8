//! Integrands for the electric field components of a Gaussian bunch.
//!
//! With `A = q + 2*sigma_x^2`, `B = q + 2*sigma_y^2` and `C = q + 2*(gamma*sigma_z)^2`,
//! each field component is proportional to the integral over `q` from zero to
//! infinity of
//!
//! `exp(-x^2/A - y^2/B - (gamma*z)^2/C)*2*gamma*u/U/sqrt(A*B*C)`,
//!
//! where `(u, U)` is `(x, A)`, `(y, B)` or `(z, C)` for the x-, y- and z-component.

use super::ffl;
use crate::{
    bunch::BunchParameters,
    geometry::{Dim3, Point3},
};

/// Evaluates the integrand for the x-component of the electric field.
pub fn kernel_ex(
    q: ffl,
    x: ffl,
    y: ffl,
    z: ffl,
    sigma_x: ffl,
    sigma_y: ffl,
    sigma_z: ffl,
    gamma: ffl,
) -> ffl {
    let a = q + 2.0 * sigma_x * sigma_x;
    let b = q + 2.0 * sigma_y * sigma_y;
    let c = q + 2.0 * (sigma_z * gamma) * (sigma_z * gamma);

    let numerator = ffl::exp(-x * x / a)
        * ffl::exp(-y * y / b)
        * ffl::exp(-(z * gamma) * (z * gamma) / c)
        * 2.0
        * x
        * gamma
        / a;
    let denominator = ffl::sqrt(a) * ffl::sqrt(b) * ffl::sqrt(c);

    numerator / denominator
}

/// Evaluates the integrand for the y-component of the electric field.
pub fn kernel_ey(
    q: ffl,
    x: ffl,
    y: ffl,
    z: ffl,
    sigma_x: ffl,
    sigma_y: ffl,
    sigma_z: ffl,
    gamma: ffl,
) -> ffl {
    let a = q + 2.0 * sigma_x * sigma_x;
    let b = q + 2.0 * sigma_y * sigma_y;
    let c = q + 2.0 * (sigma_z * gamma) * (sigma_z * gamma);

    let numerator = ffl::exp(-x * x / a)
        * ffl::exp(-y * y / b)
        * ffl::exp(-(z * gamma) * (z * gamma) / c)
        * 2.0
        * y
        * gamma
        / b;
    let denominator = ffl::sqrt(a) * ffl::sqrt(b) * ffl::sqrt(c);

    numerator / denominator
}

/// Evaluates the integrand for the z-component of the electric field.
pub fn kernel_ez(
    q: ffl,
    x: ffl,
    y: ffl,
    z: ffl,
    sigma_x: ffl,
    sigma_y: ffl,
    sigma_z: ffl,
    gamma: ffl,
) -> ffl {
    let a = q + 2.0 * sigma_x * sigma_x;
    let b = q + 2.0 * sigma_y * sigma_y;
    let c = q + 2.0 * (gamma * sigma_z) * (gamma * sigma_z);

    let numerator =
        ffl::exp(-x * x / a - y * y / b - (z * gamma) * (z * gamma) / c) * 2.0 * gamma * z / c;
    let denominator = ffl::sqrt(a * b * c);

    numerator / denominator
}

/// Integrand for one electric field component, bound to an observation
/// point and a bunch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel {
    dim: Dim3,
    point: Point3,
    sigmas: [ffl; 3],
    gamma: ffl,
}

impl Kernel {
    /// Creates the integrand for the field component along `dim`.
    pub fn new(dim: Dim3, point: &Point3, bunch: &BunchParameters) -> Self {
        Kernel {
            dim,
            point: *point,
            sigmas: bunch.sigmas(),
            gamma: bunch.gamma(),
        }
    }

    /// Returns the field dimension the integrand belongs to.
    pub fn dim(&self) -> Dim3 {
        self.dim
    }

    /// Whether the integrand is zero for every value of the integration
    /// variable, which is the case when the observation point lies in the
    /// symmetry plane normal to the field dimension.
    pub fn vanishes_identically(&self) -> bool {
        self.point[self.dim] == 0.0
    }

    /// Evaluates the integrand at the given value of the integration variable.
    pub fn evaluate(&self, q: ffl) -> ffl {
        let kernel = match self.dim {
            Dim3::X => kernel_ex,
            Dim3::Y => kernel_ey,
            Dim3::Z => kernel_ez,
        };
        kernel(
            q,
            self.point.x(),
            self.point.y(),
            self.point.z(),
            self.sigmas[0],
            self.sigmas[1],
            self.sigmas[2],
            self.gamma,
        )
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    const SIGMA_X: ffl = 1e-4;
    const SIGMA_Y: ffl = 2e-4;
    const SIGMA_Z: ffl = 1e-7;
    const GAMMA: ffl = 800.0;

    #[test]
    fn transverse_kernels_vanish_on_axis() {
        for q in [0.0, 1e-9, 1e-6] {
            assert_eq!(kernel_ex(q, 0.0, 0.0, 3e-7, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA), 0.0);
            assert_eq!(kernel_ey(q, 0.0, 0.0, 3e-7, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA), 0.0);
        }
    }

    #[test]
    fn longitudinal_kernel_vanishes_at_bunch_center() {
        assert_eq!(kernel_ez(1e-8, 1e-4, -1e-4, 0.0, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA), 0.0);
    }

    #[test]
    fn kernels_are_odd_in_their_own_coordinate() {
        let q = 3e-8;
        assert_eq!(
            kernel_ex(q, 1e-4, 2e-5, 1e-7, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA),
            -kernel_ex(q, -1e-4, 2e-5, 1e-7, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA)
        );
        assert_eq!(
            kernel_ez(q, 1e-4, 2e-5, 1e-7, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA),
            -kernel_ez(q, 1e-4, 2e-5, -1e-7, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA)
        );
    }

    #[test]
    fn transverse_kernels_swap_under_axis_exchange() {
        let q = 1e-8;
        assert_relative_eq!(
            kernel_ex(q, 3e-5, 1e-5, 1e-7, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA),
            kernel_ey(q, 1e-5, 3e-5, 1e-7, SIGMA_Y, SIGMA_X, SIGMA_Z, GAMMA),
            max_relative = 1e-14
        );
    }

    #[test]
    fn kernel_matches_formula_at_origin_of_q() {
        let (x, y, z) = (1e-4, 0.0, 0.0);
        let a = 2.0 * SIGMA_X * SIGMA_X;
        let b = 2.0 * SIGMA_Y * SIGMA_Y;
        let c = 2.0 * (SIGMA_Z * GAMMA) * (SIGMA_Z * GAMMA);
        let expected = ffl::exp(-x * x / a) * 2.0 * x * GAMMA / a / ffl::sqrt(a * b * c);
        assert_relative_eq!(
            kernel_ex(0.0, x, y, z, SIGMA_X, SIGMA_Y, SIGMA_Z, GAMMA),
            expected,
            max_relative = 1e-13
        );
    }

    #[test]
    fn bound_kernel_dispatches_on_dimension() {
        let bunch = BunchParameters::new(0.4e9, SIGMA_X, SIGMA_Y, SIGMA_Z, 2e4).unwrap();
        let point = Point3::new(1e-5, 2e-5, 3e-8).unwrap();
        let gamma = bunch.gamma();
        let kernel = Kernel::new(Dim3::Y, &point, &bunch);
        assert_eq!(kernel.dim(), Dim3::Y);
        assert!(!kernel.vanishes_identically());
        assert!(Kernel::new(Dim3::X, &Point3::new(0.0, 2e-5, 3e-8).unwrap(), &bunch)
            .vanishes_identically());
        assert_eq!(
            kernel.evaluate(2e-8),
            kernel_ey(2e-8, 1e-5, 2e-5, 3e-8, SIGMA_X, SIGMA_Y, SIGMA_Z, gamma)
        );
    }
}

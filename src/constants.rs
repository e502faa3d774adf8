//! Physical and mathematical constants.

/// Floating-point precision to use for constants.
#[allow(non_camel_case_types)]
pub type fcn = f64;

// Mathematical constants

pub const PI: fcn = std::f64::consts::PI;
/// `sqrt(pi)`.
pub const SQRT_PI: fcn = 1.772_453_850_905_516;

// Physical constants

/// Electron rest energy [eV].
pub const ELECTRON_REST_ENERGY: fcn = 0.511e6;
/// Vacuum permittivity [F/m].
pub const VACUUM_PERMITTIVITY: fcn = 8.854e-12;
/// Elementary charge [C].
pub const ELEMENTARY_CHARGE: fcn = 1.602_176_634e-19;
/// Speed of light in vacuum [m/s].
pub const SPEED_OF_LIGHT: fcn = 2.997_924_58e8;

/// Coulomb constant `1/(4*pi*eps_0)` [m/F].
pub const COULOMB_CONSTANT: fcn = 1.0 / (4.0 * PI * VACUUM_PERMITTIVITY);

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sqrt_pi_is_consistent() {
        assert_relative_eq!(SQRT_PI * SQRT_PI, PI, max_relative = 1e-15);
    }

    #[test]
    fn coulomb_constant_has_expected_magnitude() {
        assert_relative_eq!(COULOMB_CONSTANT, 8.9877e9, max_relative = 1e-4);
    }
}

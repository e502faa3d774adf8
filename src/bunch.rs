//! Parameters of a relativistic Gaussian charge bunch.

use crate::{constants::ELECTRON_REST_ENERGY, error::FieldError, field::ffl};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Immutable description of a Gaussian bunch moving along the z-axis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct BunchParameters {
    /// Energy of the bunch particles [eV].
    energy: ffl,
    /// Standard deviation of the charge distribution along x [m].
    sigma_x: ffl,
    /// Standard deviation of the charge distribution along y [m].
    sigma_y: ffl,
    /// Standard deviation of the charge distribution along z [m].
    sigma_z: ffl,
    /// Number of elementary charges in the bunch.
    particle_count: ffl,
    /// Lorentz factor.
    gamma: ffl,
    /// Speed in units of the speed of light.
    beta: ffl,
}

impl BunchParameters {
    /// Creates a new set of bunch parameters, computing the Lorentz factor
    /// and velocity from the particle energy.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::InvalidParameter` if any width or the particle count is
    /// not a positive finite number, or if the energy does not exceed the electron
    /// rest energy.
    pub fn new(
        energy: ffl,
        sigma_x: ffl,
        sigma_y: ffl,
        sigma_z: ffl,
        particle_count: ffl,
    ) -> Result<Self, FieldError> {
        for (name, value) in [
            ("sigma_x", sigma_x),
            ("sigma_y", sigma_y),
            ("sigma_z", sigma_z),
            ("particle_count", particle_count),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FieldError::InvalidParameter {
                    name,
                    value,
                    reason: "must be a finite number larger than zero",
                });
            }
        }
        if !(energy.is_finite() && energy > ELECTRON_REST_ENERGY) {
            return Err(FieldError::InvalidParameter {
                name: "energy",
                value: energy,
                reason: "must be finite and exceed the electron rest energy",
            });
        }

        let gamma = energy / ELECTRON_REST_ENERGY;
        let beta = ffl::sqrt(1.0 - 1.0 / (gamma * gamma));

        Ok(BunchParameters {
            energy,
            sigma_x,
            sigma_y,
            sigma_z,
            particle_count,
            gamma,
            beta,
        })
    }

    pub fn energy(&self) -> ffl {
        self.energy
    }

    pub fn sigma_x(&self) -> ffl {
        self.sigma_x
    }

    pub fn sigma_y(&self) -> ffl {
        self.sigma_y
    }

    pub fn sigma_z(&self) -> ffl {
        self.sigma_z
    }

    /// Returns the standard deviations along x, y and z.
    pub fn sigmas(&self) -> [ffl; 3] {
        [self.sigma_x, self.sigma_y, self.sigma_z]
    }

    pub fn particle_count(&self) -> ffl {
        self.particle_count
    }

    /// Returns the Lorentz factor of the bunch.
    pub fn gamma(&self) -> ffl {
        self.gamma
    }

    /// Returns the bunch speed in units of the speed of light.
    pub fn beta(&self) -> ffl {
        self.beta
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn derived_quantities_are_correct() {
        let bunch = BunchParameters::new(0.4e9, 1e-4, 1e-4, 1e-7, 2e4).unwrap();
        let gamma = 0.4e9 / 0.511e6;
        assert_relative_eq!(bunch.gamma(), gamma, max_relative = 1e-15);
        assert_relative_eq!(
            bunch.beta(),
            ffl::sqrt(1.0 - 1.0 / (gamma * gamma)),
            max_relative = 1e-15
        );
        assert!(bunch.beta() < 1.0);
        assert_eq!(bunch.sigmas(), [1e-4, 1e-4, 1e-7]);
    }

    #[test]
    fn non_positive_widths_are_rejected() {
        for (sigma_x, sigma_y, sigma_z) in [(0.0, 1.0, 1.0), (1.0, -1.0, 1.0), (1.0, 1.0, ffl::NAN)] {
            assert!(matches!(
                BunchParameters::new(1e9, sigma_x, sigma_y, sigma_z, 1.0),
                Err(FieldError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn non_positive_particle_count_is_rejected() {
        let result = BunchParameters::new(1e9, 1.0, 1.0, 1.0, 0.0);
        assert!(matches!(
            result,
            Err(FieldError::InvalidParameter {
                name: "particle_count",
                ..
            })
        ));
    }

    #[test]
    fn energy_at_rest_mass_is_rejected() {
        let result = BunchParameters::new(ELECTRON_REST_ENERGY, 1.0, 1.0, 1.0, 1.0);
        assert!(matches!(
            result,
            Err(FieldError::InvalidParameter { name: "energy", .. })
        ));
    }
}

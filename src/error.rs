//! Error types and error handling utilities.

use crate::{field::ffl, math::QuadratureError};
use thiserror::Error;

/// Errors that make a field evaluation impossible or untrustworthy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// A bunch parameter or query coordinate was outside its valid range.
    #[error("invalid value {value:e} for {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: ffl,
        reason: &'static str,
    },
    /// A configuration parameter was outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Quadrature kept reporting warnings after the bound was shrunk the maximum number of times.
    #[error("integration still unstable after {attempts} bound reductions (last bound {bound:e})")]
    IntegrationUnstable { bound: ffl, attempts: u32 },
    /// The comparison integral never agreed with the primary integral within the tolerance.
    #[error(
        "integration did not converge after {attempts} bound enlargements \
         (last bound {bound:e}, relative difference {relative_difference:e})"
    )]
    IntegrationDivergent {
        bound: ffl,
        attempts: u32,
        relative_difference: ffl,
    },
    /// The quadrature primitive failed outright.
    #[error("quadrature failed: {0}")]
    Quadrature(#[from] QuadratureError),
}

#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1);
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*);
    }};
}

#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn invalid_parameter_message_names_parameter() {
        let err = FieldError::InvalidParameter {
            name: "sigma_x",
            value: -1.0,
            reason: "must be larger than zero",
        };
        let message = err.to_string();
        assert!(message.contains("sigma_x"));
        assert!(message.contains("must be larger than zero"));
    }

    #[test]
    fn quadrature_errors_convert() {
        let err: FieldError = QuadratureError::NonFiniteIntegrand { at: 1.0 }.into();
        assert!(matches!(err, FieldError::Quadrature(_)));
    }
}

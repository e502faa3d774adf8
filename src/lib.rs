//! The `bunchfield` crate computes the electromagnetic field of a relativistic
//! Gaussian charge bunch at arbitrary points in the lab frame.

pub mod bunch;
pub mod constants;
pub mod error;
pub mod field;
pub mod geometry;
pub mod io;
pub mod math;
pub mod sweep;

#[cfg(feature = "cli")]
pub mod cli;

//! Command line interface.

pub mod build;
pub mod evaluate;
pub mod run;
pub mod sweep;
pub mod utils;

//! Status output.

use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use std::fmt;

lazy_static! {
    pub static ref DEFAULT_PROGRESS_STYLE: ProgressStyle = ProgressStyle::default_bar()
        .template("Progress: {bar:40}  {percent}% | ETA: {eta}")
        .expect("Invalid progress bar template");
}

/// How much non-critical information to print.
#[derive(Clone)]
pub enum Verbosity {
    Quiet,
    Messages,
    Progress(ProgressStyle),
}

impl Verbosity {
    /// Whether status messages should be printed.
    pub fn print_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Creates a progress bar for `n_items` items, which is hidden unless
    /// progress should be shown.
    pub fn create_progress_bar(&self, n_items: usize) -> ProgressBar {
        match self {
            Self::Progress(style) => ProgressBar::new(n_items as u64).with_style(style.clone()),
            _ => ProgressBar::hidden(),
        }
    }
}

impl fmt::Debug for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "Quiet"),
            Self::Messages => write!(f, "Messages"),
            Self::Progress(_) => write!(f, "Progress"),
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::Quiet
    }
}

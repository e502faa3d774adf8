//! Command line runner for the `bunchfield` library.

#[cfg(not(feature = "for-testing"))]
#[quit::main]
fn main() {
    #[cfg(feature = "cli")]
    bunchfield::cli::run::run();
}

#[cfg(feature = "for-testing")]
fn main() {
    #[cfg(feature = "cli")]
    {
        eprintln!(
            "Warning: The `for-testing` feature is enabled, which will clutter error messages\n\
             Tip: Use cargo flag --features=all-non-testing to include all features except `for-testing`"
        );
        bunchfield::cli::run::run();
    }
}

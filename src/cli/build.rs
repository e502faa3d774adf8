//! Function for building the command line hierarchy.

use super::{evaluate::create_evaluate_subcommand, sweep::create_sweep_subcommand};
use clap::{self, Arg, ArgAction, Command};

/// Build the `bunchfield` command line hierarchy.
pub fn build() -> Command {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .disable_help_subcommand(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .action(ArgAction::SetTrue)
                .help("Display elapsed time when done"),
        )
        .subcommand(create_evaluate_subcommand())
        .subcommand(create_sweep_subcommand())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn command_hierarchy_is_consistent() {
        build().debug_assert();
    }
}

// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for gickup.

use super::Session;
use crate::cli::repo::SetConfigArgs;
use crate::config::Config;
use crate::config::loader::OptionSource;
use crate::error::Result;

/// Display current application options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display the option files that were loaded, in load order.
pub fn run_inis_command(sources: &[OptionSource]) {
    if sources.is_empty() {
        println!("No option files loaded");
    }
    for (i, source) in sources.iter().enumerate() {
        println!("{}. {source}", i + 1);
    }
}

/// Run the set-config command.
///
/// # Errors
///
/// Returns an error if the value is rejected or the registry cannot be saved.
pub fn run_set_config_command(args: &SetConfigArgs, session: &mut Session) -> Result<()> {
    let env = session.env.clone();
    session
        .registry
        .set_option(args.key.as_str(), &args.value, &env)?;
    println!("{} = {}", args.key.as_str(), args.value);
    Ok(())
}

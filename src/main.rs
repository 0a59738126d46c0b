// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> options (toml/env/CLI) --> Logging --> Command Dispatch
//!   UpdateIndexList | Backup | AddRepo | AddIndex | RemoveRepo
//!   RemoveIndex | SetConfig | List | Options | Inis
//! ```

use std::process::ExitCode;

use gickup::cli::global::GlobalOptions;
use gickup::cli::{self, Command};
use gickup::cmd::Session;
use gickup::cmd::backup::run_backup_command;
use gickup::cmd::cancel_on_ctrl_c;
use gickup::cmd::config::{run_inis_command, run_options_command, run_set_config_command};
use gickup::cmd::index::{run_add_index_command, run_remove_index_command};
use gickup::cmd::list::run_list_command;
use gickup::cmd::repo::{run_add_repo_command, run_remove_repo_command};
use gickup::cmd::update_index::run_update_index_command;
use gickup::config::Config;
use gickup::config::loader::ConfigLoader;
use gickup::config::paths::PathEnv;
use gickup::logging::LogConfig;
use gickup::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();
    let env = PathEnv::from_env();

    let config = match load_config(&cli.global, &env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config, env).await
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(config.global.log_file.clone())
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: Config, env: PathEnv) -> ExitCode {
    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::FAILURE;
    };

    let result = match command {
        Command::Options => {
            run_options_command(&config);
            Ok(())
        }
        Command::Inis => {
            let loader = build_config_loader(&cli.global, &env);
            run_inis_command(loader.sources());
            Ok(())
        }
        command => match Session::open(config, &cli.global, env) {
            Ok(mut session) => run_registry_command(command, &mut session).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_registry_command(command: &Command, session: &mut Session) -> gickup::error::Result<()> {
    match command {
        Command::UpdateIndexList(args) => {
            run_update_index_command(args, session, cancel_on_ctrl_c()).await
        }
        Command::Backup(args) => run_backup_command(args, session, cancel_on_ctrl_c()).await,
        Command::AddRepo(args) => run_add_repo_command(args, session).await,
        Command::AddIndex(args) => run_add_index_command(args, session),
        Command::RemoveRepo(args) => run_remove_repo_command(args, session),
        Command::RemoveIndex(args) => run_remove_index_command(args, session),
        Command::SetConfig(args) => run_set_config_command(args, session),
        Command::List(args) => run_list_command(args, session),
        Command::Options | Command::Inis => Ok(()),
    }
}

fn build_config_loader(global: &GlobalOptions, env: &PathEnv) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if let Some(options_file) = env.options_file() {
        loader = loader.user_file(options_file);
    }
    for ini_path in &global.inis {
        loader = loader.ini(ini_path);
    }
    loader.env_prefix("GICKUP")
}

fn load_config(global: &GlobalOptions, env: &PathEnv) -> gickup::error::Result<Config> {
    let mut loader = build_config_loader(global, env);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    loader.build()
}

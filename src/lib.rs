// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                                      |
//!              ,-----------------------+-------------,
//!              |          registry (JSON)            |
//!              |   repos, index sources, options     |
//!              '--+--------------+----------------+--'
//!                 |              |                |
//!                 v              v                v
//!              index          backup           locator
//!           ssh / github   stamp, fetch     classify, paths
//!              |     |           |
//!              v     v           v
//!           process  net        git
//!                  (reqwest)  gix/CLI
//!
//!   +-----------------------------------------+
//!   |  core     process runner                |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, config    |
//!   +-----------------------------------------+
//! ```

pub mod backup;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod index;
pub mod locator;
pub mod logging;
pub mod net;
pub mod registry;

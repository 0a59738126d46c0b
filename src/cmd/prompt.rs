// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive yes/no confirmation.

use std::io::{BufRead, Write};

use anyhow::Context;

use crate::error::Result;

/// Asks `question` on `output` until `input` yields an answer.
///
/// An empty answer means yes. End of input means no.
///
/// # Errors
///
/// Returns an I/O error if reading or writing fails.
pub fn confirm_with<R, W>(mut input: R, mut output: W, question: &str) -> std::io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{question} [Y/n] ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}

/// Asks on the terminal, or answers yes right away when `assume_yes` is set.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    confirm_with(std::io::stdin().lock(), std::io::stdout().lock(), question)
        .context("failed to read answer from stdin")
}

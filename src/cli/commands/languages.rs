//! # Languages Command Module / 语言命令模块
//!
//! Lists every report language compiled into the binary and whether its
//! vocabulary is complete.

use anyhow::Result;
use colored::*;
use std::io::{self, Write};

use crate::infra::i18n::check_locales;
use crate::infra::t;

pub fn execute(locale: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", t!("cli.languages_header", locale = locale).bold())?;

    for (lang, result) in check_locales() {
        let status = match result {
            Ok(()) => t!("cli.language_complete", locale = locale).green(),
            Err(e) => t!("cli.language_incomplete", locale = locale, reason = e).red(),
        };
        writeln!(out, "  - {:<6} {}", lang, status)?;
    }
    Ok(())
}

//! # Reporter Configuration / 报告器配置
//!
//! Read-only settings consumed by the reporter. They can be loaded from a
//! TOML file; every field has a default so an empty file is valid. The CLI
//! overrides individual fields after loading.
//!
//! 报告器使用的只读设置。可从 TOML 文件加载；
//! 每个字段都有默认值，因此空文件也是有效的。
//! CLI 在加载后覆盖单个字段。

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::core::error::ConfigError;

pub const DEFAULT_TERMINAL_WIDTH: usize = 80;
pub const DEFAULT_WARNINGS_DOCS_URL: &str = "http://doc.pytest.org/en/latest/warnings.html";

/// Traceback print mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TbStyle {
    #[default]
    Auto,
    Long,
    Short,
    Line,
    Native,
    No,
}

impl TbStyle {
    /// `--tb=no` suppresses every per-bucket section.
    pub fn is_suppressed(self) -> bool {
        self == TbStyle::No
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Yes,
    No,
    #[default]
    Auto,
}

impl ColorChoice {
    /// Resolves `auto` against whether the output is a terminal.
    pub fn should_colorize(self, is_tty: bool) -> bool {
        match self {
            ColorChoice::Yes => true,
            ColorChoice::No => false,
            ColorChoice::Auto => is_tty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleOutputStyle {
    Classic,
    #[default]
    Progress,
}

/// Tri-state verbosity derived from the net `-v`/`-q` count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    MoreQuiet,
    Quiet,
    Default,
    Verbose,
}

impl Verbosity {
    pub fn from_level(level: i8) -> Self {
        match level {
            i8::MIN..=-2 => Verbosity::MoreQuiet,
            -1 => Verbosity::Quiet,
            0 => Verbosity::Default,
            _ => Verbosity::Verbose,
        }
    }

    pub fn is_verbose(self) -> bool {
        self == Verbosity::Verbose
    }

    /// The header, file paths and separators are shown in default and verbose mode.
    pub fn shows_header(self) -> bool {
        self >= Verbosity::Default
    }
}

/// The normalised `-r` selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportChars(String);

impl ReportChars {
    /// Normalises the raw `-r` string: `w` follows `disable_warnings`,
    /// duplicates are dropped and `a` stands for `fEsxXw`.
    pub fn parse(raw: &str, disable_warnings: bool) -> Self {
        let mut chars = raw.to_string();
        if !disable_warnings && !chars.contains('w') {
            chars.push('w');
        } else if disable_warnings && chars.contains('w') {
            chars = chars.replace('w', "");
        }

        let mut opts = String::new();
        for c in chars.chars() {
            if c == 'a' {
                opts = "fEsxXw".to_string();
            } else if !opts.contains(c) {
                opts.push(c);
            }
        }
        ReportChars(opts)
    }

    /// Whether a report char (or the category names `xfailed`/`skipped`) is selected.
    pub fn has(&self, name: &str) -> bool {
        let c = match name {
            "xfailed" => 'x',
            "skipped" => 's',
            other => match other.chars().next() {
                Some(c) if other.len() == 1 => c,
                _ => return false,
            },
        };
        self.0.contains(c)
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// All reporter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Requested report language; detected from the system when absent.
    pub language: Option<String>,
    /// Net verbosity, `verbose - quiet`.
    pub verbose: i8,
    pub tb_style: TbStyle,
    pub report_chars: String,
    pub disable_warnings: bool,
    /// Show the full traceback on keyboard interrupt.
    pub fulltrace: bool,
    /// Only collection is reported: failed collectors are shown as soon as
    /// collection finishes.
    pub collect_only: bool,
    /// Echo every plugin registration.
    pub traceconfig: bool,
    pub color: ColorChoice,
    pub terminal_width: Option<usize>,
    pub console_output_style: ConsoleOutputStyle,
    pub warnings_docs_url: String,
    /// Directory warning locations are shown relative to.
    pub invocation_dir: Option<String>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            language: None,
            verbose: 0,
            tb_style: TbStyle::default(),
            report_chars: String::new(),
            disable_warnings: false,
            fulltrace: false,
            collect_only: false,
            traceconfig: false,
            color: ColorChoice::default(),
            terminal_width: None,
            console_output_style: ConsoleOutputStyle::default(),
            warnings_docs_url: DEFAULT_WARNINGS_DOCS_URL.to_string(),
            invocation_dir: None,
        }
    }
}

impl ReporterConfig {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_level(self.verbose)
    }

    pub fn report_chars(&self) -> ReportChars {
        ReportChars::parse(&self.report_chars, self.disable_warnings)
    }

    /// The PASSES section is only rendered on request (`-rP`).
    pub fn show_passes(&self) -> bool {
        self.report_chars().has("P")
    }

    pub fn show_progress_info(&self) -> bool {
        self.console_output_style == ConsoleOutputStyle::Progress
    }

    /// Configured width, else `COLUMNS`, else 80.
    pub fn terminal_width(&self) -> usize {
        self.terminal_width
            .or_else(|| {
                env::var("COLUMNS")
                    .ok()
                    .and_then(|cols| cols.trim().parse().ok())
            })
            .filter(|width| *width > 0)
            .unwrap_or(DEFAULT_TERMINAL_WIDTH)
    }
}

/// Loads a reporter configuration from a TOML file.
pub fn load_reporter_config(path: &Path) -> Result<ReporterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

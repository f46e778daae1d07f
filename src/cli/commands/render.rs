//! # Render Command Module / 渲染命令模块
//!
//! This module implements the `render` command, which replays an NDJSON
//! event stream through the terminal reporter and exits with the status
//! the test session finished with.
//!
//! 此模块实现 `render` 命令，它通过终端报告器重放 NDJSON 事件流，
//! 并以测试会话结束时的状态退出。

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::core::config::{
    load_reporter_config, ColorChoice, ConsoleOutputStyle, ReporterConfig, TbStyle,
};
use crate::core::error::EventError;
use crate::core::events::EventStream;
use crate::core::models::ExitStatus;
use crate::infra::i18n::{resolve_language, Vocabulary};
use crate::reporting::TerminalReporter;

/// Command-line settings of `render`. Each one that is set overrides the
/// configuration file.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub events: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub language: Option<String>,
    pub verbose: u8,
    pub quiet: u8,
    pub report_chars: Option<String>,
    pub tb_style: Option<TbStyle>,
    pub color: Option<ColorChoice>,
    pub disable_warnings: bool,
    pub fulltrace: bool,
    pub collect_only: bool,
    pub traceconfig: bool,
    pub width: Option<usize>,
    pub console_output_style: Option<ConsoleOutputStyle>,
}

impl RenderOptions {
    pub fn apply(&self, config: &mut ReporterConfig) {
        if let Some(language) = &self.language {
            config.language = Some(language.clone());
        }
        if self.verbose > 0 || self.quiet > 0 {
            let net = i16::from(self.verbose) - i16::from(self.quiet);
            config.verbose = net.clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8;
        }
        if let Some(chars) = &self.report_chars {
            config.report_chars = chars.clone();
        }
        if let Some(tb_style) = self.tb_style {
            config.tb_style = tb_style;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if self.disable_warnings {
            config.disable_warnings = true;
        }
        if self.fulltrace {
            config.fulltrace = true;
        }
        if self.collect_only {
            config.collect_only = true;
        }
        if self.traceconfig {
            config.traceconfig = true;
        }
        if let Some(width) = self.width {
            config.terminal_width = Some(width);
        }
        if let Some(style) = self.console_output_style {
            config.console_output_style = style;
        }
    }
}

/// Executes the render command and returns the process exit code.
pub fn execute(options: RenderOptions) -> Result<u8> {
    let mut config = match &options.config {
        Some(path) => load_reporter_config(path)?,
        None => ReporterConfig::default(),
    };
    options.apply(&mut config);

    let lang = resolve_language(config.language.as_deref())?;
    let vocabulary = Vocabulary::load(&lang)?;
    info!("rendering the report in '{}'", lang);

    let stdout = io::stdout();
    let is_tty = stdout.is_terminal();
    colored::control::set_override(config.color.should_colorize(is_tty));

    let reader = open_events(options.events.as_deref())?;
    let reporter = TerminalReporter::new(stdout.lock(), config, Box::new(vocabulary), is_tty);
    let (status, _) = replay(EventStream::new(reader), reporter)?;

    Ok(status.map(ExitStatus::code).unwrap_or(0))
}

fn open_events(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event stream {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Feeds every event of `events` to `reporter` and finishes the report.
///
/// Lines that are not valid events are logged and skipped; a read error
/// ends the replay.
pub fn replay<R: BufRead, W: Write>(
    events: EventStream<R>,
    mut reporter: TerminalReporter<W>,
) -> Result<(Option<ExitStatus>, W)> {
    for event in events {
        match event {
            Ok(event) => reporter.handle(event).context("Failed to write the report")?,
            Err(EventError::Malformed { line, source }) => {
                warn!("skipping malformed event on line {}: {}", line, source);
            }
            Err(e) => return Err(e).context("Failed to read the event stream"),
        }
    }
    let status = reporter.exit_status();
    let out = reporter.finish().context("Failed to write the report")?;
    Ok((status, out))
}

//! # Terminal Reporter / 终端报告器
//!
//! Drives the live terminal output from an ordered event stream: the session
//! header, the collection line, one status letter or word per test with the
//! progress marker, and the end-of-session summary.
//!
//! 根据有序事件流驱动实时终端输出：会话标题、收集行、
//! 每个测试一个状态字母或单词及进度标记，以及会话结束摘要。
//!
//! The reporter owns the [`Session`] it reduces events into. Nothing else
//! mutates the stats table or the progress counters.

use colored::Color;
use log::{debug, warn};
use std::io::{self, Write};
use std::time::Instant;

use crate::core::config::{ReporterConfig, Verbosity};
use crate::core::events::Event;
use crate::core::models::{ExitStatus, Location, Outcome, OutcomeRecord, Phase};
use crate::core::progress::EdgeAction;
use crate::core::session::Session;
use crate::core::stats::category;
use crate::infra::i18n::{Language, ResultName};
use crate::infra::writer::{Markup, OpenLine, TerminalWriter};
use crate::reporting::summary::SectionRenderer;

/// How one report is counted and shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestStatus {
    pub category: String,
    pub letter: String,
    pub word: String,
    pub markup: Markup,
}

impl TestStatus {
    /// Reports without letter and word are setup/teardown bookkeeping: they
    /// are recorded but neither printed nor counted as progress.
    pub fn is_bookkeeping(&self) -> bool {
        self.letter.is_empty() && self.word.is_empty()
    }
}

/// Maps an outcome reported in `phase` to its category, letter and word.
pub fn test_status(outcome: Outcome, phase: Option<Phase>, lang: &dyn Language) -> TestStatus {
    let in_fixture = phase.is_some_and(Phase::is_setup_or_teardown);
    let (category, letter, result) = match outcome {
        Outcome::Passed if in_fixture => {
            return TestStatus {
                category: category::BOOKKEEPING.to_string(),
                letter: String::new(),
                word: String::new(),
                markup: Markup::NONE,
            };
        }
        Outcome::Failed if in_fixture => (category::ERROR, "E", ResultName::Error),
        Outcome::Passed => (category::PASSED, ".", ResultName::Passed),
        Outcome::Failed => (category::FAILED, "F", ResultName::Failed),
        Outcome::Skipped => (category::SKIPPED, "s", ResultName::Skipped),
        Outcome::XFailed => (category::XFAILED, "x", ResultName::XFailed),
        Outcome::XPassed => (category::XPASSED, "X", ResultName::XPassed),
    };
    let markup = match outcome {
        Outcome::Passed => Markup::color(Color::Green),
        Outcome::Failed => Markup::color(Color::Red),
        Outcome::Skipped => Markup::color(Color::Yellow),
        Outcome::XFailed | Outcome::XPassed => Markup::NONE,
    };
    TestStatus {
        category: category.to_string(),
        letter: letter.to_string(),
        word: lang.test_result(result).to_uppercase(),
        markup,
    }
}

/// The label of a test in verbose mode, always ending in a space.
///
/// The node id loses its `::()` parts, gets ` <- file` appended when the
/// test lives in another file than its node id says, and becomes
/// `[location]` when the report carries no file.
pub fn location_line(node_id: &str, location: Option<&Location>) -> String {
    let res = match location {
        Some(location) if !location.file.is_empty() => {
            let mut res = with_domain(node_id, &location.domain).replace("::()", "");
            let fsid = node_id.split("::").next().unwrap_or(node_id);
            if fsid != location.file.replace('\\', "/") {
                res.push_str(" <- ");
                res.push_str(&location.file);
            }
            res
        }
        _ => "[location]".to_string(),
    };
    format!("{} ", res)
}

/// Rewrites a trailing dotted domain as `::` segments, leaving any
/// parametrization suffix untouched.
fn with_domain(node_id: &str, domain: &str) -> String {
    match node_id.strip_suffix(domain) {
        Some(head) if !domain.is_empty() => {
            let (name, params) = match domain.find('[') {
                Some(idx) => domain.split_at(idx),
                None => (domain, ""),
            };
            format!("{}{}{}", head, name.replace('.', "::"), params)
        }
        _ => node_id.to_string(),
    }
}

#[derive(Debug, Clone)]
struct InterruptMemo {
    message: String,
    crash: Option<String>,
    traceback: Option<String>,
}

pub struct TerminalReporter<W: Write> {
    config: ReporterConfig,
    lang: Box<dyn Language>,
    tw: TerminalWriter<W>,
    session: Session,
    is_tty: bool,
    started: Instant,
    interrupt: Option<InterruptMemo>,
    exit_status: Option<ExitStatus>,
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, config: ReporterConfig, lang: Box<dyn Language>, is_tty: bool) -> Self {
        let has_markup = config.color.should_colorize(is_tty);
        let tw = TerminalWriter::new(out, config.terminal_width(), has_markup);
        Self {
            config,
            lang,
            tw,
            session: Session::new(),
            is_tty,
            started: Instant::now(),
            interrupt: None,
            exit_status: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The exit status carried by the last `session_finish`, if any.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    fn verbosity(&self) -> Verbosity {
        self.config.verbosity()
    }

    fn show_progress(&self) -> bool {
        self.config.show_progress_info() && self.verbosity().shows_header()
    }

    /// Applies one event to the session and writes its live output.
    pub fn handle(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::SessionStart {
                platform,
                runner,
                rootdir,
                plugins,
            } => self.session_start(&platform, runner, rootdir, &plugins),
            Event::PluginRegistered { plugin } => {
                if self.config.traceconfig {
                    let msg = self.lang.plugin_registered(&plugin);
                    self.tw.write_line(&msg, Markup::NONE)?;
                }
                Ok(())
            }
            Event::CollectionStart => {
                if !self.is_tty && self.verbosity().is_verbose() {
                    let msg = format!("{} ... ", self.lang.collecting());
                    self.tw.write(&msg, Markup::bold())?;
                }
                Ok(())
            }
            Event::CollectReport {
                outcome,
                items,
                record,
            } => {
                match outcome {
                    Outcome::Failed => self.session.record(category::ERROR, record),
                    Outcome::Skipped => self.session.record(category::SKIPPED, record),
                    _ => {}
                }
                self.session.progress.add_collected(items);
                if self.is_tty {
                    self.report_collect(false)?;
                }
                Ok(())
            }
            Event::CollectionFinish { collected } => {
                let discovered = self.session.progress.collected().max(collected);
                self.report_collect_count(discovered, true)?;
                self.session.progress.set_collected(collected);
                if self.config.collect_only {
                    SectionRenderer::new(
                        &mut self.tw,
                        self.lang.as_ref(),
                        &self.config,
                        &self.session.stats,
                    )
                    .summary_collection_failures()?;
                }
                Ok(())
            }
            Event::Deselected { node_ids } => {
                self.session.stats.extend(
                    category::DESELECTED,
                    node_ids.into_iter().map(OutcomeRecord::for_node),
                );
                Ok(())
            }
            Event::RunStart { node_id, location } => self.run_start(&node_id, location.as_ref()),
            Event::Report {
                outcome,
                category,
                letter,
                word,
                record,
            } => {
                let mut status = test_status(outcome, record.phase, self.lang.as_ref());
                if let Some(category) = category {
                    status.category = category;
                }
                if let Some(letter) = letter {
                    status.letter = letter;
                }
                if let Some(word) = word {
                    status.word = word;
                }
                self.report(status, record)
            }
            Event::Warning(warning) => {
                self.session.record(category::WARNINGS, warning);
                Ok(())
            }
            Event::InternalError { text } => {
                for line in text.split('\n') {
                    let msg = format!("{}> {}", self.lang.internal_error(), line);
                    self.tw.write_line(&msg, Markup::NONE)?;
                }
                Ok(())
            }
            Event::KeyboardInterrupt {
                message,
                crash,
                traceback,
            } => {
                self.interrupt = Some(InterruptMemo {
                    message,
                    crash,
                    traceback,
                });
                Ok(())
            }
            Event::SessionFinish {
                exit_status,
                duration_secs,
            } => {
                let duration = duration_secs.unwrap_or_else(|| self.started.elapsed().as_secs_f64());
                self.session_finish(exit_status, duration)
            }
        }
    }

    /// Ends the report, printing an interrupt that never reached session
    /// finish, and hands back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(memo) = self.interrupt.take() {
            self.report_interrupt(&memo)?;
        }
        self.tw.flush()?;
        Ok(self.tw.into_inner())
    }

    fn session_start(
        &mut self,
        platform: &str,
        runner: Option<String>,
        rootdir: Option<String>,
        plugins: &[String],
    ) -> io::Result<()> {
        self.started = Instant::now();
        if !self.verbosity().shows_header() {
            return Ok(());
        }
        self.tw
            .write_sep('=', Some(self.lang.session_starts()), Markup::bold())?;

        let mut msg = format!("{} {}", self.lang.platform(), platform);
        if let Some(runner) = runner {
            msg.push_str(" -- ");
            msg.push_str(&runner);
        }
        self.tw.write_line(&msg, Markup::NONE)?;

        if let Some(rootdir) = rootdir {
            self.tw
                .write_line(&format!("rootdir: {}", rootdir), Markup::NONE)?;
        }
        if !plugins.is_empty() {
            self.tw
                .write_line(&format!("plugins: {}", plugins.join(", ")), Markup::NONE)?;
        }
        Ok(())
    }

    fn report_collect(&mut self, final_line: bool) -> io::Result<()> {
        let count = self.session.progress.collected();
        self.report_collect_count(count, final_line)
    }

    fn report_collect_count(&mut self, count: usize, final_line: bool) -> io::Result<()> {
        if !self.verbosity().shows_header() {
            return Ok(());
        }

        let label = if final_line {
            self.lang.collected()
        } else {
            self.lang.collecting()
        };
        let mut line = format!("{} {} {}", label, count, self.lang.item_noun(count));

        let errors = self.session.stats.count(category::ERROR);
        if errors > 0 {
            line.push_str(&format!(" / {} {}", errors, self.lang.errors_lower()));
        }
        let skipped = self.session.stats.count(category::SKIPPED);
        if skipped > 0 {
            line.push_str(&format!(" / {} {}", skipped, self.lang.skipped_lower()));
        }

        if self.is_tty {
            let fill = self
                .tw
                .fullwidth()
                .saturating_sub(line.chars().count() + 1);
            let rewritten = format!("\r{}{}", line, " ".repeat(fill));
            self.tw.write(&rewritten, Markup::bold())?;
            if final_line {
                self.tw.write("\n", Markup::NONE)?;
            }
            Ok(())
        } else {
            self.tw.write_line(&line, Markup::NONE)
        }
    }

    fn run_start(&mut self, node_id: &str, location: Option<&Location>) -> io::Result<()> {
        match self.verbosity() {
            Verbosity::Verbose => {
                let line = location_line(node_id, location);
                self.write_ensure_prefix(&line, "", Markup::NONE)
            }
            Verbosity::Default => {
                let fsid = node_id.split("::").next().unwrap_or(node_id);
                self.write_fspath_result(fsid, "", Markup::NONE)
            }
            Verbosity::Quiet | Verbosity::MoreQuiet => Ok(()),
        }
    }

    fn report(&mut self, status: TestStatus, record: OutcomeRecord) -> io::Result<()> {
        let line = location_line(record.node_id(), record.location.as_ref());
        let fsid = record
            .node_id()
            .split("::")
            .next()
            .unwrap_or_default()
            .to_string();

        self.session.record(&status.category, record);
        if status.is_bookkeeping() {
            return Ok(());
        }
        self.session.progress.item_reported();

        match self.verbosity() {
            Verbosity::Verbose => self.write_ensure_prefix(&line, &status.word, status.markup),
            Verbosity::Default => {
                self.write_fspath_result(&fsid, &status.letter, status.markup)?;
                self.write_progress_if_past_edge()
            }
            Verbosity::Quiet | Verbosity::MoreQuiet => {
                self.tw.write(&status.letter, status.markup)
            }
        }
    }

    /// Starts a new `path ` line when the test file changes, then appends `res`.
    fn write_fspath_result(&mut self, fsid: &str, res: &str, markup: Markup) -> io::Result<()> {
        let same_path = matches!(self.tw.open_line(), Some(OpenLine::Path(path)) if path == fsid);
        if !same_path {
            if self.tw.open_line().is_some() {
                self.write_progress_filling_space()?;
            }
            self.tw.set_open_line(Some(OpenLine::Path(fsid.to_string())));
            self.tw.line("", Markup::NONE)?;
            self.tw.write(&format!("{} ", fsid), Markup::NONE)?;
        }
        self.tw.write(res, markup)
    }

    /// Opens a line for `prefix` unless it is already open, then writes
    /// the verdict `extra` followed by the progress marker.
    fn write_ensure_prefix(&mut self, prefix: &str, extra: &str, markup: Markup) -> io::Result<()> {
        let same_prefix = matches!(self.tw.open_line(), Some(OpenLine::Path(open)) if open == prefix);
        if !same_prefix {
            self.tw.line("", Markup::NONE)?;
            self.tw.set_open_line(Some(OpenLine::Path(prefix.to_string())));
            self.tw.write(prefix, Markup::NONE)?;
        }
        if !extra.is_empty() {
            self.tw.write(extra, markup)?;
            self.tw.set_open_line(Some(OpenLine::Verdict));
            self.write_progress_filling_space()?;
        }
        Ok(())
    }

    fn write_progress_filling_space(&mut self) -> io::Result<()> {
        if !self.show_progress() {
            return Ok(());
        }
        let progress = &self.session.progress;
        let fill = progress.fill_width(self.tw.chars_on_current_line(), self.tw.fullwidth());
        let msg = format!("{}{}", " ".repeat(fill), progress.message());
        self.tw.write(&msg, Markup::color(Color::Cyan))
    }

    fn write_progress_if_past_edge(&mut self) -> io::Result<()> {
        if !self.show_progress() {
            return Ok(());
        }
        let progress = &self.session.progress;
        match progress.edge_action(self.tw.chars_on_current_line(), self.tw.fullwidth()) {
            EdgeAction::Fill => self.write_progress_filling_space(),
            EdgeAction::Wrap => {
                let msg = format!("{}\n", progress.message());
                self.tw.write(&msg, Markup::color(Color::Cyan))
            }
            EdgeAction::None => Ok(()),
        }
    }

    fn session_finish(&mut self, exit_status: ExitStatus, duration_secs: f64) -> io::Result<()> {
        debug!("session finished with {}", exit_status);
        self.exit_status = Some(exit_status);
        self.tw.line("", Markup::NONE)?;

        if exit_status.shows_sections() {
            SectionRenderer::new(
                &mut self.tw,
                self.lang.as_ref(),
                &self.config,
                &self.session.stats,
            )
            .render_sections()?;
        }

        if exit_status == ExitStatus::Interrupted {
            match self.interrupt.take() {
                Some(memo) => self.report_interrupt(&memo)?,
                None => warn!("session was interrupted but no interrupt was reported"),
            }
        }

        let mut renderer = SectionRenderer::new(
            &mut self.tw,
            self.lang.as_ref(),
            &self.config,
            &self.session.stats,
        );
        renderer.summary_deselected()?;
        let summary = renderer.summary_stats(duration_secs)?;
        debug!("summary line '{}' ({})", summary.text, summary.color);
        self.tw.flush()
    }

    fn report_interrupt(&mut self, memo: &InterruptMemo) -> io::Result<()> {
        self.tw.write_sep('!', Some(&memo.message), Markup::NONE)?;
        if !memo.message.contains("KeyboardInterrupt") {
            return Ok(());
        }
        if self.config.fulltrace {
            if let Some(traceback) = &memo.traceback {
                let traceback = traceback.strip_suffix('\n').unwrap_or(traceback);
                self.tw.line(traceback, Markup::NONE)?;
            }
        } else {
            self.tw.line(
                self.lang.show_traceback_instructions(),
                Markup::color(Color::Yellow),
            )?;
            if let Some(crash) = &memo.crash {
                self.tw.line(crash, Markup::NONE)?;
            }
        }
        Ok(())
    }
}

//! # Session Summary Sections / 会话摘要部分
//!
//! Renders the end-of-session report from a finished [`StatsTable`]: the
//! ERRORS, FAILURES, warnings and PASSES sections, the short test summary,
//! the deselection count and the final stats line. Rendering only reads the
//! table.
//!
//! 从已完成的 [`StatsTable`] 渲染会话结束报告：
//! ERRORS、FAILURES、警告和 PASSES 部分、简短测试摘要、
//! 取消选择计数以及最终统计行。渲染只读取统计表。

use colored::Color;
use indexmap::IndexMap;
use std::io::{self, Write};
use std::path::Path;

use crate::core::config::{ReportChars, ReporterConfig, TbStyle, Verbosity};
use crate::core::models::{OutcomeRecord, Phase, WarningRecord};
use crate::core::stats::{category, compute_summary_line, StatsTable, SummaryLine};
use crate::infra::i18n::{Language, ResultName};
use crate::infra::writer::{Markup, TerminalWriter};

/// Number of characters of the full representation used when a failure has
/// no crash summary in `--tb=line` mode.
const CRASH_LINE_FALLBACK_LEN: usize = 50;

pub struct SectionRenderer<'a, W: Write> {
    tw: &'a mut TerminalWriter<W>,
    lang: &'a dyn Language,
    config: &'a ReporterConfig,
    report_chars: ReportChars,
    stats: &'a StatsTable,
}

impl<'a, W: Write> SectionRenderer<'a, W> {
    pub fn new(
        tw: &'a mut TerminalWriter<W>,
        lang: &'a dyn Language,
        config: &'a ReporterConfig,
        stats: &'a StatsTable,
    ) -> Self {
        Self {
            tw,
            lang,
            config,
            report_chars: config.report_chars(),
            stats,
        }
    }

    fn tb_style(&self) -> TbStyle {
        self.config.tb_style
    }

    /// The per-bucket sections, in session-finish order.
    pub fn render_sections(&mut self) -> io::Result<()> {
        self.summary_errors()?;
        self.summary_failures()?;
        self.summary_warnings()?;
        self.summary_passes()?;
        self.short_test_summary()
    }

    pub fn summary_errors(&mut self) -> io::Result<()> {
        if self.tb_style().is_suppressed() {
            return Ok(());
        }
        let reports = self.stats.reports(category::ERROR);
        if reports.is_empty() {
            return Ok(());
        }
        self.tw.write_sep('=', Some(self.lang.errors()), Markup::NONE)?;
        for rep in reports {
            let msg = error_headline(rep, self.lang);
            self.tw.write_sep('_', Some(&msg), Markup::NONE)?;
            self.write_report_body(rep)?;
        }
        Ok(())
    }

    /// Failed collectors, shown right after collection in collect-only runs.
    pub fn summary_collection_failures(&mut self) -> io::Result<()> {
        let failures: Vec<_> = self
            .stats
            .reports(category::ERROR)
            .into_iter()
            .filter(|rep| rep.phase.is_none() || rep.phase == Some(Phase::Collect))
            .collect();
        if failures.is_empty() {
            return Ok(());
        }
        self.tw
            .write_sep('!', Some(self.lang.collection_failures()), Markup::NONE)?;
        for rep in failures {
            self.write_report_body(rep)?;
        }
        Ok(())
    }

    pub fn summary_failures(&mut self) -> io::Result<()> {
        if self.tb_style().is_suppressed() {
            return Ok(());
        }
        let reports = self.stats.reports(category::FAILED);
        if reports.is_empty() {
            return Ok(());
        }
        self.tw.write_sep('=', Some(self.lang.failures()), Markup::NONE)?;
        for rep in reports {
            if self.tb_style() == TbStyle::Line {
                self.tw.write_line(&crash_line(rep), Markup::NONE)?;
                continue;
            }
            let msg = headline(rep, self.lang);
            self.tw
                .write_sep('_', Some(&msg), Markup::color(Color::Red).with_bold())?;
            self.write_report_body(rep)?;
            for sibling in self.stats.reports(category::BOOKKEEPING) {
                if sibling.node_id == rep.node_id && sibling.phase == Some(Phase::Teardown) {
                    self.print_teardown_sections(sibling)?;
                }
            }
        }
        Ok(())
    }

    pub fn summary_warnings(&mut self) -> io::Result<()> {
        if self.tb_style().is_suppressed() || !self.report_chars.has("w") {
            return Ok(());
        }
        let warnings = self.stats.warnings();
        if warnings.is_empty() {
            return Ok(());
        }

        let invocation_dir = self.config.invocation_dir.as_deref().map(Path::new);
        let groups = group_warnings(&warnings, invocation_dir);

        self.tw.write_sep(
            '=',
            Some(self.lang.warnings_summary()),
            Markup::color(Color::Yellow),
        )?;
        for (location, records) in groups {
            let header = match location {
                Some(location) => location,
                None => format!("<{}>", self.lang.undetermined_location()),
            };
            self.tw.line(&header, Markup::NONE)?;
            for warning in records {
                let indented = warning
                    .message
                    .lines()
                    .map(|line| format!("  {}", line))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.tw.line(&indented, Markup::NONE)?;
            }
            self.tw.line("", Markup::NONE)?;
        }
        let docs = self.lang.warnings_docs(&self.config.warnings_docs_url);
        self.tw.line(&docs, Markup::NONE)
    }

    pub fn summary_passes(&mut self) -> io::Result<()> {
        if self.tb_style().is_suppressed() || !self.config.show_passes() {
            return Ok(());
        }
        let reports = self.stats.reports(category::PASSED);
        if reports.is_empty() {
            return Ok(());
        }
        self.tw.write_sep('=', Some(self.lang.passes()), Markup::NONE)?;
        for rep in reports {
            let msg = headline(rep, self.lang);
            self.tw.write_sep('_', Some(&msg), Markup::NONE)?;
            self.write_report_body(rep)?;
        }
        Ok(())
    }

    /// One line per selected report, driven by the `-r` chars.
    pub fn short_test_summary(&mut self) -> io::Result<()> {
        let mut lines = Vec::new();
        let mut passes_shown = false;
        for c in self.report_chars.chars() {
            match c {
                'f' => self.simple_lines(&mut lines, category::FAILED, ResultName::Failed),
                'E' => self.simple_lines(&mut lines, category::ERROR, ResultName::Error),
                'x' => self.reason_lines(&mut lines, category::XFAILED, ResultName::XFailed),
                'X' => self.reason_lines(&mut lines, category::XPASSED, ResultName::XPassed),
                's' => self.skipped_lines(&mut lines),
                'p' | 'P' if !passes_shown => {
                    passes_shown = true;
                    self.simple_lines(&mut lines, category::PASSED, ResultName::Passed);
                }
                _ => {}
            }
        }
        if lines.is_empty() {
            return Ok(());
        }
        self.tw
            .write_sep('=', Some(self.lang.short_test_summary()), Markup::NONE)?;
        for line in lines {
            self.tw.line(&line, Markup::NONE)?;
        }
        Ok(())
    }

    fn word(&self, result: ResultName) -> String {
        self.lang.test_result(result).to_uppercase()
    }

    fn simple_lines(&self, lines: &mut Vec<String>, key: &str, result: ResultName) {
        let word = self.word(result);
        for rep in self.stats.reports(key) {
            lines.push(format!("{} {}", word, rep.node_id()));
        }
    }

    fn reason_lines(&self, lines: &mut Vec<String>, key: &str, result: ResultName) {
        let word = self.word(result);
        for rep in self.stats.reports(key) {
            match short_reason(rep) {
                Some(reason) => lines.push(format!("{} {} {}", word, rep.node_id(), reason)),
                None => lines.push(format!("{} {}", word, rep.node_id())),
            }
        }
    }

    /// Skips sharing a location and reason are folded into one counted line.
    fn skipped_lines(&self, lines: &mut Vec<String>) {
        let word = self.word(ResultName::Skipped);
        let mut folded: IndexMap<(Option<String>, Option<u32>, String), usize> = IndexMap::new();
        for rep in self.stats.reports(category::SKIPPED) {
            let (file, line) = match &rep.location {
                Some(location) => (Some(location.file.clone()), location.line),
                None => (None, None),
            };
            let reason = short_reason(rep).unwrap_or_default();
            *folded.entry((file, line, reason)).or_insert(0) += 1;
        }
        for ((file, line, reason), count) in folded {
            let position = match (file, line) {
                (Some(file), Some(line)) => format!("{}:{}: ", file, line),
                (Some(file), None) => format!("{}: ", file),
                _ => String::new(),
            };
            lines.push(format!("{} [{}] {}{}", word, count, position, reason));
        }
    }

    pub fn summary_deselected(&mut self) -> io::Result<()> {
        if !self.stats.contains(category::DESELECTED) {
            return Ok(());
        }
        let msg = format!(
            "{} {}",
            self.stats.count(category::DESELECTED),
            self.lang.tests_deselected()
        );
        self.tw.write_sep('=', Some(&msg), Markup::bold())
    }

    /// The closing colored stats line.
    pub fn summary_stats(&mut self, duration_secs: f64) -> io::Result<SummaryLine> {
        let lang = self.lang;
        let summary = compute_summary_line(
            self.stats,
            &|key: &str| lang.translate_stat(key),
            lang.no_tests_ran(),
        );
        let msg = lang.summary_stats(&summary.text, duration_secs);
        let markup = Markup::color(summary.color).with_bold();

        match self.config.verbosity() {
            Verbosity::Default | Verbosity::Verbose => self.tw.write_sep('=', Some(&msg), markup)?,
            Verbosity::Quiet => self.tw.write_line(&msg, markup)?,
            Verbosity::MoreQuiet => {}
        }
        Ok(summary)
    }

    /// The failure representation followed by every captured section.
    fn write_report_body(&mut self, rep: &OutcomeRecord) -> io::Result<()> {
        if let Some(longrepr) = &rep.body.longrepr {
            self.tw.line(strip_one_newline(&longrepr.text), Markup::NONE)?;
        }
        for section in &rep.body.sections {
            self.tw.sep('-', Some(&section.name), Markup::NONE)?;
            self.tw.line(strip_one_newline(&section.content), Markup::NONE)?;
        }
        Ok(())
    }

    fn print_teardown_sections(&mut self, rep: &OutcomeRecord) -> io::Result<()> {
        for section in &rep.body.sections {
            if section.name.contains("teardown") {
                self.tw.sep('-', Some(&section.name), Markup::NONE)?;
                self.tw.line(strip_one_newline(&section.content), Markup::NONE)?;
            }
        }
        Ok(())
    }
}

/// The location domain of a report, or the localized "test session".
pub fn headline(rep: &OutcomeRecord, lang: &dyn Language) -> String {
    match &rep.location {
        Some(location) => location.domain.clone(),
        None => lang.test_session().to_string(),
    }
}

/// The headline of an error, prefixed by the phase it happened in.
pub fn error_headline(rep: &OutcomeRecord, lang: &dyn Language) -> String {
    let msg = headline(rep, lang);
    match rep.phase {
        None => format!("{}{}", lang.errors_collecting(), msg),
        Some(Phase::Setup) => format!("{} {}", lang.errors_setup(), msg),
        Some(Phase::Teardown) => format!("{} {}", lang.errors_teardown(), msg),
        Some(_) => msg,
    }
}

/// The condensed crash line used by `--tb=line`: the crash summary, else
/// the first 50 characters of the full representation, else nothing.
pub fn crash_line(rep: &OutcomeRecord) -> String {
    match &rep.body.longrepr {
        Some(longrepr) => match &longrepr.crash {
            Some(crash) => crash.clone(),
            None => longrepr.text.chars().take(CRASH_LINE_FALLBACK_LEN).collect(),
        },
        None => String::new(),
    }
}

/// Groups warnings by resolved location, keeping first-seen group order and
/// arrival order inside each group.
pub fn group_warnings<'w>(
    warnings: &[&'w WarningRecord],
    invocation_dir: Option<&Path>,
) -> IndexMap<Option<String>, Vec<&'w WarningRecord>> {
    let mut groups: IndexMap<Option<String>, Vec<&'w WarningRecord>> = IndexMap::new();
    for &warning in warnings {
        groups
            .entry(warning.location(invocation_dir))
            .or_default()
            .push(warning);
    }
    groups
}

fn short_reason(rep: &OutcomeRecord) -> Option<String> {
    let longrepr = rep.body.longrepr.as_ref()?;
    longrepr
        .crash
        .clone()
        .or_else(|| longrepr.text.lines().next().map(str::to_string))
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
}

fn strip_one_newline(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}

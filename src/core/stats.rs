//! # Outcome Aggregation / 结果聚合
//!
//! The `StatsTable` buckets outcome records by category in arrival order,
//! and `compute_summary_line` derives the one-line colored run summary from
//! it.
//!
//! `StatsTable` 按到达顺序将结果记录按类别分桶，
//! `compute_summary_line` 从中得出单行彩色运行摘要。

use indexmap::IndexMap;
use log::debug;
use std::fmt;

use crate::core::models::{OutcomeRecord, Record, WarningRecord};

/// Canonical category keys.
pub mod category {
    pub const FAILED: &str = "failed";
    pub const PASSED: &str = "passed";
    pub const SKIPPED: &str = "skipped";
    pub const DESELECTED: &str = "deselected";
    pub const XFAILED: &str = "xfailed";
    pub const XPASSED: &str = "xpassed";
    pub const WARNINGS: &str = "warnings";
    pub const ERROR: &str = "error";

    /// Reserved key for setup/teardown bookkeeping reports.
    pub const BOOKKEEPING: &str = "";

    /// The summary line walks these first, in this order.
    pub const CANONICAL: [&str; 8] = [
        FAILED, PASSED, SKIPPED, DESELECTED, XFAILED, XPASSED, WARNINGS, ERROR,
    ];

    pub fn is_canonical(key: &str) -> bool {
        CANONICAL.contains(&key)
    }
}

/// Color of the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryColor {
    Red,
    Yellow,
    Green,
}

impl SummaryColor {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryColor::Red => "red",
            SummaryColor::Yellow => "yellow",
            SummaryColor::Green => "green",
        }
    }
}

impl fmt::Display for SummaryColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SummaryColor> for colored::Color {
    fn from(color: SummaryColor) -> Self {
        match color {
            SummaryColor::Red => colored::Color::Red,
            SummaryColor::Yellow => colored::Color::Yellow,
            SummaryColor::Green => colored::Color::Green,
        }
    }
}

/// The derived `(text, color)` summary of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub text: String,
    pub color: SummaryColor,
}

/// Category key to ordered records. Buckets are append-only and keep their
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsTable {
    buckets: IndexMap<String, Vec<Record>>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` to the bucket named `category`, creating it if absent.
    pub fn record(&mut self, category: &str, item: impl Into<Record>) {
        debug!("recording into bucket '{}'", category);
        self.buckets
            .entry(category.to_string())
            .or_default()
            .push(item.into());
    }

    /// Appends several items to one bucket, creating it even when `items` is empty.
    pub fn extend<I>(&mut self, category: &str, items: I)
    where
        I: IntoIterator,
        I::Item: Into<Record>,
    {
        self.buckets
            .entry(category.to_string())
            .or_default()
            .extend(items.into_iter().map(Into::into));
    }

    pub fn get(&self, category: &str) -> Option<&[Record]> {
        self.buckets.get(category).map(Vec::as_slice)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.buckets.contains_key(category)
    }

    pub fn count(&self, category: &str) -> usize {
        self.get(category).map_or(0, <[Record]>::len)
    }

    /// True when the bucket exists and holds at least one record.
    pub fn has_any(&self, category: &str) -> bool {
        self.count(category) > 0
    }

    /// Category keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Reports of a bucket for the session-finish sections, without the ones
    /// that were already shown.
    pub fn reports(&self, category: &str) -> Vec<&OutcomeRecord> {
        self.get(category)
            .unwrap_or_default()
            .iter()
            .filter_map(Record::as_report)
            .filter(|report| !report.pdb_shown)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&WarningRecord> {
        self.get(category::WARNINGS)
            .unwrap_or_default()
            .iter()
            .filter_map(Record::as_warning)
            .collect()
    }
}

/// Computes the summary line for `stats`.
///
/// Canonical keys are listed first in fixed order, then any other non-empty
/// key in first-seen order. The color is red for failures or errors, yellow
/// for warnings or unknown categories, green for passes and yellow otherwise.
///
/// # Examples
/// ```
/// use lingua_report::core::stats::{compute_summary_line, StatsTable, SummaryColor};
/// use lingua_report::core::models::OutcomeRecord;
///
/// let mut stats = StatsTable::new();
/// stats.record("passed", OutcomeRecord::for_node("a"));
/// stats.record("failed", OutcomeRecord::for_node("b"));
/// let summary = compute_summary_line(&stats, &|key: &str| key.to_string(), "no tests ran");
/// assert_eq!(summary.text, "1 failed, 1 passed");
/// assert_eq!(summary.color, SummaryColor::Red);
/// ```
pub fn compute_summary_line(
    stats: &StatsTable,
    translate: &dyn Fn(&str) -> String,
    no_tests_ran: &str,
) -> SummaryLine {
    let mut unknown_key_seen = false;
    let mut parts = Vec::new();

    for key in category::CANONICAL {
        let count = stats.count(key);
        if count > 0 {
            parts.push(format!("{} {}", count, translate(key)));
        }
    }

    for key in stats.keys() {
        if key == category::BOOKKEEPING || category::is_canonical(key) {
            continue;
        }
        unknown_key_seen = true;
        let count = stats.count(key);
        if count > 0 {
            parts.push(format!("{} {}", count, key));
        }
    }

    let text = if parts.is_empty() {
        no_tests_ran.to_string()
    } else {
        parts.join(", ")
    };

    let color = if stats.has_any(category::FAILED) || stats.has_any(category::ERROR) {
        SummaryColor::Red
    } else if stats.has_any(category::WARNINGS) || unknown_key_seen {
        SummaryColor::Yellow
    } else if stats.has_any(category::PASSED) {
        SummaryColor::Green
    } else {
        SummaryColor::Yellow
    };

    SummaryLine { text, color }
}

//! # Session State / 会话状态
//!
//! The mutable state of one reporting session: the stats table and the
//! progress counters. Created at session start, dropped at session end.
//!
//! 单个报告会话的可变状态：统计表和进度计数器。

use crate::core::models::Record;
use crate::core::progress::ProgressTracker;
use crate::core::stats::StatsTable;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub stats: StatsTable,
    pub progress: ProgressTracker,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome into its category bucket.
    pub fn record(&mut self, category: &str, item: impl Into<Record>) {
        self.stats.record(category, item);
    }
}

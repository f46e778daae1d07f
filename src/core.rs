//! # Core Module / 核心模块
//!
//! This module contains the core of the reporter: the outcome models, the
//! event source, the stats table with its summary line, the progress
//! counters and the reporter configuration.
//!
//! 此模块包含报告器的核心：结果模型、事件源、
//! 带摘要行的统计表、进度计数器和报告器配置。

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod progress;
pub mod session;
pub mod stats;

// Re-exports
pub use config::ReporterConfig;
pub use session::Session;
pub use stats::{compute_summary_line, StatsTable, SummaryColor, SummaryLine};

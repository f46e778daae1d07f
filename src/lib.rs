//! # Lingua Report Library / Lingua Report 库
//!
//! This library provides a localized terminal reporter for test runs. It
//! replays an ordered stream of test-outcome events, prints the live
//! progress output and renders the grouped end-of-session summary in the
//! selected language.
//!
//! 此库为测试运行提供本地化的终端报告器。
//! 它按顺序重放测试结果事件流，打印实时进度输出，
//! 并以所选语言渲染分组的会话结束摘要。
//!
//! ## Modules / 模块
//!
//! - `core` - Outcome models, events, stats aggregation, progress and configuration
//! - `infra` - Locale vocabulary and the terminal writer
//! - `reporting` - Live terminal output and summary sections
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 结果模型、事件、统计聚合、进度和配置
//! - `infra` - 区域词汇表和终端写入器
//! - `reporting` - 实时终端输出和摘要部分
//! - `cli` - 命令行接口和命令

pub mod core;
pub mod infra;
pub mod reporting;
pub mod cli;

// Re-export commonly used items
pub use core::models;
pub use core::config;
pub use reporting::TerminalReporter;

use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Initializes logging on stderr, so that it never mixes with the report.
///
/// Only warnings are shown unless `debug` is set.
pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new().with_level(level).init()?;
    Ok(())
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

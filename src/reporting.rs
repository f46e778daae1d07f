//! # Reporting Module / 报告模块
//!
//! This module turns the aggregated session into terminal text: the live
//! per-test output driven by [`terminal::TerminalReporter`] and the
//! end-of-session sections rendered by [`summary::SectionRenderer`].
//!
//! 此模块将聚合后的会话转换为终端文本：
//! 由 [`terminal::TerminalReporter`] 驱动的实时输出，
//! 以及由 [`summary::SectionRenderer`] 渲染的会话结束部分。

pub mod summary;
pub mod terminal;

// Re-export the reporter entry points
pub use summary::SectionRenderer;
pub use terminal::{test_status, TerminalReporter, TestStatus};

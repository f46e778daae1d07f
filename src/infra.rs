//! # Infrastructure Module / 基础设施模块
//!
//! This module provides the services the reporter is built on: the locale
//! vocabulary and the terminal writer.
//!
//! 此模块提供报告器所依赖的服务：区域词汇表和终端写入器。

pub mod i18n;
pub mod writer;

// Re-export i18n functions for easier access
pub use rust_i18n::t;

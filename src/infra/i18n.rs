//! # Report Vocabulary / 报告词汇表
//!
//! The reporter never prints a fixed phrase directly: every header, label
//! and noun comes from a [`Language`]. [`Vocabulary`] implements it from the
//! locale files compiled in by the build script, and refuses to load a
//! locale that does not define every entry.
//!
//! 报告器从不直接打印固定短语：每个标题、标签和名词都来自 [`Language`]。
//! [`Vocabulary`] 基于构建脚本编译进来的区域文件实现它，
//! 并拒绝加载缺少任何条目的区域。

use log::{debug, info};
use std::collections::HashMap;

use crate::core::error::LocaleError;

include!(concat!(env!("OUT_DIR"), "/vocabulary.rs"));

pub const DEFAULT_LANGUAGE: &str = "en";

/// Result names with a localized spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultName {
    Passed,
    Failed,
    Skipped,
    Error,
    XFailed,
    XPassed,
}

/// The vocabulary surface of the reporter. A locale must answer every method.
pub trait Language {
    fn session_starts(&self) -> &str;
    fn platform(&self) -> &str;
    fn plugin_registered(&self, plugin: &str) -> String;

    fn collecting(&self) -> &str;
    fn collected(&self) -> &str;
    fn item(&self) -> &str;
    fn item_plural(&self) -> &str;
    fn errors_lower(&self) -> &str;
    fn skipped_lower(&self) -> &str;

    fn failures(&self) -> &str;
    fn errors(&self) -> &str;
    fn passes(&self) -> &str;
    fn warnings_summary(&self) -> &str;
    fn collection_failures(&self) -> &str;
    fn warnings_docs(&self, url: &str) -> String;
    fn undetermined_location(&self) -> &str;
    fn test_session(&self) -> &str;
    /// Prefix glued directly onto the headline of a collection error.
    fn errors_collecting(&self) -> &str;
    fn errors_setup(&self) -> &str;
    fn errors_teardown(&self) -> &str;
    fn tests_deselected(&self) -> &str;
    fn no_tests_ran(&self) -> &str;
    fn seconds(&self) -> &str;
    fn summary_stats(&self, line: &str, duration_secs: f64) -> String;
    fn short_test_summary(&self) -> &str;
    fn internal_error(&self) -> &str;
    fn show_traceback_instructions(&self) -> &str;

    /// Label for one of the eight canonical summary keys; `None` otherwise.
    fn stat_label(&self, key: &str) -> Option<&str>;
    fn test_result(&self, result: ResultName) -> &str;

    /// Summary label for any category: canonical keys are translated, plugin
    /// categories are shown as-is.
    fn translate_stat(&self, key: &str) -> String {
        self.stat_label(key).unwrap_or(key).to_string()
    }

    fn item_noun(&self, count: usize) -> &str {
        if count == 1 {
            self.item()
        } else {
            self.item_plural()
        }
    }
}

/// A locale loaded from the compiled catalog, verified to be complete.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: HashMap<VocabKey, &'static str>,
}

impl Vocabulary {
    /// Loads `lang`, failing on an unknown locale or any missing entry.
    pub fn load(lang: &str) -> Result<Self, LocaleError> {
        if !AVAILABLE_LOCALES.contains(&lang) {
            return Err(LocaleError::Unsupported {
                lang: lang.to_string(),
                available: AVAILABLE_LOCALES.join(", "),
            });
        }

        let mut entries = HashMap::with_capacity(VocabKey::ALL.len());
        for &key in VocabKey::ALL {
            let value = lookup(lang, key).ok_or_else(|| LocaleError::MissingKey {
                lang: lang.to_string(),
                key: key.as_str(),
            })?;
            entries.insert(key, value);
        }

        debug!("loaded {} vocabulary entries for '{}'", entries.len(), lang);
        Ok(Self { entries })
    }

    pub fn get(&self, key: VocabKey) -> &str {
        self.entries.get(&key).copied().unwrap_or_default()
    }

    fn format(&self, key: VocabKey, args: &[(&str, &str)]) -> String {
        interpolate(self.get(key), args)
    }
}

impl Language for Vocabulary {
    fn session_starts(&self) -> &str {
        self.get(VocabKey::HeaderSessionStarts)
    }

    fn platform(&self) -> &str {
        self.get(VocabKey::HeaderPlatform)
    }

    fn plugin_registered(&self, plugin: &str) -> String {
        self.format(VocabKey::HeaderPluginRegistered, &[("plugin", plugin)])
    }

    fn collecting(&self) -> &str {
        self.get(VocabKey::CollectCollecting)
    }

    fn collected(&self) -> &str {
        self.get(VocabKey::CollectCollected)
    }

    fn item(&self) -> &str {
        self.get(VocabKey::CollectItem)
    }

    fn item_plural(&self) -> &str {
        self.get(VocabKey::CollectItems)
    }

    fn errors_lower(&self) -> &str {
        self.get(VocabKey::CollectErrors)
    }

    fn skipped_lower(&self) -> &str {
        self.get(VocabKey::CollectSkipped)
    }

    fn failures(&self) -> &str {
        self.get(VocabKey::SummaryFailures)
    }

    fn errors(&self) -> &str {
        self.get(VocabKey::SummaryErrors)
    }

    fn passes(&self) -> &str {
        self.get(VocabKey::SummaryPasses)
    }

    fn warnings_summary(&self) -> &str {
        self.get(VocabKey::SummaryWarningsSummary)
    }

    fn collection_failures(&self) -> &str {
        self.get(VocabKey::SummaryCollectionFailures)
    }

    fn warnings_docs(&self, url: &str) -> String {
        self.format(VocabKey::SummaryWarningsDocs, &[("url", url)])
    }

    fn undetermined_location(&self) -> &str {
        self.get(VocabKey::SummaryUndeterminedLocation)
    }

    fn test_session(&self) -> &str {
        self.get(VocabKey::SummaryTestSession)
    }

    fn errors_collecting(&self) -> &str {
        self.get(VocabKey::SummaryErrorsCollecting)
    }

    fn errors_setup(&self) -> &str {
        self.get(VocabKey::SummaryErrorsSetup)
    }

    fn errors_teardown(&self) -> &str {
        self.get(VocabKey::SummaryErrorsTeardown)
    }

    fn tests_deselected(&self) -> &str {
        self.get(VocabKey::SummaryTestsDeselected)
    }

    fn no_tests_ran(&self) -> &str {
        self.get(VocabKey::SummaryNoTestsRan)
    }

    fn seconds(&self) -> &str {
        self.get(VocabKey::SummarySeconds)
    }

    fn summary_stats(&self, line: &str, duration_secs: f64) -> String {
        let duration = format!("{:.2}", duration_secs);
        self.format(
            VocabKey::SummaryStatsLine,
            &[("line", line), ("duration", &duration), ("seconds", self.seconds())],
        )
    }

    fn short_test_summary(&self) -> &str {
        self.get(VocabKey::SummaryShortTestSummary)
    }

    fn internal_error(&self) -> &str {
        self.get(VocabKey::SummaryInternalError)
    }

    fn show_traceback_instructions(&self) -> &str {
        self.get(VocabKey::SummaryShowTracebackInstructions)
    }

    fn stat_label(&self, key: &str) -> Option<&str> {
        let vocab_key = match key {
            "failed" => VocabKey::StatsFailed,
            "passed" => VocabKey::StatsPassed,
            "skipped" => VocabKey::StatsSkipped,
            "deselected" => VocabKey::StatsDeselected,
            "xfailed" => VocabKey::StatsXfailed,
            "xpassed" => VocabKey::StatsXpassed,
            "warnings" => VocabKey::StatsWarnings,
            "error" => VocabKey::StatsError,
            _ => return None,
        };
        Some(self.get(vocab_key))
    }

    fn test_result(&self, result: ResultName) -> &str {
        self.get(match result {
            ResultName::Passed => VocabKey::ResultPassed,
            ResultName::Failed => VocabKey::ResultFailed,
            ResultName::Skipped => VocabKey::ResultSkipped,
            ResultName::Error => VocabKey::ResultError,
            ResultName::XFailed => VocabKey::ResultXfailed,
            ResultName::XPassed => VocabKey::ResultXpassed,
        })
    }
}

/// Replaces `%{name}` placeholders in `template`.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (name, value) in args {
        result = result.replace(&format!("%{{{}}}", name), value);
    }
    result
}

pub fn available_locales() -> &'static [&'static str] {
    AVAILABLE_LOCALES
}

/// Picks the report language.
///
/// An explicit request must name an available locale, either exactly or by
/// its language part (`es-MX` selects `es`). Without a request the system
/// locale is tried the same way, falling back to English.
pub fn resolve_language(requested: Option<&str>) -> Result<String, LocaleError> {
    match requested {
        Some(lang) => match_locale(lang).ok_or_else(|| LocaleError::Unsupported {
            lang: lang.to_string(),
            available: AVAILABLE_LOCALES.join(", "),
        }),
        None => {
            let system = detect_system_language();
            info!("no language requested, using '{}'", system);
            Ok(system)
        }
    }
}

/// Detects the system locale, matching the full tag, then the language
/// part, then falling back to `en`.
pub fn detect_system_language() -> String {
    sys_locale::get_locale()
        .and_then(|locale| match_locale(&locale))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

fn match_locale(locale: &str) -> Option<String> {
    if AVAILABLE_LOCALES.contains(&locale) {
        return Some(locale.to_string());
    }
    locale
        .split(['-', '_'])
        .next()
        .filter(|lang| AVAILABLE_LOCALES.contains(lang))
        .map(str::to_string)
}

/// Loads every available locale and reports whether its vocabulary is complete.
pub fn check_locales() -> Vec<(&'static str, Result<(), LocaleError>)> {
    AVAILABLE_LOCALES
        .iter()
        .map(|&lang| (lang, Vocabulary::load(lang).map(|_| ())))
        .collect()
}

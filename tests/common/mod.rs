// Shared test helpers for integration tests
#![allow(dead_code)]

use lingua_report::cli::commands::render::replay;
use lingua_report::core::config::{ColorChoice, ReporterConfig};
use lingua_report::core::events::EventStream;
use lingua_report::core::models::ExitStatus;
use lingua_report::infra::i18n::Vocabulary;
use lingua_report::TerminalReporter;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A plain, 40 columns wide configuration so expected output stays readable.
pub fn plain_config() -> ReporterConfig {
    ReporterConfig {
        color: ColorChoice::No,
        terminal_width: Some(40),
        ..ReporterConfig::default()
    }
}

/// Replays NDJSON `events` and returns the exit status and the rendered text.
pub fn render_with(
    events: &str,
    config: ReporterConfig,
    lang: &str,
    is_tty: bool,
) -> (Option<ExitStatus>, String) {
    let vocabulary = Vocabulary::load(lang).expect("locale should load");
    let reporter = TerminalReporter::new(Vec::new(), config, Box::new(vocabulary), is_tty);
    let (status, out) =
        replay(EventStream::new(events.as_bytes()), reporter).expect("replay should succeed");
    (status, String::from_utf8(out).expect("report should be UTF-8"))
}

pub fn render(events: &str, config: ReporterConfig, lang: &str) -> String {
    render_with(events, config, lang, false).1
}

pub fn session_start() -> String {
    r#"{"event":"session_start","platform":"linux","runner":"pytest-3.4.0","rootdir":"/work"}"#
        .to_string()
}

pub fn collected(count: usize) -> String {
    format!(r#"{{"event":"collection_finish","collected":{}}}"#, count)
}

pub fn run_start(node_id: &str) -> String {
    let file = node_id.split("::").next().unwrap_or(node_id);
    let domain = node_id.rsplit("::").next().unwrap_or(node_id);
    format!(
        r#"{{"event":"run_start","node_id":"{}","location":{{"file":"{}","line":1,"domain":"{}"}}}}"#,
        node_id, file, domain
    )
}

/// A `report` event for `phase` without any body.
pub fn report(node_id: &str, phase: &str, outcome: &str) -> String {
    let file = node_id.split("::").next().unwrap_or(node_id);
    let domain = node_id.rsplit("::").next().unwrap_or(node_id);
    format!(
        r#"{{"event":"report","outcome":"{}","record":{{"node_id":"{}","phase":"{}","location":{{"file":"{}","line":1,"domain":"{}"}}}}}}"#,
        outcome, node_id, phase, file, domain
    )
}

/// A failed call report with a traceback and a crash line.
pub fn failure(node_id: &str, text: &str, crash: &str) -> String {
    let file = node_id.split("::").next().unwrap_or(node_id);
    let domain = node_id.rsplit("::").next().unwrap_or(node_id);
    format!(
        r#"{{"event":"report","outcome":"failed","record":{{"node_id":"{}","phase":"call","location":{{"file":"{}","line":1,"domain":"{}"}},"body":{{"longrepr":{{"text":{:?},"crash":{:?}}}}}}}}}"#,
        node_id, file, domain, text, crash
    )
}

/// The setup, call and teardown events of one test.
pub fn full_test(node_id: &str, outcome: &str) -> Vec<String> {
    vec![
        run_start(node_id),
        report(node_id, "setup", "passed"),
        report(node_id, "call", outcome),
        report(node_id, "teardown", "passed"),
    ]
}

pub fn warning(message: &str, node_id: Option<&str>) -> String {
    match node_id {
        Some(node_id) => format!(
            r#"{{"event":"warning","message":"{}","node_id":"{}"}}"#,
            message, node_id
        ),
        None => format!(r#"{{"event":"warning","message":"{}"}}"#, message),
    }
}

pub fn session_finish(exit_status: &str) -> String {
    format!(
        r#"{{"event":"session_finish","exit_status":"{}","duration_secs":0.12}}"#,
        exit_status
    )
}

pub fn lines(events: &[String]) -> String {
    let mut out = events.join("\n");
    out.push('\n');
    out
}

/// Writes an event stream to `name` inside `temp_dir`.
pub fn write_events(temp_dir: &TempDir, name: &str, events: &[String]) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, lines(events)).expect("Failed to write event stream");
    path
}

/// Writes a reporter configuration to `name` inside `temp_dir`.
pub fn write_config(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write config");
    path
}

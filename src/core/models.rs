//! # Data Models Module / 数据模型模块
//!
//! This module defines the outcome records the reporter aggregates: test
//! reports with their phase, location and render payload, warnings, and the
//! session exit status. Payload fields are deserialized leniently so that a
//! non-text value in an event never aborts a report.
//!
//! 此模块定义报告器聚合的结果记录：带阶段、位置和渲染内容的测试报告、
//! 警告以及会话退出状态。内容字段以宽松方式反序列化，
//! 事件中的非文本值不会中断报告。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// The phase of a test run a report was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collect,
    Setup,
    Call,
    Teardown,
}

impl Phase {
    /// Setup and teardown reports carry fixture bookkeeping rather than a verdict.
    pub fn is_setup_or_teardown(self) -> bool {
        matches!(self, Phase::Setup | Phase::Teardown)
    }
}

/// The raw outcome a test runner attaches to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    #[serde(rename = "xfailed")]
    XFailed,
    #[serde(rename = "xpassed")]
    XPassed,
}

/// The `(file, line, domain)` triple used to label a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lossy_text")]
    pub file: String,
    #[serde(default, deserialize_with = "lossy_line")]
    pub line: Option<u32>,
    #[serde(default, deserialize_with = "lossy_text")]
    pub domain: String,
}

impl Location {
    pub fn new(file: impl Into<String>, line: Option<u32>, domain: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            domain: domain.into(),
        }
    }
}

/// The long representation of a failure, usually a formatted traceback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct LongRepr {
    /// The full text, rendered verbatim.
    pub text: String,
    /// A one-line crash summary (`path:line: message`), when the runner knows it.
    pub crash: Option<String>,
}

impl LongRepr {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            crash: None,
        }
    }

    pub fn with_crash(mut self, crash: impl Into<String>) -> Self {
        self.crash = Some(crash.into());
        self
    }
}

/// A long representation may arrive as a bare string or as an object with
/// `text` and `crash`. Any other payload is kept as its JSON text.
impl From<Value> for LongRepr {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut map) if map.contains_key("text") => {
                let text = map.remove("text").map(coerce_text).unwrap_or_default();
                let crash = map
                    .remove("crash")
                    .filter(|crash| !crash.is_null())
                    .map(coerce_text);
                LongRepr { text, crash }
            }
            other => LongRepr {
                text: coerce_text(other),
                crash: None,
            },
        }
    }
}

/// A named block of captured output attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "lossy_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lossy_text")]
    pub content: String,
}

impl Section {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Opaque render payload of a report. The aggregator never looks inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBody {
    #[serde(default)]
    pub longrepr: Option<LongRepr>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// One observed event for a test node or a collection phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    #[serde(default, deserialize_with = "lossy_optional_text")]
    pub node_id: Option<String>,
    /// `None` marks a collection-time event.
    #[serde(default)]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub body: ReportBody,
    /// Set when the record was already surfaced, e.g. by an interactive debugger.
    #[serde(default)]
    pub pdb_shown: bool,
}

impl OutcomeRecord {
    /// A record carrying nothing but a node id, as used for deselected items.
    pub fn for_node(node_id: impl Into<String>) -> Self {
        Self {
            node_id: Some(node_id.into()),
            ..Self::default()
        }
    }

    pub fn node_id(&self) -> &str {
        self.node_id.as_deref().unwrap_or("")
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_longrepr(mut self, longrepr: LongRepr) -> Self {
        self.body.longrepr = Some(longrepr);
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.body.sections.push(section);
        self
    }
}

/// Where a warning came from when no node id is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FsLocation {
    Position { file: String, line: u32 },
    Path(String),
}

/// A warning captured during the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningRecord {
    #[serde(deserialize_with = "lossy_text")]
    pub message: String,
    #[serde(default, deserialize_with = "lossy_optional_text")]
    pub node_id: Option<String>,
    #[serde(default)]
    pub fslocation: Option<FsLocation>,
}

impl WarningRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            node_id: None,
            fslocation: None,
        }
    }

    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_fslocation(mut self, fslocation: FsLocation) -> Self {
        self.fslocation = Some(fslocation);
        self
    }

    /// Resolves the user-facing location: the node id, else `file:line`
    /// relative to `invocation_dir`, else `None` (undetermined).
    pub fn location(&self, invocation_dir: Option<&Path>) -> Option<String> {
        if let Some(node_id) = self.node_id.as_deref().filter(|id| !id.is_empty()) {
            return Some(node_id.to_string());
        }
        match &self.fslocation {
            Some(FsLocation::Position { file, line }) => {
                let path = Path::new(file);
                let relative = invocation_dir
                    .and_then(|dir| path.strip_prefix(dir).ok())
                    .unwrap_or(path);
                Some(format!("{}:{}", relative.display(), line))
            }
            Some(FsLocation::Path(path)) if !path.is_empty() => Some(path.clone()),
            _ => None,
        }
    }
}

/// An entry of a stats bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Report(OutcomeRecord),
    Warning(WarningRecord),
}

impl Record {
    pub fn as_report(&self) -> Option<&OutcomeRecord> {
        match self {
            Record::Report(report) => Some(report),
            Record::Warning(_) => None,
        }
    }

    pub fn as_warning(&self) -> Option<&WarningRecord> {
        match self {
            Record::Warning(warning) => Some(warning),
            Record::Report(_) => None,
        }
    }
}

impl From<OutcomeRecord> for Record {
    fn from(report: OutcomeRecord) -> Self {
        Record::Report(report)
    }
}

impl From<WarningRecord> for Record {
    fn from(warning: WarningRecord) -> Self {
        Record::Warning(warning)
    }
}

/// The exit status of the test session, as decided by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    Ok,
    TestsFailed,
    Interrupted,
    InternalError,
    UsageError,
    NoTestsCollected,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Ok => 0,
            ExitStatus::TestsFailed => 1,
            ExitStatus::Interrupted => 2,
            ExitStatus::InternalError => 3,
            ExitStatus::UsageError => 4,
            ExitStatus::NoTestsCollected => 5,
        }
    }

    /// Whether the per-bucket sections are rendered for this status.
    pub fn shows_sections(self) -> bool {
        !matches!(self, ExitStatus::InternalError)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

/// Turns any JSON value into display text: strings verbatim, `null` as
/// empty, everything else in its JSON form.
pub fn coerce_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lossy_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(coerce_text)
}

fn lossy_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| match value {
        Value::Null => None,
        other => Some(coerce_text(other)),
    })
}

/// Line numbers may arrive as numbers or numeric strings; anything else is unknown.
fn lossy_line<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

//! # Event Source / 事件源
//!
//! Test-runner events, delivered in order as one JSON object per line. The
//! reporter consumes them synchronously through [`EventStream`].
//!
//! 测试运行器事件，按顺序以每行一个 JSON 对象的形式传递。
//! 报告器通过 [`EventStream`] 同步消费它们。

use log::debug;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

use crate::core::error::EventError;
use crate::core::models::{ExitStatus, Location, Outcome, OutcomeRecord, WarningRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SessionStart {
        #[serde(default)]
        platform: String,
        #[serde(default)]
        runner: Option<String>,
        #[serde(default)]
        rootdir: Option<String>,
        #[serde(default)]
        plugins: Vec<String>,
    },
    /// A plugin was registered; echoed only with `traceconfig`.
    PluginRegistered { plugin: String },
    CollectionStart,
    /// Result of collecting one collector (module, package, ...).
    CollectReport {
        outcome: Outcome,
        #[serde(default)]
        items: usize,
        #[serde(default)]
        record: OutcomeRecord,
    },
    /// Collection is over; `collected` is the final number of items to run.
    CollectionFinish { collected: usize },
    Deselected { node_ids: Vec<String> },
    RunStart {
        node_id: String,
        #[serde(default)]
        location: Option<Location>,
    },
    /// One phase of one test finished. A plugin may override the category,
    /// status letter and word.
    Report {
        outcome: Outcome,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        letter: Option<String>,
        #[serde(default)]
        word: Option<String>,
        record: OutcomeRecord,
    },
    Warning(WarningRecord),
    InternalError { text: String },
    KeyboardInterrupt {
        message: String,
        #[serde(default)]
        crash: Option<String>,
        #[serde(default)]
        traceback: Option<String>,
    },
    SessionFinish {
        exit_status: ExitStatus,
        #[serde(default)]
        duration_secs: Option<f64>,
    },
}

/// Reads events from a line-oriented source. Blank lines are skipped and
/// invalid UTF-8 is replaced rather than rejected.
pub struct EventStream<R> {
    reader: R,
    line_no: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> EventStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: Vec::new(),
        }
    }

    fn next_event(&mut self) -> Result<Option<Event>, EventError> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event = serde_json::from_str(line).map_err(|source| EventError::Malformed {
                line: self.line_no,
                source,
            })?;
            debug!("event on line {}: {:?}", self.line_no, event);
            return Ok(Some(event));
        }
    }
}

impl<R: BufRead> Iterator for EventStream<R> {
    type Item = Result<Event, EventError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

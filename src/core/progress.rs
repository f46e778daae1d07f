//! # Progress Tracking / 进度跟踪
//!
//! Counts collected and reported items and decides where the ` [NNN%]`
//! marker goes on the live output line.

/// Width of the progress marker, `" [100%]"`.
pub const PROGRESS_LENGTH: usize = 7;

/// What to do with the progress marker after an outcome was written in
/// the compact (non-verbose) layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeAction {
    /// Nothing to print yet.
    None,
    /// Pad the current line and right-align the marker (last item).
    Fill,
    /// The line is about to overflow: print the marker and wrap.
    Wrap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    collected: usize,
    reported: usize,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collected(&self) -> usize {
        self.collected
    }

    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn add_collected(&mut self, count: usize) {
        self.collected += count;
    }

    /// Replaces the collected count with the final number from the runner.
    pub fn set_collected(&mut self, count: usize) {
        self.collected = count;
    }

    pub fn item_reported(&mut self) {
        self.reported += 1;
    }

    /// `floor(reported * 100 / collected)`, or 100 when nothing was collected.
    pub fn percent(&self) -> usize {
        if self.collected == 0 {
            100
        } else {
            self.reported * 100 / self.collected
        }
    }

    /// The marker, e.g. `" [ 33%]"`.
    pub fn message(&self) -> String {
        format!(" [{:>3}%]", self.percent())
    }

    pub fn is_last_item(&self) -> bool {
        self.reported == self.collected
    }

    /// Decides the marker placement for a line that currently holds
    /// `chars_on_line` characters on a terminal `width` wide.
    pub fn edge_action(&self, chars_on_line: usize, width: usize) -> EdgeAction {
        if self.is_last_item() {
            EdgeAction::Fill
        } else if chars_on_line + PROGRESS_LENGTH + 1 >= width {
            EdgeAction::Wrap
        } else {
            EdgeAction::None
        }
    }

    /// Padding that right-aligns the marker on a line holding `chars_on_line`.
    pub fn fill_width(&self, chars_on_line: usize, width: usize) -> usize {
        let msg_len = self.message().chars().count();
        width.saturating_sub(chars_on_line + msg_len + 1)
    }
}

//! # Terminal Writer / 终端写入器
//!
//! A line-oriented output sink with optional color markup. It keeps track of
//! how many characters the current line holds so the reporter can place the
//! progress marker and close unterminated lines.
//!
//! 带可选颜色标记的按行输出端。它记录当前行的字符数，
//! 以便报告器放置进度标记并结束未终止的行。

use colored::{Color, Colorize};
use std::io::{self, Write};

/// Color and weight applied to a piece of output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markup {
    pub color: Option<Color>,
    pub bold: bool,
}

impl Markup {
    pub const NONE: Markup = Markup {
        color: None,
        bold: false,
    };

    pub fn color(color: impl Into<Color>) -> Self {
        Self {
            color: Some(color.into()),
            bold: false,
        }
    }

    pub fn bold() -> Self {
        Self {
            color: None,
            bold: true,
        }
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn apply(&self, text: &str) -> String {
        let mut styled = text.normal();
        if let Some(color) = self.color {
            styled = styled.color(color);
        }
        if self.bold {
            styled = styled.bold();
        }
        styled.to_string()
    }
}

/// What the unterminated line currently on screen was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenLine {
    /// A test file path followed by status letters.
    Path(String),
    /// A verbose location line that already received its verdict.
    Verdict,
}

pub struct TerminalWriter<W: Write> {
    out: W,
    fullwidth: usize,
    has_markup: bool,
    chars_on_current_line: usize,
    open_line: Option<OpenLine>,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(out: W, fullwidth: usize, has_markup: bool) -> Self {
        Self {
            out,
            fullwidth,
            has_markup,
            chars_on_current_line: 0,
            open_line: None,
        }
    }

    pub fn open_line(&self) -> Option<&OpenLine> {
        self.open_line.as_ref()
    }

    pub fn set_open_line(&mut self, open_line: Option<OpenLine>) {
        self.open_line = open_line;
    }

    /// Terminates the open line, if any.
    pub fn ensure_newline(&mut self) -> io::Result<()> {
        if self.open_line.take().is_some() {
            self.line("", Markup::NONE)?;
        }
        Ok(())
    }

    /// Writes a full line, closing any open line first.
    pub fn write_line(&mut self, text: &str, markup: Markup) -> io::Result<()> {
        self.ensure_newline()?;
        self.line(text, markup)
    }

    /// Writes a separator, closing any open line first.
    pub fn write_sep(&mut self, sepchar: char, title: Option<&str>, markup: Markup) -> io::Result<()> {
        self.ensure_newline()?;
        self.sep(sepchar, title, markup)
    }

    pub fn fullwidth(&self) -> usize {
        self.fullwidth
    }

    pub fn chars_on_current_line(&self) -> usize {
        self.chars_on_current_line
    }

    /// Writes `text` as-is; markup is dropped when the sink is not color capable.
    pub fn write(&mut self, text: &str, markup: Markup) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        for c in text.chars() {
            if c == '\n' || c == '\r' {
                self.chars_on_current_line = 0;
            } else {
                self.chars_on_current_line += 1;
            }
        }
        if self.has_markup && markup != Markup::NONE {
            self.out.write_all(markup.apply(text).as_bytes())
        } else {
            self.out.write_all(text.as_bytes())
        }
    }

    /// Writes `text` followed by a newline.
    pub fn line(&mut self, text: &str, markup: Markup) -> io::Result<()> {
        self.write(text, markup)?;
        self.write("\n", Markup::NONE)
    }

    /// Writes a full-width separator line, centering `title` when given.
    ///
    /// ```text
    /// =================== FAILURES ===================
    /// ```
    pub fn sep(&mut self, sepchar: char, title: Option<&str>, markup: Markup) -> io::Result<()> {
        let line = separator_line(sepchar, title, self.fullwidth);
        self.line(&line, markup)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Builds the text of a separator line `fullwidth` characters wide.
pub fn separator_line(sepchar: char, title: Option<&str>, fullwidth: usize) -> String {
    let mut line = match title {
        Some(title) => {
            let title_len = title.chars().count() as isize;
            let n = ((fullwidth as isize - title_len - 2) / 2).max(1) as usize;
            let fill: String = std::iter::repeat_n(sepchar, n).collect();
            format!("{} {} {}", fill, title, fill)
        }
        None => std::iter::repeat_n(sepchar, fullwidth).collect(),
    };
    if !sepchar.is_whitespace() && line.chars().count() < fullwidth {
        line.push(sepchar);
    }
    line
}

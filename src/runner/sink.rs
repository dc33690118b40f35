//! Where the runner draws its progress

use crate::capture;
use crate::config::ColorMode;
use std::io;

/// Foreground colors the runner uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Bold,
}

/// Terminal-like primitives the runner renders progress with
///
/// Any renderer implementing these operations can stand in for a terminal.
pub trait ProgressSink {
    /// Write plain text at the cursor
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Remember the current cursor position
    fn save_cursor(&mut self) -> io::Result<()>;

    /// Move the cursor back to the remembered position
    fn restore_cursor(&mut self) -> io::Result<()>;

    /// Erase from the cursor to the end of the line
    fn clear_to_end_of_line(&mut self) -> io::Result<()>;

    /// Write text in a color and style
    fn write_colored(&mut self, text: &str, color: Color, style: Style) -> io::Result<()>;
}

/// A sink that draws on the terminal through the output channel
///
/// Cursor movement is only emitted when stdout is a terminal, as `crossterm`
/// commands rendered to ANSI text, and colors
/// follow the configured [`ColorMode`]. Because it writes through the output
/// channel, an [`OutputCapture`](crate::capture::OutputCapture) around a runner
/// captures everything it draws.
#[derive(Debug, Clone)]
pub struct TerminalSink {
    colors: bool,
    cursor: bool,
}

impl TerminalSink {
    /// Create a sink for stdout using the given color mode
    pub fn new(mode: ColorMode) -> Self {
        let tty = stdout_is_tty();
        let colors = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => tty,
        };
        TerminalSink {
            colors: cfg!(feature = "colors") && colors,
            cursor: tty,
        }
    }

    /// Whether colors will be emitted
    pub fn colors(&self) -> bool {
        self.colors
    }

    /// Emit a terminal command as ANSI text through the output channel
    #[cfg(feature = "colors")]
    fn command(&self, command: impl crossterm::Command) -> io::Result<()> {
        if !self.cursor {
            return Ok(());
        }
        let mut ansi = String::new();
        command
            .write_ansi(&mut ansi)
            .map_err(|_| io::Error::other("failed to format terminal command"))?;
        capture::emit(&ansi)
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new(ColorMode::Auto)
    }
}

impl ProgressSink for TerminalSink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        capture::emit(text)
    }

    #[cfg(feature = "colors")]
    fn save_cursor(&mut self) -> io::Result<()> {
        self.command(crossterm::cursor::SavePosition)
    }

    #[cfg(feature = "colors")]
    fn restore_cursor(&mut self) -> io::Result<()> {
        self.command(crossterm::cursor::RestorePosition)
    }

    #[cfg(feature = "colors")]
    fn clear_to_end_of_line(&mut self) -> io::Result<()> {
        self.command(crossterm::terminal::Clear(
            crossterm::terminal::ClearType::UntilNewLine,
        ))
    }

    // Without a terminal backend the counter is appended rather than redrawn.
    #[cfg(not(feature = "colors"))]
    fn save_cursor(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(not(feature = "colors"))]
    fn restore_cursor(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(not(feature = "colors"))]
    fn clear_to_end_of_line(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(feature = "colors")]
    fn write_colored(&mut self, text: &str, color: Color, style: Style) -> io::Result<()> {
        use std::io::Write;
        use termcolor::{Buffer, ColorSpec, WriteColor};

        if !self.colors {
            return capture::emit(text);
        }

        let fg = match color {
            Color::Red => termcolor::Color::Red,
            Color::Green => termcolor::Color::Green,
            Color::Yellow => termcolor::Color::Yellow,
            Color::White => termcolor::Color::White,
        };
        let mut buffer = Buffer::ansi();
        buffer.set_color(ColorSpec::new().set_fg(Some(fg)).set_bold(style == Style::Bold))?;
        buffer.write_all(text.as_bytes())?;
        buffer.reset()?;
        capture::emit(&String::from_utf8_lossy(buffer.as_slice()))
    }

    #[cfg(not(feature = "colors"))]
    fn write_colored(&mut self, text: &str, _color: Color, _style: Style) -> io::Result<()> {
        capture::emit(text)
    }
}

#[cfg(feature = "colors")]
fn stdout_is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

#[cfg(not(feature = "colors"))]
fn stdout_is_tty() -> bool {
    false
}

/// One call made on a [`TranscriptSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Write(String),
    SaveCursor,
    RestoreCursor,
    ClearToEndOfLine,
    Colored {
        text: String,
        color: Color,
        style: Style,
    },
}

/// An in-memory sink that records what a runner drew
///
/// [`raw`](Self::raw) is every piece of text in the order written.
/// [`screen`](Self::screen) is what a terminal would be left showing, with
/// later progress indicators drawn over earlier ones.
#[derive(Debug, Default, Clone)]
pub struct TranscriptSink {
    events: Vec<SinkEvent>,
    raw: String,
    screen: String,
    cursor: usize,
    saved: Option<usize>,
}

impl TranscriptSink {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made on the sink, in order
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// All text written, including overwritten progress
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// What a terminal would be left showing
    pub fn screen(&self) -> &str {
        &self.screen
    }

    fn line_end(&self) -> usize {
        self.screen[self.cursor..]
            .find('\n')
            .map(|offset| self.cursor + offset)
            .unwrap_or(self.screen.len())
    }

    fn draw(&mut self, text: &str) {
        self.raw.push_str(text);
        let mut end = (self.cursor + text.len()).min(self.line_end());
        while !self.screen.is_char_boundary(end) {
            end += 1;
        }
        self.screen.replace_range(self.cursor..end, text);
        self.cursor += text.len();
    }
}

impl ProgressSink for TranscriptSink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.events.push(SinkEvent::Write(text.to_string()));
        self.draw(text);
        Ok(())
    }

    fn save_cursor(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::SaveCursor);
        self.saved = Some(self.cursor);
        Ok(())
    }

    fn restore_cursor(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::RestoreCursor);
        if let Some(saved) = self.saved {
            self.cursor = saved.min(self.screen.len());
        }
        Ok(())
    }

    fn clear_to_end_of_line(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::ClearToEndOfLine);
        let end = self.line_end();
        self.screen.replace_range(self.cursor..end, "");
        Ok(())
    }

    fn write_colored(&mut self, text: &str, color: Color, style: Style) -> io::Result<()> {
        self.events.push(SinkEvent::Colored {
            text: text.to_string(),
            color,
            style,
        });
        self.draw(text);
        Ok(())
    }
}

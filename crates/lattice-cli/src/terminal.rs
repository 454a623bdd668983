use crossterm::{
    cursor::{Hide, MoveUp, Show},
    terminal::{Clear, ClearType},
    Command,
};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

/// Semantic colour of a piece of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Bold,
    Info,
    Success,
    Warning,
    Danger,
}

/// Colour and cursor capabilities.
///
/// Each method returns the text to write rather than writing it, so the
/// output sink keeps a single ordered stream.
pub trait Terminal: Send + Sync {
    fn colorize(&self, text: &str, tone: Tone) -> String;
    fn cursor_up(&self, lines: usize) -> String;
    fn clear_line(&self) -> String;
    fn clear_display(&self) -> String;
    fn hide_cursor(&self) -> String;
    fn show_cursor(&self) -> String;
}

/// ANSI escape sequences; colour can be switched off for pipes.
#[derive(Debug, Clone, Copy)]
pub struct AnsiTerminal {
    colors: bool,
}

impl AnsiTerminal {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Colour only when stdout is a terminal and the user did not opt out.
    pub fn detect(no_color: bool) -> Self {
        Self::new(!no_color && std::io::stdout().is_terminal())
    }
}

fn ansi(command: impl Command) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = command.write_ansi(&mut out);
    out
}

impl Terminal for AnsiTerminal {
    fn colorize(&self, text: &str, tone: Tone) -> String {
        if !self.colors || text.is_empty() {
            return text.to_string();
        }
        match tone {
            Tone::Plain => text.to_string(),
            Tone::Bold => text.bold().to_string(),
            Tone::Info => text.cyan().to_string(),
            Tone::Success => text.green().to_string(),
            Tone::Warning => text.yellow().to_string(),
            Tone::Danger => text.red().to_string(),
        }
    }

    fn cursor_up(&self, lines: usize) -> String {
        // MoveUp(0) still moves one line on most terminals.
        if lines == 0 {
            return String::new();
        }
        ansi(MoveUp(u16::try_from(lines).unwrap_or(u16::MAX)))
    }

    fn clear_line(&self) -> String {
        ansi(Clear(ClearType::UntilNewLine))
    }

    fn clear_display(&self) -> String {
        ansi(Clear(ClearType::FromCursorDown))
    }

    fn hide_cursor(&self) -> String {
        ansi(Hide)
    }

    fn show_cursor(&self) -> String {
        ansi(Show)
    }
}

use std::io::Write;
use std::sync::Arc;

use tracing::warn;

use crate::terminal::{Terminal, Tone};

/// Ordered text sink for everything a command shows the user.
///
/// Write failures are logged and otherwise ignored; a closed pipe must not
/// abort a polling loop.
pub struct Output {
    writer: Box<dyn Write + Send>,
    terminal: Arc<dyn Terminal>,
}

impl Output {
    pub fn new(writer: Box<dyn Write + Send>, terminal: Arc<dyn Terminal>) -> Self {
        Self { writer, terminal }
    }

    pub fn stdout(terminal: Arc<dyn Terminal>) -> Self {
        Self::new(Box::new(std::io::stdout()), terminal)
    }

    pub fn terminal(&self) -> &dyn Terminal {
        self.terminal.as_ref()
    }

    pub fn colorize(&self, text: &str, tone: Tone) -> String {
        self.terminal.colorize(text, tone)
    }

    pub fn say(&mut self, text: &str) {
        if let Err(err) = self.writer.write_all(text.as_bytes()) {
            warn!(%err, "failed to write output");
        }
    }

    pub fn say_line(&mut self, text: &str) {
        self.say(text);
        self.new_line();
    }

    pub fn new_line(&mut self) {
        self.say("\n");
    }

    pub fn incorrect_usage(&mut self, message: &str) {
        if message.is_empty() {
            self.say_line("Incorrect Usage");
        } else {
            self.say_line(&format!("Incorrect Usage: {message}"));
        }
    }

    pub fn flush(&mut self) {
        if let Err(err) = self.writer.flush() {
            warn!(%err, "failed to flush output");
        }
    }
}

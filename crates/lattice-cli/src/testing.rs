//! Capturing doubles for command tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::exit_handler::{ExitCallback, ExitHandler};
use crate::output::Output;
use crate::terminal::{Terminal, Tone};

/// Renders colours and cursor operations as readable tags.
pub struct TagTerminal;

impl Terminal for TagTerminal {
    fn colorize(&self, text: &str, tone: Tone) -> String {
        let tag = match tone {
            Tone::Plain => return text.to_string(),
            Tone::Bold => "bold",
            Tone::Info => "info",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
        };
        format!("<{tag}>{text}</{tag}>")
    }

    fn cursor_up(&self, lines: usize) -> String {
        format!("<up:{lines}>")
    }

    fn clear_line(&self) -> String {
        "<clear-line>".to_string()
    }

    fn clear_display(&self) -> String {
        "<clear-display>".to_string()
    }

    fn hide_cursor(&self) -> String {
        "<hide-cursor>".to_string()
    }

    fn show_cursor(&self) -> String {
        "<show-cursor>".to_string()
    }
}

#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn capture() -> (Output, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let output = Output::new(Box::new(buffer.clone()), Arc::new(TagTerminal));
    (output, buffer)
}

/// Holds callbacks until the test fires them.
#[derive(Default)]
pub struct ManualExit {
    callbacks: Mutex<Vec<ExitCallback>>,
}

impl ManualExit {
    pub fn registered(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }

    pub fn fire(&self) {
        let pending: Vec<ExitCallback> = std::mem::take(&mut *self.callbacks.lock().unwrap());
        for callback in pending {
            callback();
        }
    }
}

impl ExitHandler for ManualExit {
    fn on_exit(&self, callback: ExitCallback) {
        self.callbacks.lock().unwrap().push(callback);
    }
}

/// Fires every callback the moment it is registered.
pub struct ImmediateExit;

impl ExitHandler for ImmediateExit {
    fn on_exit(&self, callback: ExitCallback) {
        callback();
    }
}

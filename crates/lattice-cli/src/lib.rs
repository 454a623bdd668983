pub mod commands;
pub mod exit_handler;
pub mod json_runner;
pub mod output;
pub mod render;
pub mod terminal;
pub mod view_model;
pub mod visualizer;

#[cfg(test)]
mod testing;

pub use commands::AppCommands;
pub use exit_handler::{ExitHandler, SignalExitHandler};
pub use json_runner::JsonRunner;
pub use output::Output;
pub use terminal::{AnsiTerminal, Terminal, Tone};
pub use visualizer::{Visualizer, VisualizerState};

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use lattice_receptor::ClusterApi;

use crate::exit_handler::ExitHandler;
use crate::output::Output;
use crate::render::render_cell_row;
use crate::terminal::Tone;
use crate::view_model::build_cell_distribution;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizerState {
    Idle,
    Polling,
    Cancelled,
}

/// Redraws the cell distribution in place at a fixed rate until the exit
/// signal fires.
///
/// Each redraw rewinds the cursor by exactly the number of rows the previous
/// draw wrote, then clears everything below the new rows.
pub struct Visualizer<'a> {
    api: &'a dyn ClusterApi,
    output: &'a mut Output,
    exit: &'a dyn ExitHandler,
    state: VisualizerState,
}

impl<'a> Visualizer<'a> {
    pub fn new(api: &'a dyn ClusterApi, output: &'a mut Output, exit: &'a dyn ExitHandler) -> Self {
        Self {
            api,
            output,
            exit,
            state: VisualizerState::Idle,
        }
    }

    pub fn state(&self) -> VisualizerState {
        self.state
    }

    /// A zero `rate` draws once and returns without touching the exit signal.
    pub async fn run(&mut self, rate: Duration) {
        let title = self.output.colorize("Distribution", Tone::Bold);
        self.output.say_line(&title);
        let mut lines_written = self.draw().await;

        if rate.is_zero() {
            return;
        }

        let cancelled = CancellationToken::new();
        let trigger = cancelled.clone();
        self.exit.on_exit(Box::new(move || trigger.cancel()));

        let hide = self.output.terminal().hide_cursor();
        self.output.say(&hide);
        self.output.flush();
        self.state = VisualizerState::Polling;
        debug!(?rate, "visualizer polling");

        let mut ticker = interval_at(Instant::now() + rate, rate);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {
                    self.state = VisualizerState::Cancelled;
                    let show = self.output.terminal().show_cursor();
                    self.output.say(&show);
                    self.output.flush();
                    debug!("visualizer cancelled");
                    return;
                }
                _ = ticker.tick() => {
                    let up = self.output.terminal().cursor_up(lines_written);
                    self.output.say(&up);
                    lines_written = self.draw().await;
                }
            }
        }
    }

    /// Writes one frame and returns how many rows it occupies.
    async fn draw(&mut self) -> usize {
        let rows = match self.api.list_cells().await {
            Ok(cells) => {
                let rows = build_cell_distribution(&cells);
                for row in &rows {
                    render_cell_row(self.output, row);
                }
                rows.len()
            }
            Err(err) => {
                let clear = self.output.terminal().clear_line();
                self.output.say(&format!("Error visualizing: {err}{clear}"));
                self.output.new_line();
                1
            }
        };

        let clear = self.output.terminal().clear_display();
        self.output.say(&clear);
        self.output.flush();
        rows
    }
}

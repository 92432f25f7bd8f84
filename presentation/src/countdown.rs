//! Countdown page.

use crate::output::console::ConsoleFormatter;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use signup_domain::LaunchSchedule;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const REDRAW_INTERVAL: Duration = Duration::from_secs(1);

/// Live countdown to the launch instant, redrawn every second.
pub struct CountdownView {
    schedule: LaunchSchedule,
    quiet: bool,
}

impl CountdownView {
    pub fn new(schedule: LaunchSchedule) -> Self {
        Self {
            schedule,
            quiet: false,
        }
    }

    /// Hide the spinner (for `--quiet` or non-interactive output).
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Run until launch. Returns false if cancelled first.
    pub async fn run(&self, cancel: &CancellationToken) -> bool {
        let bar = if self.quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(Self::spinner_style());
            bar
        };

        let mut ticker = tokio::time::interval(REDRAW_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    bar.abandon();
                    return false;
                }
                _ = ticker.tick() => {}
            }

            let remaining = self.schedule.time_remaining(Utc::now());
            if remaining.is_expired {
                debug!("Countdown expired");
                bar.finish_with_message(ConsoleFormatter::countdown_done());
                return true;
            }
            bar.set_message(ConsoleFormatter::countdown(&remaining));
            bar.tick();
        }
    }
}

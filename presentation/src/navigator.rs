//! Route gating between the countdown and the registration form.

use crate::countdown::CountdownView;
use crate::output::console::ConsoleFormatter;
use chrono::Utc;
use signup_domain::{LaunchSchedule, Route, RouteDecision};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Pause on the "Registration Not Open" page before redirecting.
pub const NOT_OPEN_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Follows route decisions until the registration form may be shown.
pub struct Navigator {
    schedule: LaunchSchedule,
    quiet: bool,
    cancellation: CancellationToken,
}

impl Navigator {
    pub fn new(schedule: LaunchSchedule, cancellation: CancellationToken) -> Self {
        Self {
            schedule,
            quiet: false,
            cancellation,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Starting from `requested`, show whatever the launch gate requires.
    ///
    /// Returns true once the registration form should be rendered, false if
    /// cancelled on the way.
    pub async fn reach_registration(&self, requested: Route) -> bool {
        let mut route = requested;
        loop {
            let decision = self.schedule.resolve(route, Utc::now());
            info!(
                "Route {} -> {} ({:?})",
                route.as_str(),
                decision.target().as_str(),
                decision
            );

            match decision {
                RouteDecision::Render(Route::Registration) => return true,
                RouteDecision::Render(Route::Countdown) => {
                    let view = CountdownView::new(self.schedule).with_quiet(self.quiet);
                    if !view.run(&self.cancellation).await {
                        return false;
                    }
                    route = Route::Registration;
                }
                RouteDecision::Redirect(Route::Countdown) => {
                    print!("{}", ConsoleFormatter::not_open_view(&self.schedule));
                    tokio::select! {
                        biased;
                        _ = self.cancellation.cancelled() => return false,
                        _ = tokio::time::sleep(NOT_OPEN_REDIRECT_DELAY) => {}
                    }
                    route = Route::Countdown;
                }
                RouteDecision::Redirect(Route::Registration) => {
                    route = Route::Registration;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn schedule_in(delta: TimeDelta) -> LaunchSchedule {
        LaunchSchedule::new((Utc::now() + delta).fixed_offset())
    }

    #[tokio::test]
    async fn test_registration_after_launch_renders() {
        let nav = Navigator::new(schedule_in(TimeDelta::hours(-1)), CancellationToken::new())
            .with_quiet(true);
        assert!(nav.reach_registration(Route::Registration).await);
    }

    #[tokio::test]
    async fn test_countdown_after_launch_redirects_to_registration() {
        let nav = Navigator::new(schedule_in(TimeDelta::hours(-1)), CancellationToken::new())
            .with_quiet(true);
        assert!(nav.reach_registration(Route::Countdown).await);
    }

    #[tokio::test]
    async fn test_registration_before_launch_can_be_cancelled() {
        let token = CancellationToken::new();
        let nav = Navigator::new(schedule_in(TimeDelta::days(3)), token.clone()).with_quiet(true);

        let cancel = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });
        assert!(!nav.reach_registration(Route::Registration).await);
        cancel.await.unwrap();
    }

    #[tokio::test]
    async fn test_registration_shortly_before_launch_waits_then_renders() {
        // Redirect pause (3 s) outlasts the remaining time, so the countdown
        // finishes on its first tick
        let nav = Navigator::new(
            schedule_in(TimeDelta::milliseconds(500)),
            CancellationToken::new(),
        )
        .with_quiet(true);
        let reached = tokio::time::timeout(
            Duration::from_secs(10),
            nav.reach_registration(Route::Registration),
        )
        .await;
        assert_eq!(reached, Ok(true));
    }
}

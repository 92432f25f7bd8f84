//! Route gating around the launch instant.

use super::schedule::LaunchSchedule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Live countdown to the launch instant.
    Countdown,
    /// The team registration form.
    Registration,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Countdown => "countdown",
            Route::Registration => "registration",
        }
    }
}

/// What to do with a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

impl RouteDecision {
    /// The route that ends up displayed.
    pub fn target(&self) -> Route {
        match self {
            RouteDecision::Render(route) | RouteDecision::Redirect(route) => *route,
        }
    }
}

impl LaunchSchedule {
    /// Gate a route on the launch instant.
    ///
    /// The form is unreachable before launch and the countdown is pointless
    /// after it.
    pub fn resolve(&self, requested: Route, now: DateTime<Utc>) -> RouteDecision {
        match (requested, self.has_launched(now)) {
            (Route::Registration, false) => RouteDecision::Redirect(Route::Countdown),
            (Route::Countdown, true) => RouteDecision::Redirect(Route::Registration),
            (route, _) => RouteDecision::Render(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn launch() -> (LaunchSchedule, DateTime<Utc>) {
        let schedule = LaunchSchedule::default();
        let at = schedule.launch_at().with_timezone(&Utc);
        (schedule, at)
    }

    #[test]
    fn test_registration_before_launch_redirects_to_countdown() {
        let (schedule, at) = launch();
        let decision = schedule.resolve(Route::Registration, at - TimeDelta::seconds(1));
        assert_eq!(decision, RouteDecision::Redirect(Route::Countdown));
    }

    #[test]
    fn test_countdown_at_launch_redirects_to_registration() {
        let (schedule, at) = launch();
        assert_eq!(
            schedule.resolve(Route::Countdown, at),
            RouteDecision::Redirect(Route::Registration)
        );
    }

    #[test]
    fn test_matching_routes_render() {
        let (schedule, at) = launch();
        assert_eq!(
            schedule.resolve(Route::Countdown, at - TimeDelta::hours(1)),
            RouteDecision::Render(Route::Countdown)
        );
        assert_eq!(
            schedule.resolve(Route::Registration, at + TimeDelta::hours(1)),
            RouteDecision::Render(Route::Registration)
        );
    }

    #[test]
    fn test_target_is_the_displayed_route() {
        assert_eq!(
            RouteDecision::Redirect(Route::Countdown).target(),
            Route::Countdown
        );
        assert_eq!(
            RouteDecision::Render(Route::Registration).target(),
            Route::Registration
        );
    }
}

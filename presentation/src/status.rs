//! One-shot `status` command.

use crate::output::console::ConsoleFormatter;
use signup_application::{CapacityCoordinator, RefreshOutcome, RegistrationGateway};
use std::sync::Arc;

/// Read the count once and format it. Fails open to an "unavailable" line.
pub async fn status_line(gateway: Arc<dyn RegistrationGateway>) -> String {
    let coordinator = CapacityCoordinator::new(gateway);
    match coordinator.refresh_count().await {
        RefreshOutcome::Refreshed(snapshot) => ConsoleFormatter::count_line(snapshot),
        RefreshOutcome::Unchanged(_) => ConsoleFormatter::count_unknown(),
    }
}

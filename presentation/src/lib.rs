//! Presentation layer for team-signup
//!
//! This crate contains the CLI definition, the countdown page, the
//! interactive registration form and console output formatting.

pub mod cli;
pub mod countdown;
pub mod input;
pub mod navigator;
pub mod output;
pub mod registration;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use cli::commands::{Cli, Command};
pub use countdown::CountdownView;
pub use input::spawn_stdin_lines;
pub use navigator::Navigator;
pub use output::console::ConsoleFormatter;
pub use registration::{GatewayFactory, RegistrationPage};
pub use status::status_line;

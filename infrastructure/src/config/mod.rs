//! Configuration file loading for team-signup
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `TEAM_SIGNUP_*` (e.g. `TEAM_SIGNUP_WEBHOOK_URL`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./team-signup.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/team-signup/config.toml`
//! 5. Default values
//!
//! Command line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{ConfigIssue, ConfigIssueCode, FileConfig, Severity};
pub use loader::ConfigLoader;

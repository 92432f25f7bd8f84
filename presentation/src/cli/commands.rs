//! CLI command definitions

use clap::{Parser, Subcommand};
use signup_domain::Route;
use std::path::PathBuf;

/// Which page to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Live countdown to launch, continuing into registration when it expires
    Countdown,
    /// Team registration form (shows the countdown until launch)
    Register,
    /// Print the current registration count and exit
    Status,
}

impl Command {
    /// Page for this command, if it opens one.
    pub fn route(&self) -> Option<Route> {
        match self {
            Command::Countdown => Some(Route::Countdown),
            Command::Register => Some(Route::Registration),
            Command::Status => None,
        }
    }
}

/// CLI arguments for team-signup
#[derive(Parser, Debug)]
#[command(name = "team-signup")]
#[command(author, version, about = "Capacity-limited team registration")]
#[command(long_about = r#"
Registers a team of three for a competition with a hard limit of 20 teams.

The registration form opens at the launch time. Until then a countdown is
shown. The shared registration sheet behind the webhook URL is the single
source of truth for how many teams are registered.

Configuration files are loaded from (in priority order):
1. TEAM_SIGNUP_* environment variables
2. --config <path>     Explicit config file
3. ./team-signup.toml  Project-level config
4. ~/.config/team-signup/config.toml   Global config

Example:
  team-signup
  team-signup countdown
  team-signup --webhook-url https://script.google.com/macros/s/ID/exec register
  team-signup status
"#)]
pub struct Cli {
    /// Page to open (defaults to the countdown)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Registration webhook URL
    #[arg(long, value_name = "URL", global = true)]
    pub webhook_url: Option<String>,

    /// Launch time (RFC 3339, e.g. 2025-10-16T12:00:00-04:00)
    #[arg(long, value_name = "TIME", global = true)]
    pub launch_time: Option<String>,

    /// Only accept member emails at this domain
    #[arg(long, value_name = "DOMAIN", global = true)]
    pub email_domain: Option<String>,

    /// Append an audit trail (JSONL) to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub audit_log: Option<PathBuf>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress the countdown spinner
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::Countdown)
    }
}

//! Console output formatter for the registration pages

use colored::Colorize;
use signup_application::{Notice, NoticeLevel};
use signup_domain::{
    CEILING, CapacitySnapshot, FieldKey, LaunchSchedule, TimeRemaining, ValidationErrors,
};

/// Formats registration views for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Page title shown above the form.
    pub fn form_header(snapshot: Option<CapacitySnapshot>) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Design Competition"));
        output.push_str(&format!("{}\n", "Team Registration Form".dimmed()));
        if let Some(snapshot) = snapshot {
            output.push_str(&format!("{}\n", Self::count_line(snapshot)));
        }
        output
    }

    /// `N/20 teams registered`
    pub fn count_line(snapshot: CapacitySnapshot) -> String {
        let text = format!("{} teams registered", snapshot);
        if snapshot.is_full() {
            text.red().to_string()
        } else if snapshot.remaining() <= 3 {
            text.yellow().to_string()
        } else {
            text.dimmed().to_string()
        }
    }

    /// Shown by `status` when the count could not be read.
    pub fn count_unknown() -> String {
        format!("?/{} teams registered (count unavailable)", CEILING)
            .yellow()
            .to_string()
    }

    pub fn notice(notice: &Notice) -> String {
        match notice.level {
            NoticeLevel::Info => format!("{} {}", "i".cyan(), notice.message),
            NoticeLevel::Success => format!("{} {}", "v".green(), notice.message.green()),
            NoticeLevel::Error => format!("{} {}", "x".red(), notice.message.red()),
        }
    }

    pub fn field_error(field: FieldKey, message: &str) -> String {
        format!("  {} {}: {}", "x".red(), field.label(), message.red())
    }

    pub fn validation_errors(errors: &ValidationErrors) -> String {
        let mut output = format!("{}\n", "Please fix the following fields:".red().bold());
        for error in errors.errors() {
            output.push_str(&Self::field_error(error.field, &error.message));
            output.push('\n');
        }
        output
    }

    /// Prompt for one field, showing any current value as the default.
    pub fn field_prompt(field: FieldKey, current: &str) -> String {
        let section = match field {
            FieldKey::TeamName => Some("Team Information".to_string()),
            FieldKey::FirstName(slot) => Some(format!("Team Member {}", slot + 1)),
            _ => None,
        };
        let mut output = String::new();
        if let Some(section) = section {
            output.push_str(&format!("\n{}\n", section.cyan().bold()));
        }
        if current.trim().is_empty() {
            output.push_str(&format!("  {}: ", field.label().bold()));
        } else {
            output.push_str(&format!(
                "  {} [{}]: ",
                field.label().bold(),
                current.dimmed()
            ));
        }
        output
    }

    pub fn setup_required() -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", "Setup Required".yellow().bold()));
        output.push_str("Enter the registration webhook URL, e.g.\n");
        output.push_str(&format!(
            "  {}\n",
            "https://script.google.com/macros/s/YOUR_SCRIPT_ID/exec".dimmed()
        ));
        output.push_str("Webhook URL: ");
        output
    }

    pub fn retry_prompt() -> String {
        format!(
            "{} ",
            "Press Enter to retry with the same details, or type 'edit' to change them:".bold()
        )
    }

    pub fn submitting() -> String {
        format!("{}", "Submitting...".dimmed())
    }

    pub fn submitted_view() -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Successfully Registered!"));
        output.push_str("Your team has been registered for the design competition. Good luck!\n");
        output.push_str(&Self::footer());
        output
    }

    pub fn capacity_view() -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Capacity Reached"));
        output.push_str(&format!(
            "We've reached the maximum of {} team submissions for this competition.\n",
            CEILING
        ));
        output.push_str("Thank you for your interest!\n");
        output.push_str(&Self::footer());
        output
    }

    pub fn not_open_view(schedule: &LaunchSchedule) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Registration Not Open"));
        output.push_str(&format!(
            "Team registration opens at {}. Please wait for the countdown to complete.\n",
            schedule.launch_at().to_rfc3339()
        ));
        output.push_str(&format!("{}\n", "Redirecting to countdown page...".dimmed()));
        output
    }

    /// Spinner message for the countdown.
    pub fn countdown(remaining: &TimeRemaining) -> String {
        format!(
            "{} {}",
            "Registration opens in".bold(),
            remaining.to_string().cyan().bold()
        )
    }

    pub fn countdown_done() -> String {
        format!("{}", "Registration is open!".green().bold())
    }

    fn header(title: &str) -> String {
        format!(
            "\n{}\n  {}\n{}\n",
            "=".repeat(60).cyan(),
            title.bold(),
            "=".repeat(60).cyan()
        )
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

//! Pure formatting functions for console output.
//!
//! Every function returns the styled line; printing is left to the reporter.

use console::style;

/// Format an error message with a red prefix.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

/// Format a warning message with a yellow marker.
pub fn format_warning(message: &str) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), message)
}

/// Format a success message with a green checkmark.
pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

/// Format a status message with a yellow arrow.
pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// Format a verbose diagnostic line, dimmed.
pub fn format_verbose(message: &str) -> String {
    style(format!("  {}", message)).dim().to_string()
}

/// Format the proposed version change (or initial release).
///
/// # Arguments
/// * `current` - Current release tag, `None` for a first release
/// * `next` - The tag about to be created
pub fn format_proposed_tag(current: Option<&str>, next: &str) -> String {
    match current {
        Some(current) => format!(
            "Releasing {} → {}",
            style(current).red(),
            style(next).green().bold()
        ),
        None => format!("Initial release {}", style(next).green().bold()),
    }
}

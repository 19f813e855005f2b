//! Consistent styling utilities for PacFinder CLI output
//!
//! Respects the [NO_COLOR standard](https://no-color.org/) and detects
//! terminal capabilities.

use std::env;

use owo_colors::OwoColorize;
use supports_color::Stream;

use crate::core::classify::InstallReason;

/// Detect if colors should be enabled
#[must_use]
pub fn colors_enabled() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(val) = env::var("PACFINDER_COLORS") {
        if val == "never" || val == "0" || val == "false" {
            return false;
        }
        if val == "always" || val == "1" || val == "true" {
            return true;
        }
    }

    supports_color::on(Stream::Stdout).is_some_and(|level| level.has_basic)
}

/// Check if unicode borders and icons should be used
#[must_use]
pub fn use_unicode() -> bool {
    if let Ok(val) = env::var("PACFINDER_UNICODE") {
        return val != "0" && val != "false";
    }
    colors_enabled()
}

/// Apply color only if colors are enabled
#[inline]
#[must_use]
pub fn maybe_color(text: &str, f: impl Fn(&str) -> String) -> String {
    if colors_enabled() {
        f(text)
    } else {
        text.to_string()
    }
}

/// Header with arrow prefix (e.g., "==> core")
#[must_use]
pub fn header(msg: &str) -> String {
    maybe_color(msg, |m| format!("{} {}", "==>".magenta().bold(), m.bold()))
}

/// Error message
#[must_use]
pub fn error(msg: &str) -> String {
    maybe_color(msg, |m| format!("{} {}", "error:".red().bold(), m))
}

/// Arrow prefix for sub-items
#[must_use]
pub fn arrow(msg: &str) -> String {
    let icon = if use_unicode() { "→" } else { ">" };
    maybe_color(msg, |m| format!("{} {}", icon.cyan().bold(), m))
}

/// Dimmed/muted text
#[must_use]
pub fn dim(msg: &str) -> String {
    maybe_color(msg, |m| m.dimmed().to_string())
}

/// Package name
#[must_use]
pub fn package(name: &str) -> String {
    maybe_color(name, |n| n.bold().to_string())
}

/// Version string
#[must_use]
pub fn version(ver: &str) -> String {
    maybe_color(ver, |v| v.green().to_string())
}

/// Repository name
#[must_use]
pub fn repo(name: &str) -> String {
    maybe_color(name, |r| r.magenta().to_string())
}

/// Install reason, colored by kind
#[must_use]
pub fn reason(reason: InstallReason) -> String {
    maybe_color(reason.label(), |r| match reason {
        InstallReason::NotInstalled => r.dimmed().to_string(),
        InstallReason::Explicit => r.green().to_string(),
        InstallReason::Dependency => r.blue().to_string(),
        InstallReason::Optional => r.cyan().to_string(),
        InstallReason::Orphan => r.yellow().to_string(),
    })
}

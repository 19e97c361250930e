//! Formatting utilities for CLI output.
//!
//! ANSI-styled help text plus plain renderings of sink state and
//! configuration values.

use toml::Value;

/// ANSI escape codes used by the help and error output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";
    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Blue color
    pub const BLUE: &'static str = "\x1b[34m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats command names with styling
pub fn format_command(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::GREEN, text, Colors::RESET)
}

/// Formats category names with styling
pub fn format_category(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::BLUE, text, Colors::RESET)
}

/// Formats descriptions and examples with muted styling
pub fn format_description(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// One-line summary of a sink, e.g. `alsa_output.usb: 40% (muted)`
///
/// Volume is rounded to whole percent. No color, so output can be piped.
pub fn format_sink_state(sink: &str, volume: f64, muted: bool) -> String {
    let suffix = if muted { " (muted)" } else { "" };
    format!("{sink}: {volume:.0}%{suffix}")
}

/// Formats a TOML value for human-readable CLI output.
///
/// Arrays and tables show their size rather than full contents.
///
/// ```
/// use pawpulse::cli::formatting::format_toml_value;
///
/// let value = toml::Value::String("pawpulse".to_string());
/// assert_eq!(format_toml_value(&value), "\"pawpulse\"");
///
/// let value = toml::Value::Integer(5000);
/// assert_eq!(format_toml_value(&value), "5000");
/// ```
pub fn format_toml_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(arr) => format!("[{}]", arr.len()),
        Value::Table(table) => format!("{{{}}}", table.len()),
        Value::Datetime(datetime) => datetime.to_string(),
    }
}

//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

/// Formats and prints rows based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
        OutputFormat::Minimal => print_minimal(data),
    }
}

/// Prints rows under a header in table mode, plain otherwise.
pub fn print_section<T: Serialize + Tabled>(title: &str, data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Table {
        print_header(title);
    }
    print_output(data, format)
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints one whitespace separated line of values per row.
fn print_minimal<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    for item in data {
        let line = match serde_json::to_value(item)? {
            serde_json::Value::Object(fields) => fields
                .values()
                .map(minimal_value)
                .collect::<Vec<_>>()
                .join(" "),
            other => minimal_value(&other),
        };
        println!("{}", line);
    }
    Ok(())
}

fn minimal_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "nan".to_string(),
        other => other.to_string(),
    }
}

/// Formats a value in scientific notation for tables.
pub fn format_sci(value: f64) -> String {
    format!("{:.6e}", value)
}

/// Table cell formatter for float columns.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn display_sci(value: &f64) -> String {
    format_sci(*value)
}

/// Prints an info message.
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from a float in scientific notation.
    pub fn from_f64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, format_sci(value))
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sci() {
        assert_eq!(format_sci(1234.5), "1.234500e3");
        assert_eq!(format_sci(0.0), "0.000000e0");
    }

    #[test]
    fn test_minimal_value() {
        assert_eq!(minimal_value(&serde_json::json!("1h")), "1h");
        assert_eq!(minimal_value(&serde_json::json!(2.5)), "2.5");
        assert_eq!(minimal_value(&serde_json::Value::Null), "nan");
    }
}

//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::error::{ConfigError, Result};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).map_err(ConfigError::JsonError)?;
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Card list entry for display
#[derive(Debug, Clone, Serialize)]
pub struct CardListEntry {
    pub card: String,
    pub index: u32,
    pub monitor: Option<String>,
    pub driver: Option<String>,
}

impl TableDisplay for CardListEntry {
    fn to_table(&self) -> String {
        format!(
            "[{}] {} (monitor: {}, driver: {})",
            self.index,
            self.card,
            self.monitor.as_deref().unwrap_or("none"),
            self.driver.as_deref().unwrap_or("unknown")
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.index, self.card)
    }
}

/// Card list for display
#[derive(Debug, Clone, Serialize)]
pub struct CardList {
    pub cards: Vec<CardListEntry>,
}

impl TableDisplay for CardList {
    fn to_table(&self) -> String {
        let mut output = format!("AMD cards found: {}\n\n", self.cards.len());
        for card in &self.cards {
            output.push_str(&card.to_table());
            output.push('\n');
        }
        output
    }

    fn to_compact(&self) -> String {
        self.cards
            .iter()
            .map(|c| c.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One-shot temperature/fan snapshot for display
#[derive(Debug, Clone, Serialize)]
pub struct CardStatus {
    pub card: String,
    pub index: u32,
    pub temperature_celsius: Option<f64>,
    pub fan_percent: Option<f64>,
}

impl TableDisplay for CardStatus {
    fn to_table(&self) -> String {
        let temperature = match self.temperature_celsius {
            Some(t) => format!("{}°C", t),
            None => "unknown".to_string(),
        };
        let fan = match self.fan_percent {
            Some(p) => format!("{:.1}%", p),
            None => "unknown".to_string(),
        };
        format!(
            "[{}] {}\n  Temperature: {}\n  Fan Speed: {}\n",
            self.index, self.card, temperature, fan
        )
    }
}

/// Telemetry key/value report for one card
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryReport {
    pub card: String,
    pub values: Vec<TelemetryValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelemetryValue {
    pub key: String,
    pub value: Option<String>,
}

impl TableDisplay for TelemetryReport {
    fn to_table(&self) -> String {
        let mut output = format!("{}\n", self.card);
        for entry in &self.values {
            output.push_str(&format!(
                "  {:<20} {}\n",
                entry.key,
                entry.value.as_deref().unwrap_or("n/a")
            ));
        }
        output
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}

//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use specsheet_domain::{AnalysisRecord, AttributeResult, Outcome};
use specsheet_extractor::{default_label, Roster, RosterEntry};
use std::time::Duration;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Confidence above which a value is shown as reliable
pub const HIGH_CONFIDENCE: u8 = 70;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the results of a run.
    pub fn format_record(&self, record: &AnalysisRecord, roster: &Roster) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_record_json(record, roster),
            OutputFormat::Table => Ok(self.format_record_table(record, roster)),
            OutputFormat::Quiet => Ok(format_record_quiet(record)),
        }
    }

    fn format_record_json(&self, record: &AnalysisRecord, roster: &Roster) -> Result<String> {
        let timings = record.timings();
        let documents: Vec<serde_json::Value> = timings
            .documents
            .iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "method": d.method.as_str(),
                    "chars": d.chars,
                    "elapsed_secs": d.elapsed.as_secs_f64(),
                })
            })
            .collect();

        let results: Vec<serde_json::Value> = record
            .results()
            .iter()
            .map(|r| {
                let reason = match r.outcome() {
                    Outcome::Degraded(reason) => Some(reason.to_string()),
                    _ => None,
                };
                serde_json::json!({
                    "attribute": r.attribute(),
                    "label": label_for(roster, r.attribute()),
                    "value": r.value(),
                    "confidence": r.confidence().value(),
                    "outcome": r.outcome().label(),
                    "reason": reason,
                })
            })
            .collect();

        let output = serde_json::json!({
            "run_id": record.run_id().to_string(),
            "documents": documents,
            "timings": {
                "ingestion_secs": timings.ingestion().as_secs_f64(),
                "extraction_secs": timings.extraction.as_secs_f64(),
                "total_secs": timings.total().as_secs_f64(),
            },
            "results": results,
        });

        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn format_record_table(&self, record: &AnalysisRecord, roster: &Roster) -> String {
        if record.is_empty() {
            return self.colorize("No attributes analyzed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Attribute", "Value", "Confidence", "Status"]);

        for result in record.results() {
            builder.push_record([
                label_for(roster, result.attribute()),
                result.value().to_string(),
                self.confidence_cell(result),
                self.status_cell(result),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn confidence_cell(&self, result: &AttributeResult) -> String {
        let confidence = result.confidence();
        let text = format!("{}%", confidence.value());
        if confidence.value() > HIGH_CONFIDENCE {
            self.colorize(&text, "green")
        } else {
            self.colorize(&text, "yellow")
        }
    }

    fn status_cell(&self, result: &AttributeResult) -> String {
        match result.outcome() {
            Outcome::Found => result.outcome().label().to_string(),
            Outcome::NotFound => self.colorize(result.outcome().label(), "yellow"),
            Outcome::Degraded(reason) => {
                self.colorize(&format!("degraded: {}", reason), "red")
            }
        }
    }

    /// Summary cards shown above the results table.
    pub fn summary(&self, record: &AnalysisRecord) -> String {
        let timings = record.timings();
        let mut lines = vec![
            format!("Files processed:        {}", record.documents().len()),
            format!(
                "Total processing time:  {}",
                format_duration(timings.total())
            ),
            format!(
                "Analysis time:          {}",
                format_duration(timings.extraction)
            ),
        ];

        let degraded = record.degraded().count();
        if degraded > 0 {
            lines.push(self.warning(&format!(
                "{} of {} attribute(s) could not be analyzed",
                degraded,
                record.len()
            )));
        }

        lines.join("\n")
    }

    /// Format the configured attribute roster.
    pub fn format_roster(&self, roster: &Roster) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<serde_json::Value> = roster
                    .entries()
                    .iter()
                    .map(|entry| match entry {
                        RosterEntry::Valid(spec) => serde_json::json!({
                            "attribute": spec.name,
                            "label": spec.label(),
                            "model": spec.model,
                            "answer_marker": spec.answer_marker(),
                            "valid": true,
                        }),
                        RosterEntry::Invalid { name, reason } => serde_json::json!({
                            "attribute": name,
                            "label": entry.label(),
                            "valid": false,
                            "reason": reason,
                        }),
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Quiet => Ok(roster.names().join("\n")),
            OutputFormat::Table => {
                if roster.is_empty() {
                    return Ok(self.colorize(
                        "No attributes configured. Run `specsheet init` to write a template.",
                        "yellow",
                    ));
                }

                let mut builder = Builder::default();
                builder.push_record(["Attribute", "Label", "Model", "Status"]);
                for entry in roster.entries() {
                    match entry {
                        RosterEntry::Valid(spec) => builder.push_record([
                            spec.name.clone(),
                            spec.label(),
                            spec.model.clone(),
                            self.colorize("ok", "green"),
                        ]),
                        RosterEntry::Invalid { name, reason } => builder.push_record([
                            name.clone(),
                            entry.label(),
                            String::new(),
                            self.colorize(&format!("invalid: {}", reason), "red"),
                        ]),
                    }
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Display label of an attribute, falling back to its title-cased key.
pub fn label_for(roster: &Roster, attribute: &str) -> String {
    roster
        .get(attribute)
        .map(RosterEntry::label)
        .unwrap_or_else(|| default_label(attribute))
}

fn format_record_quiet(record: &AnalysisRecord) -> String {
    record
        .results()
        .iter()
        .map(|r| format!("{}={}", r.attribute(), r.value()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

//! Rendering of a decoded command mapping

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;
use wpd_command::{classify, keys, render_values_with, status, CommandError, Status};
use wpd_core::{PropertyKey, PropertyValues};

#[derive(Debug, Serialize)]
pub struct Report {
    /// Command named by the mapping's category/id entries, if any
    pub command: Option<String>,
    pub status: String,
    pub outcome: &'static str,
    pub entries: Vec<EntryReport>,
}

#[derive(Debug, Serialize)]
pub struct EntryReport {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tag: String,
    pub value: String,
}

/// The command a request mapping invokes
fn command_of(values: &PropertyValues) -> Option<PropertyKey> {
    if !values.has(&keys::COMMAND_CATEGORY) {
        return None;
    }
    Some(PropertyKey::new(
        values.read::<Uuid>(&keys::COMMAND_CATEGORY),
        values.read::<u32>(&keys::COMMAND_ID),
    ))
}

impl Report {
    pub fn new(values: &PropertyValues, names: &HashMap<PropertyKey, String>) -> Self {
        let command = command_of(values);
        let context = command.unwrap_or(PropertyKey::new(Uuid::nil(), 0));
        let (status, outcome) = match status::read_status(context, values) {
            Ok(code) => {
                let outcome = match classify(code) {
                    Status::Ok => "succeeded",
                    Status::NotSupported => "not supported",
                    Status::Failed(_) => "failed",
                };
                (code.to_string(), outcome)
            }
            Err(CommandError::MissingStatus { .. }) => ("<missing>".to_string(), "no status"),
            Err(err) => (err.to_string(), "malformed"),
        };

        let entries = values
            .iter()
            .map(|(key, value)| EntryReport {
                key: key.to_string(),
                name: names.get(key).cloned(),
                tag: value.tag().to_string(),
                value: value.to_debug_string(),
            })
            .collect();

        Self {
            command: command.map(|c| c.to_string()),
            status,
            outcome,
            entries,
        }
    }
}

/// Plain-text rendering: the entry dump followed by a status line
pub fn render_text(values: &PropertyValues, names: &HashMap<PropertyKey, String>) -> String {
    let report = Report::new(values, names);
    let mut out = String::new();
    if let Some(command) = &report.command {
        out.push_str(&format!("command: {}\n", command));
    }
    out.push_str(&render_values_with(values, |key| names.get(key).map(String::as_str)));
    out.push_str(&format!("status: {} ({})\n", report.status, report.outcome));
    out
}

pub fn render_json(values: &PropertyValues, names: &HashMap<PropertyKey, String>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report::new(values, names))
}

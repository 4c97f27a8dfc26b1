//! Header-alias resolution, row validation, and format parsing

use crate::analytics_core::TransactionRecord;
use serde_json::Value;
use std::collections::HashMap;

/// Required canonical fields, in diagnostic order.
pub const CANONICAL_FIELDS: [&str; 3] = ["pk", "coins", "action"];

/// Per-file ingestion failure. Non-fatal to the batch; the failing file
/// contributes zero reports.
#[derive(Debug)]
pub enum IngestError {
    UnsupportedFileType(String),
    EmptyFile,
    /// Required canonical fields with no recognized header alias.
    MissingFields(Vec<&'static str>),
    /// A data row left required fields empty.
    MissingValues { line: usize, fields: Vec<&'static str> },
    MalformedLine { line: usize, message: String },
    Io(std::io::Error),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::UnsupportedFileType(ext) => {
                write!(f, "Unsupported file type '{}': only .csv and .jsonl are supported", ext)
            }
            IngestError::EmptyFile => write!(f, "File contains no rows"),
            IngestError::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            IngestError::MissingValues { line, fields } => {
                write!(f, "Line {}: empty required field(s): {}", line, fields.join(", "))
            }
            IngestError::MalformedLine { line, message } => {
                write!(f, "Line {}: {}", line, message)
            }
            IngestError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err)
    }
}

/// Lowercase and strip all whitespace, so `"User ID"` matches `userid`.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a normalized header/key to its canonical field, if recognized.
fn canonical_field(normalized: &str) -> Option<&'static str> {
    match normalized {
        "pk" | "id" | "userid" | "user_id" | "sk" => Some("pk"),
        "coins" | "coin" | "amount" | "value" => Some("coins"),
        "action" | "type" | "event" | "actiontype" => Some("action"),
        "timestamp" | "time" | "ts" => Some("timestamp"),
        _ => None,
    }
}

/// Unparsable coin values coerce to 0 rather than failing the file.
fn coerce_coins(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

fn parse_timestamp(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Parse CSV text: a header row with aliased column names, then data rows.
pub fn parse_csv(text: &str) -> Result<Vec<TransactionRecord>, IngestError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    // First alias wins per canonical field, matching the original resolver.
    let mut columns: HashMap<&'static str, usize> = HashMap::new();
    for (index, header) in lines[0].split(',').enumerate() {
        if let Some(field) = canonical_field(&normalize_key(header)) {
            columns.entry(field).or_insert(index);
        }
    }

    let missing: Vec<&'static str> = CANONICAL_FIELDS
        .iter()
        .filter(|field| !columns.contains_key(**field))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingFields(missing));
    }
    if lines.len() == 1 {
        return Err(IngestError::EmptyFile);
    }

    let cell = |values: &[&str], field: &str| -> String {
        columns
            .get(field)
            .and_then(|index| values.get(*index))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    let mut records = Vec::with_capacity(lines.len() - 1);
    for (offset, row) in lines[1..].iter().enumerate() {
        let line = offset + 2; // 1-based, after the header
        let values: Vec<&str> = row.split(',').collect();

        let user_id = cell(&values, "pk");
        let action = cell(&values, "action");
        let mut empty = Vec::new();
        if user_id.is_empty() {
            empty.push("pk");
        }
        if action.is_empty() {
            empty.push("action");
        }
        if !empty.is_empty() {
            return Err(IngestError::MissingValues { line, fields: empty });
        }

        let timestamp = columns
            .get("timestamp")
            .and_then(|index| values.get(*index))
            .and_then(|value| parse_timestamp(value));

        records.push(TransactionRecord {
            user_id,
            coins: coerce_coins(&cell(&values, "coins")),
            action,
            timestamp,
        });
    }
    Ok(records)
}

fn value_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn value_to_coins(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => coerce_coins(s),
        _ => 0.0,
    }
}

fn value_to_timestamp(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_timestamp(s),
        _ => None,
    }
}

/// Parse JSONL text: one object per line, keys resolved through the same
/// alias table as CSV headers.
pub fn parse_jsonl(text: &str) -> Result<Vec<TransactionRecord>, IngestError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    let mut records = Vec::with_capacity(lines.len());
    for (position, (line, raw)) in lines.iter().enumerate() {
        let value: Value = serde_json::from_str(raw).map_err(|err| IngestError::MalformedLine {
            line: *line,
            message: err.to_string(),
        })?;
        let Value::Object(object) = value else {
            return Err(IngestError::MalformedLine {
                line: *line,
                message: "expected a JSON object".to_string(),
            });
        };

        let mut fields: HashMap<&'static str, &Value> = HashMap::new();
        for (key, value) in &object {
            if let Some(field) = canonical_field(&normalize_key(key)) {
                fields.entry(field).or_insert(value);
            }
        }

        // The first row stands in for a header: unrecognized keys across the
        // board surface as missing canonical fields.
        if position == 0 {
            let missing: Vec<&'static str> = CANONICAL_FIELDS
                .iter()
                .filter(|field| !fields.contains_key(**field))
                .copied()
                .collect();
            if !missing.is_empty() {
                return Err(IngestError::MissingFields(missing));
            }
        }

        let user_id = value_to_string(fields.get("pk").copied());
        let action = value_to_string(fields.get("action").copied());
        let mut empty = Vec::new();
        if user_id.is_empty() {
            empty.push("pk");
        }
        if action.is_empty() {
            empty.push("action");
        }
        if !empty.is_empty() {
            return Err(IngestError::MissingValues { line: *line, fields: empty });
        }

        records.push(TransactionRecord {
            user_id,
            coins: value_to_coins(fields.get("coins").copied()),
            action,
            timestamp: value_to_timestamp(fields.get("timestamp").copied()),
        });
    }
    Ok(records)
}

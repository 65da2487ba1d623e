//! Payload decoding for list reads.
//!
//! The script endpoint answers with a JSON array of objects; the CSV export
//! answers with a header row followed by data rows. Both are normalized into
//! [`Fields`] rows keyed by lowercase column name.

use std::cmp::Ordering;

use serde_json::Value;

use crate::error::{HubError, Result};
use crate::types::Fields;

/// Decode a list body into normalized rows
pub fn parse_rows(body: &str) -> Result<Vec<Fields>> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();

    if trimmed.is_empty() {
        return Err(HubError::MalformedPayload("empty body".to_string()));
    }

    match trimmed.chars().next() {
        Some('[') => parse_json_rows(trimmed),
        Some('{') => Err(HubError::MalformedPayload(
            "expected a JSON array, got an object".to_string(),
        )),
        // Login pages and script error pages come back as HTML
        Some('<') => Err(HubError::MalformedPayload(
            "expected JSON or CSV, got HTML".to_string(),
        )),
        _ => parse_csv_rows(trimmed),
    }
}

fn parse_json_rows(body: &str) -> Result<Vec<Fields>> {
    let values: Vec<Value> = serde_json::from_str(body)?;

    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(map) => Some(
                map.into_iter()
                    .map(|(key, value)| (normalize_key(&key), cell_text(value)))
                    .collect(),
            ),
            _ => None,
        })
        .collect())
}

fn parse_csv_rows(body: &str) -> Result<Vec<Fields>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_key).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Fields = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Sheet cells come back typed (ids as numbers, empty cells as null)
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Numeric value of a timestamp-derived id, `None` when it is not a number
pub fn id_sort_key(id: &str) -> Option<f64> {
    id.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Newest-first comparison: larger numeric ids first, non-numeric ids last
pub fn newest_first(a: &str, b: &str) -> Ordering {
    match (id_sort_key(a), id_sort_key(b)) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

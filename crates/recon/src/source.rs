//! Line-delimited JSON reference source.

use std::io::BufRead;

use serde_json::Value;

use crate::error::ReconError;
use crate::model::{Record, SourceRecord};

/// One line of the source: its 0-based index and the parsed record.
#[derive(Debug)]
pub struct SourceEntry {
    pub sequence: u64,
    pub result: Result<SourceRecord, ReconError>,
}

/// Lazy iterator over a JSON-lines reader. Restart by building a new one
/// over a fresh reader.
pub struct JsonLinesSource<R> {
    reader: R,
    id_field: String,
    next_line: u64,
    buf: String,
    done: bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R, id_field: impl Into<String>) -> Self {
        Self {
            reader,
            id_field: id_field.into(),
            next_line: 0,
            buf: String::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = SourceEntry;

    fn next(&mut self) -> Option<SourceEntry> {
        loop {
            if self.done {
                return None;
            }

            self.buf.clear();
            let sequence = self.next_line;
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => self.next_line += 1,
                // The offending line is consumed; keep going with the next one
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    self.next_line += 1;
                    return Some(SourceEntry {
                        sequence,
                        result: Err(ReconError::LineParse {
                            line: sequence,
                            message: e.to_string(),
                        }),
                    });
                }
                Err(e) => {
                    self.done = true;
                    return Some(SourceEntry {
                        sequence,
                        result: Err(ReconError::from(e)),
                    });
                }
            }

            let line = self.buf.trim();
            if line.is_empty() {
                log::debug!("skipping blank line {sequence}");
                continue;
            }

            return Some(SourceEntry {
                sequence,
                result: parse_line(line, &self.id_field, sequence),
            });
        }
    }
}

/// Parse one reference line and resolve its identifier.
pub fn parse_line(line: &str, id_field: &str, sequence: u64) -> Result<SourceRecord, ReconError> {
    let value: Value = serde_json::from_str(line).map_err(|e| ReconError::LineParse {
        line: sequence,
        message: e.to_string(),
    })?;

    let document = match value {
        Value::Object(map) => map,
        other => {
            return Err(ReconError::LineParse {
                line: sequence,
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            })
        }
    };

    let identifier = extract_identifier(&document, id_field).ok_or_else(|| {
        ReconError::MissingIdentifier {
            line: sequence,
            field: id_field.to_string(),
        }
    })?;

    Ok(SourceRecord { identifier, document })
}

/// First element of the identifier sequence; a bare string is accepted too.
pub fn extract_identifier(document: &Record, id_field: &str) -> Option<String> {
    let first = match document.get(id_field)? {
        Value::Array(items) => items.first()?,
        other => other,
    };

    let id = match first {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

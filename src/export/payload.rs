//! Delimited payload encoding
//!
//! Records are written one per line in schema column order, with no header.
//! Fields are quoted only when they contain the delimiter, a quote or a line
//! break, so values survive a round trip through the SQLite shell's
//! `.import` in csv mode. A missing or null field is written as an empty
//! string, which is why the import script follows up with `UPDATE ... = NULL`.

use std::borrow::Cow;

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde_json::Value;

use super::ExportError;
use crate::models::{Column, Record};

/// Field delimiter used when none is configured
pub const DEFAULT_DELIMITER: char = '|';

/// Text form of a single field value
pub fn render_value(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(b)) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Writes and reads delimited payloads for a column schema
#[derive(Debug, Clone, Copy)]
pub struct PayloadWriter {
    delimiter: u8,
}

impl PayloadWriter {
    /// Create a writer for `delimiter`, which must be a single ASCII character
    /// other than a quote or a line break
    pub fn new(delimiter: char) -> Result<Self, ExportError> {
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\n' | '\r') {
            return Err(ExportError::InvalidInput(format!(
                "Unsupported payload delimiter: {:?}",
                delimiter
            )));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }

    /// The delimiter as a character
    pub fn delimiter(&self) -> char {
        self.delimiter as char
    }

    /// Render each record as one delimited entry, without line terminators.
    ///
    /// An entry holding a value with an embedded newline spans several
    /// physical lines inside quotes.
    pub fn render_lines(
        &self,
        records: &[&Record],
        columns: &[Column],
    ) -> Result<Vec<String>, ExportError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        let mut ends = Vec::with_capacity(records.len());
        for record in records {
            writer.write_record(
                columns
                    .iter()
                    .map(|col| render_value(record.get(&col.name)).into_owned()),
            )?;
            writer.flush().map_err(|e| ExportError::Payload(e.to_string()))?;
            ends.push(writer.get_ref().len());
        }

        let buffer = writer
            .into_inner()
            .map_err(|e| ExportError::Payload(e.to_string()))?;
        let text = String::from_utf8(buffer).map_err(|e| ExportError::Payload(e.to_string()))?;

        let mut lines = Vec::with_capacity(ends.len());
        let mut start = 0;
        for end in ends {
            // Each entry ends with the single-byte terminator
            lines.push(text[start..end - 1].to_string());
            start = end;
        }
        Ok(lines)
    }

    /// Render all records as a payload document, one newline-terminated
    /// entry per record
    pub fn render(&self, records: &[&Record], columns: &[Column]) -> Result<String, ExportError> {
        Ok(join_lines(&self.render_lines(records, columns)?))
    }

    /// Header line naming the columns, for callers whose loader expects one
    pub fn header(&self, columns: &[Column]) -> Result<String, ExportError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(columns.iter().map(|col| col.name.as_str()))?;
        let buffer = writer
            .into_inner()
            .map_err(|e| ExportError::Payload(e.to_string()))?;
        let text = String::from_utf8(buffer).map_err(|e| ExportError::Payload(e.to_string()))?;
        Ok(text.trim_end_matches('\n').to_string())
    }

    /// Parse a payload back into raw text fields, one row per record.
    ///
    /// Every row must have exactly one field per column.
    pub fn parse(&self, payload: &str, columns: &[Column]) -> Result<Vec<Vec<String>>, ExportError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(payload.as_bytes());

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() != columns.len() {
                return Err(ExportError::Payload(format!(
                    "Row {} has {} fields, expected {}",
                    idx,
                    record.len(),
                    columns.len()
                )));
            }
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}

impl Default for PayloadWriter {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
        }
    }
}

pub(crate) fn join_lines(lines: &[String]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValueType;
    use serde_json::json;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("a", ValueType::Integer),
            Column::new("b", ValueType::Text).with_nulls(true),
            Column::new("c", ValueType::Real).with_nulls(true),
        ]
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(None), "");
        assert_eq!(render_value(Some(&json!(null))), "");
        assert_eq!(render_value(Some(&json!("x y"))), "x y");
        assert_eq!(render_value(Some(&json!(12))), "12");
        assert_eq!(render_value(Some(&json!(0.5))), "0.5");
        assert_eq!(render_value(Some(&json!(false))), "false");
        assert_eq!(render_value(Some(&json!({"k": [1]}))), r#"{"k":[1]}"#);
    }

    #[test]
    fn test_render_column_order_and_missing() {
        let r1 = record(json!({"c": 1.5, "a": 1, "b": "x"}));
        let r2 = record(json!({"a": 2, "b": null}));
        let payload = PayloadWriter::default()
            .render(&[&r1, &r2], &columns())
            .unwrap();

        assert_eq!(payload, "1|x|1.5\n2||\n");
    }

    #[test]
    fn test_render_quotes_special_values() {
        let r = record(json!({"a": 1, "b": "pipe|and \"quote\"\nnewline"}));
        let lines = PayloadWriter::default()
            .render_lines(&[&r], &columns())
            .unwrap();

        assert_eq!(lines, vec!["1|\"pipe|and \"\"quote\"\"\nnewline\"|"]);
    }

    #[test]
    fn test_parse_back() {
        let r1 = record(json!({"a": 1, "b": "a|b", "c": 2.25}));
        let r2 = record(json!({"a": 2, "b": "line\nbreak"}));
        let writer = PayloadWriter::default();
        let payload = writer.render(&[&r1, &r2], &columns()).unwrap();

        let rows = writer.parse(&payload, &columns()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "a|b", "2.25"]);
        assert_eq!(rows[1], vec!["2", "line\nbreak", ""]);
    }

    #[test]
    fn test_custom_delimiter_and_header() {
        let writer = PayloadWriter::new('\t').unwrap();
        let r = record(json!({"a": 1, "b": "x|y"}));
        assert_eq!(writer.render(&[&r], &columns()).unwrap(), "1\tx|y\t\n");
        assert_eq!(writer.header(&columns()).unwrap(), "a\tb\tc");
        assert_eq!(writer.delimiter(), '\t');
    }

    #[test]
    fn test_invalid_delimiter() {
        assert!(PayloadWriter::new('"').is_err());
        assert!(PayloadWriter::new('\n').is_err());
        assert!(PayloadWriter::new('§').is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_width() {
        let err = PayloadWriter::default()
            .parse("1|2\n", &columns())
            .unwrap_err();
        assert!(matches!(err, ExportError::Payload(_)));
    }

    #[test]
    fn test_empty_records() {
        let payload = PayloadWriter::default().render(&[], &columns()).unwrap();
        assert_eq!(payload, "");
    }
}

// src/parse/mod.rs
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// Column names, from the first line of the file.
/// Shared by every record of a single parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Arc<[String]>,
    /// name → column position; for duplicate names the later column wins
    index: Arc<HashMap<String, usize>>,
}

impl Header {
    fn from_line(line: &str) -> Self {
        let names: Vec<String> = line.split(',').map(str::to_string).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect::<HashMap<_, _>>();
        Self {
            names: names.into(),
            index: Arc::new(index),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One data row, addressed by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Header,
    /// Positional values; shorter than the header when the row was short.
    values: Vec<String>,
}

impl Record {
    /// Value of `field`, or `None` when the header has no such column or the
    /// row ended before reaching it.
    pub fn get(&self, field: &str) -> Option<&str> {
        let idx = *self.header.index.get(field)?;
        self.values.get(idx).map(String::as_str)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Iterate `(name, value)` pairs in header order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.header
            .names
            .iter()
            .enumerate()
            .map(move |(i, n)| (n.as_str(), self.values.get(i).map(String::as_str)))
    }
}

/// Turns raw delimited text into records.
pub trait RecordParser {
    fn parse(&self, text: &str) -> Vec<Record>;
}

/// Plain comma splitting: no quoting, no escapes, no line-ending cleanup.
///
/// - line 1 is the header
/// - the final line is always dropped, so input is expected to end in `\n`;
///   without it the last data row is lost
/// - short rows leave trailing columns absent, long rows lose their extras
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveCsv;

impl RecordParser for NaiveCsv {
    fn parse(&self, text: &str) -> Vec<Record> {
        let lines: Vec<&str> = text.split('\n').collect();
        let header = Header::from_line(lines[0]);

        let body = if lines.len() > 2 {
            &lines[1..lines.len() - 1]
        } else {
            &[][..]
        };

        let records: Vec<Record> = body
            .iter()
            .map(|line| {
                let values = line
                    .split(',')
                    .take(header.len())
                    .map(str::to_string)
                    .collect();
                Record {
                    header: header.clone(),
                    values,
                }
            })
            .collect();

        debug!(
            columns = header.len(),
            rows = records.len(),
            "parsed naive csv"
        );
        records
    }
}

/// Convenience for the default parser.
pub fn parse(text: &str) -> Vec<Record> {
    NaiveCsv.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_with_trailing_newline() {
        let text = "Borough,EnteredOn,EventType\n\
                    Manhattan,1/2/2018 10:00:00 AM,Shooting Permit\n\
                    Queens,3/4/2017 09:00:00 PM,Theater Load in and Load Outs\n";
        let records = parse(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Borough"), Some("Manhattan"));
        assert_eq!(records[0].get("EnteredOn"), Some("1/2/2018 10:00:00 AM"));
        assert_eq!(records[1].get("EventType"), Some("Theater Load in and Load Outs"));
        for r in &records {
            assert!(r.fields().all(|(_, v)| v.is_some()));
        }
    }

    #[test]
    fn test_last_line_dropped_without_trailing_newline() {
        let text = "a,b\n1,2\n3,4";
        let records = parse(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("a"), Some("1"));
    }

    #[test]
    fn test_short_and_long_rows() {
        let text = "a,b,c\n1\n1,2,3,4,5\n";
        let records = parse(text);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].get("a"), Some("1"));
        assert_eq!(records[0].get("b"), None);
        assert_eq!(records[0].get("c"), None);

        assert_eq!(records[1].get("c"), Some("3"));
        assert_eq!(records[1].fields().count(), 3);
    }

    #[test]
    fn test_quotes_are_not_special() {
        let text = "name,borough\n\"Smith, J\",Bronx\n";
        let records = parse(text);
        assert_eq!(records[0].get("name"), Some("\"Smith"));
        assert_eq!(records[0].get("borough"), Some(" J\""));
    }

    #[test]
    fn test_crlf_is_kept() {
        let text = "a,b\r\n1,2\r\n";
        let records = parse(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("b\r"), Some("2\r"));
        assert_eq!(records[0].get("b"), None);
    }

    #[test]
    fn test_duplicate_header_later_wins() {
        let records = parse("x,x\n1,2\n");
        assert_eq!(records[0].get("x"), Some("2"));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(parse("").is_empty());
        assert!(parse("a,b").is_empty());
        assert!(parse("a,b\n").is_empty());
        assert_eq!(parse("a,b\n\n").len(), 1);
    }
}

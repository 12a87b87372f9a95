//! Header and record splitting
//!
//! Records are read with [`csv`]: comma separated, optional double quotes, `""` as an escaped
//! quote, and quoted cells may span lines. Rows may be ragged; padding happens when a row is
//! materialized.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;

use crate::error::{ImportError, Result};

const BOM: char = '\u{feff}';

fn reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.trim_start_matches(BOM).as_bytes())
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

/// Ordered header names from the first line of a file
pub fn parse_header(raw_first_line: &str) -> Vec<String> {
    split_record(raw_first_line)
}

/// Split one record into trimmed fields. Anything after the first record is ignored.
pub fn split_record(line: &str) -> Vec<String> {
    let mut record = StringRecord::new();
    match reader(line).read_record(&mut record) {
        Ok(true) => record.iter().map(str::to_string).collect(),
        _ => vec![String::new()],
    }
}

/// One data record
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    /// 1-based line number where the record starts
    pub line: usize,
    pub values: Vec<String>,
}

/// Header plus data records of a file
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Split a whole file. Blank records are skipped; the first non-blank one is the header.
pub fn parse_document(text: &str) -> Result<CsvDocument> {
    let mut reader = reader(text);
    let mut headers = None;
    let mut records = vec![];

    for result in reader.records() {
        let record = result.map_err(|e| ImportError::Malformed {
            line: e.position().map_or(0, |p| p.line() as usize),
            message: e.to_string(),
        })?;
        if is_blank(&record) {
            continue;
        }
        let values: Vec<String> = record.iter().map(str::to_string).collect();
        match headers {
            None => headers = Some(values),
            Some(_) => records.push(Record {
                line: record.position().map_or(0, |p| p.line() as usize),
                values,
            }),
        }
    }

    let headers = headers.ok_or(ImportError::EmptyFile)?;
    Ok(CsvDocument { headers, records })
}

//! `filename,leftover_ratio,cleanup_score` tabular output.
//!
//! Rows end in CRLF and fields are quoted only when they contain a delimiter,
//! a quote or a line break, matching RFC 4180 minimal quoting.

use crate::constants::report::{CSV_HEADER, CSV_RATIO_PRECISION};
use crate::core_modules::scoring::CleanupScore;
use crate::error::{AssessmentError, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const DELIMITER: char = ',';
const QUOTE: char = '"';
const LINE_TERMINATOR: &str = "\r\n";

/// One CSV data row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow<'a> {
    pub filename: &'a str,
    pub leftover_ratio: f64,
    pub cleanup_score: CleanupScore,
}

fn escape(field: &str) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\r' || c == '\n');
    if needs_quotes {
        Cow::Owned(format!("{QUOTE}{}{QUOTE}", field.replace(QUOTE, "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> std::io::Result<()> {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            write!(writer, "{DELIMITER}")?;
        }
        writer.write_all(escape(field).as_bytes())?;
    }
    writer.write_all(LINE_TERMINATOR.as_bytes())
}

/// Writes the header and every row to `writer`.
pub fn write_rows<'a, W: Write>(
    writer: &mut W,
    rows: impl IntoIterator<Item = CsvRow<'a>>,
) -> std::io::Result<()> {
    write_record(writer, &CSV_HEADER)?;
    let precision = CSV_RATIO_PRECISION;
    for row in rows {
        let ratio = format!("{:.precision$}", row.leftover_ratio);
        write_record(writer, &[row.filename, &ratio, row.cleanup_score.label()])?;
    }
    writer.flush()
}

/// Writes the CSV report to `path`, replacing any existing file.
pub fn write_csv<'a>(path: &Path, rows: impl IntoIterator<Item = CsvRow<'a>>) -> Result<()> {
    let file = File::create(path).map_err(|err| AssessmentError::report_write(path, err))?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, rows).map_err(|err| AssessmentError::report_write(path, err))
}

//! CSV input and output for training corpora and batch scoring.
//!
//! Structural problems (missing columns, short rows, empty training fields,
//! unknown labels) reject the whole file with [`DetectorError::Data`]; no row
//! is ever skipped silently.

use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{DetectorError, Result};
use crate::models::{Label, LabeledEmail, ScoredRecord};

/// Columns appended to every batch record on output.
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "prediction",
    "confidence",
    "risk_count",
    "risk_percent",
    "severity",
    "highlighted",
];

/// Batch records, kept as raw columns so they can be written back verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInput {
    pub headers: Vec<String>,
    pub text_index: usize,
    pub rows: Vec<Vec<String>>,
}

impl BatchInput {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input)
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| DetectorError::Data(format!("missing required column '{}'", name)))
}

/// Read a labeled training corpus with `text` and `label` columns.
pub fn read_corpus<R: Read>(input: R) -> Result<Vec<LabeledEmail>> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let text_index = column(&headers, "text")?;
    let label_index = column(&headers, "label")?;

    let mut corpus = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let row = i + 2;
        let text = match record.get(text_index) {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(DetectorError::Data(format!("row {}: missing text", row))),
        };
        let label = match record.get(label_index) {
            Some(l) if !l.trim().is_empty() => Label::parse(l)
                .map_err(|e| DetectorError::Data(format!("row {}: {}", row, e)))?,
            _ => return Err(DetectorError::Data(format!("row {}: missing label", row))),
        };
        corpus.push(LabeledEmail {
            text: text.to_string(),
            label,
        });
    }

    debug!(rows = corpus.len(), "read training corpus");
    Ok(corpus)
}

pub fn load_corpus(path: &Path) -> Result<Vec<LabeledEmail>> {
    read_corpus(std::fs::File::open(path)?)
}

/// Read batch records; the `text` column is required.
///
/// Empty text is a valid record. A row with fewer fields than the header is
/// rejected.
pub fn read_batch<R: Read>(input: R) -> Result<BatchInput> {
    let mut rdr = reader(input);
    let headers_record = rdr.headers()?.clone();
    let text_index = column(&headers_record, "text")?;
    let headers: Vec<String> = headers_record.iter().map(str::to_string).collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() < headers.len() {
            return Err(DetectorError::Data(format!(
                "row {}: expected {} fields, found {}",
                i + 2,
                headers.len(),
                record.len()
            )));
        }
        rows.push(record.iter().take(headers.len()).map(str::to_string).collect());
    }

    debug!(rows = rows.len(), "read batch input");
    Ok(BatchInput {
        headers,
        text_index,
        rows,
    })
}

pub fn load_batch(path: &Path) -> Result<BatchInput> {
    read_batch(std::fs::File::open(path)?)
}

/// Write scored records: the input columns followed by [`OUTPUT_COLUMNS`].
pub fn write_batch<W: Write>(output: W, headers: &[String], records: &[ScoredRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(output);

    let mut header_row: Vec<&str> = headers.iter().map(String::as_str).collect();
    header_row.extend(OUTPUT_COLUMNS);
    wtr.write_record(&header_row)?;

    for record in records {
        let mut row = record.fields.clone();
        row.push(record.prediction.label.to_string());
        row.push(format!("{:.4}", record.prediction.confidence));
        row.push(record.risk.match_count.to_string());
        row.push(format!("{:.0}", record.risk.risk_percent));
        row.push(record.risk.severity.to_string());
        row.push(record.risk.highlighted_text.clone());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

//! In-memory table of string cells shared by every pipeline stage.
//!
//! A [`Frame`] is the unit of exchange between the loader, the join engine,
//! and the projector: ordered headers plus one `Vec<String>` per row. Empty
//! cells stand in for missing values, matching CSV semantics. Header
//! normalization (trim, lowercase, space to underscore) lives here because
//! every input table goes through it before any name resolution happens.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use encoding_rs::Encoding;

use crate::io_utils;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Frame { headers, rows }
    }

    /// Read a delimited file fully into memory.
    pub fn from_path(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)
            .with_context(|| format!("Reading headers from {path:?}"))?;
        let mut rows = Vec::new();
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record =
                record.with_context(|| format!("Reading row {} of {path:?}", row_idx + 2))?;
            rows.push(io_utils::decode_record(&record, encoding)?);
        }
        Ok(Frame { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Canonicalize every header in place. Row count and order are untouched.
    /// Two distinct headers collapsing onto one normalized name is a
    /// data-quality problem upstream and is not defended against here.
    pub fn normalize_headers(&mut self) {
        for header in &mut self.headers {
            *header = normalize_header(header);
        }
    }

    /// Overwrite an existing column's cells; `values` must cover every row.
    pub fn replace_column(&mut self, index: usize, values: Vec<String>) -> Result<()> {
        ensure!(
            index < self.headers.len(),
            "Column index {index} out of range for {} column(s)",
            self.headers.len()
        );
        ensure!(
            values.len() == self.rows.len(),
            "Replacement column has {} value(s) for {} row(s)",
            values.len(),
            self.rows.len()
        );
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value;
        }
        Ok(())
    }

    /// Append a column on the right; `values` must cover every row.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        ensure!(
            values.len() == self.rows.len(),
            "Column '{name}' has {} value(s) for {} row(s)",
            values.len(),
            self.rows.len()
        );
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }
}

pub fn normalize_header(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        Frame::new(
            vec![" Accident Index ".to_string(), "Vehicle Reference".to_string()],
            vec![
                vec!["A1".to_string(), "1".to_string()],
                vec!["A2".to_string(), "2".to_string()],
            ],
        )
    }

    #[test]
    fn normalize_header_trims_lowercases_and_underscores() {
        assert_eq!(normalize_header(" Accident Index "), "accident_index");
        assert_eq!(normalize_header("Local Authority (District)"), "local_authority_(district)");
        assert_eq!(normalize_header("severity"), "severity");
    }

    #[test]
    fn normalize_headers_is_idempotent() {
        let mut frame = sample_frame();
        frame.normalize_headers();
        let once = frame.clone();
        frame.normalize_headers();
        assert_eq!(frame, once);
    }

    #[test]
    fn normalize_headers_leaves_rows_untouched() {
        let mut frame = sample_frame();
        let rows_before = frame.rows().to_vec();
        frame.normalize_headers();
        assert_eq!(frame.headers(), ["accident_index", "vehicle_reference"]);
        assert_eq!(frame.rows(), rows_before.as_slice());
    }

    #[test]
    fn push_column_rejects_length_mismatch() {
        let mut frame = sample_frame();
        assert!(frame.push_column("year", vec!["2020".to_string()]).is_err());
        assert!(
            frame
                .push_column("year", vec!["2020".to_string(), "2021".to_string()])
                .is_ok()
        );
        assert_eq!(frame.column_index("year"), Some(2));
        assert_eq!(frame.rows()[1][2], "2021");
    }
}

//! Tidy-table serialization: Parquet through Arrow, or plain CSV.
//!
//! The projected frame is all strings; Parquet output types the derived
//! columns (year as 64-bit integer, date and month as `Date32`) and keeps
//! everything else Utf8. Empty cells become nulls in both cases.

use std::{collections::HashSet, fs, fs::File, path::Path, sync::Arc};

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Date32Builder, Int64Builder, StringBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use parquet::{
    arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties,
};

use crate::{
    cli::OutputFormat,
    dates::{MONTH_COLUMN, YEAR_COLUMN},
    frame::Frame,
    io_utils,
};

pub fn write_frame(
    frame: &Frame,
    path: &Path,
    format: OutputFormat,
    date_column: Option<&str>,
) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output directory {parent:?}"))?;
    }
    match format {
        OutputFormat::Csv => write_csv(frame, path),
        OutputFormat::Parquet => write_parquet(frame, path, date_column),
    }
}

fn write_csv(frame: &Frame, path: &Path) -> Result<()> {
    let delimiter = io_utils::resolve_output_delimiter(path, None);
    let mut writer = io_utils::open_csv_writer(path, delimiter)?;
    writer
        .write_record(frame.headers())
        .context("Writing tidy headers")?;
    for row in frame.rows() {
        writer.write_record(row).context("Writing tidy row")?;
    }
    writer.flush().context("Flushing tidy output")?;
    Ok(())
}

fn write_parquet(frame: &Frame, path: &Path, date_column: Option<&str>) -> Result<()> {
    let mut date_columns: HashSet<&str> = HashSet::new();
    let mut integer_columns: HashSet<&str> = HashSet::new();
    if let Some(date) = date_column {
        date_columns.insert(date);
        date_columns.insert(MONTH_COLUMN);
        integer_columns.insert(YEAR_COLUMN);
    }

    let fields: Vec<Field> = frame
        .headers()
        .iter()
        .map(|name| {
            let data_type = if integer_columns.contains(name.as_str()) {
                DataType::Int64
            } else if date_columns.contains(name.as_str()) {
                DataType::Date32
            } else {
                DataType::Utf8
            };
            Field::new(name, data_type, true)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(frame.column_count());
    for (index, name) in frame.headers().iter().enumerate() {
        let cells = frame.rows().iter().map(|row| row.get(index));
        let column: ArrayRef = if integer_columns.contains(name.as_str()) {
            let mut builder = Int64Builder::new();
            for cell in cells {
                builder.append_option(cell.and_then(|v| v.trim().parse::<i64>().ok()));
            }
            Arc::new(builder.finish())
        } else if date_columns.contains(name.as_str()) {
            let mut builder = Date32Builder::new();
            for cell in cells {
                builder.append_option(cell.and_then(|v| days_since_epoch(v)));
            }
            Arc::new(builder.finish())
        } else {
            let mut builder = StringBuilder::new();
            for cell in cells {
                builder.append_option(cell.map(|v| v.as_str()).filter(|v| !v.is_empty()));
            }
            Arc::new(builder.finish())
        };
        columns.push(column);
    }

    let batch = RecordBatch::try_new(schema.clone(), columns)
        .context("Building tidy record batch")?;
    let file =
        File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_dictionary_enabled(true)
        .build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))
        .context("Creating parquet writer")?;
    writer.write(&batch).context("Writing tidy record batch")?;
    writer.close().context("Closing parquet writer")?;
    Ok(())
}

fn days_since_epoch(value: &str) -> Option<i32> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    i32::try_from((date - NaiveDate::default()).num_days()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_since_epoch_matches_known_dates() {
        assert_eq!(days_since_epoch("1970-01-01"), Some(0));
        assert_eq!(days_since_epoch("1970-01-02"), Some(1));
        assert_eq!(days_since_epoch("2020-12-01"), Some(18597));
        assert_eq!(days_since_epoch("not-a-date"), None);
        assert_eq!(days_since_epoch(""), None);
    }
}

//! Day-first date coercion and the derived `year`/`month` columns.
//!
//! STATS19 releases write dates day-first (`31/12/2020`); newer bundles use
//! ISO. Values that parse are rewritten in ISO form, values that do not
//! become empty cells. The run never fails on a bad date.

use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate};

use crate::frame::Frame;

pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// Day-first forms take priority over ISO so ambiguous numeric dates read as
// day/month/year.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y/%m/%d"];

pub fn parse_dayfirst_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Coerce `date_column` to ISO dates and append `year` and `month`
/// (first day of the value's month) columns. Rows whose date does not parse
/// get empty cells in all three columns.
pub fn append_derived_dates(frame: &mut Frame, date_column: &str) -> Result<()> {
    let index = frame
        .column_index(date_column)
        .ok_or_else(|| anyhow!("Date column '{date_column}' not found in collision table"))?;

    let parsed: Vec<Option<NaiveDate>> = frame
        .rows()
        .iter()
        .map(|row| row.get(index).and_then(|value| parse_dayfirst_date(value)))
        .collect();

    let coerced = parsed
        .iter()
        .map(|date| {
            date.map(|d| d.format(ISO_DATE_FORMAT).to_string())
                .unwrap_or_default()
        })
        .collect();
    let years = parsed
        .iter()
        .map(|date| date.map(|d| d.year().to_string()).unwrap_or_default())
        .collect();
    let months = parsed
        .iter()
        .map(|date| {
            date.and_then(|d| d.with_day(1))
                .map(|d| d.format(ISO_DATE_FORMAT).to_string())
                .unwrap_or_default()
        })
        .collect();

    frame.replace_column(index, coerced)?;
    frame.push_column(YEAR_COLUMN, years)?;
    frame.push_column(MONTH_COLUMN, months)?;
    Ok(())
}

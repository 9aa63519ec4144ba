//! Final column selection: catalog order in, stable output schema out.
//!
//! Walks the field catalog against the joined table, keeping each field under
//! its resolved name, dropping optional fields that did not resolve, and
//! renaming the outcome field to its canonical name. The derived year and
//! month columns are slotted in directly after the date field when present.

use anyhow::{Result, anyhow};
use log::debug;

use crate::{
    catalog::{DATE_FIELD, FieldCatalog, OUTCOME_FIELD},
    dates::{MONTH_COLUMN, YEAR_COLUMN},
    frame::Frame,
};

/// Project `joined` onto the catalog's output schema. Does not mutate its
/// input; the returned frame owns fresh rows in projection order.
pub fn project(joined: &Frame, catalog: &FieldCatalog) -> Result<Frame> {
    let mut selected: Vec<(usize, String)> = Vec::new();

    for field in &catalog.fields {
        match field.resolve(joined.headers()) {
            Some(resolved) => {
                let index = joined
                    .column_index(resolved)
                    .ok_or_else(|| anyhow!("Resolved column '{resolved}' vanished from the joined table"))?;
                let output_name = if field.name == OUTCOME_FIELD {
                    OUTCOME_FIELD.to_string()
                } else {
                    resolved.to_string()
                };
                selected.push((index, output_name));
                if field.name == DATE_FIELD {
                    for derived in [YEAR_COLUMN, MONTH_COLUMN] {
                        if let Some(derived_index) = joined.column_index(derived) {
                            selected.push((derived_index, derived.to_string()));
                        }
                    }
                }
            }
            None if field.required => {
                return Err(anyhow!(
                    "Required field '{}' is missing from the joined table",
                    field.name
                ));
            }
            None => {
                debug!("Field '{}' absent from this release; omitted from output", field.name);
            }
        }
    }

    let headers = selected.iter().map(|(_, name)| name.clone()).collect();
    let rows = joined
        .rows()
        .iter()
        .map(|row| {
            selected
                .iter()
                .map(|(index, _)| row.get(*index).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(Frame::new(headers, rows))
}

//! Hash left-join used to link casualties to their vehicle and collision rows.
//!
//! The right side is indexed once into a `HashMap` keyed on the join cells;
//! the left side is then walked in order, so output rows keep the left
//! table's ordering and the output always has exactly one row per left row.
//! Right-side key columns are dropped (they duplicate the left keys) and any
//! remaining right column whose name already exists on the left is suffixed
//! with the origin table label rather than silently overwriting anything.

use std::collections::{HashMap, HashSet};

use anyhow::{Result, anyhow};
use itertools::Itertools;
use log::debug;

use crate::frame::Frame;

const KEY_SEPARATOR: &str = "\u{1f}";

/// Left-join `right` onto `left`. Left rows without a match keep empty cells
/// in every right-side column; when the right side carries duplicate keys the
/// first row wins, preserving one-output-row-per-left-row.
pub fn left_join(
    left: &Frame,
    right: &Frame,
    left_keys: &[&str],
    right_keys: &[&str],
    suffix: &str,
) -> Result<Frame> {
    let left_indices = key_indices(left, left_keys, "left")?;
    let right_indices = key_indices(right, right_keys, "right")?;
    if left_indices.len() != right_indices.len() {
        return Err(anyhow!(
            "Left and right join keys must contain the same number of columns"
        ));
    }

    let lookup = build_right_lookup(right, &right_indices);
    let (headers, right_columns) = build_output_headers(left, right, &right_indices, suffix);

    let mut rows = Vec::with_capacity(left.row_count());
    for left_row in left.rows() {
        let key = build_key(left_row, &left_indices);
        let mut combined = left_row.clone();
        match lookup.get(&key) {
            Some(&right_idx) => {
                let right_row = &right.rows()[right_idx];
                combined.extend(
                    right_columns
                        .iter()
                        .map(|idx| right_row.get(*idx).cloned().unwrap_or_default()),
                );
            }
            None => {
                combined.extend(right_columns.iter().map(|_| String::new()));
            }
        }
        rows.push(combined);
    }

    Ok(Frame::new(headers, rows))
}

fn key_indices(frame: &Frame, keys: &[&str], side: &str) -> Result<Vec<usize>> {
    keys.iter()
        .map(|name| {
            frame
                .column_index(name)
                .ok_or_else(|| anyhow!("Join key column '{name}' not found in {side} table"))
        })
        .collect()
}

fn build_key(row: &[String], key_indices: &[usize]) -> String {
    key_indices
        .iter()
        .map(|idx| row.get(*idx).map(|s| s.trim()).unwrap_or(""))
        .join(KEY_SEPARATOR)
}

fn build_right_lookup(right: &Frame, key_indices: &[usize]) -> HashMap<String, usize> {
    let mut lookup: HashMap<String, usize> = HashMap::with_capacity(right.row_count());
    let mut duplicates = 0usize;
    for (row_idx, row) in right.rows().iter().enumerate() {
        let key = build_key(row, key_indices);
        if lookup.contains_key(&key) {
            duplicates += 1;
        } else {
            lookup.insert(key, row_idx);
        }
    }
    if duplicates > 0 {
        debug!("Ignored {duplicates} duplicate-keyed row(s) on the right side of a join");
    }
    lookup
}

fn build_output_headers(
    left: &Frame,
    right: &Frame,
    right_key_indices: &[usize],
    suffix: &str,
) -> (Vec<String>, Vec<usize>) {
    let mut headers = left.headers().to_vec();
    let mut seen: HashSet<String> = headers.iter().cloned().collect();
    let mut right_columns = Vec::new();

    for (idx, name) in right.headers().iter().enumerate() {
        if right_key_indices.contains(&idx) {
            continue;
        }
        let mut candidate = name.clone();
        if seen.contains(&candidate) {
            candidate = format!("{name}_{suffix}");
            let mut counter = 1usize;
            while seen.contains(&candidate) {
                candidate = format!("{name}_{suffix}_{counter}");
                counter += 1;
            }
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
        right_columns.push(idx);
    }

    (headers, right_columns)
}

//! Field catalog listing.
//!
//! Renders the logical field names, their column-name aliases in priority
//! order, the origin table, and the required flag as an ASCII table.

use anyhow::Result;
use itertools::Itertools;
use log::info;

use crate::{catalog::FieldCatalog, cli::FieldsArgs};

pub fn execute(args: &FieldsArgs) -> Result<()> {
    let catalog = match &args.fields {
        Some(path) => FieldCatalog::load(path)?,
        None => FieldCatalog::builtin(),
    };

    let headers = ["#", "field", "aliases", "origin", "required"];
    let mut rows = Vec::with_capacity(catalog.fields.len());
    for (idx, field) in catalog.fields.iter().enumerate() {
        rows.push(vec![
            (idx + 1).to_string(),
            field.name.clone(),
            field.candidates().join(", "),
            field.role.to_string(),
            if field.required { "yes".to_string() } else { String::new() },
        ]);
    }

    print!("{}", render_rows(&headers, &rows));
    info!("Listed {} field(s)", catalog.fields.len());
    Ok(())
}

fn render_rows(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        let mut line = cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let padding = widths[idx].saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(padding))
            })
            .join("  ");
        while line.ends_with(' ') {
            line.pop();
        }
        line
    };

    let mut output = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    output.push_str(&format_line(&header_cells));
    output.push('\n');
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat((*w).max(3))).collect();
    output.push_str(&separator.join("  "));
    output.push('\n');
    for row in rows {
        output.push_str(&format_line(row));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_rows_aligns_columns() {
        let rows = vec![
            vec!["1".to_string(), "accident_index".to_string()],
            vec!["2".to_string(), "date".to_string()],
        ];
        let rendered = render_rows(&["#", "field"], &rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "#  field");
        assert_eq!(lines[2], "1  accident_index");
        assert_eq!(lines[3], "2  date");
    }
}

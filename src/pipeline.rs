//! One-release run orchestration: locate, load, reconcile, join, project,
//! write.
//!
//! The stages run strictly left to right and the whole run completes or
//! fails as a unit. Structural problems (missing collision file, unreadable
//! input) abort the run; data-level irregularities (bad dates, absent
//! optional columns, unmatched join keys) are absorbed where they occur.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    catalog::{DATE_FIELD, FieldCatalog},
    cli::TidyArgs,
    dates,
    frame::Frame,
    io_utils, join, project, sink,
};

/// Collision table filenames in presence-check order; releases switched from
/// "Accidents" to "Collisions" naming partway through the series.
const COLLISION_FILES: &[&str] = &["Accidents.csv", "Collisions.csv"];
const VEHICLE_FILE: &str = "Vehicles.csv";
const CASUALTY_FILE: &str = "Casualties.csv";

const COLLISION_KEY: &str = "accident_index";
const VEHICLE_REFERENCE: &str = "vehicle_reference";

const DEFAULT_OUTPUT_STEM: &str = "casualty_joined";

pub fn execute(args: &TidyArgs) -> Result<()> {
    let catalog = match &args.fields {
        Some(path) => FieldCatalog::load(path)?,
        None => FieldCatalog::builtin(),
    };
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;

    let collision_path = resolve_collision_path(&args.source_dir)?;
    let vehicle_path = args.source_dir.join(VEHICLE_FILE);
    let casualty_path = args.source_dir.join(CASUALTY_FILE);

    let mut collision = load_table(&collision_path, args.delimiter, encoding)
        .with_context(|| format!("Reading collision table {collision_path:?}"))?;
    let vehicle = load_table(&vehicle_path, args.delimiter, encoding)
        .with_context(|| format!("Reading vehicle table {vehicle_path:?}"))?;
    let casualty = load_table(&casualty_path, args.delimiter, encoding)
        .with_context(|| format!("Reading casualty table {casualty_path:?}"))?;
    info!(
        "Loaded {} collision(s), {} vehicle(s), {} casualty(ies) from '{}'",
        collision.row_count(),
        vehicle.row_count(),
        casualty.row_count(),
        args.source_dir.display()
    );

    let date_column = catalog
        .resolve(DATE_FIELD, collision.headers())
        .map(str::to_string);
    match &date_column {
        Some(name) => {
            debug!("Resolved collision date column '{name}'");
            dates::append_derived_dates(&mut collision, name)?;
        }
        None => debug!("No date column in this release; year/month derivation skipped"),
    }

    let casualty_id = required_column(&catalog, COLLISION_KEY, &casualty, "casualty")?;
    let casualty_ref = required_column(&catalog, VEHICLE_REFERENCE, &casualty, "casualty")?;
    let vehicle_id = required_column(&catalog, COLLISION_KEY, &vehicle, "vehicle")?;
    let vehicle_ref = required_column(&catalog, VEHICLE_REFERENCE, &vehicle, "vehicle")?;
    let collision_id = required_column(&catalog, COLLISION_KEY, &collision, "collision")?;

    let linked = join::left_join(
        &casualty,
        &vehicle,
        &[casualty_id.as_str(), casualty_ref.as_str()],
        &[vehicle_id.as_str(), vehicle_ref.as_str()],
        "vehicle",
    )
    .context("Joining casualties to vehicles")?;
    let joined = join::left_join(
        &linked,
        &collision,
        &[casualty_id.as_str()],
        &[collision_id.as_str()],
        "collision",
    )
    .context("Joining casualties to collisions")?;
    debug!(
        "Joined table holds {} row(s) across {} column(s)",
        joined.row_count(),
        joined.column_count()
    );

    let tidy = project::project(&joined, &catalog)?;

    let output = resolve_output_path(args);
    sink::write_frame(&tidy, &output, args.format, date_column.as_deref())
        .with_context(|| format!("Writing tidy table to {output:?}"))?;
    println!(
        "Saved {} with {} rows and {} columns",
        output.display(),
        tidy.row_count(),
        tidy.column_count()
    );
    Ok(())
}

fn load_table(path: &Path, delimiter: Option<u8>, encoding: &'static Encoding) -> Result<Frame> {
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    let mut frame = Frame::from_path(path, delimiter, encoding)?;
    frame.normalize_headers();
    Ok(frame)
}

fn resolve_collision_path(source_dir: &Path) -> Result<PathBuf> {
    COLLISION_FILES
        .iter()
        .map(|name| source_dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            anyhow!(
                "No collision table in '{}'; expected {}",
                source_dir.display(),
                COLLISION_FILES.join(" or ")
            )
        })
}

fn required_column(
    catalog: &FieldCatalog,
    field: &str,
    frame: &Frame,
    table: &str,
) -> Result<String> {
    catalog
        .resolve(field, frame.headers())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Required column '{field}' not found in {table} table"))
}

fn resolve_output_path(args: &TidyArgs) -> PathBuf {
    args.output.clone().unwrap_or_else(|| {
        args.source_dir
            .join(format!("{DEFAULT_OUTPUT_STEM}.{}", args.format.extension()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_collision_path_reports_both_accepted_names() {
        let missing = resolve_collision_path(Path::new("/no/such/dir")).unwrap_err();
        let message = missing.to_string();
        assert!(message.contains("Accidents.csv"));
        assert!(message.contains("Collisions.csv"));
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture file");
    path
}

/// Standard two-collision release: raw headers use the mixed-case,
/// space-separated spellings seen in older bundles, the casualty table names
/// the outcome `Casualty Severity`, and casualty `A1`/ref 2 has no matching
/// vehicle row.
#[allow(dead_code)]
pub fn write_release(dir: &Path) {
    write_file(
        dir,
        "Accidents.csv",
        "Accident Index,Date,Road Type,Speed Limit\n\
         A1,31/12/2020,6,30\n\
         A2,01/02/2021,3,60\n",
    );
    write_file(
        dir,
        "Vehicles.csv",
        "Accident Index,Vehicle Reference,Vehicle Type\n\
         A1,1,9\n\
         A2,1,11\n",
    );
    write_file(
        dir,
        "Casualties.csv",
        "Accident Index,Vehicle Reference,Casualty Class,Casualty Severity\n\
         A1,1,1,3\n\
         A1,2,3,2\n\
         A2,1,1,1\n",
    );
}

/// Read a CSV output file back as (headers, rows).
#[allow(dead_code)]
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("open output csv");
    let headers = reader
        .headers()
        .expect("read output headers")
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("read output row")
                .iter()
                .map(|c| c.to_string())
                .collect()
        })
        .collect();
    (headers, rows)
}

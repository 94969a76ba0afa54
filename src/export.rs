use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::ExportError;
use crate::types::Observation;

pub const DEFAULT_EXPORT_FILE: &str = "solar_panel_data_filtered.csv";

pub const CSV_HEADER: [&str; 8] = [
    "irradiance",
    "humidity",
    "wind_speed",
    "ambient_temperature",
    "tilt_angle",
    "kwh",
    "season",
    "month",
];

/// The header row is written even when `rows` is empty.
pub fn write_csv<W: Write>(rows: &[Observation], writer: W) -> Result<W, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

pub fn to_csv_string(rows: &[Observation]) -> Result<String, ExportError> {
    let buf = write_csv(rows, Vec::new())?;
    Ok(String::from_utf8(buf)?)
}

pub fn export_csv_file(rows: &[Observation], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(rows, file)?;
    info!(rows = rows.len(), path = %path.display(), "exported CSV");
    Ok(())
}

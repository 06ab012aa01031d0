//! CSV export for evaluation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::EvaluationResult;

/// Column header for CSV export.
const HEADER: &str = "timestamp,load_mw,solar_mw,wind_mw,net_grid_mw,soc,action";

/// Exports an evaluation result to a CSV file at the given path.
///
/// Writes a header row followed by one row per timestamp. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &EvaluationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes an evaluation result as CSV to any writer.
///
/// A series shorter than `timestamps` leaves its trailing cells empty.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &EvaluationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for (i, ts) in result.timestamps.iter().enumerate() {
        wtr.write_record(&[
            ts.to_string(),
            cell(&result.load, i),
            cell(&result.solar, i),
            cell(&result.wind, i),
            cell(&result.net_grid, i),
            cell(&result.soc, i),
            cell(&result.actions, i),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn cell(values: &[f64], i: usize) -> String {
    values.get(i).map_or_else(String::new, |v| format!("{v:.4}"))
}

//! CSV export of a matrix.
//!
//! One line per row, `columns` comma-separated fields, `\n` terminated, no
//! header and no trailing comma.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use csv::{Terminator, WriterBuilder};

use crate::{element::Element, error::Result, matrix::Matrix};

/// Writes `matrix` as CSV to `writer`.
///
/// # Errors
///
/// [`crate::MatmulError::Export`] on any write failure.
pub fn write_csv<T: Element, W: Write>(matrix: &Matrix<T>, writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for row in matrix.rows_iter() {
        csv.write_record(row.iter().map(|value| value.to_string()))?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `matrix` as CSV to the file at `path`, replacing it if present.
///
/// # Errors
///
/// [`crate::MatmulError::Export`] if the file cannot be created or written.
pub fn export_csv<T: Element>(matrix: &Matrix<T>, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_csv(matrix, BufWriter::new(file))
}

/// `result_<YYYYmmdd_HHMMSS>.csv`, one per session.
pub fn session_file_name() -> PathBuf {
    PathBuf::from(format!(
        "result_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

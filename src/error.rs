use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Error type returned by conversion functions.
///
/// This is a single error enum shared across table reading, join-index building and XML output.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Table read error from the CSV layer.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// XML serialization error.
    #[error("xml write error: {0}")]
    XmlWrite(#[from] xml::writer::Error),

    /// The source has no header row. Downstream behavior on a headerless table is undefined,
    /// so this fails loudly instead of producing a malformed tree.
    #[error("table '{}' has no header row", .path.display())]
    EmptyTable { path: PathBuf },

    /// A sub-table row has fewer values than its header. Sub rows are expected fully
    /// populated; truncating silently would drop joined fields.
    #[error(
        "malformed row in table '{table}': row {row} has {got} values but the header has {expected}"
    )]
    MalformedRow {
        table: String,
        /// 1-based row number; the header counts as row 1.
        row: usize,
        expected: usize,
        got: usize,
    },
}

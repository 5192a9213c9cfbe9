//! Station snapshot error types.

/// Errors that can occur while loading the static station snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StationDataError {
    /// Snapshot file could not be read
    #[error("failed to read station snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot contents could not be parsed
    #[error("failed to parse station snapshot: {0}")]
    Csv(#[from] csv::Error),

    /// Snapshot parsed but yielded no usable stations
    #[error("station snapshot contained no usable stations")]
    EmptySnapshot,
}

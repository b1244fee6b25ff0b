#[derive(Debug, thiserror::Error)]
pub enum TrafficError {
    #[error("Malformed timestamp in {field}: {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },

    #[error("Time filter out of range: {0} (expected -1 or 0..1440)")]
    OutOfRangeTimeFilter(i64),

    #[error("Invalid time filter: {0:?} (expected `any`, a minute, or HH:MM)")]
    InvalidTimeFilter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrafficError>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A `negotiated_rate` cell that is neither missing nor a number.
    #[error("invalid negotiated_rate {value:?} on data row {row}")]
    InvalidRate { row: usize, value: String },

    #[error("invalid report options: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no preview has been shown in this session; preview the report before exporting")]
    PreviewRequired,
}

impl ReportError {
    /// True for the errors that abort loading before any aggregation runs.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ReportError::Io(_) | ReportError::Csv(_) | ReportError::InvalidRate { .. }
        )
    }
}

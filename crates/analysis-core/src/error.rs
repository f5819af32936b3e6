use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl AnalysisError {
    /// True for failures caused by the snapshot itself rather than the transport.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, AnalysisError::MissingData(_))
    }
}

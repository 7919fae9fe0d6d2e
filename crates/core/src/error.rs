use thiserror::Error;

/// Errors raised for structurally invalid analysis input.
///
/// Undefined metrics and small samples are not errors; they surface as absent
/// values in the results.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid cycle table: {0}")]
    InvalidCycles(String),

    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for AnalysisError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

use thiserror::Error;

use pairscan_core::MatchError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] pairscan_core::ValidationError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Store(#[from] pairscan_core::StoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Match(MatchError::InvalidQuery { .. }) => 2,
            Self::Match(_) | Self::Store(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}

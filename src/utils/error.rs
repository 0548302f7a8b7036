use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegPadError {
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Resource exhaustion: {0}")]
    ResourceExhaustion(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl SegPadError {
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, SegPadError::ContractViolation(_))
    }

    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, SegPadError::ResourceExhaustion(_))
    }
}

// Fallible reservations surface as resource exhaustion
impl From<TryReserveError> for SegPadError {
    fn from(e: TryReserveError) -> Self {
        SegPadError::ResourceExhaustion(format!("allocation failed: {}", e))
    }
}

impl From<rayon::ThreadPoolBuildError> for SegPadError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        SegPadError::ThreadPool(format!("failed to build worker pool: {}", e))
    }
}

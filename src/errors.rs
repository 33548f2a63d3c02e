use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurvivalEnergyError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Error identified during scenario calculation: {0}")]
    FailureInCalculation(#[from] CalculationError),
    #[error("Error writing output: {0}")]
    ErrorInOutput(OutputError),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct CalculationError {
    error: anyhow::Error,
}

impl CalculationError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct OutputError {
    error: anyhow::Error,
}

impl OutputError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}

// Domain error taxonomy
// Every lifecycle operation returns these; the HTTP adapter maps them to status codes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroError {
    #[error("Producer with ID {0} not found")]
    ProducerNotFound(String),

    #[error("Farm with ID {0} not found")]
    FarmNotFound(String),

    #[error("Harvest with ID {0} not found")]
    HarvestNotFound(String),

    #[error("Planted culture with ID {0} not found")]
    PlantedCultureNotFound(String),

    /// Farm areas violate `arable + vegetation <= total` or contain a negative value
    #[error("Invalid farm areas: arable {arable} + vegetation {vegetation} exceeds total {total}, or an area is negative")]
    InvalidArea {
        total: f64,
        arable: f64,
        vegetation: f64,
    },

    #[error("Document {0} is invalid")]
    InvalidDocument(String),

    #[error("Producer with document {0} already exists")]
    ProducerAlreadyExists(String),

    #[error("Planted area {0} is invalid, it must be greater than zero")]
    InvalidPlantedArea(f64),

    #[error("State {0} is not a valid Brazilian state code")]
    InvalidState(String),

    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Persistence failures pass through untouched
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AgroError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AgroError::ProducerNotFound(_)
                | AgroError::FarmNotFound(_)
                | AgroError::HarvestNotFound(_)
                | AgroError::PlantedCultureNotFound(_)
        )
    }

    /// Client-side validation failures (bad payloads), as opposed to lookups and conflicts
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AgroError::InvalidArea { .. }
                | AgroError::InvalidDocument(_)
                | AgroError::InvalidPlantedArea(_)
                | AgroError::InvalidState(_)
                | AgroError::EmptyField(_)
        )
    }
}

pub type AgroResult<T> = std::result::Result<T, AgroError>;

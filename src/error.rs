use thiserror::Error;

#[derive(Error, Debug)]
pub enum PictiorError {
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(#[from] serde_json::Error),
}

use thiserror::Error;
use uuid::Uuid;

use tally_domain::GroupError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),
    #[error("Participant not in group: {0}")]
    InvalidParticipant(String),
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

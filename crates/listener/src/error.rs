//! Listener error types

use contracts::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("failed to subscribe to '{subject}': {message}")]
    Subscribe { subject: String, message: String },
}

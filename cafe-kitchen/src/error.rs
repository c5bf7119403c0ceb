//! Kitchen feed errors

use cafe_client::ClientError;
use shared::order::OrderStatus;
use thiserror::Error;

/// Kitchen feed error
///
/// None of these are fatal: the feed keeps polling and the operator may
/// retry any transition.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Polling failed
    #[error("Transport error: {0}")]
    Transport(#[from] ClientError),

    /// The store did not apply a status change; displayed status is unchanged
    #[error("Status update for order {order_id} failed: {reason}")]
    TransitionFailure { order_id: String, reason: String },

    /// Only the single forward step is allowed
    #[error("Cannot move order from '{from}' to '{to}'")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Another transition for the same order is outstanding
    #[error("A status change for order {0} is already in progress")]
    TransitionInFlight(String),

    #[error("Unknown order: {0}")]
    UnknownOrder(String),
}

impl FeedError {
    /// Retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FeedError::Transport(_) | FeedError::TransitionFailure { .. }
        )
    }
}

pub type FeedResult<T> = Result<T, FeedError>;

//! Ordering error types
//!
//! | Kind | Effect |
//! |------|--------|
//! | [`ValidationError`] | Blocks the action locally; the user corrects input |
//! | [`OrderingError::Transport`] | Transient message; the user re-triggers |
//! | [`OrderingError::Rejected`] | The store refused; its message is shown |

use cafe_client::ClientError;
use thiserror::Error;

/// Local validation failure; no network call is made (or its result is discarded)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("O produto '{0}' não está disponível")]
    ProductUnavailable(String),

    #[error("Escolha uma opção para '{0}'")]
    MissingRequiredOption(String),

    #[error("Grupo de opções desconhecido '{0}'")]
    UnknownOptionGroup(String),

    #[error("Opção desconhecida '{option}' no grupo '{group}'")]
    UnknownOption { group: String, option: String },

    #[error("A quantidade deve estar entre 1 e {max} (recebido {got})")]
    InvalidQuantity { got: i64, max: u32 },

    #[error("Observação muito longa (máximo de {0} caracteres)")]
    NoteTooLong(usize),

    #[error("Nenhum item do carrinho na posição {0}")]
    ItemNotFound(usize),

    #[error("O carrinho está vazio")]
    EmptyCart,

    #[error("Informe o nome do cliente")]
    MissingCustomerName,

    #[error("Endereço de entrega incompleto: falta {0}")]
    IncompleteAddress(&'static str),

    #[error("Informe o código do cupom")]
    EmptyCouponCode,

    #[error("{0}")]
    CouponRejected(String),

    #[error("{0}")]
    CouponIneligible(String),

    /// Blocks delivery checkout only; pickup and dine-in remain available
    #[error("{0}")]
    ZoneUnserved(String),
}

impl ValidationError {
    pub fn is_zone_unserved(&self) -> bool {
        matches!(self, ValidationError::ZoneUnserved(_))
    }
}

/// Ordering error
#[derive(Debug, Error)]
pub enum OrderingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] ClientError),

    #[error("Order rejected: {0}")]
    Rejected(String),
}

impl OrderingError {
    /// Message for a user-visible notice
    pub fn user_message(&self) -> String {
        match self {
            OrderingError::Validation(e) => e.to_string(),
            OrderingError::Transport(e) => e.user_message(),
            OrderingError::Rejected(message) => message.clone(),
        }
    }
}

/// Result type for ordering operations
pub type OrderingResult<T> = Result<T, OrderingError>;

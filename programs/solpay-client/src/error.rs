use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolpayError {

    #[error("Invalid {role} identity: {reason}")]
    InvalidIdentity {
        role: &'static str,
        reason: String,
    },

    #[error("Invalid stream parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("No bump seed produces an off-curve stream address")]
    DerivationExhausted,

    #[error("Account is not a payment stream: {0}")]
    InvalidStreamAccount(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No wallet keypair found at {0}")]
    WalletNotFound(String),

    /// Anything the cluster or RPC node reported back. Kept as text,
    /// callers decide whether to retry.
    #[error("Remote submission failed: {0}")]
    Remote(String),

}

impl From<anchor_client::ClientError> for SolpayError {
    fn from(err: anchor_client::ClientError) -> Self {
        SolpayError::Remote(err.to_string())
    }
}

impl From<anchor_client::solana_client::client_error::ClientError> for SolpayError {
    fn from(err: anchor_client::solana_client::client_error::ClientError) -> Self {
        SolpayError::Remote(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SolpayError>;

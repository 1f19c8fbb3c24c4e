//! Error handling for the application

use thiserror::Error;

/// Asset registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Unknown asset symbol: {0}")]
    UnknownSymbol(String),

    #[error("Unknown asset address: {0}")]
    UnknownAddress(String),
}

/// Routing service errors that callers treat differently from a plain failed call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Routing service at {0} refuses round-trip quotes (same input and output mint)")]
    RoundTripRefused(String),
}

/// Errors raised while evaluating a single watch-list entry.
///
/// These never escape the scan loop; the scheduler logs them and moves on.
#[derive(Error, Debug, Clone)]
pub enum ArbitrageError {
    #[error("Invalid arbitrage route: {0}")]
    InvalidRoute(String),

    #[error("Input amount {amount} {symbol} rounds to zero smallest units")]
    ZeroAmount { symbol: String, amount: f64 },

    #[error("Unexpected failure while processing {symbol}: {detail}")]
    Unexpected { symbol: String, detail: String },
}

/// Execution-related errors
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("Swap request failed: {0}")]
    SwapRequest(String),

    #[error("Invalid swap transaction: {0}")]
    InvalidTransaction(String),

    #[error("Transaction simulation failed: {0}")]
    SimulationFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

/// Startup-time application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Credential error: {0}")]
    CredentialError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

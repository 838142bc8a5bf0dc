use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("String marshaling failed: {0}")]
    Encoding(String),

    #[error("Native symbol missing: {0}")]
    SymbolMissing(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

use bridge_traits::{BridgeError, Encoding};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogError {
    /// The native library reported `NFD_ERROR`.
    #[error(
        "Native dialog error: {}",
        message.as_deref().unwrap_or("no error message reported")
    )]
    Native { message: Option<String> },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("A dialog is already open on this thread")]
    Reentrant,

    #[error("No native backend registered for {0:?} strings")]
    EncodingUnavailable(Encoding),

    #[error("Bridge error: {0}")]
    Bridge(#[source] BridgeError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl DialogError {
    /// Native error text, when the failure came from the native library.
    pub fn native_message(&self) -> Option<&str> {
        match self {
            Self::Native { message } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<BridgeError> for DialogError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::InvalidArgument(message) => Self::InvalidArgument(message),
            other => Self::Bridge(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DialogError>;

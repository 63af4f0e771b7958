use std::io;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error parsing message, command is missing")]
    MessageParsingErrorMissingCommand,

    #[error("Error parsing message, {param_name} parameter is missing")]
    MessageParsingErrorMissingParameter { param_name: String },

    #[error("Connection {0} is already registered")]
    DuplicateConnection(Uuid),

    #[error("Connection {0} is not registered")]
    UnknownConnection(Uuid),

    #[error("Unable to resolve address {0}")]
    AddressResolution(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Session has been destroyed")]
    SessionClosed,

    #[error("Unknown capability: {name}")]
    UnknownCapability { name: String },
}

impl Error {
    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

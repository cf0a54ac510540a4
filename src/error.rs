use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),
    #[error("stack underflow")]
    StackUnderflow,
    #[error("{token} ?")]
    UnknownToken { token: String },
    #[error("malformed definition: {clause}")]
    MalformedDefinition { clause: String },
    #[error("{word} ? (definition cycle)")]
    DefinitionCycle { word: String },
}

impl Error {
    /// Interpretation failures only abort the current line; everything else
    /// tears down the session.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::IO(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

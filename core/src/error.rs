use std::fmt::Display;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Message(String),
    /// (domain class name or schema name)
    UndefinedSerializableClass(String),
    /// (description of the override shape)
    InvalidResourceClass(String),
}

impl Error {
    pub fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Message(msg) => formatter.write_str(msg),
            Error::UndefinedSerializableClass(name) => {
                write!(formatter, "undefined serializable class: {}", name)
            }
            Error::InvalidResourceClass(shape) => {
                write!(formatter, "invalid serializable class: {}", shape)
            }
        }
    }
}

impl std::error::Error for Error {}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeanError {
    #[error("Invalid data name: '{name}'")]
    InvalidName { name: String },
    #[error("Data '{name}' not found!")]
    DataNotFound { name: String },
    #[error("Invalid data type '{kind}' for '{name}'!")]
    InvalidType { name: String, kind: String },
    #[error("Invalid parent data type '{parent_kind}' at '{parent}' for '{name}'!")]
    InvalidParentType { name: String, parent: String, parent_kind: String },
    #[error("No callable passed for '{name}' datatype!")]
    MissingCallable { name: String },
    #[error("Data '{name}' is not nullable!")]
    NotNullable { name: String },
    #[error("Invalid {kind} value: {message}")]
    InvalidValue { kind: String, message: String },
    #[error("Value is not an instance of '{class}'!")]
    TypeMismatch { class: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BeanError {
    pub(crate) fn invalid_value(kind: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidValue { kind: kind.to_string(), message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, BeanError>;

// Helper conversions
impl From<config::ConfigError> for BeanError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for BeanError {
    fn from(e: serde_json::Error) -> Self { Self::Serialization(e.to_string()) }
}

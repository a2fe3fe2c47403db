//! Error types for Tutor Hub.

use chrono::NaiveDate;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Fixture loading and entity lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Malformed fixture data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Failed to read fixtures from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid price range: min {min} is above max {max}")]
    InvalidPriceRange { min: String, max: String },
}

/// Registration wizard errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("A wizard needs at least one step")]
    NoSteps,

    #[error("Submit is only available on the final step (currently on step {index})")]
    NotTerminal { index: usize },

    #[error("Step {step} is incomplete: {reason}")]
    Incomplete { step: String, reason: String },

    #[error("Date {date} is in the past")]
    PastDate { date: NaiveDate },

    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: String, value: String },

    #[error("Submission failed: {0}")]
    SubmitFailed(String),
}

/// Messaging errors.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Contact {id} not found")]
    UnknownContact { id: String },

    #[error("No conversation is open")]
    NoConversation,
}

/// Errors raised while interpreting shell input.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument for {command}: {reason}")]
    InvalidArgument { command: String, reason: String },

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Command {command} is not available on the {view} view")]
    WrongView { command: String, view: String },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

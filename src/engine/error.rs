//! Engine error type

use thiserror::Error;

/// Everything the engine can fail with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The drawing surface identifier resolved to nothing
    #[error("could not find canvas with id \"{id}\"")]
    SurfaceNotFound { id: String },

    /// A caller handed the engine something it cannot use
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Vector division by a zero scalar or a vector with a zero component
    #[error("division by 0")]
    DivisionByZero,

    /// An optional capability was invoked on a type that does not provide it
    #[error("{type_name} does not implement {capability}")]
    NotImplemented {
        type_name: &'static str,
        capability: &'static str,
    },

    /// A host (browser) API call failed
    #[error("host error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

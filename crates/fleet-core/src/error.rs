//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `FleetError` as one
//! variant where core parsing or validation can fail underneath them.

use thiserror::Error;

/// The base error type for `fleet-core`.
#[derive(Debug, Error, PartialEq)]
pub enum FleetError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot parse {what} from {value:?}")]
    Parse {
        what:  &'static str,
        value: String,
    },
}

/// Shorthand result type for `fleet-core`.
pub type FleetResult<T> = Result<T, FleetError>;

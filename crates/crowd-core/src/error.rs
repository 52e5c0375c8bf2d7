//! Kernel-wide configuration error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where configuration can fail.

use thiserror::Error;

/// Errors raised while validating configuration, before any tick runs.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown parameter `{name}` for model `{model}`")]
    UnknownParameter { model: &'static str, name: String },

    #[error("parameter `{name}` = {value} is invalid: {reason}")]
    InvalidParameter {
        name:   String,
        value:  f64,
        reason: &'static str,
    },
}

/// Shorthand result type for configuration handling in all `crowd-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;

//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `ConverterError`, so functions can simply
//! return `Result<T>`.
use crate::error::ConverterError;

/// Workspace-wide `Result` alias with `ConverterError` as the default error.
pub type Result<T, E = ConverterError> = std::result::Result<T, E>;

//! Error handling module
//!
//! Errors raised at the library boundary. The comparison and generation
//! pipeline itself is a total function over well-formed snapshots and
//! returns no `Result`; the only fallible surface is the JSON boundary
//! where snapshots arrive from the introspection layer.

use thiserror::Error;

/// Library-boundary error type
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

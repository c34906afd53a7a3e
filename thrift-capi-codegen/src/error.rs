//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema document parse error.
    #[error("schema parse error: {0}")]
    Parse(#[from] thrift_capi_schema::ParseError),

    /// Schema resolution or validation error.
    #[error("schema error: {0}")]
    Schema(#[from] thrift_capi_schema::SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A construct this backend cannot bridge reached an emission branch.
    ///
    /// Generation stops at the first occurrence and no artifact is written.
    #[error("unsupported {what} in '{context}': not bridged across the C API")]
    Unsupported {
        /// The offending type or construct.
        what: String,
        /// Declaration being emitted.
        context: String,
    },
}

impl CodegenError {
    /// Creates an unsupported-construct error.
    pub fn unsupported(what: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Unsupported {
            what: what.into(),
            context: context.into(),
        }
    }
}

//! Error types for script parsing.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while parsing a script into an AST.
#[derive(Error, Debug, Diagnostic)]
pub enum GenError {
    /// The AST front end rejected the source text outright.
    #[error("Syntax error in script: {message}")]
    #[diagnostic(code(ramforge::gen::syntax_error))]
    SyntaxError { message: String },
}

impl GenError {
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::SyntaxError {
            message: message.into(),
        }
    }
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, GenError>;

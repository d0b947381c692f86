//! Error types for the analyzer pipeline.

use thiserror::Error;

/// Errors that can occur while analyzing a script and its imports.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The AST front end rejected a script's source text.
    #[error("syntax error in {file_path:?}: {message}")]
    Syntax { file_path: String, message: String },

    /// A non-URL import specifier did not match any file in the supplied set.
    #[error("could not resolve import {specifier:?} from {from:?}")]
    Import { specifier: String, from: String },

    /// A remote (`http://`/`https://`) import failed to fetch or parse.
    #[error("failed to import {url:?}: {reason}")]
    UrlImport { url: String, reason: String },
}

impl AnalysisError {
    /// The small negative integer the host encodes a cost-table failure as,
    /// per the error-handling contract `calculate_ram_usage` implements.
    pub fn code(&self) -> i64 {
        match self {
            AnalysisError::Syntax { .. } => -1,
            AnalysisError::Import { .. } => -2,
            AnalysisError::UrlImport { .. } => -3,
        }
    }
}

/// Result type used throughout the analyzer.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            AnalysisError::Syntax {
                file_path: String::new(),
                message: String::new()
            }
            .code(),
            -1
        );
        assert_eq!(
            AnalysisError::Import {
                specifier: String::new(),
                from: String::new()
            }
            .code(),
            -2
        );
        assert_eq!(
            AnalysisError::UrlImport {
                url: String::new(),
                reason: String::new()
            }
            .code(),
            -3
        );
    }
}

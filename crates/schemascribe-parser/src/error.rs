//! Parser errors

use schemascribe_core::{Diagnostic, DiagnosticCode, Severity};
use thiserror::Error;

use crate::format::InputFormat;

/// Failure of a whole parse
///
/// Problems inside a table or field never surface here; they become
/// diagnostics and parsing continues.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No strategy produced a table and the empty-schema policy is `error`
    #[error("No tables found in {format} input")]
    NoTablesFound { format: InputFormat },
}

impl ParseError {
    /// Convert to a diagnostic for reports
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::NoTablesFound { .. } => {
                Diagnostic::new(DiagnosticCode::NoTablesFound, Severity::Error, self.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_error_diagnostic() {
        let err = ParseError::NoTablesFound {
            format: InputFormat::Unknown,
        };
        assert_eq!(err.to_string(), "No tables found in unknown input");

        let diag = err.to_diagnostic();
        assert_eq!(diag.code, DiagnosticCode::NoTablesFound);
        assert_eq!(diag.severity, Severity::Error);
    }
}

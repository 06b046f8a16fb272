//! Collects diagnostics and mirrors them to the tracing subscriber

use schemascribe_core::{Diagnostic, Severity};

/// Ordered diagnostic collector
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a log event
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let line = diagnostic.location.as_ref().map(|l| l.line);
        match diagnostic.severity {
            Severity::Error => {
                tracing::error!(code = %diagnostic.code, ?line, "{}", diagnostic.message)
            }
            Severity::Warn => {
                tracing::warn!(code = %diagnostic.code, ?line, "{}", diagnostic.message)
            }
            Severity::Info => {
                tracing::info!(code = %diagnostic.code, ?line, "{}", diagnostic.message)
            }
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

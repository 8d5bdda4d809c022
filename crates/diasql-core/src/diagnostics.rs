use std::fmt;

use schemars::JsonSchema;
use serde::Serialize;

/// Category of a model-level diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A foreign key whose primary key columns were only partly matched.
    InvalidRelationship,
    /// Tables left over when topological ordering found a cycle.
    DependencyCycle,
}

impl DiagnosticKind {
    /// Heading used when the diagnostic is rendered as an SQL comment.
    pub fn title(self) -> &'static str {
        match self {
            DiagnosticKind::InvalidRelationship => "INVALID RELATIONSHIP",
            DiagnosticKind::DependencyCycle => "DEPENDENCY CYCLE",
        }
    }
}

/// Non-fatal finding recorded while building a schema model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.title(), self.message)
    }
}

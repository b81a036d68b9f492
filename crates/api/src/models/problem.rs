use super::symbol::{Position, Range};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

/// A non-fatal diagnostic produced while parsing or converting a file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Problem {
    pub message: String,
    pub range: Range,
    pub severity: Severity,
}

impl Problem {
    pub fn new(message: impl Into<String>, range: Range, severity: Severity) -> Self {
        Self {
            message: message.into(),
            range,
            severity,
        }
    }

    pub fn error(message: impl Into<String>, range: Range) -> Self {
        Self::new(message, range, Severity::Error)
    }

    pub fn warning(message: impl Into<String>, range: Range) -> Self {
        Self::new(message, range, Severity::Warning)
    }

    pub fn position(&self) -> Position {
        self.range.begin
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}: {}", self.severity, self.range, self.message)
    }
}

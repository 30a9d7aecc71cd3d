use std::fmt;

use serde::Serialize;

use crate::path::FieldPath;

/// What went wrong at a single location of a candidate message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum IssueKind {
    /// A required key is absent.
    MissingField,
    /// The value has the wrong JSON type.
    WrongType,
    /// The value has the right type but a malformed syntax (e.g. a URL).
    InvalidFormat,
    /// The value is well-typed but not acceptable (empty, out of range, not in an enum).
    InvalidValue,
    /// A discriminator names no known variant.
    UnknownVariant { tag: String, allowed: Vec<String> },
    /// The envelope `channel` is outside the implemented set.
    UnsupportedChannel {
        channel: String,
        supported: Vec<String>,
    },
    /// A key that the selected shape does not declare.
    UnexpectedField,
}

impl IssueKind {
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::MissingField => "missingField",
            IssueKind::WrongType => "wrongType",
            IssueKind::InvalidFormat => "invalidFormat",
            IssueKind::InvalidValue => "invalidValue",
            IssueKind::UnknownVariant { .. } => "unknownVariant",
            IssueKind::UnsupportedChannel { .. } => "unsupportedChannel",
            IssueKind::UnexpectedField => "unexpectedField",
        }
    }
}

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: FieldPath,
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Description of the accepted shape.
    pub expected: String,
    /// JSON type name, or the offending value for scalars.
    pub received: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_root() {
            "<root>".to_string()
        } else {
            self.path.to_string()
        };
        write!(
            f,
            "{path}: {} (expected {}, received {})",
            self.kind.code(),
            self.expected,
            self.received
        )
    }
}

/// Every problem found in one candidate, in document order.
///
/// Never empty: a `ValidationError` is only produced when at least one issue
/// was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Rendered paths of every issue, in order.
    pub fn paths(&self) -> Vec<String> {
        self.issues.iter().map(|issue| issue.path.to_string()).collect()
    }

    /// First issue recorded at `path` (dot/bracket notation).
    pub fn issue_at(&self, path: &str) -> Option<&Issue> {
        self.issues
            .iter()
            .find(|issue| issue.path.to_string() == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.issues.len() == 1 { "issue" } else { "issues" };
        write!(f, "validation failed with {} {noun}", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by registry lookups and validation.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SchemaError {
    /// No schema registered under the given name.
    #[error("schema not found: {name}")]
    NotFound { name: String },

    /// The candidate failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Outcome of validating a candidate: typed data or every problem found.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

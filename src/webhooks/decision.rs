//! Diagnostics and decisions produced by the admission handlers.
//!
//! A [`Diagnostic`] is one failure bound to a field path. A [`Decision`]
//! aggregates every diagnostic of one request and serializes as
//! `{accepted, warnings, diagnostics}`.

use std::fmt;

use serde::{Serialize, Serializer};

/// One segment of a [`FieldPath`]
#[derive(Clone, Debug, PartialEq, Eq)]
enum PathSegment {
    Key(String),
    Index(usize),
}

/// Path into a resource, rendered as `spec.networkInterfaces[0].subnetID`.
///
/// The root path renders as the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from a sequence of keys
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: keys
                .into_iter()
                .map(|key| PathSegment::Key(key.into()))
                .collect(),
        }
    }

    /// Path to a named child field
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Key(key.into()));
        path
    }

    /// Path to a sequence element
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Index(index));
        path
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Class of a validation failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// The object's own content violates a structural or grammar constraint
    Invalid,
    /// Well-formed content that violates a policy
    Forbidden,
    /// The policy could not be evaluated
    InternalError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Invalid => write!(f, "Invalid value"),
            DiagnosticKind::Forbidden => write!(f, "Forbidden"),
            DiagnosticKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// A single validation failure bound to a field path
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub path: FieldPath,
    pub kind: DiagnosticKind,
    /// Offending value, only set for `Invalid`
    pub value: Option<serde_json::Value>,
    pub message: String,
}

impl Diagnostic {
    /// Create an `Invalid` diagnostic carrying the rejected value
    pub fn invalid(
        path: FieldPath,
        value: impl Into<serde_json::Value>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path,
            kind: DiagnosticKind::Invalid,
            value: Some(value.into()),
            message: message.into(),
        }
    }

    /// Create a `Forbidden` diagnostic
    pub fn forbidden(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: DiagnosticKind::Forbidden,
            value: None,
            message: message.into(),
        }
    }

    /// Create an `InternalError` diagnostic at the root path
    pub fn internal_error(err: &dyn std::error::Error) -> Self {
        Self {
            path: FieldPath::root(),
            kind: DiagnosticKind::InternalError,
            value: None,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_root() {
            write!(f, "{}: ", self.path)?;
        }
        match &self.value {
            Some(value) => write!(f, "{}: {}: {}", self.kind, value, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Resource a decision is attributed to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subject {
    pub kind: String,
    pub group: String,
    pub name: String,
}

impl Subject {
    /// `Kind.group`, as the apiserver qualifies a kind in error messages
    pub fn qualified_kind(&self) -> String {
        if self.group.is_empty() {
            self.kind.clone()
        } else {
            format!("{}.{}", self.kind, self.group)
        }
    }
}

/// Outcome of one admission request
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Decision {
    pub accepted: bool,
    pub warnings: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    subject: Option<Subject>,
}

impl Decision {
    /// An accepted decision with no warnings
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            warnings: Vec::new(),
            diagnostics: Vec::new(),
            subject: None,
        }
    }

    /// Accepted when `diagnostics` is empty, rejected otherwise
    pub fn from_diagnostics(subject: Subject, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            accepted: diagnostics.is_empty(),
            warnings: Vec::new(),
            diagnostics,
            subject: Some(subject),
        }
    }

    /// Attach a warning; does not change the outcome
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    /// Render a rejection the way the apiserver renders an invalid object:
    /// `Kind.group "name" is invalid: [path: Reason: detail, ...]`.
    ///
    /// Returns `None` for accepted decisions.
    pub fn rejection_message(&self) -> Option<String> {
        if self.accepted {
            return None;
        }

        let causes = match self.diagnostics.as_slice() {
            [single] => single.to_string(),
            all => format!(
                "[{}]",
                all.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };

        Some(match &self.subject {
            Some(subject) => format!(
                "{} {:?} is invalid: {}",
                subject.qualified_kind(),
                subject.name,
                causes
            ),
            None => causes,
        })
    }
}

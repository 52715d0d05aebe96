//! Outcome model: what a dispatched hook produced.
//!
//! Hooks report through `Result<ReturnValue, Raised>`. The classifier folds
//! that into an `InvocationOutcome`, which is what callers pattern-match on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value returned by a hook that completed normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ReturnValue {
    Void,
    Bool(bool),
}

/// Kind of condition raised by a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaisedKind {
    /// "This does not apply here": the caller should treat it as a skip.
    AssumptionViolation,
    /// An explicit check inside the hook did not hold.
    AssertionFailure,
    /// Anything else, including a panic escaping the hook.
    Other,
}

/// A condition raised from inside a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raised {
    kind: RaisedKind,
    message: String,
}

impl Raised {
    pub fn new(kind: RaisedKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn assumption(message: impl Into<String>) -> Self {
        Self::new(RaisedKind::AssumptionViolation, message)
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(RaisedKind::AssertionFailure, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(RaisedKind::Other, message)
    }

    pub fn kind(&self) -> RaisedKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Raised {}

/// Classified result of one dispatch.
///
/// Serialized as `{"kind": "RETURNED" | "SKIPPED" | "FAILED", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvocationOutcome {
    Returned { value: ReturnValue },
    Skipped { reason: String },
    Failed { cause: String, assertion_style: bool },
}

impl InvocationOutcome {
    pub fn returned(value: ReturnValue) -> Self {
        InvocationOutcome::Returned { value }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        InvocationOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(cause: impl Into<String>, assertion_style: bool) -> Self {
        InvocationOutcome::Failed {
            cause: cause.into(),
            assertion_style,
        }
    }

    /// The boolean result of a condition call, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InvocationOutcome::Returned {
                value: ReturnValue::Bool(b),
            } => Some(*b),
            _ => None,
        }
    }

    pub fn is_returned(&self) -> bool {
        matches!(self, InvocationOutcome::Returned { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, InvocationOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, InvocationOutcome::Failed { .. })
    }
}

//! Outcome Classifier: raw hook result -> `InvocationOutcome`.
//!
//! Pure mapping; it never fails. Failure causes pass through the redactor.

use crate::config::Redactor;
use crate::domain::{InvocationOutcome, Raised, RaisedKind, ReturnKind, ReturnValue};

#[derive(Debug, Clone, Default)]
pub struct OutcomeClassifier {
    redactor: Redactor,
}

impl OutcomeClassifier {
    pub fn new(redactor: Redactor) -> Self {
        Self { redactor }
    }

    /// Classify `raw` for a hook declared to return `declared`.
    pub fn classify(
        &self,
        declared: ReturnKind,
        raw: Result<ReturnValue, Raised>,
    ) -> InvocationOutcome {
        match raw {
            Ok(value) => match (declared, value) {
                (ReturnKind::Bool, ReturnValue::Bool(b)) => {
                    InvocationOutcome::returned(ReturnValue::Bool(b))
                }
                (ReturnKind::Bool, ReturnValue::Void) => InvocationOutcome::failed(
                    "hook declared a boolean return but produced none",
                    false,
                ),
                (ReturnKind::Void, _) => InvocationOutcome::returned(ReturnValue::Void),
            },
            Err(raised) => match raised.kind() {
                RaisedKind::AssumptionViolation => {
                    InvocationOutcome::skipped(raised.message().to_string())
                }
                RaisedKind::AssertionFailure => {
                    InvocationOutcome::failed(self.redactor.redact(raised.message()), true)
                }
                RaisedKind::Other => {
                    InvocationOutcome::failed(self.redactor.redact(raised.message()), false)
                }
            },
        }
    }
}

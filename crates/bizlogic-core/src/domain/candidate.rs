//! Candidate method shapes.
//!
//! A `CandidateMethod` is the registry's description of one overload: which
//! slots it declares, whether the last string slot is variadic, what it
//! returns and what it is called against. It carries no behavior.

use serde::Serialize;

/// One declared parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "slot", content = "type", rename_all = "snake_case")]
pub enum ParamSpec {
    /// Consumes one string argument (or, as a variadic tail, all remaining ones).
    StringSlot,
    /// Filled with the caller's context object; never consumes an argument.
    ContextSlot,
    /// Any other declared type. A candidate holding one is never eligible.
    UnsupportedSlot(&'static str),
}

/// Declared return type of a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    Void,
    Bool,
}

/// What the hook is invoked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverKind {
    /// The caller-supplied target object.
    Instance,
    /// The declaring type itself (its shared type-level state).
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateMethod {
    pub method_name: String,
    pub params: Vec<ParamSpec>,
    /// The final `StringSlot` absorbs zero or more trailing strings.
    pub has_variadic_tail: bool,
    pub returns: ReturnKind,
    pub receiver: ReceiverKind,
}

impl CandidateMethod {
    /// Number of string slots that take exactly one argument.
    pub fn fixed_string_slots(&self) -> usize {
        let strings = self
            .params
            .iter()
            .filter(|p| matches!(p, ParamSpec::StringSlot))
            .count();
        if self.has_variadic_tail {
            strings.saturating_sub(1)
        } else {
            strings
        }
    }

    pub fn has_context_slot(&self) -> bool {
        self.params.contains(&ParamSpec::ContextSlot)
    }

    pub fn has_unsupported_slot(&self) -> bool {
        self.params
            .iter()
            .any(|p| matches!(p, ParamSpec::UnsupportedSlot(_)))
    }

    /// Index of the variadic slot, if any.
    pub fn variadic_index(&self) -> Option<usize> {
        if self.has_variadic_tail {
            self.params.len().checked_sub(1)
        } else {
            None
        }
    }
}

impl AsRef<CandidateMethod> for CandidateMethod {
    fn as_ref(&self) -> &CandidateMethod {
        self
    }
}

//! Overload Resolver: picks exactly one candidate for an argument count and
//! context availability.
//!
//! Eligibility:
//! - no `UnsupportedSlot`
//! - a declared `ContextSlot` requires a supplied context
//! - without a variadic tail the fixed string slots equal `n`,
//!   with one they are at most `n`
//!
//! Zero eligible candidates is `ArityMismatch`, more than one is
//! `AmbiguousOverload`. There is no tie-break.

use crate::domain::{CandidateMethod, DispatchError};

pub fn is_eligible(candidate: &CandidateMethod, args: usize, context_present: bool) -> bool {
    if candidate.has_unsupported_slot() {
        return false;
    }
    if candidate.has_context_slot() && !context_present {
        return false;
    }
    let fixed = candidate.fixed_string_slots();
    if candidate.has_variadic_tail {
        fixed <= args
    } else {
        fixed == args
    }
}

/// Select the single eligible candidate among `candidates`.
///
/// `declaring_type` and `method` are only used for error reporting.
pub fn resolve<'c, M: AsRef<CandidateMethod>>(
    declaring_type: &str,
    method: &str,
    candidates: &'c [M],
    args: usize,
    context_present: bool,
) -> Result<&'c M, DispatchError> {
    let mut eligible = candidates
        .iter()
        .filter(|c| is_eligible(c.as_ref(), args, context_present));

    let Some(first) = eligible.next() else {
        return Err(DispatchError::ArityMismatch {
            declaring_type: declaring_type.to_string(),
            method: method.to_string(),
            args,
            context: context_present,
        });
    };

    let others = eligible.count();
    if others > 0 {
        return Err(DispatchError::AmbiguousOverload {
            declaring_type: declaring_type.to_string(),
            method: method.to_string(),
            args,
            context: context_present,
            matches: others + 1,
        });
    }

    Ok(first)
}

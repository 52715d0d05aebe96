//! Domain model (rule references, method shapes, requests, outcomes, errors).

pub mod candidate;
pub mod errors;
pub mod outcome;
pub mod request;
pub mod rule_ref;

pub use candidate::{CandidateMethod, ParamSpec, ReceiverKind, ReturnKind};
pub use errors::DispatchError;
pub use outcome::{InvocationOutcome, Raised, RaisedKind, ReturnValue};
pub use request::InvocationRequest;
pub use rule_ref::{NESTED_MARKER, RuleReference, TYPE_SEPARATOR, TypePath};

//! Invoker: binds arguments to the selected shape and calls the hook.
//!
//! The raw `Result<ReturnValue, Raised>` is handed to the classifier as is.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::domain::{CandidateMethod, ParamSpec, Raised, ReturnValue};
use crate::registry::{ArgValue, CallArgs, Receiver, RegisteredMethod};

/// Walk the declared slots and bind context and strings to them.
///
/// Expects a shape the resolver accepted; anything else raises instead of
/// panicking.
pub fn bind_args<'a>(
    shape: &CandidateMethod,
    context: Option<&'a dyn Any>,
    args: &[String],
) -> Result<CallArgs<'a>, Raised> {
    let mut remaining = args.iter();
    let mut values = Vec::with_capacity(shape.params.len());
    let variadic_at = shape.variadic_index();

    for (idx, slot) in shape.params.iter().enumerate() {
        let value = match slot {
            ParamSpec::ContextSlot => ArgValue::Context(
                context.ok_or_else(|| Raised::other("context slot declared but no context supplied"))?,
            ),
            ParamSpec::StringSlot if variadic_at == Some(idx) => {
                ArgValue::Group(remaining.by_ref().cloned().collect())
            }
            ParamSpec::StringSlot => ArgValue::Str(
                remaining
                    .next()
                    .cloned()
                    .ok_or_else(|| Raised::other(format!("missing argument for slot {idx}")))?,
            ),
            ParamSpec::UnsupportedSlot(ty) => {
                return Err(Raised::other(format!("unsupported parameter type {ty}")));
            }
        };
        values.push(value);
    }

    let extra = remaining.count();
    if extra > 0 {
        return Err(Raised::other(format!("{extra} argument(s) left unbound")));
    }

    Ok(CallArgs::new(values))
}

/// Call the hook, turning an escaping panic into a raised condition.
pub fn invoke(
    method: &RegisteredMethod,
    receiver: Receiver<'_>,
    args: &CallArgs<'_>,
) -> Result<ReturnValue, Raised> {
    match catch_unwind(AssertUnwindSafe(|| method.call(receiver, args))) {
        Ok(result) => result,
        Err(payload) => Err(Raised::other(panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

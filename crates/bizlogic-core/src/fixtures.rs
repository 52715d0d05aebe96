//! Test fixtures: a target type with one overload family per dispatch rule,
//! a context type, and a member type with type-level state.

use std::sync::{Arc, Mutex};

use crate::config::ExecutorConfig;
use crate::dispatch::BusinessLogicExecutor;
use crate::domain::{Raised, ReturnValue};
use crate::registry::{CallArgs, MethodRegistry, Receiver, RegistryBuilder, Signature};

pub const TARGET_TYPE: &str = "com.example.logic.FakeTarget";
pub const OTHER_CLASS: &str = "com.example.logic.FakeTarget$OtherClass";

#[derive(Debug, Default)]
pub struct FakeTarget {
    calls: Mutex<Vec<String>>,
    value: Mutex<Option<String>>,
}

impl FakeTarget {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[derive(Debug)]
pub struct FakeContext {
    label: String,
}

impl FakeContext {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Type-level state of `FakeTarget$OtherClass`.
#[derive(Debug, Default)]
pub struct OtherClassState {
    value: Mutex<Option<String>>,
}

impl OtherClassState {
    pub fn value(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn group(items: &[String]) -> String {
    format!("[{}]", items.join(","))
}

fn ctx(args: &CallArgs<'_>, index: usize) -> Result<String, Raised> {
    Ok(format!("ctx={}", args.context::<FakeContext>(index)?.label))
}

/// Record `name(parts...)` on the target.
fn record(recv: Receiver<'_>, name: &str, parts: Vec<String>) -> Result<ReturnValue, Raised> {
    recv.instance::<FakeTarget>()?
        .record(format!("{name}({})", parts.join(",")));
    Ok(ReturnValue::Void)
}

pub fn registry() -> MethodRegistry {
    build_registry().expect("fixture registry is valid")
}

pub fn executor() -> BusinessLogicExecutor {
    BusinessLogicExecutor::new(Arc::new(registry()), &ExecutorConfig::new(TARGET_TYPE))
        .expect("fixture config is valid")
}

fn build_registry() -> Result<MethodRegistry, crate::registry::RegistryError> {
    let t = TARGET_TYPE;
    let builder = RegistryBuilder::new::<FakeContext>()
        .declare_type(t)?
        .declare_member_type(t, "OtherClass")?
        .type_state(OTHER_CLASS, Arc::new(OtherClassState::default()))?
        // overloads by string count
        .register(t, Signature::instance("voidMethod"), |recv, _| {
            record(recv, "voidMethod", vec![])
        })?
        .register(t, Signature::instance("voidMethod").string(), |recv, args| {
            record(recv, "voidMethod", vec![args.string(0)?.to_string()])
        })?
        .register(t, Signature::instance("voidMethod").string().string(), |recv, args| {
            record(
                recv,
                "voidMethod",
                vec![args.string(0)?.to_string(), args.string(1)?.to_string()],
            )
        })?
        // context position
        .register(
            t,
            Signature::instance("contextFirst").context::<FakeContext>().string(),
            |recv, args| record(recv, "contextFirst", vec![ctx(args, 0)?, args.string(1)?.to_string()]),
        )?
        .register(
            t,
            Signature::instance("contextLast").string().context::<FakeContext>(),
            |recv, args| record(recv, "contextLast", vec![args.string(0)?.to_string(), ctx(args, 1)?]),
        )?
        .register(
            t,
            Signature::instance("contextOnly").context::<FakeContext>(),
            |recv, args| record(recv, "contextOnly", vec![ctx(args, 0)?]),
        )?
        .register(
            t,
            Signature::instance("contextTwice")
                .context::<FakeContext>()
                .string()
                .context::<FakeContext>(),
            |recv, args| {
                record(
                    recv,
                    "contextTwice",
                    vec![ctx(args, 0)?, args.string(1)?.to_string(), ctx(args, 2)?],
                )
            },
        )?
        // variadic tails
        .register(t, Signature::instance("varargs").variadic(), |recv, args| {
            record(recv, "varargs", vec![group(args.group(0)?)])
        })?
        .register(
            t,
            Signature::instance("fixedThenVarargs").string().variadic(),
            |recv, args| {
                record(
                    recv,
                    "fixedThenVarargs",
                    vec![args.string(0)?.to_string(), group(args.group(1)?)],
                )
            },
        )?
        .register(
            t,
            Signature::instance("contextFixedVarargs")
                .context::<FakeContext>()
                .string()
                .variadic(),
            |recv, args| {
                record(
                    recv,
                    "contextFixedVarargs",
                    vec![ctx(args, 0)?, args.string(1)?.to_string(), group(args.group(2)?)],
                )
            },
        )?
        // never eligible
        .register(
            t,
            Signature::instance("unsupported").string().param::<i32>(),
            |recv, _| record(recv, "unsupported", vec![]),
        )?
        // eligible twice for one argument
        .register(t, Signature::instance("ambiguous").string(), |recv, _| {
            record(recv, "ambiguous", vec![])
        })?
        .register(t, Signature::instance("ambiguous").variadic(), |recv, _| {
            record(recv, "ambiguous", vec![])
        })?
        // conditions
        .register(t, Signature::instance("trueCondition").returns_bool(), |_, _| {
            Ok(ReturnValue::Bool(true))
        })?
        .register(t, Signature::instance("falseCondition").returns_bool(), |_, _| {
            Ok(ReturnValue::Bool(false))
        })?
        .register(
            t,
            Signature::instance("stringsEqual").string().string().returns_bool(),
            |_, args| Ok(ReturnValue::Bool(args.string(0)? == args.string(1)?)),
        )?
        .register(
            t,
            Signature::instance("skippedCondition").string().returns_bool(),
            |_, args| Err(Raised::assumption(args.string(0)?)),
        )?
        // raised conditions
        .register(t, Signature::instance("assumptionFailure").string(), |_, args| {
            Err(Raised::assumption(args.string(0)?))
        })?
        .register(t, Signature::instance("assertionFailure").string(), |_, args| {
            Err(Raised::assertion(args.string(0)?))
        })?
        .register(t, Signature::instance("otherFailure").string(), |_, args| {
            Err(Raised::other(args.string(0)?))
        })?
        .register(t, Signature::instance("panics"), |_, _| panic!("kaboom"))?
        // instance vs type-level state
        .register(t, Signature::instance("setInstanceValue").string(), |recv, args| {
            let target = recv.instance::<FakeTarget>()?;
            *target.value.lock().unwrap() = Some(args.string(0)?.to_string());
            Ok(ReturnValue::Void)
        })?
        .register(
            OTHER_CLASS,
            Signature::type_level("setStaticValue").string(),
            |recv, args| {
                let state = recv.type_state::<OtherClassState>()?;
                *state.value.lock().unwrap() = Some(args.string(0)?.to_string());
                Ok(ReturnValue::Void)
            },
        )?
        .register(
            OTHER_CLASS,
            Signature::type_level("staticValueIs").string().returns_bool(),
            |recv, args| {
                let state = recv.type_state::<OtherClassState>()?;
                let expected = args.string(0)?;
                Ok(ReturnValue::Bool(state.value().as_deref() == Some(expected)))
            },
        )?;
    Ok(builder.build())
}

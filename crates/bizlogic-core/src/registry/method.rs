//! RegisteredMethod - 型消去されたフック本体
//!
//! # 二層構造
//! - **形状（CandidateMethod）**: オーバーロード解決が見るデータ
//! - **本体（MethodFn）**: `Receiver` と `CallArgs` を受け取る object-safe なクロージャ
//!
//! ホスト側のクロージャは `Receiver::instance::<T>()` / `CallArgs::string(i)` などで
//! 具体型を取り出し、失敗時は `Raised` を `?` で返します。

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::domain::{CandidateMethod, Raised, ReturnValue};

/// Type-erased hook body.
pub type MethodFn = dyn Fn(Receiver<'_>, &CallArgs<'_>) -> Result<ReturnValue, Raised> + Send + Sync;

/// Shared type-level state owned by a registry entry.
pub type TypeState = Arc<dyn Any + Send + Sync>;

/// What a hook is called against.
#[derive(Clone, Copy)]
pub enum Receiver<'a> {
    /// The caller-supplied target object.
    Instance(&'a dyn Any),
    /// The declaring type; carries its shared state when one was registered.
    Type(Option<&'a (dyn Any + Send + Sync)>),
}

impl<'a> Receiver<'a> {
    /// Downcast the target. A target of another type raises a generic failure.
    pub fn instance<T: Any>(self) -> Result<&'a T, Raised> {
        match self {
            Receiver::Instance(target) => target.downcast_ref::<T>().ok_or_else(|| {
                Raised::other(format!("target is not an instance of {}", type_name::<T>()))
            }),
            Receiver::Type(_) => Err(Raised::other(format!(
                "type-level call has no {} instance",
                type_name::<T>()
            ))),
        }
    }

    /// Downcast the declaring type's shared state.
    pub fn type_state<S: Any>(self) -> Result<&'a S, Raised> {
        match self {
            Receiver::Type(Some(state)) => {
                let state: &'a dyn Any = state;
                state.downcast_ref::<S>().ok_or_else(|| {
                    Raised::other(format!("type state is not {}", type_name::<S>()))
                })
            }
            Receiver::Type(None) => Err(Raised::other("declaring type has no shared state")),
            Receiver::Instance(_) => Err(Raised::other("instance call has no type state")),
        }
    }
}

/// One bound argument.
#[derive(Clone)]
pub enum ArgValue<'a> {
    Context(&'a dyn Any),
    Str(String),
    /// Everything the variadic tail absorbed, possibly nothing.
    Group(Vec<String>),
}

impl fmt::Debug for ArgValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Context(_) => f.write_str("Context(..)"),
            ArgValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            ArgValue::Group(g) => f.debug_tuple("Group").field(g).finish(),
        }
    }
}

/// Arguments bound in the hook's declared slot order.
#[derive(Debug, Clone, Default)]
pub struct CallArgs<'a> {
    values: Vec<ArgValue<'a>>,
}

impl<'a> CallArgs<'a> {
    pub fn new(values: Vec<ArgValue<'a>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArgValue<'a>> {
        self.values.get(index)
    }

    pub fn string(&self, index: usize) -> Result<&str, Raised> {
        match self.values.get(index) {
            Some(ArgValue::Str(s)) => Ok(s),
            other => Err(slot_mismatch(index, "string", other)),
        }
    }

    pub fn group(&self, index: usize) -> Result<&[String], Raised> {
        match self.values.get(index) {
            Some(ArgValue::Group(g)) => Ok(g),
            other => Err(slot_mismatch(index, "variadic group", other)),
        }
    }

    pub fn context<C: Any>(&self, index: usize) -> Result<&'a C, Raised> {
        match self.values.get(index) {
            Some(ArgValue::Context(ctx)) => {
                let ctx: &'a dyn Any = *ctx;
                ctx.downcast_ref::<C>().ok_or_else(|| {
                    Raised::other(format!("context is not {}", type_name::<C>()))
                })
            }
            other => Err(slot_mismatch(index, "context", other)),
        }
    }
}

fn slot_mismatch(index: usize, expected: &str, found: Option<&ArgValue<'_>>) -> Raised {
    Raised::other(format!("slot {index}: expected {expected}, found {found:?}"))
}

/// A candidate shape together with its body.
#[derive(Clone)]
pub struct RegisteredMethod {
    shape: CandidateMethod,
    body: Arc<MethodFn>,
}

impl RegisteredMethod {
    pub fn new(shape: CandidateMethod, body: Arc<MethodFn>) -> Self {
        Self { shape, body }
    }

    pub fn shape(&self) -> &CandidateMethod {
        &self.shape
    }

    pub fn call(&self, receiver: Receiver<'_>, args: &CallArgs<'_>) -> Result<ReturnValue, Raised> {
        (self.body)(receiver, args)
    }
}

impl AsRef<CandidateMethod> for RegisteredMethod {
    fn as_ref(&self) -> &CandidateMethod {
        &self.shape
    }
}

impl fmt::Debug for RegisteredMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredMethod")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

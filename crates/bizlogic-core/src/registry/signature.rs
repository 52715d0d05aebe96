//! Signature - ホストが宣言するメソッドの形
//!
//! パラメータは Rust の型で宣言します。`String` は文字列スロット、
//! registry のコンテキスト型はコンテキストスロット、それ以外は未対応スロットになります。
//! 分類は `RegistryBuilder::register` 時に行います。

use std::any::{Any, TypeId, type_name};

use crate::domain::{ParamSpec, ReceiverKind, ReturnKind};

/// A declared parameter, not yet classified against the registry's context type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredParam {
    type_id: TypeId,
    type_name: &'static str,
    variadic: bool,
}

impl DeclaredParam {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            variadic: false,
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Map the declared type onto a slot kind.
    pub fn classify(&self, context_type: TypeId) -> ParamSpec {
        if self.type_id == TypeId::of::<String>() {
            ParamSpec::StringSlot
        } else if self.type_id == context_type && !self.variadic {
            ParamSpec::ContextSlot
        } else {
            ParamSpec::UnsupportedSlot(self.type_name)
        }
    }
}

/// Builder for one overload's declared shape.
///
/// ```ignore
/// Signature::instance("methodWithContext")
///     .context::<DeviceContext>()
///     .string()
///     .variadic()
///     .returns_bool();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub(crate) method_name: String,
    pub(crate) params: Vec<DeclaredParam>,
    pub(crate) returns: ReturnKind,
    pub(crate) receiver: ReceiverKind,
}

impl Signature {
    /// A method invoked against the caller's target.
    pub fn instance(method_name: impl Into<String>) -> Self {
        Self::with_receiver(method_name, ReceiverKind::Instance)
    }

    /// A method invoked against its declaring type (static-like).
    pub fn type_level(method_name: impl Into<String>) -> Self {
        Self::with_receiver(method_name, ReceiverKind::Type)
    }

    fn with_receiver(method_name: impl Into<String>, receiver: ReceiverKind) -> Self {
        Self {
            method_name: method_name.into(),
            params: Vec::new(),
            returns: ReturnKind::Void,
            receiver,
        }
    }

    pub fn param<T: Any>(mut self) -> Self {
        self.params.push(DeclaredParam::of::<T>());
        self
    }

    pub fn string(self) -> Self {
        self.param::<String>()
    }

    pub fn context<C: Any>(self) -> Self {
        self.param::<C>()
    }

    /// Trailing variadic slot of `T`; only `String` is supported.
    pub fn variadic_of<T: Any>(mut self) -> Self {
        self.params.push(DeclaredParam {
            variadic: true,
            ..DeclaredParam::of::<T>()
        });
        self
    }

    pub fn variadic(self) -> Self {
        self.variadic_of::<String>()
    }

    pub fn returns_bool(mut self) -> Self {
        self.returns = ReturnKind::Bool;
        self
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }
}

//! MethodRegistry - 宣言型ごとの候補メソッド表
//!
//! ホストアプリケーションが起動時に一度だけ構築し、以降は読み取り専用で共有します。
//!
//! # 構造
//! - `declaring type name -> TypeEntry`
//! - `TypeEntry` は `method name -> Vec<RegisteredMethod>`（オーバーロード）を持つ
//! - メンバー型（`Outer$Inner`）は独立した `TypeEntry` として登録され、外側の型から名前で辿れる
//! - 型レベルの共有状態は `TypeEntry` が所有する

pub mod builder;
pub mod method;
pub mod signature;

use std::any::{Any, TypeId};
use std::collections::HashMap;

pub use self::builder::RegistryBuilder;
pub use self::method::{ArgValue, CallArgs, MethodFn, Receiver, RegisteredMethod, TypeState};
pub use self::signature::{DeclaredParam, Signature};

/// RegistryError は registry 構築時のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("declaring type '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("declaring type '{0}' is not registered")]
    UnknownType(String),

    #[error("invalid type name '{0}'")]
    InvalidTypeName(String),

    #[error("invalid method name '{0}'")]
    InvalidMethodName(String),

    #[error("'{declaring_type}.{method}' is already registered with the same shape")]
    DuplicateShape {
        declaring_type: String,
        method: String,
    },

    #[error("'{declaring_type}.{method}' declares a variadic slot that is not the last parameter")]
    MisplacedVariadic {
        declaring_type: String,
        method: String,
    },

    #[error("type state for '{0}' is already set")]
    StateAlreadySet(String),
}

/// Everything registered for one declaring type.
pub struct TypeEntry {
    name: String,
    members: HashMap<String, String>,
    methods: HashMap<String, Vec<RegisteredMethod>>,
    state: Option<TypeState>,
}

impl TypeEntry {
    fn new(name: String) -> Self {
        Self {
            name,
            members: HashMap::new(),
            methods: HashMap::new(),
            state: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry key of the member type `inner`, if declared.
    pub fn member(&self, inner: &str) -> Option<&str> {
        self.members.get(inner).map(String::as_str)
    }

    /// All overloads registered under `method`.
    pub fn candidates(&self, method: &str) -> Option<&[RegisteredMethod]> {
        self.methods.get(method).map(Vec::as_slice)
    }

    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn state(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.state.as_deref()
    }

    /// Typed view of the shared type-level state.
    pub fn shared_state<S: Any>(&self) -> Option<&S> {
        let state: &dyn Any = self.state.as_deref()?;
        state.downcast_ref::<S>()
    }
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("members", &self.members)
            .field("methods", &self.method_names())
            .field("state", &self.state.is_some())
            .finish()
    }
}

/// Read-only table of declaring types, built by `RegistryBuilder`.
#[derive(Debug)]
pub struct MethodRegistry {
    context_type: TypeId,
    context_name: &'static str,
    types: HashMap<String, TypeEntry>,
}

impl MethodRegistry {
    pub fn builder<C: Any>() -> RegistryBuilder {
        RegistryBuilder::new::<C>()
    }

    pub fn get(&self, declaring_type: &str) -> Option<&TypeEntry> {
        self.types.get(declaring_type)
    }

    /// The injectable context type every `ContextSlot` refers to.
    pub fn context_type(&self) -> TypeId {
        self.context_type
    }

    pub fn context_name(&self) -> &'static str {
        self.context_name
    }

    pub fn registered_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

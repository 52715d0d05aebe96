//! RegistryBuilder - 起動時の登録と検証
//!
//! # Fail-fast 設計
//! - 型名・メソッド名の形式チェック
//! - 同一形状の二重登録を拒否
//! - 可変長スロットは最後のパラメータのみ
//!
//! 形状が異なるが同じ引数数で両方マッチしうるオーバーロードは登録可能で、
//! 実行時に `AmbiguousOverload` として報告されます。

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{CandidateMethod, NESTED_MARKER, Raised, ReturnValue};

use super::method::{CallArgs, Receiver, RegisteredMethod};
use super::{MethodRegistry, RegistryError, Signature, TypeEntry};

/// Builds a `MethodRegistry` for one injectable context type `C`.
///
/// # 使用例
/// ```ignore
/// let registry = MethodRegistry::builder::<DeviceContext>()
///     .declare_type("com.example.Target")?
///     .register("com.example.Target", Signature::instance("method1").string(), |recv, args| {
///         recv.instance::<Target>()?.record(args.string(0)?);
///         Ok(ReturnValue::Void)
///     })?
///     .build();
/// ```
pub struct RegistryBuilder {
    context_type: TypeId,
    context_name: &'static str,
    types: HashMap<String, TypeEntry>,
}

impl RegistryBuilder {
    pub fn new<C: Any>() -> Self {
        Self {
            context_type: TypeId::of::<C>(),
            context_name: type_name::<C>(),
            types: HashMap::new(),
        }
    }

    /// Declare a top-level type.
    pub fn declare_type(mut self, name: impl Into<String>) -> Result<Self, RegistryError> {
        let name = name.into();
        if !is_valid_type_name(&name) {
            return Err(RegistryError::InvalidTypeName(name));
        }
        self.insert_type(name)?;
        Ok(self)
    }

    /// Declare `inner` as a member type of the already declared `outer`.
    ///
    /// The member is registered under the key `Outer$Inner`.
    pub fn declare_member_type(
        mut self,
        outer: &str,
        inner: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let inner = inner.into();
        if inner.is_empty() || inner.contains(NESTED_MARKER) || inner.contains('.') {
            return Err(RegistryError::InvalidTypeName(inner));
        }
        let key = format!("{outer}{NESTED_MARKER}{inner}");
        let outer_entry = self
            .types
            .get_mut(outer)
            .ok_or_else(|| RegistryError::UnknownType(outer.to_string()))?;
        if outer_entry.members.contains_key(&inner) {
            return Err(RegistryError::AlreadyRegistered(key));
        }
        outer_entry.members.insert(inner, key.clone());
        self.insert_type(key)?;
        Ok(self)
    }

    /// Attach shared type-level state to a declared type.
    pub fn type_state<S: Any + Send + Sync>(
        mut self,
        declaring_type: &str,
        state: Arc<S>,
    ) -> Result<Self, RegistryError> {
        let entry = self.entry_mut(declaring_type)?;
        if entry.state.is_some() {
            return Err(RegistryError::StateAlreadySet(declaring_type.to_string()));
        }
        entry.state = Some(state);
        Ok(self)
    }

    /// Register one overload of a method on a declared type.
    pub fn register<F>(
        mut self,
        declaring_type: &str,
        signature: Signature,
        body: F,
    ) -> Result<Self, RegistryError>
    where
        F: Fn(Receiver<'_>, &CallArgs<'_>) -> Result<ReturnValue, Raised> + Send + Sync + 'static,
    {
        let shape = self.shape_of(declaring_type, signature)?;
        let entry = self.entry_mut(declaring_type)?;
        let overloads = entry.methods.entry(shape.method_name.clone()).or_default();
        if overloads.iter().any(|m| {
            m.shape().params == shape.params && m.shape().has_variadic_tail == shape.has_variadic_tail
        }) {
            return Err(RegistryError::DuplicateShape {
                declaring_type: declaring_type.to_string(),
                method: shape.method_name,
            });
        }
        overloads.push(RegisteredMethod::new(shape, Arc::new(body)));
        Ok(self)
    }

    pub fn build(self) -> MethodRegistry {
        tracing::debug!(
            types = self.types.len(),
            context = self.context_name,
            "method registry built"
        );
        MethodRegistry {
            context_type: self.context_type,
            context_name: self.context_name,
            types: self.types,
        }
    }

    fn insert_type(&mut self, name: String) -> Result<(), RegistryError> {
        if self.types.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.types.insert(name.clone(), TypeEntry::new(name));
        Ok(())
    }

    fn entry_mut(&mut self, declaring_type: &str) -> Result<&mut TypeEntry, RegistryError> {
        self.types
            .get_mut(declaring_type)
            .ok_or_else(|| RegistryError::UnknownType(declaring_type.to_string()))
    }

    fn shape_of(
        &self,
        declaring_type: &str,
        signature: Signature,
    ) -> Result<CandidateMethod, RegistryError> {
        let Signature {
            method_name,
            params,
            returns,
            receiver,
        } = signature;

        if method_name.is_empty() || method_name.contains(['.', NESTED_MARKER]) {
            return Err(RegistryError::InvalidMethodName(method_name));
        }

        let variadic_at = params.iter().position(|p| p.is_variadic());
        if let Some(idx) = variadic_at {
            if idx + 1 != params.len() {
                return Err(RegistryError::MisplacedVariadic {
                    declaring_type: declaring_type.to_string(),
                    method: method_name,
                });
            }
        }

        Ok(CandidateMethod {
            method_name,
            params: params.iter().map(|p| p.classify(self.context_type)).collect(),
            has_variadic_tail: variadic_at.is_some(),
            returns,
            receiver,
        })
    }
}

fn is_valid_type_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(NESTED_MARKER)
        && name.split('.').all(|segment| !segment.is_empty())
}

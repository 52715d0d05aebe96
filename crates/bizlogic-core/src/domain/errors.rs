//! Errors - ディスパッチ時のエラー分類
//!
//! ここに並ぶのは「呼び出す前に」確定するエラーだけです。
//! 呼び出したメソッド内部で発生した失敗は `InvocationOutcome` として返り、エラーにはなりません。

use thiserror::Error;

/// Errors raised while locating or resolving a rule, before any hook runs.
///
/// All variants are fatal for the call; the executor never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("malformed rule reference '{0}'")]
    MalformedReference(String),

    #[error("declaring type '{0}' is not registered")]
    TypeNotFound(String),

    #[error("type '{outer}' has no member type '{inner}'")]
    MemberTypeNotFound { outer: String, inner: String },

    #[error("only one level of nested type addressing is supported: '{0}'")]
    NestingTooDeep(String),

    #[error("method '{method}' not found on '{declaring_type}'")]
    MethodNotFound {
        declaring_type: String,
        method: String,
    },

    #[error(
        "no overload of '{declaring_type}.{method}' accepts {args} string argument(s) (context supplied: {context})"
    )]
    ArityMismatch {
        declaring_type: String,
        method: String,
        args: usize,
        context: bool,
    },

    #[error(
        "{matches} overloads of '{declaring_type}.{method}' accept {args} string argument(s) (context supplied: {context})"
    )]
    AmbiguousOverload {
        declaring_type: String,
        method: String,
        args: usize,
        context: bool,
        matches: usize,
    },

    #[error("'{0}' does not return boolean and cannot be used as a condition")]
    NotACondition(String),
}

impl DispatchError {
    /// True for the "type or method not found" family.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            DispatchError::MalformedReference(_)
                | DispatchError::TypeNotFound(_)
                | DispatchError::MemberTypeNotFound { .. }
                | DispatchError::NestingTooDeep(_)
                | DispatchError::MethodNotFound { .. }
        )
    }

    /// True when overload selection found zero or several candidates.
    pub fn is_overload_error(&self) -> bool {
        matches!(
            self,
            DispatchError::ArityMismatch { .. } | DispatchError::AmbiguousOverload { .. }
        )
    }
}

//! bizlogic-core
//!
//! Rule-driven dispatch of pre-registered hooks.
//!
//! A rule reference such as `com.example.Target.method` (or
//! `com.example.Target$Inner.method`) plus string arguments is resolved
//! against an explicit registry of method shapes and invoked on a caller
//! supplied target, optionally injecting a context object.
//!
//! # モジュール構成
//! - **domain**: ルール参照、メソッド形状、リクエスト、結果、エラー
//! - **registry**: 起動時に構築する読み取り専用の候補メソッド表
//! - **dispatch**: Locator → Resolver → Invoker → Classifier と、それを束ねる executor
//! - **rules**: 条件/アクションのルールブックと適用
//! - **config**: executor 設定と失敗メッセージの redaction

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod registry;
pub mod rules;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::{ConfigError, ExecutorConfig, Redactor};
pub use dispatch::BusinessLogicExecutor;
pub use domain::{
    CandidateMethod, DispatchError, InvocationOutcome, InvocationRequest, ParamSpec, Raised,
    RaisedKind, ReceiverKind, ReturnKind, ReturnValue, RuleReference,
};
pub use registry::{
    CallArgs, MethodRegistry, Receiver, RegistryBuilder, RegistryError, Signature,
};
pub use rules::{RuleBook, RuleReport};

//! BusinessLogicExecutor - ルール参照を 1 回のメソッド呼び出しに変換する
//!
//! # フロー
//! `Idle → Located → Resolved → Invoked → Classified → Idle`
//!
//! Located / Resolved で失敗した場合は `DispatchError` を返し、フックは呼ばれません。
//! 呼び出し後の結果はすべて `InvocationOutcome` として返ります。
//!
//! executor 自身は可変状態を持たないため、複数スレッドから同時に呼び出せます。

use std::any::Any;
use std::sync::Arc;

use tracing::{debug, debug_span, warn};

use crate::config::{ConfigError, ExecutorConfig, Redactor};
use crate::domain::{
    CandidateMethod, DispatchError, InvocationOutcome, InvocationRequest, ReceiverKind, ReturnKind,
};
use crate::registry::{MethodRegistry, Receiver};

use super::classifier::OutcomeClassifier;
use super::invoker;
use super::locator::{Located, RuleLocator};
use super::resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallMode {
    Action,
    Condition,
}

pub struct BusinessLogicExecutor {
    registry: Arc<MethodRegistry>,
    default_type: String,
    classifier: OutcomeClassifier,
}

impl BusinessLogicExecutor {
    pub fn new(registry: Arc<MethodRegistry>, config: &ExecutorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let redactor = Redactor::compile(&config.redaction_patterns)?;
        Ok(Self {
            registry,
            default_type: config.default_type.clone(),
            classifier: OutcomeClassifier::new(redactor),
        })
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    /// Run `rule` as an action. Any return value is accepted.
    pub fn execute_action(
        &self,
        rule: &str,
        args: &[String],
        target: &dyn Any,
        context: Option<&dyn Any>,
    ) -> Result<InvocationOutcome, DispatchError> {
        let located = self.locator().locate(rule)?;
        self.dispatch(located, target, context, args, CallMode::Action)
    }

    /// Run `rule` as a condition.
    ///
    /// The selected overload must be declared boolean; a void method is
    /// rejected with `NotACondition` before it runs. A returned outcome is
    /// therefore always `Returned(Bool(_))`, `Skipped` or `Failed`.
    pub fn execute_condition(
        &self,
        rule: &str,
        args: &[String],
        target: &dyn Any,
        context: Option<&dyn Any>,
    ) -> Result<InvocationOutcome, DispatchError> {
        let located = self.locator().locate(rule)?;
        self.dispatch(located, target, context, args, CallMode::Condition)
    }

    /// Run a prepared request as an action.
    pub fn execute(&self, request: InvocationRequest<'_>) -> Result<InvocationOutcome, DispatchError> {
        self.dispatch_request(request, CallMode::Action)
    }

    /// Run a prepared request as a condition; see `execute_condition`.
    pub fn execute_condition_request(
        &self,
        request: InvocationRequest<'_>,
    ) -> Result<InvocationOutcome, DispatchError> {
        self.dispatch_request(request, CallMode::Condition)
    }

    /// Locate and resolve without invoking anything.
    pub fn describe(
        &self,
        rule: &str,
        args: usize,
        context_present: bool,
    ) -> Result<&CandidateMethod, DispatchError> {
        let Located { reference, entry } = self.locator().locate(rule)?;
        let candidates = entry.candidates(reference.method_name()).ok_or_else(|| {
            DispatchError::MethodNotFound {
                declaring_type: entry.name().to_string(),
                method: reference.method_name().to_string(),
            }
        })?;
        let method = resolver::resolve(
            entry.name(),
            reference.method_name(),
            candidates,
            args,
            context_present,
        )?;
        Ok(method.shape())
    }

    fn dispatch_request(
        &self,
        request: InvocationRequest<'_>,
        mode: CallMode,
    ) -> Result<InvocationOutcome, DispatchError> {
        let entry = self.locator().resolve_type(request.rule)?;
        let located = Located {
            reference: request.rule.clone(),
            entry,
        };
        self.dispatch(located, request.target, request.context, request.args, mode)
    }

    fn locator(&self) -> RuleLocator<'_> {
        RuleLocator::new(&self.registry, &self.default_type)
    }

    fn dispatch(
        &self,
        located: Located<'_>,
        target: &dyn Any,
        context: Option<&dyn Any>,
        args: &[String],
        mode: CallMode,
    ) -> Result<InvocationOutcome, DispatchError> {
        let Located { reference, entry } = located;
        let span = debug_span!("dispatch", rule = %reference, args = args.len(), mode = ?mode);
        let _guard = span.enter();
        debug!(declaring_type = entry.name(), "located");

        let method_name = reference.method_name();
        let candidates = entry.candidates(method_name).ok_or_else(|| {
            let err = DispatchError::MethodNotFound {
                declaring_type: entry.name().to_string(),
                method: method_name.to_string(),
            };
            warn!(error = %err, "resolution failed");
            err
        })?;

        let context = self.effective_context(context);
        let method = resolver::resolve(
            entry.name(),
            method_name,
            candidates,
            args.len(),
            context.is_some(),
        )
        .inspect_err(|err| warn!(error = %err, "overload resolution failed"))?;
        let shape = method.shape();
        debug!(params = ?shape.params, variadic = shape.has_variadic_tail, "resolved");

        if mode == CallMode::Condition && shape.returns != ReturnKind::Bool {
            return Err(DispatchError::NotACondition(reference.to_string()));
        }

        let receiver = match shape.receiver {
            ReceiverKind::Instance => Receiver::Instance(target),
            ReceiverKind::Type => Receiver::Type(entry.state()),
        };
        let raw = invoker::bind_args(shape, context, args)
            .and_then(|bound| invoker::invoke(method, receiver, &bound));
        debug!(ok = raw.is_ok(), "invoked");

        let outcome = self.classifier.classify(shape.returns, raw);
        debug!(?outcome, "classified");
        Ok(outcome)
    }

    /// A context of the wrong type counts as no context.
    fn effective_context<'a>(&self, context: Option<&'a dyn Any>) -> Option<&'a dyn Any> {
        let context = context?;
        if Any::type_id(context) == self.registry.context_type() {
            Some(context)
        } else {
            warn!(
                expected = self.registry.context_name(),
                "supplied context has the wrong type and is ignored"
            );
            None
        }
    }
}

impl std::fmt::Debug for BusinessLogicExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessLogicExecutor")
            .field("default_type", &self.default_type)
            .field("types", &self.registry.len())
            .finish_non_exhaustive()
    }
}

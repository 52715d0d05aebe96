use std::any::Any;

use super::rule_ref::RuleReference;

/// One dispatch: rule, target, optional context and string arguments.
///
/// Borrowed for the duration of the call only; nothing here outlives the
/// returned outcome.
#[derive(Clone, Copy)]
pub struct InvocationRequest<'a> {
    pub rule: &'a RuleReference,
    pub target: &'a dyn Any,
    pub context: Option<&'a dyn Any>,
    pub args: &'a [String],
}

impl<'a> InvocationRequest<'a> {
    pub fn new(rule: &'a RuleReference, target: &'a dyn Any, args: &'a [String]) -> Self {
        Self {
            rule,
            target,
            context: None,
            args,
        }
    }

    pub fn with_context(mut self, context: &'a dyn Any) -> Self {
        self.context = Some(context);
        self
    }
}

impl std::fmt::Debug for InvocationRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationRequest")
            .field("rule", &self.rule.to_string())
            .field("context", &self.context.is_some())
            .field("args", &self.args)
            .finish()
    }
}

//! Applying a rule book through an executor.
//!
//! Every rule of every list registered for a key is evaluated in order.
//! A rule matches when each condition's boolean result differs from its
//! `negated` flag; its actions then run in order. The first `Skipped` or
//! `Failed` outcome, from a condition or an action, stops evaluation and is
//! reported in `RuleReport::halted`.

use std::any::Any;

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::dispatch::BusinessLogicExecutor;
use crate::domain::{DispatchError, InvocationOutcome};

use super::book::{Rule, RuleBook};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    pub rules_matched: usize,
    pub actions_invoked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted: Option<InvocationOutcome>,
}

impl RuleReport {
    pub fn is_skipped(&self) -> bool {
        self.halted.as_ref().is_some_and(InvocationOutcome::is_skipped)
    }

    pub fn is_failed(&self) -> bool {
        self.halted.as_ref().is_some_and(InvocationOutcome::is_failed)
    }
}

enum RuleStep {
    NotMatched,
    Matched,
    Halted(InvocationOutcome),
}

impl RuleBook {
    pub fn apply_logic_for(
        &self,
        key: &str,
        executor: &BusinessLogicExecutor,
        target: &dyn Any,
        context: Option<&dyn Any>,
    ) -> Result<RuleReport, DispatchError> {
        let span = info_span!("apply_logic", key);
        let _guard = span.enter();

        let mut report = RuleReport::default();
        for list in self.lists_for(key) {
            debug!(description = list.description.as_deref(), rules = list.rules.len(), "rule list");
            for rule in &list.rules {
                match apply_rule(rule, executor, target, context, &mut report)? {
                    RuleStep::NotMatched => {}
                    RuleStep::Matched => report.rules_matched += 1,
                    RuleStep::Halted(outcome) => {
                        info!(?outcome, "rule evaluation halted");
                        report.halted = Some(outcome);
                        return Ok(report);
                    }
                }
            }
        }

        info!(
            matched = report.rules_matched,
            actions = report.actions_invoked,
            "rules applied"
        );
        Ok(report)
    }
}

fn apply_rule(
    rule: &Rule,
    executor: &BusinessLogicExecutor,
    target: &dyn Any,
    context: Option<&dyn Any>,
    report: &mut RuleReport,
) -> Result<RuleStep, DispatchError> {
    for condition in &rule.conditions {
        let outcome = executor.execute_condition(&condition.method, &condition.args, target, context)?;
        match outcome.as_bool() {
            Some(value) if value != condition.negated => {}
            Some(_) => {
                debug!(method = %condition.method, "condition not met");
                return Ok(RuleStep::NotMatched);
            }
            None => return Ok(RuleStep::Halted(outcome)),
        }
    }

    for action in &rule.actions {
        let outcome = executor.execute_action(&action.method, &action.args, target, context)?;
        report.actions_invoked += 1;
        if !outcome.is_returned() {
            return Ok(RuleStep::Halted(outcome));
        }
    }

    Ok(RuleStep::Matched)
}

//! Rule book model.
//!
//! Wire form (JSON):
//!
//! ```json
//! {
//!   "rules": {
//!     "com.example.CameraTest#testFlash": [
//!       {
//!         "description": "flash is optional on low-end devices",
//!         "rules": [
//!           {
//!             "conditions": [{ "method": "!hasFlash", "args": [] }],
//!             "actions": [{ "method": "skip", "args": ["no flash"] }]
//!           }
//!         ]
//!       }
//!     ]
//!   },
//!   "redaction_patterns": ["serial=\\w+"]
//! }
//! ```
//!
//! A leading `!` on a condition's method negates it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const NEGATION_PREFIX: char = '!';

#[derive(Debug, Error)]
pub enum RuleBookError {
    #[error("rule book is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Method reference plus string arguments, as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCall {
    method: String,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireCall", into = "WireCall")]
pub struct Condition {
    pub method: String,
    pub args: Vec<String>,
    /// The condition holds when the call returns `false`.
    pub negated: bool,
}

impl Condition {
    pub fn new(method: impl Into<String>, args: Vec<String>) -> Self {
        Self::from(WireCall {
            method: method.into(),
            args,
        })
    }
}

impl From<WireCall> for Condition {
    fn from(call: WireCall) -> Self {
        let trimmed = call.method.trim();
        match trimmed.strip_prefix(NEGATION_PREFIX) {
            Some(rest) => Self {
                method: rest.trim().to_string(),
                args: call.args,
                negated: true,
            },
            None => Self {
                method: trimmed.to_string(),
                args: call.args,
                negated: false,
            },
        }
    }
}

impl From<Condition> for WireCall {
    fn from(c: Condition) -> Self {
        let method = if c.negated {
            format!("{NEGATION_PREFIX}{}", c.method)
        } else {
            c.method
        };
        WireCall {
            method,
            args: c.args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub method: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Action {
    pub fn new(method: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Actions run when every condition holds. No conditions means always.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBook {
    /// Rule lists keyed by the name of what they apply to (e.g. a test).
    pub rules: HashMap<String, Vec<RuleList>>,
    pub redaction_patterns: Vec<String>,
}

impl RuleBook {
    pub fn from_json_str(text: &str) -> Result<Self, RuleBookError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn has_logic_for(&self, key: &str) -> bool {
        self.rules.get(key).is_some_and(|lists| !lists.is_empty())
    }

    pub fn lists_for(&self, key: &str) -> &[RuleList] {
        self.rules.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

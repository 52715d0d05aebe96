//! Dispatch pipeline: Rule Locator → Overload Resolver → Invoker → Outcome Classifier.
//!
//! Each stage is a plain function or a borrowed view over the registry; only
//! `BusinessLogicExecutor` ties them together.

pub mod classifier;
pub mod executor;
pub mod invoker;
pub mod locator;
pub mod resolver;

pub use self::classifier::OutcomeClassifier;
pub use self::executor::BusinessLogicExecutor;
pub use self::locator::{Located, RuleLocator};
pub use self::resolver::{is_eligible, resolve};

//! Rule books: delivered condition/action rules evaluated through the executor.

pub mod apply;
pub mod book;

pub use self::apply::RuleReport;
pub use self::book::{Action, Condition, Rule, RuleBook, RuleBookError, RuleList};

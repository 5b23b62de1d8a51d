//! Filter expression parser and evaluator for task lists.
//!
//! A filter string scopes the visible task list by note path and by tags in
//! the task text.
//!
//! # Supported Syntax
//!
//! ## Rules
//! - `#tag` - Tasks whose text contains `#tag`
//! - `folder/sub` - Tasks in the note `folder/sub` or any note below it
//! - `!rule` - Negates a tag or path rule (`!#someday`, `!archive`)
//!
//! ## Boolean Operators
//! - `and`, `or` - Same precedence, evaluated left to right
//! - `( ... )` - Grouping; a group matches when any expression inside it matches
//!
//! An empty filter string matches every task.
//!
//! # Example
//!
//! ```
//! use vault_calendar_core::filter::{FilterEvaluator, FilterParser};
//! use vault_calendar_core::Task;
//!
//! let filter = FilterParser::parse("(#a #b)").unwrap();
//! let evaluator = FilterEvaluator::new(&filter);
//!
//! assert!(evaluator.matches(&Task::new("inbox.md", "only #b here", false)));
//! assert!(!evaluator.matches(&Task::new("inbox.md", "no tags", false)));
//! ```

mod ast;
mod evaluator;
mod lexer;
mod parser;

pub use ast::{Expression, FilterRule, LogicalOp, RuleKind};
pub use evaluator::FilterEvaluator;
pub use lexer::{FilterToken, Lexer};
pub use parser::FilterParser;

use crate::task::Task;

/// Returns true if `task` passes the filter string `input`.
///
/// Parses on every call; use [`FilterParser`] and [`FilterEvaluator`] when
/// filtering many tasks.
pub fn matches(input: &str, task: &Task) -> bool {
    FilterParser::parse(input).is_none_or(|expression| FilterEvaluator::new(&expression).matches(task))
}

//! Filter evaluation against extracted tasks.
//!
//! # Example
//!
//! ```
//! use vault_calendar_core::filter::{FilterEvaluator, FilterParser};
//! use vault_calendar_core::Task;
//!
//! let filter = FilterParser::parse("projects and !#someday").unwrap();
//! let task = Task::new("projects/garden.md", "Order seeds #spring", false);
//!
//! let evaluator = FilterEvaluator::new(&filter);
//! assert!(evaluator.matches(&task));
//! ```

use super::ast::{Expression, FilterRule, LogicalOp, RuleKind};
use crate::task::Task;

/// Evaluates a parsed filter expression against tasks.
#[derive(Debug)]
pub struct FilterEvaluator<'a> {
    expression: &'a Expression,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    pub fn new(expression: &'a Expression) -> Self {
        Self { expression }
    }

    /// Returns true if the task matches the filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.evaluate(self.expression, task)
    }

    /// Filters a slice of tasks, returning only those that match.
    pub fn filter_tasks<'b>(&self, tasks: &'b [Task]) -> Vec<&'b Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    fn evaluate(&self, expression: &Expression, task: &Task) -> bool {
        match expression {
            Expression::Rule(rule) => rule_matches(rule, task),
            Expression::Logical { op, left, right } => {
                let left = self.evaluate(left, task);
                let right = self.evaluate(right, task);
                match op {
                    LogicalOp::And => left && right,
                    LogicalOp::Or => left || right,
                }
            }
            Expression::Group(children) => {
                children.is_empty() || children.iter().any(|child| self.evaluate(child, task))
            }
        }
    }
}

/// Applies a single rule, including its exclusion flag.
fn rule_matches(rule: &FilterRule, task: &Task) -> bool {
    let hit = if rule.is_tag {
        has_tag(task, &rule.value)
    } else {
        in_path(task, &rule.value)
    };
    match rule.kind {
        RuleKind::Include => hit,
        RuleKind::Exclude => !hit,
    }
}

/// Checks if the task text contains `#tag` as a literal substring.
fn has_tag(task: &Task, tag: &str) -> bool {
    task.raw_text.contains(&format!("#{tag}"))
}

/// Checks if the task's note is `prefix` itself or lives below it.
fn in_path(task: &Task, prefix: &str) -> bool {
    let path = task.source_path.as_str();
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

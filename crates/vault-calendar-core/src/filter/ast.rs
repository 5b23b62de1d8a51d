//! Abstract Syntax Tree (AST) for filter expressions.

/// Whether a rule keeps or removes the tasks it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Keep tasks that match.
    Include,
    /// Keep tasks that do not match (written with a leading `!`).
    Exclude,
}

/// A single include/exclude rule over a tag or a path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub kind: RuleKind,
    /// Tag name (without `#`) or path prefix.
    pub value: String,
    /// True when the rule matches a `#tag` in the task text instead of the
    /// note path.
    pub is_tag: bool,
}

impl FilterRule {
    /// Builds a rule from one filter token.
    ///
    /// A leading `!` makes the rule an exclusion; a `#` after it makes it a tag
    /// rule. Anything else is a path prefix.
    ///
    /// # Example
    ///
    /// ```
    /// use vault_calendar_core::filter::{FilterRule, RuleKind};
    ///
    /// let rule = FilterRule::from_token("!#someday");
    /// assert_eq!(rule.kind, RuleKind::Exclude);
    /// assert!(rule.is_tag);
    /// assert_eq!(rule.value, "someday");
    /// ```
    pub fn from_token(token: &str) -> Self {
        let (kind, rest) = match token.strip_prefix('!') {
            Some(rest) => (RuleKind::Exclude, rest),
            None => (RuleKind::Include, token),
        };
        let (is_tag, value) = match rest.strip_prefix('#') {
            Some(tag) => (true, tag),
            None => (false, rest),
        };
        Self {
            kind,
            value: value.to_string(),
            is_tag,
        }
    }

    /// Creates an include rule for a tag.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Include,
            value: name.into(),
            is_tag: true,
        }
    }

    /// Creates an include rule for a path prefix.
    pub fn path(prefix: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Include,
            value: prefix.into(),
            is_tag: false,
        }
    }

    /// Turns the rule into an exclusion.
    pub fn excluded(mut self) -> Self {
        self.kind = RuleKind::Exclude;
        self
    }
}

/// Binary operator joining two expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A single tag or path rule.
    Rule(FilterRule),

    /// `left and right` / `left or right`.
    Logical {
        op: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// A parenthesized sequence of expressions.
    ///
    /// A group matches when any of its children matches, whatever operators
    /// were written between them at the top of the group. An empty group
    /// matches everything.
    Group(Vec<Expression>),
}

impl Expression {
    /// Creates an AND expression from two expressions.
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::logical(LogicalOp::And, left, right)
    }

    /// Creates an OR expression from two expressions.
    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::logical(LogicalOp::Or, left, right)
    }

    /// Creates a logical expression with the given operator.
    pub fn logical(op: LogicalOp, left: Expression, right: Expression) -> Self {
        Expression::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a rule expression from a filter token.
    pub fn rule(token: &str) -> Self {
        Expression::Rule(FilterRule::from_token(token))
    }
}

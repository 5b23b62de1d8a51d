//! Recursive descent parser for filter expressions.

use super::ast::{Expression, LogicalOp};
use super::lexer::{FilterToken, Lexer};

/// Parser for task filter expressions.
///
/// The parser never fails. Filter strings are typed live into a settings
/// field, so malformed input yields the best tree that can be built from it
/// rather than an error.
///
/// # Grammar
///
/// ```text
/// expression ::= logical
/// logical    ::= primary (("and" | "or") primary)*
/// primary    ::= "(" expression* ")" | rule
/// rule       ::= ["!"] ["#"] word
/// ```
///
/// `and` and `or` share one precedence level and associate to the left:
/// `#a or #b and #c` is `(#a or #b) and #c`.
///
/// # Recovery
///
/// - a trailing operator is dropped (`#a and` parses as `#a`)
/// - an operator in operand position is skipped
/// - an unclosed `(` is closed at the end of the input
/// - a `)` before the first rule is skipped
/// - the input ends with the first complete top-level expression; tokens
///   after it (`#a #b`, `#a ) or #b`) are ignored
///
/// # Example
///
/// ```
/// use vault_calendar_core::filter::{Expression, FilterParser};
///
/// assert_eq!(FilterParser::parse(""), None);
///
/// let expr = FilterParser::parse("#work and #urgent").unwrap();
/// assert_eq!(expr, Expression::and(Expression::rule("#work"), Expression::rule("#urgent")));
/// ```
pub struct FilterParser {
    tokens: Vec<FilterToken>,
    position: usize,
}

impl FilterParser {
    /// Parses a filter string into an expression.
    ///
    /// Returns `None` when the input holds no rule at all (empty or blank
    /// strings, or only operators and parentheses that produce nothing).
    /// Callers treat `None` as "every task passes".
    pub fn parse(input: &str) -> Option<Expression> {
        let tokens = Lexer::new(input).tokenize();
        let mut parser = Self {
            tokens,
            position: 0,
        };

        while parser.check(&FilterToken::CloseParen) {
            parser.advance();
        }
        let expression = parser.parse_expression();

        if parser.position < parser.tokens.len() {
            tracing::debug!(
                filter = input,
                ignored = parser.tokens.len() - parser.position,
                "ignoring tokens after filter expression"
            );
        }
        expression
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&FilterToken> {
        self.tokens.get(self.position)
    }

    /// Consumes the current token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Checks if the current token matches the expected token.
    fn check(&self, expected: &FilterToken) -> bool {
        self.peek() == Some(expected)
    }

    /// Returns the operator at the current position, if any.
    fn peek_operator(&self) -> Option<LogicalOp> {
        match self.peek()? {
            FilterToken::And => Some(LogicalOp::And),
            FilterToken::Or => Some(LogicalOp::Or),
            _ => None,
        }
    }

    fn parse_expression(&mut self) -> Option<Expression> {
        self.parse_logical()
    }

    /// Parses `primary (("and" | "or") primary)*`, folding to the left.
    fn parse_logical(&mut self) -> Option<Expression> {
        let mut left = self.parse_primary()?;

        while let Some(op) = self.peek_operator() {
            self.advance();
            match self.parse_primary() {
                Some(right) => left = Expression::logical(op, left, right),
                None => break,
            }
        }

        Some(left)
    }

    /// Parses a parenthesized group or a single rule.
    ///
    /// Returns `None` at the end of input or in front of a `)`, which is left
    /// for the enclosing group to consume.
    fn parse_primary(&mut self) -> Option<Expression> {
        loop {
            match self.peek()? {
                FilterToken::And | FilterToken::Or => self.advance(),
                FilterToken::CloseParen => return None,
                FilterToken::OpenParen => {
                    self.advance();
                    return Some(self.parse_group());
                }
                FilterToken::Word(word) => {
                    let expression = Expression::rule(word);
                    self.advance();
                    return Some(expression);
                }
            }
        }
    }

    /// Parses `expression* ")"` after an opening parenthesis.
    fn parse_group(&mut self) -> Expression {
        let mut children = Vec::new();
        while self.peek().is_some() && !self.check(&FilterToken::CloseParen) {
            if let Some(child) = self.parse_expression() {
                children.push(child);
            }
        }
        // consume ')' when present
        self.advance();
        Expression::Group(children)
    }
}

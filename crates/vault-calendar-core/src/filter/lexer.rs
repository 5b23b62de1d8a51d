//! Lexer (tokenizer) for filter expressions.
//!
//! Parentheses are always tokens on their own, even when written directly
//! against a word (`(#a` is `(` followed by `#a`). Everything else is split
//! on whitespace runs.

/// A token in a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    /// The `and` keyword.
    And,

    /// The `or` keyword.
    Or,

    /// Any other word: a rule such as `#tag`, `!#tag`, `folder/sub` or `!folder`.
    Word(String),
}

/// Lexer for tokenizing filter expressions.
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Collects all tokens of the input.
    pub fn tokenize(self) -> Vec<FilterToken> {
        let spaced = self.input.replace('(', " ( ").replace(')', " ) ");
        spaced.split_whitespace().map(Self::classify).collect()
    }

    fn classify(word: &str) -> FilterToken {
        match word {
            "(" => FilterToken::OpenParen,
            ")" => FilterToken::CloseParen,
            "and" => FilterToken::And,
            "or" => FilterToken::Or,
            other => FilterToken::Word(other.to_string()),
        }
    }
}

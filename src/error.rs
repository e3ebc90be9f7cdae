use std::fmt;

use thiserror::Error;

use crate::token::{Location, Token, Type};

/// Raised by the lexer. The lexer never aborts on the first one — it keeps scanning and the
/// caller is handed every accumulated error together (§7).
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub location: Location,
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Error: {}", self.location.human(), self.message)
    }
}

impl std::error::Error for LexError {}

/// Raised by the parser. Like the lexer, the parser recovers via panic-mode synchronization and
/// accumulates every error it finds before giving up on producing an AST.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.token.r#type == Type::EOF {
            write!(f, "{} Error at end: {}", self.token.location.human(), self.message)
        } else {
            write!(f, "{} Error at '{}': {}", self.token.location.human(), self.token.lexeme, self.message)
        }
    }
}

impl std::error::Error for ParseError {}

/// Raised by the resolver. Unlike the lexer/parser, the first resolve error aborts the pass:
/// static semantic rules are checked with ordinary `Result` propagation, not accumulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Error at '{}': {}", self.token.location.human(), self.token.lexeme, self.message)
    }
}

impl std::error::Error for ResolveError {}

/// Raised by the interpreter. Propagates out and terminates execution; carries the offending
/// token so the caller can report a line number.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Error at '{}': {}", self.token.location.human(), self.token.lexeme, self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// The facade's top-level failure: whichever pipeline stage stopped the run first. Stages run
/// in order (§2) and the first one that fails is the one reported; later stages never run.
#[derive(Debug, Error)]
pub enum EmberError {
    #[error("{} lex error(s), first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Lex(Vec<LexError>),
    #[error("{} parse error(s), first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Parse(Vec<ParseError>),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<Vec<LexError>> for EmberError {
    fn from(errors: Vec<LexError>) -> Self {
        EmberError::Lex(errors)
    }
}

impl From<Vec<ParseError>> for EmberError {
    fn from(errors: Vec<ParseError>) -> Self {
        EmberError::Parse(errors)
    }
}

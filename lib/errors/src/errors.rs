use std::fmt::Display;

use cursor::Line;
use itertools::Itertools;

/// A single diagnostic, formatted the way every Lox front end reports them:
/// `[line 3] Error at ')': Expect expression.`
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{}: {message}", if at.is_empty() { "".to_string() } else { format!(" at {at}") })]
pub struct LoxError {
    pub line: Line,
    /// Where on the line the error happened, e.g. `'+'` or `end`. Empty for
    /// errors that aren't tied to a token.
    pub at: String,
    pub message: String,
}

impl LoxError {
    pub fn new(line: Line, at: impl ToString, message: impl ToString) -> Self {
        Self { line, at: at.to_string(), message: message.to_string() }
    }
}

#[derive(thiserror::Error, Debug, Default, PartialEq, derive_more::Deref, derive_more::DerefMut)]
pub struct LoxErrors(pub Vec<LoxError>);

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

/// Sink for diagnostics. The scanner and parser only classify errors and hand
/// them over; what happens next (printing, aborting, ...) is up to the caller.
pub trait Reporter {
    fn report(&mut self, error: LoxError);
}

impl Reporter for LoxErrors {
    fn report(&mut self, error: LoxError) {
        self.0.push(error);
    }
}

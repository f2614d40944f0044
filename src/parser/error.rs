//! # Parser Error Definitions
//!
//! Two kinds of failure exist and are never conflated:
//!
//! - **No match** is ordinary and expected. Inside the engine it is the
//!   `Ok(None)` arm of a [`Step`](super::Step) and every combinator recovers
//!   from it by backtracking. Only a top-level invocation turns an
//!   unrecovered no-match into [`ParseError::NoMatch`].
//! - **Grammar errors** are programmer errors in how the grammar was built,
//!   such as invoking a rule that was never defined. They travel as
//!   `Err(GrammarError)` straight through all combinators via `?` and abort
//!   the invocation.

use thiserror::Error;

use crate::shape::Shape;

/// A defect in the grammar itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A rule was invoked before any parser was bound to it.
    #[error("rule `{rule}` is not defined")]
    Undefined { rule: String },

    /// A parser was bound to a rule (or run as a type) it cannot produce.
    #[error("rule `{rule}` has shape `{expected}` but was given a parser of shape `{found}`")]
    ShapeMismatch {
        rule: String,
        expected: Shape,
        found: Shape,
    },

    /// A mapping callback does not accept what its parser produces.
    #[error("callback expects `{expected}` but the parser produces `{found}`")]
    CallbackMismatch { expected: Shape, found: Shape },

    /// Rules nested deeper than the configured limit, typically because of
    /// left recursion.
    #[error("recursion limit of {limit} exceeded in rule `{rule}` at {position}")]
    RecursionLimit {
        rule: String,
        limit: usize,
        position: usize,
    },

    /// A value did not convert into the requested Rust type.
    #[error("value does not conform to shape `{shape}`")]
    Extraction { shape: Shape },
}

/// Failure of a top-level parse invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input did not match. `position` is the furthest offset at which
    /// matching could not proceed.
    #[error("parse error at {position}")]
    NoMatch { position: usize },

    /// The grammar matched a prefix but input remains.
    #[error("unexpected trailing input at {position}")]
    TrailingInput { position: usize },

    /// The starting cursor is past the end of the input or not on a char
    /// boundary.
    #[error("cursor {cursor} is not a valid position in input of length {len}")]
    InvalidCursor { cursor: usize, len: usize },

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl ParseError {
    /// Input offset the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::NoMatch { position } | ParseError::TrailingInput { position } => {
                Some(*position)
            }
            ParseError::InvalidCursor { cursor, .. } => Some(*cursor),
            ParseError::Grammar(GrammarError::RecursionLimit { position, .. }) => Some(*position),
            ParseError::Grammar(_) => None,
        }
    }
}

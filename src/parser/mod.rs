//! # Parser Module
//!
//! A backtracking parser-combinator engine over `&str` input.
//!
//! ## Architecture
//!
//! - **combinators**: the [`Parser`] value with sequencing (`+`), ordered
//!   choice (`|`) and [`Parser::map`]
//! - **token**: terminal parsers ([`token::by`], [`token::literal`], ...)
//! - **grammar**: late-bound [`Grammar`] cells for recursive rules
//! - **state**: cursor and bookkeeping of one invocation
//! - **memo**: the single-use result cache owned by the state
//! - **error**: [`ParseError`] and [`GrammarError`]
//!
//! ## Backtracking
//!
//! Every combinator is atomic: when it fails, the cursor is back where it
//! started. Alternatives are tried in order and the first success wins.

mod combinators;
mod error;
mod grammar;
mod memo;
mod state;
pub mod token;

pub use combinators::{Callback, Parser, RuleId, Step};
pub use error::{GrammarError, ParseError};
pub use grammar::Grammar;
pub use state::ParseState;

//! # Ruparsec - Backtracking Parser Combinators
//!
//! Ruparsec builds recursive-descent parsers by composing small parsers with
//! sequencing, ordered choice and result mapping. The structure of a composed
//! parser's result is derived mechanically from its parts: sequences flatten
//! into tuples and alternatives flatten into deduplicated unions.
//!
//! ## Architecture Overview
//!
//! 1. **Shapes** (`shape`) - The result-shape algebra (product and addition)
//! 2. **Values** (`value`) - Dynamically tagged results and the typed [`value::Data`] boundary
//! 3. **Parser** (`parser`) - Combinators, terminal parsers, grammar cells and the memo table
//! 4. **Grammars** (`grammars`) - Ready-made grammars, currently integer arithmetic
//!
//! ## Pipeline Flow
//!
//! ```text
//! Grammar construction
//!     ↓
//! [Shape algebra] → Shape of every parser, checked by define/map
//!     ↓
//! Invocation (text, cursor, ParseOptions)
//!     ↓
//! [ParseState] → cursor, furthest failure, memo table
//!     ↓
//! [Parser::run] → Value conforming to the shape
//!     ↓
//! [Data::from_value] → typed Rust result
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Shapes Instead of Type-Level Unions
//! Rust has no anonymous sum types, so a parser's result structure is a
//! runtime [`shape::Shape`] computed once when combinators are composed.
//! Mismatches (a callback with the wrong arity, a rule defined with a parser
//! of the wrong shape) are reported when the grammar is built, not while
//! parsing.
//!
//! ### Late-Bound Rules
//! A [`parser::Grammar`] cell can be referenced before it is defined. It is
//! looked up each time it runs, which is what makes recursive grammars work.
//!
//! ### Single-Use Memoization
//! When a sequence fails after its left operand matched, the left result is
//! parked under (rule, position). An alternative that starts with the same
//! parser at the same position takes it back instead of re-parsing.
//!
//! ## Module Structure
//!
//! - [`shape`] - Result-shape algebra
//! - [`value`] - Values and the [`value::Data`] trait
//! - [`config`] - Per-invocation options
//! - [`parser`] - The combinator engine
//! - [`grammars`] - Example grammars
//!
//! ## Example
//!
//! ```ignore
//! use ruparsec::parser::Grammar;
//! use ruparsec::parser::token::{by, epsilon};
//!
//! let decimal: Grammar<char> = Grammar::declare("Decimal");
//! let number: Grammar<String> = Grammar::declare("Number");
//!
//! decimal.define(by(|c| c.is_ascii_digit()))?;
//! number.define(
//!     (&decimal + &number).map(|d: char, rest: String| format!("{d}{rest}"))
//!         | epsilon::<String>(),
//! )?;
//!
//! assert_eq!(number.parse("42abc")?, "42");
//! ```

pub mod config;
pub mod grammars;
pub mod parser;
pub mod shape;
pub mod value;

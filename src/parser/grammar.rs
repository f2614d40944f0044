//! # Grammar Cells
//!
//! A [`Grammar<T>`] is a named, late-bound rule. It starts out empty, can be
//! referenced from other parsers before it is defined, and is bound later
//! with [`Grammar::define`]. This is what makes self-referential and mutually
//! recursive grammars possible:
//!
//! ```ignore
//! let decimal: Grammar<char> = Grammar::declare("Decimal");
//! let number: Grammar<String> = Grammar::declare("Number");
//!
//! decimal.define(by(|c| c.is_ascii_digit()))?;
//! number.define(
//!     (&decimal + &number).map(|d: char, rest: String| format!("{d}{rest}"))
//!         | epsilon::<String>(),
//! )?;
//! ```
//!
//! ## Lazy References
//!
//! Using a cell inside a combinator (`&number`, or [`Grammar::parser`]) does
//! not copy its current definition. It produces a reference parser that looks
//! the definition up every time it runs. That is why `number` can mention
//! itself while it is still empty.
//!
//! References share ownership of the cell. A grammar can be built in a
//! function that returns only its start rule, and the helper rules stay
//! alive through the references to them. A recursive rule keeps itself
//! alive through its own body.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, BitOr};
use std::rc::Rc;

use crate::config::ParseOptions;
use crate::shape::{Injection, Shape};
use crate::value::Data;

use super::combinators::{Parser, RuleId};
use super::error::{GrammarError, ParseError};
use super::state::ParseState;

struct Slot {
    id: RuleId,
    name: String,
    shape: Shape,
    body: RefCell<Option<Parser>>,
}

/// A late-bound grammar rule producing `T`.
pub struct Grammar<T> {
    slot: Rc<Slot>,
    marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Grammar<T> {
    fn clone(&self) -> Self {
        Grammar {
            slot: Rc::clone(&self.slot),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Grammar<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.slot.name)
            .field("shape", &self.slot.shape)
            .field("defined", &self.slot.body.borrow().is_some())
            .finish()
    }
}

impl<T: Data> Default for Grammar<T> {
    fn default() -> Self {
        Self::declare("<anonymous>")
    }
}

impl<T: Data> Grammar<T> {
    /// Create an empty rule. Invoking it before [`Grammar::define`] is a
    /// [`GrammarError::Undefined`].
    pub fn declare(name: impl Into<String>) -> Self {
        Grammar {
            slot: Rc::new(Slot {
                id: RuleId::fresh(),
                name: name.into(),
                shape: T::shape(),
                body: RefCell::new(None),
            }),
            marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.slot.name
    }

    pub fn id(&self) -> RuleId {
        self.slot.id
    }

    pub fn shape(&self) -> &Shape {
        &self.slot.shape
    }

    pub fn is_defined(&self) -> bool {
        self.slot.body.borrow().is_some()
    }

    /// Bind the rule to `parser`, replacing any previous definition.
    ///
    /// The parser must produce this rule's shape, or a union whose variants
    /// all occur in it.
    pub fn define(&self, parser: Parser) -> Result<(), GrammarError> {
        let body = match Injection::between(parser.shape(), &self.slot.shape) {
            Some(Injection::Identity) => parser,
            Some(injection) => parser.inject(injection, self.slot.shape.clone()),
            None => {
                return Err(GrammarError::ShapeMismatch {
                    rule: self.slot.name.clone(),
                    expected: self.slot.shape.clone(),
                    found: parser.shape().clone(),
                })
            }
        };

        log::trace!("rule `{}` defined as {}", self.slot.name, self.slot.shape);
        *self.slot.body.borrow_mut() = Some(body);
        Ok(())
    }

    /// A parser that runs whatever this rule is bound to at the moment it
    /// runs.
    pub fn parser(&self) -> Parser {
        let slot = Rc::clone(&self.slot);
        let name = self.slot.name.clone();

        Parser::with_id(
            self.slot.id,
            self.slot.shape.clone(),
            move |state: &mut ParseState<'_>| {
                let body = slot.body.borrow().clone();
                let Some(body) = body else {
                    return Err(GrammarError::Undefined { rule: name.clone() });
                };

                let start = state.position();
                state.enter(&name)?;
                log::trace!("enter `{name}` at {start}, depth {}", state.depth());
                let outcome = body.run(state);
                state.leave();

                match &outcome {
                    Ok(Some(_)) => log::trace!("`{name}` matched {start}..{}", state.position()),
                    Ok(None) => log::trace!("`{name}` failed at {start}"),
                    Err(_) => {}
                }
                outcome
            },
        )
    }

    // === Invocation ===

    /// Parse a prefix of `text` starting at offset 0. Trailing input is
    /// allowed.
    pub fn parse(&self, text: &str) -> Result<T, ParseError> {
        let mut cursor = 0;
        self.parse_at(text, &mut cursor)
    }

    /// Parse all of `text`.
    pub fn parse_all(&self, text: &str) -> Result<T, ParseError> {
        self.parse_all_with(text, &ParseOptions::default())
    }

    pub fn parse_all_with(&self, text: &str, options: &ParseOptions) -> Result<T, ParseError> {
        let mut cursor = 0;
        let value = self.parse_with(text, &mut cursor, options)?;
        if cursor != text.len() {
            return Err(ParseError::TrailingInput { position: cursor });
        }
        Ok(value)
    }

    /// Parse starting at `*cursor`, leaving `*cursor` at the end of the match.
    /// This embeds the rule as a sub-parser of a larger document.
    pub fn parse_at(&self, text: &str, cursor: &mut usize) -> Result<T, ParseError> {
        self.parse_with(text, cursor, &ParseOptions::default())
    }

    pub fn parse_with(
        &self,
        text: &str,
        cursor: &mut usize,
        options: &ParseOptions,
    ) -> Result<T, ParseError> {
        let value = self.parser().parse_with(text, cursor, options)?;
        T::from_value(value).ok_or_else(|| GrammarError::Extraction { shape: T::shape() }.into())
    }
}

impl<T: Data> From<&Grammar<T>> for Parser {
    fn from(grammar: &Grammar<T>) -> Self {
        grammar.parser()
    }
}

impl<T: Data> From<Grammar<T>> for Parser {
    fn from(grammar: Grammar<T>) -> Self {
        grammar.parser()
    }
}

/// `&rule + x` sequences a reference to the rule with `x`.
impl<T: Data, R: Into<Parser>> Add<R> for &Grammar<T> {
    type Output = Parser;

    fn add(self, rhs: R) -> Self::Output {
        self.parser().seq(rhs.into())
    }
}

/// `&rule | x` tries a reference to the rule, then `x`.
impl<T: Data, R: Into<Parser>> BitOr<R> for &Grammar<T> {
    type Output = Parser;

    fn bitor(self, rhs: R) -> Self::Output {
        self.parser().or(rhs.into())
    }
}

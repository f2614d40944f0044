use std::fmt;
use std::ops::{Add, BitOr};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::ParseOptions;
use crate::shape::{Injection, Shape};
use crate::value::{Data, Value};

use super::error::{GrammarError, ParseError};
use super::state::ParseState;

/// Outcome of running a parser: a value, no match (`Ok(None)`), or a fatal
/// grammar error.
pub type Step = Result<Option<Value>, GrammarError>;

type ParserFn = Rc<dyn Fn(&mut ParseState<'_>) -> Step>;

/// Process-unique identity of a parser, shared by its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

impl RuleId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        RuleId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// === Parser value ===

/// An immutable parser together with the shape of what it produces.
///
/// Cloning is cheap and keeps the [`RuleId`], so clones count as the same
/// rule for memoization.
#[derive(Clone)]
pub struct Parser {
    id: RuleId,
    shape: Shape,
    parser: ParserFn,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Parser")
            .field("id", &self.id)
            .field("shape", &self.shape)
            .finish()
    }
}

impl Parser {
    /// Wrap a parsing function producing values of `shape`.
    ///
    /// The function must restore the cursor whenever it returns `Ok(None)`
    /// and must only produce values conforming to `shape`.
    pub fn new<F>(shape: Shape, parser: F) -> Self
    where
        F: Fn(&mut ParseState<'_>) -> Step + 'static,
    {
        Self::with_id(RuleId::fresh(), shape, parser)
    }

    pub(crate) fn with_id<F>(id: RuleId, shape: Shape, parser: F) -> Self
    where
        F: Fn(&mut ParseState<'_>) -> Step + 'static,
    {
        Parser {
            id,
            shape,
            parser: Rc::new(parser),
        }
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Run at the current cursor, taking back a memoized result first if one
    /// is parked for this parser at this position.
    pub fn run(&self, state: &mut ParseState<'_>) -> Step {
        if let Some(value) = state.recall(self.id) {
            return Ok(Some(value));
        }
        (self.parser)(state)
    }

    // === Combinators ===

    /// Sequence: parse `self` then `rhs`, producing the flattened tuple of
    /// both results. Atomic: if `rhs` fails the cursor goes back to where
    /// `self` started.
    pub fn seq(self, rhs: Parser) -> Parser {
        let shape = self.shape.product(&rhs.shape);
        Parser::new(shape, move |state: &mut ParseState<'_>| {
            let anchor = state.position();
            let Some(lhs_value) = self.run(state)? else {
                state.restore(anchor);
                return Ok(None);
            };

            let lhs_end = state.position();
            match rhs.run(state)? {
                Some(rhs_value) => Ok(Some(lhs_value.concat(rhs_value))),
                None => {
                    state.restore(anchor);
                    state.remember(self.id, anchor, lhs_value, lhs_end);
                    Ok(None)
                }
            }
        })
    }

    /// Ordered choice: try `self`; only if it fails, try `rhs` from the same
    /// position. The result has the deduplicated union of both shapes.
    pub fn or(self, rhs: Parser) -> Parser {
        let (shape, left, right) = self.shape.sum(&rhs.shape);
        Parser::new(shape, move |state: &mut ParseState<'_>| {
            let anchor = state.position();
            if let Some(value) = self.run(state)? {
                return Ok(Some(left.apply(value)));
            }

            state.restore(anchor);
            if let Some(value) = rhs.run(state)? {
                return Ok(Some(right.apply(value)));
            }

            state.restore(anchor);
            Ok(None)
        })
    }

    /// Transform the result with `callback`.
    ///
    /// A tuple result is spread positionally over the callback's parameters;
    /// any other result (or a tuple whose whole shape matches a single
    /// parameter) is passed as one argument.
    ///
    /// # Panics
    ///
    /// Panics when the callback's parameters do not fit this parser's shape.
    /// Use [`Parser::try_map`] to handle that case.
    pub fn map<Args, F>(self, callback: F) -> Parser
    where
        F: Callback<Args>,
    {
        match self.try_map(callback) {
            Ok(parser) => parser,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`Parser::map`], reporting a callback that does not fit this
    /// parser's shape as an error instead of panicking.
    pub fn try_map<Args, F>(self, callback: F) -> Result<Parser, GrammarError>
    where
        F: Callback<Args>,
    {
        let parameters = F::parameters();
        let spread = Arguments::plan(&self.shape, &parameters).ok_or_else(|| {
            GrammarError::CallbackMismatch {
                expected: Shape::tuple(parameters.clone()),
                found: self.shape.clone(),
            }
        })?;

        let output = F::Output::shape();
        Ok(Parser::new(output, move |state: &mut ParseState<'_>| {
            let anchor = state.position();
            let Some(value) = self.run(state)? else {
                state.restore(anchor);
                return Ok(None);
            };

            let args = match spread {
                Arguments::Whole => vec![value],
                Arguments::Spread => value.into_members(),
            };
            match callback.invoke(args) {
                Some(result) => Ok(Some(result.into_value())),
                None => Err(GrammarError::Extraction {
                    shape: self.shape.clone(),
                }),
            }
        }))
    }

    /// Carry results into the wider shape `shape` through `injection`.
    pub(crate) fn inject(self, injection: Injection, shape: Shape) -> Parser {
        Parser::new(shape, move |state: &mut ParseState<'_>| {
            Ok(self.run(state)?.map(|value| injection.apply(value)))
        })
    }

    // === Invocation ===

    /// Parse a prefix of `text` as a `T`, starting at offset 0.
    pub fn parse<T: Data>(&self, text: &str) -> Result<T, ParseError> {
        if T::shape() != self.shape {
            return Err(GrammarError::ShapeMismatch {
                rule: "<parser>".to_string(),
                expected: T::shape(),
                found: self.shape.clone(),
            }
            .into());
        }

        let mut cursor = 0;
        let value = self.parse_with(text, &mut cursor, &ParseOptions::default())?;
        T::from_value(value).ok_or_else(|| GrammarError::Extraction { shape: T::shape() }.into())
    }

    /// Run as a top-level invocation starting at `*cursor`.
    ///
    /// On success `*cursor` is left at the end of the match. On failure it is
    /// untouched and the error carries the furthest position reached.
    pub fn parse_with(
        &self,
        text: &str,
        cursor: &mut usize,
        options: &ParseOptions,
    ) -> Result<Value, ParseError> {
        let mut state = ParseState::new(text, *cursor, options)?;
        let outcome = self.run(&mut state);

        log::debug!(
            "parse of {} from {} finished at {} (furthest {}, memo: {} stored, {} hit, {} unused)",
            self.id,
            *cursor,
            state.position(),
            state.furthest(),
            state.memo_stores(),
            state.memo_hits(),
            state.memo_len()
        );

        match outcome? {
            Some(value) => {
                *cursor = state.position();
                Ok(value)
            }
            None => Err(ParseError::NoMatch {
                position: state.furthest(),
            }),
        }
    }
}

// === Callbacks ===

/// How a result is handed to a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arguments {
    Whole,
    Spread,
}

impl Arguments {
    fn plan(shape: &Shape, parameters: &[Shape]) -> Option<Arguments> {
        if parameters.len() == 1 && parameters[0] == *shape {
            return Some(Arguments::Whole);
        }
        if shape.is_tuple() && shape.members() == parameters {
            return Some(Arguments::Spread);
        }
        None
    }
}

/// Functions usable with [`Parser::map`]. Implemented for every `Fn` of one
/// to eight [`Data`] parameters returning [`Data`].
pub trait Callback<Args>: 'static {
    type Output: Data;

    fn parameters() -> Vec<Shape>;

    /// Call with one value per parameter. `None` if a value does not convert.
    fn invoke(&self, args: Vec<Value>) -> Option<Self::Output>;
}

macro_rules! impl_callback {
    ($($param:ident $arg:ident),+) => {
        impl<Func, Out, $($param),+> Callback<($($param,)+)> for Func
        where
            Func: Fn($($param),+) -> Out + 'static,
            Out: Data,
            $($param: Data,)+
        {
            type Output = Out;

            fn parameters() -> Vec<Shape> {
                vec![$($param::shape()),+]
            }

            fn invoke(&self, args: Vec<Value>) -> Option<Out> {
                let mut args = args.into_iter();
                $(let $arg = $param::from_value(args.next()?)?;)+
                Some(self($($arg),+))
            }
        }
    };
}

impl_callback!(A a);
impl_callback!(A a, B b);
impl_callback!(A a, B b, C c);
impl_callback!(A a, B b, C c, D d);
impl_callback!(A a, B b, C c, D d, E e);
impl_callback!(A a, B b, C c, D d, E e, F f);
impl_callback!(A a, B b, C c, D d, E e, F f, G g);
impl_callback!(A a, B b, C c, D d, E e, F f, G g, H h);

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B), flattened
impl<R: Into<Parser>> Add<R> for Parser {
    type Output = Parser;

    fn add(self, rhs: R) -> Self::Output {
        self.seq(rhs.into())
    }
}

/// `|` for ordered choice: A | B -> A or B, deduplicated
impl<R: Into<Parser>> BitOr<R> for Parser {
    type Output = Parser;

    fn bitor(self, rhs: R) -> Self::Output {
        self.or(rhs.into())
    }
}

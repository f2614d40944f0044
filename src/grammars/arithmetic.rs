//! # Integer Arithmetic
//!
//! A four-operator integer calculator grammar with blank skipping and
//! parentheses:
//!
//! ```text
//! Blank      : <whitespace>
//! Blanks     : Blank Blanks | <epsilon>
//! Decimal    : '0' | ... | '9'
//! Number     : Decimal Number | <epsilon>
//! Primary    : Blanks Decimal Number
//!            | Blanks '(' Expression Blanks ')'
//! Product    : Primary (Blanks ('*' | '/') Primary)*
//! Additive   : Product (Blanks ('+' | '-') Product)*
//! Expression : Additive Blanks
//! ```
//!
//! Parsing produces an [`Expr`] tree. Evaluation is a separate step so that
//! division by zero and overflow are reported as [`EvalError`]s rather than
//! hidden inside a mapping callback.
//!
//! ## Additive Forms
//!
//! The repetition in `Product` and `Additive` has two spellings, selected by
//! [`Additive`]:
//!
//! - [`Additive::Tail`] collects the operator chain in a recursive tail rule
//!   and folds it to the left, so `8 - 4 - 2` is `(8 - 4) - 2`.
//! - [`Additive::RightRecursive`] is the textbook right-recursive form
//!   `Product Blanks '+' Additive | Product Blanks '-' Additive | Product`.
//!   It groups to the right, so `8 - 4 - 2` is `8 - (4 - 2)`. Both
//!   alternatives share one `Product Blanks` head parser, so a failed `+`
//!   leaves the head's result in the memo table for the `-` alternative.

use std::fmt;

use thiserror::Error;

use crate::config::ParseOptions;
use crate::impl_data;
use crate::parser::token::{by, ch, epsilon};
use crate::parser::{Grammar, GrammarError, ParseError, Parser};

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(&self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }

    pub fn apply(&self, lhs: i64, rhs: i64) -> Result<i64, EvalError> {
        let result = match self {
            BinOp::Add => lhs.checked_add(rhs),
            BinOp::Sub => lhs.checked_sub(rhs),
            BinOp::Mul => lhs.checked_mul(rhs),
            BinOp::Div => {
                if rhs == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                lhs.checked_div(rhs)
            }
        };
        result.ok_or(EvalError::Overflow)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Decimal digits as written.
    Number(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn evaluate(&self) -> Result<i64, EvalError> {
        match self {
            Expr::Number(digits) => digits
                .parse::<i64>()
                .map_err(|_| EvalError::Overflow),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.evaluate()?, rhs.evaluate()?),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Number(digits) => write!(f, "{digits}"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

impl_data!(Expr, BinOp);

/// Operator chain collected by a tail rule, innermost operation first.
type Chain = Vec<(BinOp, Expr)>;

fn fold(first: Expr, chain: Chain) -> Expr {
    chain
        .into_iter()
        .rev()
        .fold(first, |lhs, (op, rhs)| Expr::binary(op, lhs, rhs))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum CalcError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// How `Product` and `Additive` are spelled. See the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Additive {
    #[default]
    Tail,
    RightRecursive,
}

/// The arithmetic grammar with every named rule exposed.
#[derive(Debug, Clone)]
pub struct Arithmetic {
    pub blank: Grammar<char>,
    pub blanks: Grammar<()>,
    pub decimal: Grammar<char>,
    pub number: Grammar<String>,
    pub primary: Grammar<Expr>,
    pub product: Grammar<Expr>,
    pub additive: Grammar<Expr>,
    pub expression: Grammar<Expr>,
}

impl Arithmetic {
    /// Left-associative grammar that skips blanks between tokens.
    pub fn new() -> Result<Self, GrammarError> {
        Self::build(Additive::Tail, true)
    }

    /// Right-recursive grammar that skips blanks between tokens.
    pub fn right_recursive() -> Result<Self, GrammarError> {
        Self::build(Additive::RightRecursive, true)
    }

    /// Left-associative grammar without blank skipping: `1+2` parses, `1 + 2`
    /// does not.
    pub fn compact() -> Result<Self, GrammarError> {
        Self::build(Additive::Tail, false)
    }

    pub fn build(form: Additive, skip_blanks: bool) -> Result<Self, GrammarError> {
        let grammar = Arithmetic {
            blank: Grammar::declare("Blank"),
            blanks: Grammar::declare("Blanks"),
            decimal: Grammar::declare("Decimal"),
            number: Grammar::declare("Number"),
            primary: Grammar::declare("Primary"),
            product: Grammar::declare("Product"),
            additive: Grammar::declare("Additive"),
            expression: Grammar::declare("Expression"),
        };

        grammar.define_lexical(skip_blanks)?;
        match form {
            Additive::Tail => grammar.define_tails()?,
            Additive::RightRecursive => grammar.define_right_recursive()?,
        }

        grammar.expression.define(
            (&grammar.additive + &grammar.blanks).map(|expr: Expr, _: ()| expr),
        )?;

        Ok(grammar)
    }

    fn define_lexical(&self, skip_blanks: bool) -> Result<(), GrammarError> {
        self.blank.define(by(char::is_whitespace))?;
        if skip_blanks {
            self.blanks.define(
                (&self.blank + &self.blanks).map(|_: char, _: ()| ()) | epsilon::<()>(),
            )?;
        } else {
            self.blanks.define(epsilon::<()>())?;
        }

        self.decimal.define(by(|c| c.is_ascii_digit()))?;
        self.number.define(
            (&self.decimal + &self.number).map(|decimal: char, number: String| {
                let mut digits = String::with_capacity(number.len() + 1);
                digits.push(decimal);
                digits.push_str(&number);
                digits
            }) | epsilon::<String>(),
        )?;

        let literal = (&self.blanks + &self.decimal + &self.number)
            .map(|_: (), decimal: char, number: String| Expr::Number(format!("{decimal}{number}")));
        let parenthesized = (&self.blanks + ch('(') + &self.expression + &self.blanks + ch(')'))
            .map(|_: (), _: char, inner: Expr, _: (), _: char| inner);
        self.primary.define(literal | parenthesized)
    }

    fn define_tails(&self) -> Result<(), GrammarError> {
        let product_tail: Grammar<Chain> = Grammar::declare("ProductTail");
        let multiplicative = operator('*', BinOp::Mul, '/', BinOp::Div);
        product_tail.define(tail(&self.blanks, multiplicative, &self.primary, &product_tail))?;
        self.product.define((&self.primary + &product_tail).map(fold))?;

        let additive_tail: Grammar<Chain> = Grammar::declare("AdditiveTail");
        let additive = operator('+', BinOp::Add, '-', BinOp::Sub);
        additive_tail.define(tail(&self.blanks, additive, &self.product, &additive_tail))?;
        self.additive.define((&self.product + &additive_tail).map(fold))
    }

    fn define_right_recursive(&self) -> Result<(), GrammarError> {
        let head = &self.primary + &self.blanks;
        self.product.define(
            right_operation(head.clone(), '*', BinOp::Mul, &self.product)
                | right_operation(head, '/', BinOp::Div, &self.product)
                | &self.primary,
        )?;

        let head = &self.product + &self.blanks;
        self.additive.define(
            right_operation(head.clone(), '+', BinOp::Add, &self.additive)
                | right_operation(head, '-', BinOp::Sub, &self.additive)
                | &self.product,
        )
    }

    // === Entry Points ===

    /// Parse all of `text`.
    pub fn parse(&self, text: &str) -> Result<Expr, ParseError> {
        self.expression.parse_all(text)
    }

    /// Parse an expression starting at `*cursor`, leaving `*cursor` after it.
    pub fn parse_with(
        &self,
        text: &str,
        cursor: &mut usize,
        options: &ParseOptions,
    ) -> Result<Expr, ParseError> {
        self.expression.parse_with(text, cursor, options)
    }

    /// Parse all of `text` and evaluate it.
    pub fn evaluate(&self, text: &str) -> Result<i64, CalcError> {
        Ok(self.parse(text)?.evaluate()?)
    }
}

fn operator(first: char, first_op: BinOp, second: char, second_op: BinOp) -> Parser {
    ch(first).map(move |_: char| first_op) | ch(second).map(move |_: char| second_op)
}

/// `Blanks operator operand tail | <epsilon>`
fn tail(
    blanks: &Grammar<()>,
    operator: Parser,
    operand: &Grammar<Expr>,
    rest: &Grammar<Chain>,
) -> Parser {
    (blanks + operator + operand + rest).map(|_: (), op: BinOp, rhs: Expr, mut chain: Chain| {
        chain.push((op, rhs));
        chain
    }) | epsilon::<Chain>()
}

/// `head symbol rest`, combined right-recursively.
fn right_operation(head: Parser, symbol: char, op: BinOp, rest: &Grammar<Expr>) -> Parser {
    (head + ch(symbol) + rest).map(move |lhs: Expr, _: (), _: char, rhs: Expr| {
        Expr::binary(op, lhs, rhs)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_rule_is_digit_prefix() {
        let grammar = Arithmetic::new().expect("grammar should build");
        assert_eq!(grammar.number.parse("123abc"), Ok("123".to_string()));
        assert_eq!(grammar.number.parse(""), Ok(String::new()));
    }

    #[test]
    fn test_left_associative_tail() {
        let grammar = Arithmetic::new().expect("grammar should build");
        let expr = grammar.parse("8 - 4 - 2").expect("should parse");
        assert_eq!(expr.to_string(), "((8 - 4) - 2)");
        assert_eq!(expr.evaluate(), Ok(2));
    }

    #[test]
    fn test_right_recursive_grouping() {
        let grammar = Arithmetic::right_recursive().expect("grammar should build");
        let expr = grammar.parse("8 - 4 - 2").expect("should parse");
        assert_eq!(expr.to_string(), "(8 - (4 - 2))");
        assert_eq!(expr.evaluate(), Ok(6));
    }

    #[test]
    fn test_precedence_and_parentheses() {
        let grammar = Arithmetic::new().expect("grammar should build");
        assert_eq!(grammar.evaluate("2 + 3 * 4").ok(), Some(14));
        assert_eq!(grammar.evaluate("(2 + 3) * 4").ok(), Some(20));
        assert_eq!(grammar.evaluate(" ( ( 7 ) ) ").ok(), Some(7));
    }

    #[test]
    fn test_evaluation_errors() {
        let grammar = Arithmetic::new().expect("grammar should build");
        assert!(matches!(
            grammar.evaluate("1 / 0"),
            Err(CalcError::Eval(EvalError::DivisionByZero))
        ));
        assert!(matches!(
            grammar.evaluate("99999999999999999999"),
            Err(CalcError::Eval(EvalError::Overflow))
        ));
        assert!(matches!(
            grammar.evaluate("9223372036854775807 + 1"),
            Err(CalcError::Eval(EvalError::Overflow))
        ));
    }

    #[test]
    fn test_expression_rule_outlives_grammar() {
        let expression = Arithmetic::new()
            .expect("grammar should build")
            .expression
            .clone();
        assert_eq!(
            expression.parse_all("1 + 2 * 3").map(|expr| expr.to_string()),
            Ok("(1 + (2 * 3))".to_string())
        );
    }

    #[test]
    fn test_bin_op_apply() {
        assert_eq!(BinOp::Div.apply(7, 2), Ok(3));
        assert_eq!(BinOp::Div.apply(-7, 2), Ok(-3));
        assert_eq!(BinOp::Div.apply(i64::MIN, -1), Err(EvalError::Overflow));
    }
}

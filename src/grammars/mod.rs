//! Ready-made grammars built on the combinators in [`crate::parser`].

pub mod arithmetic;

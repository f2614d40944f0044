//! Terminal parsers: the leaves every grammar bottoms out in.

use crate::shape::Shape;
use crate::value::Data;

use super::combinators::Parser;
use super::state::ParseState;

/// Match one char satisfying `pred`.
pub fn by<F>(pred: F) -> Parser
where
    F: Fn(char) -> bool + 'static,
{
    Parser::new(Shape::of::<char>(), move |state: &mut ParseState<'_>| {
        match state.peek() {
            Some(c) if pred(c) => {
                state.advance();
                Ok(Some(c.into_value()))
            }
            _ => {
                state.record_failure(state.position());
                Ok(None)
            }
        }
    })
}

/// Match exactly `expected`.
pub fn ch(expected: char) -> Parser {
    by(move |c| c == expected)
}

/// Match exactly `pattern`, producing it as a `String`.
///
/// Nothing is consumed unless the whole pattern matches.
pub fn literal(pattern: impl Into<String>) -> Parser {
    let pattern: String = pattern.into();
    Parser::new(Shape::of::<String>(), move |state: &mut ParseState<'_>| {
        if state.eat(&pattern) {
            return Ok(Some(pattern.clone().into_value()));
        }

        let matched: usize = state
            .remaining()
            .chars()
            .zip(pattern.chars())
            .take_while(|(found, wanted)| found == wanted)
            .map(|(found, _)| found.len_utf8())
            .sum();
        state.record_failure(state.position() + matched);
        Ok(None)
    })
}

/// Always succeed with `T::default()` without consuming input.
pub fn epsilon<T: Data + Default>() -> Parser {
    epsilon_with(T::default)
}

/// Always succeed with a fresh value from `produce`.
pub fn epsilon_with<T, F>(produce: F) -> Parser
where
    T: Data,
    F: Fn() -> T + 'static,
{
    Parser::new(T::shape(), move |_: &mut ParseState<'_>| {
        Ok(Some(produce().into_value()))
    })
}

/// Always succeed with a value computed from the full input and the current
/// cursor. The cursor is not moved.
pub fn epsilon_at<T, F>(produce: F) -> Parser
where
    T: Data,
    F: Fn(&str, usize) -> T + 'static,
{
    Parser::new(T::shape(), move |state: &mut ParseState<'_>| {
        Ok(Some(produce(state.text(), state.position()).into_value()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;

    fn run(parser: &Parser, text: &str) -> (Option<crate::value::Value>, usize, usize) {
        let mut state = ParseState::new(text, 0, &ParseOptions::default()).expect("valid cursor");
        let value = parser.run(&mut state).expect("no grammar error");
        (value, state.position(), state.furthest())
    }

    #[test]
    fn test_by_matches_predicate() {
        let digit = by(|c| c.is_ascii_digit());
        let (value, position, _) = run(&digit, "7a");
        assert_eq!(value.and_then(|v| v.downcast::<char>()), Some('7'));
        assert_eq!(position, 1);
    }

    #[test]
    fn test_by_fails_without_consuming() {
        let digit = by(|c| c.is_ascii_digit());
        let (value, position, _) = run(&digit, "a");
        assert!(value.is_none());
        assert_eq!(position, 0);

        let (value, position, _) = run(&digit, "");
        assert!(value.is_none());
        assert_eq!(position, 0);
    }

    #[test]
    fn test_ch_on_multibyte_input() {
        let (value, position, _) = run(&ch('λ'), "λx");
        assert_eq!(value.and_then(|v| v.downcast::<char>()), Some('λ'));
        assert_eq!(position, 'λ'.len_utf8());
    }

    #[test]
    fn test_literal() {
        let keyword = literal("let");
        assert_eq!(keyword.shape(), &Shape::of::<String>());

        let (value, position, _) = run(&keyword, "let x");
        assert_eq!(value.and_then(|v| v.downcast::<String>()), Some("let".to_string()));
        assert_eq!(position, 3);
    }

    #[test]
    fn test_literal_partial_match_consumes_nothing() {
        let (value, position, furthest) = run(&literal("let"), "lex");
        assert!(value.is_none());
        assert_eq!(position, 0);
        assert_eq!(furthest, 2);
    }

    #[test]
    fn test_epsilon_variants() {
        let (value, position, _) = run(&epsilon::<String>(), "abc");
        assert_eq!(value.and_then(|v| v.downcast::<String>()), Some(String::new()));
        assert_eq!(position, 0);

        let (value, _, _) = run(&epsilon_with(|| 42i64), "abc");
        assert_eq!(value.and_then(|v| v.downcast::<i64>()), Some(42));

        let rest = epsilon_at(|text: &str, cursor: usize| text[cursor..].len());
        let mut state = ParseState::new("abc", 1, &ParseOptions::default()).expect("valid cursor");
        let value = rest.run(&mut state).expect("no grammar error");
        assert_eq!(value.and_then(|v| v.downcast::<usize>()), Some(2));
        assert_eq!(state.position(), 1);
    }
}

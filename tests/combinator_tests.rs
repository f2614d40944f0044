//! Tests for sequencing, ordered choice and mapping

use ruparsec::config::ParseOptions;
use ruparsec::parser::token::{by, ch, epsilon, literal};
use ruparsec::parser::{GrammarError, ParseError, Parser};
use ruparsec::shape::Shape;
use ruparsec::value::{Data, Union2};

fn digit() -> Parser {
    by(|c| c.is_ascii_digit())
}

#[test]
fn sequence_flattens_into_one_tuple() {
    let parser = digit() + ch('+') + digit();
    assert_eq!(parser.shape(), &<(char, char, char)>::shape());
    assert_eq!(parser.parse::<(char, char, char)>("1+2"), Ok(('1', '+', '2')));
}

#[test]
fn sequence_grouping_does_not_matter() {
    let left = (digit() + ch('-')) + digit();
    let right = digit() + (ch('-') + digit());
    assert_eq!(left.shape(), right.shape());
    assert_eq!(
        left.parse::<(char, char, char)>("4-2"),
        right.parse::<(char, char, char)>("4-2")
    );
}

#[test]
fn failed_sequence_restores_cursor() {
    let parser = ch('1') + ch('+');
    let mut cursor = 0;
    let result = parser.parse_with("1-", &mut cursor, &ParseOptions::default());
    assert!(matches!(result, Err(ParseError::NoMatch { position: 1 })));
    assert_eq!(cursor, 0);
}

#[test]
fn failed_sequence_lets_alternative_start_over() {
    let parser = (ch('a') + ch('b')).map(|_: char, _: char| 1u8)
        | (ch('a') + ch('c')).map(|_: char, _: char| 2u8);
    assert_eq!(parser.parse::<u8>("ac"), Ok(2));
}

#[test]
fn alternative_prefers_first_success() {
    let parser = literal("ab") | literal("a");
    assert_eq!(parser.parse::<String>("ab"), Ok("ab".to_string()));
    assert_eq!(parser.parse::<String>("ax"), Ok("a".to_string()));

    let shadowed = literal("a") | literal("ab");
    assert_eq!(shadowed.parse::<String>("ab"), Ok("a".to_string()));
}

#[test]
fn alternative_of_equal_shapes_collapses() {
    let parser = ch('a') | ch('b');
    assert_eq!(parser.shape(), &Shape::of::<char>());
    assert_eq!(parser.parse::<char>("b"), Ok('b'));
}

#[test]
fn alternative_of_distinct_shapes_is_a_union() {
    let parser = ch('a') | literal("bc");
    assert_eq!(parser.shape(), &<Union2<char, String>>::shape());
    assert_eq!(
        parser.parse::<Union2<char, String>>("a"),
        Ok(Union2::First('a'))
    );
    assert_eq!(
        parser.parse::<Union2<char, String>>("bc"),
        Ok(Union2::Second("bc".to_string()))
    );
}

#[test]
fn union_nested_in_sequence() {
    let parser = (digit() | literal("x")) + ch(';');
    assert_eq!(parser.shape().to_string(), "(char | String, char)");
    assert_eq!(
        parser.parse::<(Union2<char, String>, char)>("x;"),
        Ok((Union2::Second("x".to_string()), ';'))
    );
}

#[test]
fn map_spreads_tuple_members() {
    let parser = (digit() + ch('*') + digit()).map(|a: char, _: char, b: char| {
        let a = a.to_digit(10).unwrap_or_default();
        let b = b.to_digit(10).unwrap_or_default();
        a * b
    });
    assert_eq!(parser.parse::<u32>("6*7"), Ok(42));
}

#[test]
fn map_accepts_whole_tuple() {
    let parser = (ch('a') + ch('b')).map(|pair: (char, char)| format!("{}{}", pair.1, pair.0));
    assert_eq!(parser.parse::<String>("ab"), Ok("ba".to_string()));
}

#[test]
fn map_of_union_receives_union() {
    let parser = (digit() | literal("none")).map(|value: Union2<char, String>| match value {
        Union2::First(_) => true,
        Union2::Second(_) => false,
    });
    assert_eq!(parser.parse::<bool>("7"), Ok(true));
    assert_eq!(parser.parse::<bool>("none"), Ok(false));
}

#[test]
fn try_map_rejects_wrong_arity() {
    let result = (ch('a') + ch('b')).try_map(|a: char| a);
    assert!(matches!(result, Err(GrammarError::CallbackMismatch { .. })));
}

#[test]
fn try_map_rejects_wrong_types() {
    let result = (ch('a') + literal("b")).try_map(|_: char, _: char| ());
    assert!(matches!(result, Err(GrammarError::CallbackMismatch { .. })));
}

#[test]
#[should_panic(expected = "callback expects")]
fn map_panics_on_mismatch() {
    let _ = ch('a').map(|_: String| ());
}

#[test]
fn epsilon_matches_empty_input() {
    assert_eq!(epsilon::<String>().parse::<String>(""), Ok(String::new()));
    assert_eq!((ch('a') | epsilon::<char>()).parse::<char>("b"), Ok('\0'));
}

#[test]
fn parse_checks_requested_type() {
    let result = ch('a').parse::<String>("a");
    assert!(matches!(
        result,
        Err(ParseError::Grammar(GrammarError::ShapeMismatch { .. }))
    ));
}

#[test]
fn furthest_failure_is_reported() {
    let parser = literal("abc") | literal("abd");
    assert_eq!(
        parser.parse::<String>("abx"),
        Err(ParseError::NoMatch { position: 2 })
    );
}

#[test]
fn parse_with_moves_cursor_on_success() {
    let parser = digit() + digit();
    let mut cursor = 1;
    let value = parser
        .parse_with("a12b", &mut cursor, &ParseOptions::default())
        .expect("should match");
    assert_eq!(<(char, char)>::from_value(value), Some(('1', '2')));
    assert_eq!(cursor, 3);
}

#[test]
fn parse_with_rejects_invalid_cursor() {
    let mut cursor = 5;
    let result = digit().parse_with("12", &mut cursor, &ParseOptions::default());
    assert_eq!(result.err(), Some(ParseError::InvalidCursor { cursor: 5, len: 2 }));

    let mut cursor = 1;
    let result = digit().parse_with("é1", &mut cursor, &ParseOptions::default());
    assert!(matches!(result, Err(ParseError::InvalidCursor { .. })));
}

#[test]
fn clones_share_identity() {
    let parser = digit();
    let clone = parser.clone();
    assert_eq!(parser.id(), clone.id());
    assert_ne!(parser.id(), digit().id());
}

//! Diagnostics: every failure is a `SyntaxError` with a rendered message;
//! nothing panics and no partial tree escapes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ruby_parser::{Parser, SyntaxError, SyntaxErrorKind};

fn parse_err(code: &str) -> SyntaxError {
    let mut parser = Parser::new(code, "(string)");
    parser.tree().expect_err("expected a syntax error")
}

#[test]
fn unterminated_string_names_opener_and_closer() {
    let err = parse_err("\"abc");
    assert_eq!(err.kind, SyntaxErrorKind::UnterminatedLiteral);
    assert!(err.message.contains("unterminated string"), "{}", err.message);
    assert!(err.message.contains("'\"'"), "{}", err.message);
    assert!(err.message.contains("^ starts here"), "{}", err.message);
}

#[test]
fn unterminated_single_quote() {
    let err = parse_err("'abc");
    assert_eq!(err.kind, SyntaxErrorKind::UnterminatedLiteral);
    assert!(err.message.contains("unterminated string"), "{}", err.message);
    assert!(err.message.contains("\"'\""), "{}", err.message);
}

#[test]
fn unterminated_regexp() {
    let err = parse_err("/abc");
    assert!(err.message.contains("unterminated regexp"), "{}", err.message);
    assert!(err.message.contains("'/'"), "{}", err.message);
}

#[test]
fn unterminated_word_array_names_the_pair_closer() {
    let err = parse_err("%w[a b");
    assert!(err.message.contains("unterminated word array"), "{}", err.message);
    assert!(err.message.contains("']'"), "{}", err.message);
}

#[test]
fn unterminated_percent_paren_string() {
    let err = parse_err("%q(abc");
    assert!(err.message.contains("unterminated string"), "{}", err.message);
    assert!(err.message.contains("')'"), "{}", err.message);
}

#[test]
fn unexpected_eof_mid_expression() {
    let err = parse_err("1 +");
    assert_eq!(err.kind, SyntaxErrorKind::UnexpectedEof);
    assert!(err.message.contains("unexpected end-of-input"), "{}", err.message);
    assert!(err.message.contains("expected: 'expression'"), "{}", err.message);
}

#[test]
fn unexpected_token_shows_a_caret_line() {
    let err = parse_err("def 1\nend");
    assert!(err.message.contains("syntax error"), "{}", err.message);
    assert!(err.message.contains("^ here"), "{}", err.message);
    assert!(err.message.contains("method name"), "{}", err.message);
}

#[test]
fn invalid_input_is_reported_with_its_text() {
    let err = parse_err("123abc");
    assert_eq!(err.kind, SyntaxErrorKind::InvalidInput);
    assert!(err.message.contains("unexpected 'a'"), "{}", err.message);
}

#[test]
fn class_name_must_be_a_constant() {
    let err = parse_err("class foo\nend");
    assert!(
        err.message.contains("class/module name must be CONSTANT"),
        "{}",
        err.message
    );
}

#[test]
fn case_needs_when_or_in_before_else() {
    let err = parse_err("case x\nelse\nend");
    assert!(err.message.contains("case 'when' or 'in'"), "{}", err.message);
}

#[test]
fn assignment_to_a_literal_is_rejected() {
    let err = parse_err("1 = 2");
    assert!(err.message.contains("syntax error"), "{}", err.message);
}

#[test]
fn missing_block_after_stabby_proc_args() {
    let err = parse_err("->(x) x");
    assert!(err.message.contains("expected: 'block'"), "{}", err.message);
}

#[test]
fn invalid_escapes_surface_from_the_lexer() {
    let err = parse_err("\"a\\xZZ\"");
    assert_eq!(err.kind, SyntaxErrorKind::InvalidCharacterEscape);
    let err = parse_err("\"a\\uZZ\"");
    assert_eq!(err.kind, SyntaxErrorKind::InvalidUnicodeEscape);
}

#[test]
fn file_and_line_lead_the_message() {
    let err = parse_err("x = (");
    assert!(err.message.starts_with("(string)#1: "), "{}", err.message);
}

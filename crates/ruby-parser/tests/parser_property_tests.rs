//! Property tests over a corpus of valid fragments: determinism,
//! separator equivalence, scope isolation, and robustness against
//! single-character mutations.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use ruby_ast::DebugCreator;
use ruby_parser::Parser;

/// Valid fragments exercising every construct family. Kept heredoc-free so
/// the separator-equivalence property can rewrite newlines freely.
const CORPUS: &[&str] = &[
    "a = 1",
    "a = 1\nb = a + 2",
    "x = [1, 2, 3]\nx[0] = 4",
    "foo(1, 2)",
    "foo 1, 2",
    "foo bar do end",
    "bar do end",
    "foo { |a, b| a + b }",
    "def foo(a, b = 1, *c, &d)\na\nend",
    "def self.run\nyield 1\nend",
    "class Foo < Bar\ndef baz\n@x\nend\nend",
    "module M\nX = 1\nend",
    "if a\nb\nelse\nc\nend",
    "unless a\nb\nend",
    "while a\nb\nend",
    "x = 0\nx += 1 while x < 10",
    "case x\nwhen 1, 2\ny\nelse\nz\nend",
    "case x\nin [a, *b]\na\nend",
    "begin\na\nrescue E => e\nb\nensure\nc\nend",
    "a, b = 1, 2",
    "a, *rest = [1, 2, 3]",
    "h = { a: 1, \"b\" => 2 }",
    "s = \"x\" \"y\"",
    "s = \"a#{b}c\"",
    "r = /foo/i",
    "x =~ /bar/",
    "w = %w[a b c]",
    "y = %i[d e]",
    "t = a ? b : c",
    "p 1..10",
    "q = a..b",
    "alias shove <<",
    "undef foo",
    "x ||= 1",
    "x &&= 2",
    "obj.attr = 5",
    "a&.b",
    "::Top::Inner",
    "-> (x) { x * 2 }",
    "super",
    "return 1, 2",
    "BEGIN { 1 }",
    "for i in [1, 2]\ni\nend",
    "defined?(foo)",
    "not a",
    "a and b or c",
    "puts(*args, **opts, &blk)",
];

fn parse_to_sexp(code: &str) -> Result<String, String> {
    let mut parser = Parser::new(code, "(corpus)");
    match parser.tree() {
        Ok(tree) => Ok(DebugCreator::render(&tree)),
        Err(err) => Err(err.message),
    }
}

#[test]
fn corpus_parses_cleanly() {
    for code in CORPUS {
        let result = parse_to_sexp(code);
        assert!(result.is_ok(), "{code:?}: {result:?}");
    }
}

#[test]
fn parsing_is_deterministic() {
    for code in CORPUS {
        assert_eq!(parse_to_sexp(code), parse_to_sexp(code), "{code:?}");
    }
}

#[test]
fn semicolons_are_equivalent_to_newlines() {
    for code in CORPUS {
        let with_semicolons = code.replace('\n', ";");
        assert_eq!(
            parse_to_sexp(code),
            parse_to_sexp(&with_semicolons),
            "{code:?}"
        );
    }
}

#[test]
fn local_bindings_in_blocks_stay_local() {
    let outer = parse_to_sexp("foo { a = 1 }\na").unwrap();
    assert!(
        outer.contains("(:call, nil, :a)"),
        "outer `a` must stay a call: {outer}"
    );
    let flat = parse_to_sexp("a = 1\na").unwrap();
    assert!(flat.contains("(:lvar, :a)"), "bound `a` must be an lvar: {flat}");
}

#[test]
fn adjacent_strings_merge_like_one_literal() {
    assert_eq!(parse_to_sexp("\"ab\" \"cd\""), parse_to_sexp("\"abcd\""));
    assert_eq!(parse_to_sexp("'ab' 'cd'"), parse_to_sexp("'abcd'"));
}

#[test]
fn every_unterminated_opener_raises() {
    for fragment in ["\"abc", "'abc", "`abc", "/abc", "%w[abc", "%W{a", "%i(a", "%q(a", "(1", "[1"] {
        let result = parse_to_sexp(fragment);
        assert!(result.is_err(), "{fragment:?} should not parse: {result:?}");
    }
}

proptest! {
    #[test]
    fn corpus_with_one_inserted_character_never_panics(
        index in 0..CORPUS.len(),
        position in 0usize..64,
        c in proptest::char::range(' ', '~')
    ) {
        let code = CORPUS[index];
        let at = position.min(code.len());
        // keep the mutation on a char boundary
        let at = (0..=at).rev().find(|i| code.is_char_boundary(*i)).unwrap_or(0);
        let mut mutated = String::with_capacity(code.len() + 1);
        mutated.push_str(&code[..at]);
        mutated.push(c);
        mutated.push_str(&code[at..]);
        // must return, with either a tree or an error
        let _ = parse_to_sexp(&mutated);
    }

    #[test]
    fn arbitrary_ascii_never_panics(code in "[ -~\n]{0,60}") {
        let _ = parse_to_sexp(&code);
    }
}

//! Stream-level contracts: every `tokens()` call ends in exactly one
//! terminal token, newline collapsing never produces adjacent `Eol`s, and
//! the context-sensitive decisions hold across operator/value boundaries.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ruby_lexer::Lexer;
use ruby_token::TokenKind;

fn tokens(code: &str) -> Vec<ruby_token::Token> {
    Lexer::new(code, "(contract)").tokens()
}

#[test]
fn stream_always_ends_with_eof_or_one_invalid_token() {
    for code in [
        "",
        "a + b",
        "\"unterminated",
        "/unterminated",
        "%w[unterminated",
        "123abc",
        "def foo; end",
        "x = <<~EOF\n  body\nEOF\n",
    ] {
        let tokens = tokens(code);
        let last = tokens.last().expect("stream may not be empty");
        assert!(
            last.is_eof() || !last.is_valid(),
            "{code:?} ended with {:?}",
            last.kind
        );
        // nothing after the terminal token
        for token in &tokens[..tokens.len() - 1] {
            assert!(token.is_valid(), "{code:?} had a non-terminal invalid token");
        }
    }
}

#[test]
fn no_adjacent_eol_tokens_after_post_processing() {
    for code in ["a\n\n\nb", "a;;;b", "a;\n;b", "\n\na", "a\n\n"] {
        let tokens = tokens(code);
        for pair in tokens.windows(2) {
            assert!(
                !(pair[0].is_eol() && pair[1].is_eol()),
                "{code:?} produced adjacent Eol tokens"
            );
        }
    }
}

#[test]
fn every_token_carries_the_file_label() {
    for token in tokens("a = [1, \"two\", :three]\n") {
        assert_eq!(&*token.file, "(contract)");
    }
}

#[test]
fn whitespace_precedes_is_tracked() {
    let tokens = tokens("foo [1]");
    assert_eq!(tokens[1].kind, TokenKind::LBracket);
    assert!(tokens[1].whitespace_precedes);
    let tokens = Lexer::new("foo[1]", "(contract)").tokens();
    assert_eq!(tokens[1].kind, TokenKind::LBracket);
    assert!(!tokens[1].whitespace_precedes);
}

#[test]
fn slash_context_decisions() {
    // value on the left: division
    assert_eq!(tokens("a / b")[1].kind, TokenKind::Divide);
    assert_eq!(tokens("1/2")[1].kind, TokenKind::Divide);
    // expression position: regexp
    assert_eq!(tokens("foo(/re/)")[1].kind, TokenKind::LParen);
    assert_eq!(tokens("foo(/re/)")[2].kind, TokenKind::InterpolatedRegexpBegin);
    assert_eq!(tokens("x =~ /re/")[2].kind, TokenKind::InterpolatedRegexpBegin);
    assert_eq!(tokens("foo /re/")[1].kind, TokenKind::InterpolatedRegexpBegin);
}

#[test]
fn left_shift_context_decisions() {
    assert_eq!(tokens("a << b")[1].kind, TokenKind::LeftShift);
    assert_eq!(tokens("a<<b")[1].kind, TokenKind::LeftShift);
    // `=` on the left makes it a heredoc opener
    let toks = tokens("a =<<B\nbody\nB\n");
    assert_eq!(toks[2].kind, TokenKind::InterpolatedStringBegin);
    // so does an identifier-looking word right after
    let toks = tokens("puts <<B\nbody\nB\n");
    assert_eq!(toks[1].kind, TokenKind::InterpolatedStringBegin);
}

#[test]
fn stacked_heredocs_on_one_line() {
    let code = "a(<<ONE, <<TWO)\n1\nONE\n2\nTWO\nb\n";
    let toks = tokens(code);
    let strings: Vec<_> = toks
        .iter()
        .filter(|t| t.kind == TokenKind::String)
        .map(|t| t.literal_or_blank().to_string())
        .collect();
    assert_eq!(strings, vec!["1\n", "2\n"]);
    // tokenization continues after both bodies
    assert!(toks.iter().any(|t| t.literal.as_deref() == Some("b")));
}

#[test]
fn doc_comments_attach_only_to_definition_keywords() {
    let toks = tokens("# about foo\n# more\ndef foo; end\n");
    assert_eq!(toks[0].kind, TokenKind::DefKeyword);
    assert_eq!(toks[0].doc.as_deref(), Some("# about foo\n# more\n"));

    // docs with no definition following are dropped
    let toks = tokens("# dangling\nx = 1\n");
    assert!(toks.iter().all(|t| t.doc.is_none()));
}

#[test]
fn equals_begin_doc_blocks() {
    let toks = tokens("=begin\nstuff\n=end\nclass Foo\nend\n");
    assert_eq!(toks[0].kind, TokenKind::ClassKeyword);
    let doc = toks[0].doc.as_deref().expect("doc attached");
    assert!(doc.starts_with("=begin"));
    assert!(doc.ends_with("=end\n"));
}

#[test]
fn symbol_family() {
    let toks = tokens(":foo :foo= :<=> :! :[] :'quoted'");
    let names: Vec<_> = toks
        .iter()
        .filter(|t| t.kind == TokenKind::Symbol)
        .map(|t| t.literal_or_blank().to_string())
        .collect();
    assert_eq!(names, vec!["foo", "foo=", "<=>", "!", "[]", "quoted"]);
}

#[test]
fn interpolated_word_arrays() {
    let kinds: Vec<_> = tokens("%W[a#{b} c]").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::PercentUpperW,
            TokenKind::InterpolatedStringBegin,
            TokenKind::String,
            TokenKind::EvaluateToStringBegin,
            TokenKind::BareName,
            TokenKind::EvaluateToStringEnd,
            TokenKind::InterpolatedStringEnd,
            TokenKind::String,
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn escapes_resolve_in_double_quotes_only() {
    let toks = tokens(r#""a\tb""#);
    assert_eq!(toks[1].literal_or_blank(), "a\tb");
    let toks = tokens(r"'a\tb'");
    assert_eq!(toks[0].literal_or_blank(), "a\\tb");
    let toks = tokens(r#""\u{1F600}""#);
    assert_eq!(toks[1].literal_or_blank(), "\u{1F600}");
}

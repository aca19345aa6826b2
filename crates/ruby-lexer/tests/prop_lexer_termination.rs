//! The lexer must terminate and stay panic-free on arbitrary input; failure
//! is always expressed as a token kind, never as an unwind or a hang.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use ruby_lexer::Lexer;

proptest! {
    #[test]
    fn arbitrary_ascii_terminates(code in "[ -~\t\n]{0,200}") {
        let tokens = Lexer::new(code.as_str(), "(fuzz)").tokens();
        let last = tokens.last().unwrap();
        prop_assert!(last.is_eof() || !last.is_valid());
    }

    #[test]
    fn arbitrary_unicode_terminates(code in "\\PC{0,80}") {
        let tokens = Lexer::new(code.as_str(), "(fuzz)").tokens();
        prop_assert!(!tokens.is_empty());
    }

    #[test]
    fn tokenization_is_deterministic(code in "[ -~\n]{0,120}") {
        let a = Lexer::new(code.as_str(), "(fuzz)").tokens();
        let b = Lexer::new(code.as_str(), "(fuzz)").tokens();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn quoted_fragments_round_up_to_a_terminal(word in "[a-z]{1,8}") {
        for wrap in [
            format!("\"{word}"),
            format!("'{word}"),
            format!("/{word}"),
            format!("%w[{word}"),
            format!("\"{word}\""),
            format!("%i({word})"),
        ] {
            let tokens = Lexer::new(wrap.as_str(), "(fuzz)").tokens();
            let last = tokens.last().unwrap();
            prop_assert!(last.is_eof() || !last.is_valid());
        }
    }
}

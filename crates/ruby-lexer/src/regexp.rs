//! Regexp sub-lexer: `/…/` and `%r(…)`.
//!
//! Unlike the string family, regexp content keeps its escapes raw — the
//! regexp engine interprets them later. Only an escaped delimiter collapses
//! so `/a\/b/` means `a/b`. Trailing option letters ride the end token as
//! its literal.

use ruby_token::{Token, TokenKind};

use crate::{FrameAction, Lexer};

/// State for an in-flight regexp literal.
#[derive(Debug)]
pub struct RegexpFrame {
    stop: u8,
    start: Option<u8>,
    pair_depth: usize,
    state: RegexpState,
    options: String,
    /// Opener position, for unterminated-literal diagnostics
    begin_line: usize,
    begin_column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegexpState {
    InProgress,
    EvaluateBegin,
    EvaluateEnd,
    EndToken,
}

impl RegexpFrame {
    pub(crate) fn new(stop: u8, start: Option<u8>, begin_line: usize, begin_column: usize) -> Self {
        RegexpFrame {
            stop,
            start,
            pair_depth: 0,
            state: RegexpState::InProgress,
            options: String::new(),
            begin_line,
            begin_column,
        }
    }
}

impl Lexer {
    pub(crate) fn step_regexp_frame(&mut self, f: &mut RegexpFrame) -> (Token, FrameAction) {
        match f.state {
            RegexpState::EvaluateBegin => {
                f.state = RegexpState::EvaluateEnd;
                (self.token_here(TokenKind::EvaluateToStringBegin), FrameAction::Descend)
            }
            RegexpState::EvaluateEnd => {
                self.advance(); // }
                if self.current_char() == f.stop && f.pair_depth == 0 {
                    self.advance();
                    f.options = self.consume_regexp_options();
                    f.state = RegexpState::EndToken;
                } else {
                    f.state = RegexpState::InProgress;
                }
                (self.token_here(TokenKind::EvaluateToStringEnd), FrameAction::Keep)
            }
            RegexpState::EndToken => {
                let mut token = self.token_here(TokenKind::InterpolatedRegexpEnd);
                if !f.options.is_empty() {
                    token.literal = Some(f.options.as_str().into());
                }
                (token, FrameAction::Pop)
            }
            RegexpState::InProgress => self.consume_regexp_content(f),
        }
    }

    fn consume_regexp_content(&mut self, f: &mut RegexpFrame) -> (Token, FrameAction) {
        let mut buf = String::new();
        loop {
            let c = self.current_char();
            if c == 0 {
                let token = Token::with_literal(
                    TokenKind::UnterminatedRegexp,
                    buf,
                    self.file(),
                    f.begin_line,
                    f.begin_column,
                );
                return (token, FrameAction::Pop);
            }
            if c == b'\\' {
                let c = self.next_char();
                if c == b'/' || c == f.stop {
                    buf.push(c as char);
                    self.advance();
                } else {
                    buf.push('\\');
                    self.push_current_char(&mut buf);
                }
            } else if c == b'#' && self.peek() == b'{' {
                self.advance_by(2);
                f.state = RegexpState::EvaluateBegin;
                return (
                    self.token_here_with_literal(TokenKind::String, buf),
                    FrameAction::Keep,
                );
            } else if Some(c) == f.start && f.start != Some(f.stop) {
                f.pair_depth += 1;
                buf.push(c as char);
                self.advance();
            } else if c == f.stop {
                self.advance();
                if f.pair_depth == 0 {
                    f.options = self.consume_regexp_options();
                    f.state = RegexpState::EndToken;
                    return (
                        self.token_here_with_literal(TokenKind::String, buf),
                        FrameAction::Keep,
                    );
                }
                f.pair_depth -= 1;
                buf.push(c as char);
            } else {
                self.push_current_char(&mut buf);
            }
        }
    }

    fn consume_regexp_options(&mut self) -> String {
        let mut options = String::new();
        loop {
            let c = self.current_char();
            if matches!(c, b'i' | b'm' | b'x' | b'o' | b'u' | b'e' | b's' | b'n') {
                options.push(c as char);
                self.advance();
            } else {
                return options;
            }
        }
    }
}

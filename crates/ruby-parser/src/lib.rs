//! Pratt (top-down operator precedence) parser for Ruby.
//!
//! [`Parser::tree`] turns source text into a [`ruby_ast::Node`] tree whose
//! rendered form follows the RubyParser S-expression convention. Parsing
//! dispatches on the current token to a prefix handler
//! ([`Parser::null_denotation`]) and then, while the next operator binds
//! tighter than the surrounding precedence, to an infix handler
//! ([`Parser::left_denotation`]). A stack of active precedences resolves the
//! one ambiguity neighbor comparison cannot: which call a trailing `do`
//! block belongs to.
//!
//! Local-variable sets thread through every rule so a bareword is classified
//! (`lvar` read vs. paren-less call) the moment it is read. Entering
//! `def`/`class`/`module` starts a fresh set; entering a block copies the
//! enclosing one, so inner bindings never leak back out.
//!
//! All failures raise [`SyntaxError`]; no partial tree is returned.

use std::sync::Arc;

use ruby_ast::{Node, NodeKind};
use ruby_lexer::Lexer;
use ruby_token::{Token, TokenKind};
use rustc_hash::FxHashSet;
use tracing::trace;

mod error;
mod expressions;
mod literals;
mod precedence;
mod statements;

pub use error::{SyntaxError, SyntaxErrorKind};
pub use precedence::Precedence;

use precedence::is_first_arg_of_call_without_parens;

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Per-scope set of bound local-variable spellings.
pub(crate) type Locals = FxHashSet<Arc<str>>;

type NullFn = fn(&mut Parser, &mut Locals) -> ParseResult<Node>;
type LeftFn = fn(&mut Parser, Node, &mut Locals) -> ParseResult<Node>;

/// The parser owns the token stream and the original source (for error
/// excerpts). One instance parses one input.
pub struct Parser {
    code: Arc<str>,
    file: Arc<str>,
    tokens: Vec<Token>,
    index: usize,
    precedence_stack: Vec<Precedence>,
}

impl Parser {
    pub fn new(code: impl Into<Arc<str>>, file: impl Into<Arc<str>>) -> Self {
        let code = code.into();
        let file = file.into();
        let tokens = Lexer::new(code.clone(), file.clone()).tokens();
        Parser {
            code,
            file,
            tokens,
            index: 0,
            precedence_stack: Vec::new(),
        }
    }

    /// Parse the whole input. The root is always a `Block`.
    pub fn tree(&mut self) -> ParseResult<Node> {
        self.validate_current_token()?;
        let mut locals = Locals::default();
        self.skip_newlines();
        let root_token = self.current_token();
        let mut nodes = Vec::new();
        while !self.current_token().is_eof() {
            let exp = self.parse_expression(Precedence::Lowest, &mut locals)?;
            nodes.push(exp);
            self.validate_current_token()?;
            self.next_expression()?;
        }
        Ok(Node::new(root_token, NodeKind::Block { nodes }))
    }

    pub(crate) fn parse_expression(
        &mut self,
        precedence: Precedence,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        self.skip_newlines();
        trace!(target: "ruby_parser", ?precedence, token = ?self.current_token().kind, "parse_expression");

        self.precedence_stack.push(precedence);
        let result = self.parse_expression_inner(precedence, locals);
        self.precedence_stack.pop();
        result
    }

    fn parse_expression_inner(
        &mut self,
        precedence: Precedence,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        let Some(null_fn) = self.null_denotation(token.kind) else {
            return Err(self.unexpected(&token, "expression"));
        };

        let mut left = null_fn(self, locals)?;

        while self.current_token().is_valid() {
            let token = self.current_token();
            if !self.higher_precedence(&token, &left, precedence) {
                break;
            }
            let Some(left_fn) = self.left_denotation(&token, &left, precedence) else {
                return Err(self.unexpected(&token, "expression"));
            };
            left = left_fn(self, left, locals)?;
        }

        Ok(left)
    }

    /// Prefix handler for a token kind, if it can begin an expression.
    fn null_denotation(&self, kind: TokenKind) -> Option<NullFn> {
        let f: NullFn = match kind {
            TokenKind::AliasKeyword => Parser::parse_alias,
            TokenKind::LBracket | TokenKind::LBracketRBracket => Parser::parse_array,
            TokenKind::BackRef => Parser::parse_back_ref,
            TokenKind::BeginKeyword => Parser::parse_begin,
            TokenKind::BEGINKeyword | TokenKind::ENDKeyword => Parser::parse_statement_keyword,
            TokenKind::BitwiseAnd => Parser::parse_block_pass,
            TokenKind::TrueKeyword | TokenKind::FalseKeyword => Parser::parse_bool,
            TokenKind::BreakKeyword => Parser::parse_break,
            TokenKind::CaseKeyword => Parser::parse_case,
            TokenKind::ClassKeyword => Parser::parse_class,
            TokenKind::DefKeyword => Parser::parse_def,
            TokenKind::DefinedKeyword => Parser::parse_defined,
            TokenKind::DotDot | TokenKind::DotDotDot => Parser::parse_beginless_range,
            TokenKind::ENCODINGKeyword => Parser::parse_encoding,
            TokenKind::FILEKeyword => Parser::parse_file_constant,
            TokenKind::LINEKeyword => Parser::parse_line_number,
            TokenKind::ForKeyword => Parser::parse_for,
            TokenKind::LParen => Parser::parse_group,
            TokenKind::LCurlyBrace => Parser::parse_hash,
            TokenKind::BareName
            | TokenKind::ClassVariable
            | TokenKind::Constant
            | TokenKind::GlobalVariable
            | TokenKind::InstanceVariable => Parser::parse_identifier,
            TokenKind::IfKeyword => Parser::parse_if,
            TokenKind::InterpolatedRegexpBegin => Parser::parse_interpolated_regexp,
            TokenKind::InterpolatedShellBegin => Parser::parse_interpolated_shell,
            TokenKind::InterpolatedStringBegin => Parser::parse_interpolated_string,
            TokenKind::InterpolatedSymbolBegin => Parser::parse_interpolated_symbol,
            TokenKind::Exponent => Parser::parse_keyword_splat,
            TokenKind::Bignum | TokenKind::Fixnum | TokenKind::Float | TokenKind::Rational => {
                Parser::parse_lit
            }
            TokenKind::ModuleKeyword => Parser::parse_module,
            TokenKind::NextKeyword => Parser::parse_next,
            TokenKind::NilKeyword => Parser::parse_nil,
            TokenKind::Not | TokenKind::NotKeyword => Parser::parse_not,
            TokenKind::NthRef => Parser::parse_nth_ref,
            TokenKind::RedoKeyword => Parser::parse_redo,
            TokenKind::RetryKeyword => Parser::parse_retry,
            TokenKind::ReturnKeyword => Parser::parse_return,
            TokenKind::SelfKeyword => Parser::parse_self,
            TokenKind::Multiply => Parser::parse_splat,
            TokenKind::Arrow => Parser::parse_stabby_proc,
            TokenKind::String => Parser::parse_string,
            TokenKind::SuperKeyword => Parser::parse_super,
            TokenKind::Symbol => Parser::parse_symbol,
            TokenKind::SymbolKey => Parser::parse_symbol_key,
            TokenKind::ConstantResolution => Parser::parse_top_level_constant,
            TokenKind::Minus | TokenKind::Plus | TokenKind::Tilde => Parser::parse_unary_operator,
            TokenKind::UndefKeyword => Parser::parse_undef,
            TokenKind::UnlessKeyword => Parser::parse_unless,
            TokenKind::UntilKeyword | TokenKind::WhileKeyword => Parser::parse_while,
            TokenKind::PercentLowerI | TokenKind::PercentUpperI => Parser::parse_word_symbol_array,
            TokenKind::PercentLowerW | TokenKind::PercentUpperW => Parser::parse_word_array,
            TokenKind::YieldKeyword => Parser::parse_yield,
            _ => return None,
        };
        Some(f)
    }

    /// Infix handler for a token appearing after `left`.
    fn left_denotation(&self, token: &Token, left: &Node, precedence: Precedence) -> Option<LeftFn> {
        let f: LeftFn = match token.kind {
            TokenKind::Equal => {
                if matches!(
                    precedence,
                    Precedence::Array | Precedence::BareCallArg | Precedence::CallArg
                ) {
                    Parser::parse_assignment_expression_without_multiple_values
                } else {
                    Parser::parse_assignment_expression
                }
            }
            TokenKind::LParen => Parser::parse_call_expression_with_parens,
            TokenKind::ConstantResolution => Parser::parse_constant_resolution_expression,
            TokenKind::BitwiseAnd
            | TokenKind::BitwiseOr
            | TokenKind::BitwiseXor
            | TokenKind::Comparison
            | TokenKind::Divide
            | TokenKind::EqualEqual
            | TokenKind::EqualEqualEqual
            | TokenKind::Exponent
            | TokenKind::GreaterThan
            | TokenKind::GreaterThanOrEqual
            | TokenKind::LeftShift
            | TokenKind::LessThan
            | TokenKind::LessThanOrEqual
            | TokenKind::Minus
            | TokenKind::Modulus
            | TokenKind::Multiply
            | TokenKind::NotEqual
            | TokenKind::Plus
            | TokenKind::RightShift => Parser::parse_infix_expression,
            TokenKind::DoKeyword | TokenKind::LCurlyBrace => Parser::parse_iter_expression,
            TokenKind::And | TokenKind::AndKeyword | TokenKind::Or | TokenKind::OrKeyword => {
                Parser::parse_logical_expression
            }
            TokenKind::Match => Parser::parse_match_expression,
            TokenKind::IfKeyword
            | TokenKind::UnlessKeyword
            | TokenKind::WhileKeyword
            | TokenKind::UntilKeyword => Parser::parse_modifier_expression,
            TokenKind::Comma => Parser::parse_multiple_assignment_expression,
            TokenKind::NotMatch => Parser::parse_not_match_expression,
            TokenKind::AndEqual
            | TokenKind::BitwiseAndEqual
            | TokenKind::BitwiseOrEqual
            | TokenKind::BitwiseXorEqual
            | TokenKind::DivideEqual
            | TokenKind::ExponentEqual
            | TokenKind::LeftShiftEqual
            | TokenKind::MinusEqual
            | TokenKind::ModulusEqual
            | TokenKind::MultiplyEqual
            | TokenKind::OrEqual
            | TokenKind::PlusEqual
            | TokenKind::RightShiftEqual => Parser::parse_op_assign_expression,
            TokenKind::DotDot | TokenKind::DotDotDot => Parser::parse_range_expression,
            TokenKind::LBracket | TokenKind::LBracketRBracket
                if self.treat_left_bracket_as_element_reference(left, token) =>
            {
                Parser::parse_ref_expression
            }
            TokenKind::RescueKeyword => Parser::parse_rescue_expression,
            TokenKind::SafeNavigation => Parser::parse_safe_send_expression,
            TokenKind::Dot => {
                if self.peek_token().is_lparen() {
                    Parser::parse_proc_call_expression
                } else {
                    Parser::parse_send_expression
                }
            }
            TokenKind::TernaryQuestion => Parser::parse_ternary_expression,
            _ => {
                if is_first_arg_of_call_without_parens(left, token) {
                    return Some(Parser::parse_call_expression_without_parens);
                }
                return None;
            }
        };
        Some(f)
    }

    // ----- token-stream helpers -----

    pub(crate) fn current_token(&self) -> Token {
        match self.tokens.get(self.index) {
            Some(token) => token.clone(),
            None => Token::new(TokenKind::Invalid, self.file.clone(), 0, 0),
        }
    }

    pub(crate) fn peek_token(&self) -> Token {
        match self.tokens.get(self.index + 1) {
            Some(token) => token.clone(),
            None => Token::new(TokenKind::Invalid, self.file.clone(), 0, 0),
        }
    }

    pub(crate) fn advance(&mut self) {
        self.index += 1;
    }

    pub(crate) fn rewind(&mut self) {
        self.index -= 1;
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.current_token().is_eol() {
            self.advance();
        }
    }

    /// The current expression must be over; step past its terminators.
    pub(crate) fn next_expression(&mut self) -> ParseResult<()> {
        let token = self.current_token();
        if !token.is_end_of_expression() {
            return Err(self.unexpected(&token, "end-of-line"));
        }
        self.skip_newlines();
        Ok(())
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<()> {
        if self.current_token().kind != kind {
            return Err(self.unexpected_current(expected));
        }
        Ok(())
    }

    /// Raise on the failure token kinds the lexer encodes instead of
    /// raising itself.
    pub(crate) fn validate_current_token(&self) -> ParseResult<()> {
        match self.token_validation_error(&self.current_token()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub(crate) fn token_validation_error(&self, token: &Token) -> Option<SyntaxError> {
        match token.kind {
            TokenKind::Invalid => Some(SyntaxError::new(
                SyntaxErrorKind::InvalidInput,
                format!(
                    "{}: syntax error, unexpected '{}'",
                    token.line + 1,
                    token.literal_or_blank()
                ),
            )),
            TokenKind::InvalidUnicodeEscape => Some(SyntaxError::new(
                SyntaxErrorKind::InvalidUnicodeEscape,
                format!("{}: invalid Unicode escape", token.line + 1),
            )),
            TokenKind::InvalidCharacterEscape => Some(SyntaxError::new(
                SyntaxErrorKind::InvalidCharacterEscape,
                format!("{}: invalid character escape", token.line + 1),
            )),
            TokenKind::UnterminatedRegexp
            | TokenKind::UnterminatedString
            | TokenKind::UnterminatedWordArray => Some(self.unterminated_thing(token, None)),
            _ => None,
        }
    }

    // ----- body parsing -----

    pub(crate) fn parse_body(
        &mut self,
        locals: &mut Locals,
        precedence: Precedence,
        end_kind: TokenKind,
        allow_rescue: bool,
    ) -> ParseResult<Node> {
        let body_token = self.current_token();
        let mut nodes = Vec::new();
        self.validate_current_token()?;
        self.skip_newlines();
        while !self.current_token().is_eof() && self.current_token().kind != end_kind {
            if allow_rescue && self.current_token().kind == TokenKind::RescueKeyword {
                let body = Node::new(body_token.clone(), NodeKind::Block { nodes });
                let begin_node = self.parse_rest_of_begin(body_token.clone(), body, locals)?;
                self.rewind(); // the caller consumes the `end`
                return Ok(Node::new(
                    body_token,
                    NodeKind::Block {
                        nodes: vec![begin_node],
                    },
                ));
            }
            let exp = self.parse_expression(precedence, locals)?;
            nodes.push(exp);
            self.next_expression()?;
        }
        Ok(Node::new(body_token, NodeKind::Block { nodes }))
    }

    pub(crate) fn parse_body_until(
        &mut self,
        locals: &mut Locals,
        precedence: Precedence,
        end_kinds: &[TokenKind],
        expected_message: &str,
    ) -> ParseResult<Node> {
        let body_token = self.current_token();
        let mut nodes = Vec::new();
        self.validate_current_token()?;
        self.skip_newlines();
        let finished = |parser: &Parser| end_kinds.contains(&parser.current_token().kind);
        while !self.current_token().is_eof() && !finished(self) {
            let exp = self.parse_expression(precedence, locals)?;
            nodes.push(exp);
            self.validate_current_token()?;
            self.next_expression()?;
        }
        if !finished(self) {
            return Err(self.unexpected_current(expected_message));
        }
        Ok(Node::new(body_token, NodeKind::Block { nodes }))
    }

    pub(crate) fn parse_def_body(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let body_token = self.current_token();
        let mut nodes = Vec::new();
        self.skip_newlines();
        while !self.current_token().is_eof() && !self.current_token().is_end_keyword() {
            if self.current_token().kind == TokenKind::RescueKeyword {
                let body = Node::new(body_token.clone(), NodeKind::Block { nodes });
                let begin_node = self.parse_rest_of_begin(body_token.clone(), body, locals)?;
                self.rewind(); // the `end` belongs to the def
                return Ok(Node::new(
                    body_token,
                    NodeKind::Block {
                        nodes: vec![begin_node],
                    },
                ));
            }
            let exp = self.parse_expression(Precedence::Lowest, locals)?;
            nodes.push(exp);
            self.next_expression()?;
        }
        Ok(Node::new(body_token, NodeKind::Block { nodes }))
    }

    // ----- diagnostics -----

    pub(crate) fn code_line(&self, number: usize) -> String {
        let bytes = self.code.as_bytes();
        let mut start = 0;
        for _ in 0..number {
            match memchr::memchr(b'\n', &bytes[start..]) {
                Some(pos) => start += pos + 1,
                None => return String::new(),
            }
        }
        let end = memchr::memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |pos| start + pos);
        self.code[start..end].trim_end_matches('\r').to_string()
    }

    fn current_line(&self) -> String {
        self.code_line(self.current_token().line)
    }

    pub(crate) fn unexpected_current(&self, expected: &str) -> SyntaxError {
        self.unexpected(&self.current_token(), expected)
    }

    pub(crate) fn unexpected(&self, token: &Token, expected: &str) -> SyntaxError {
        self.unexpected_with_description(token, expected, "expected")
    }

    pub(crate) fn unexpected_error(&self, token: &Token, error: &str) -> SyntaxError {
        self.unexpected_with_description(token, error, "error")
    }

    fn unexpected_with_description(
        &self,
        token: &Token,
        help: &str,
        help_description: &str,
    ) -> SyntaxError {
        let file = &token.file;
        let line = token.line + 1;
        match token.kind.value() {
            None => SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken,
                format!(
                    "{file}#{line}: syntax error, {help_description} '{help}' (token type: {:?})",
                    token.kind
                ),
            ),
            Some(_) if token.kind == TokenKind::Eof => {
                let indent = " ".repeat(token.column);
                SyntaxError::new(
                    SyntaxErrorKind::UnexpectedEof,
                    format!(
                        "{file}#{line}: syntax error, unexpected end-of-input ({help_description}: '{help}')\n{}\n{indent}^ here, {help_description} '{help}'",
                        self.current_line()
                    ),
                )
            }
            Some(value) => {
                let indent = " ".repeat(token.column);
                let line_text = self.code_line(token.line);
                match &token.literal {
                    Some(literal) => SyntaxError::new(
                        SyntaxErrorKind::UnexpectedToken,
                        format!(
                            "{file}#{line}: syntax error, unexpected {value} '{literal}' ({help_description}: '{help}')\n{line_text}\n{indent}^ here, {help_description} '{help}'"
                        ),
                    ),
                    None => SyntaxError::new(
                        SyntaxErrorKind::UnexpectedToken,
                        format!(
                            "{file}#{line}: syntax error, unexpected '{value}' ({help_description}: '{help}')\n{line_text}\n{indent}^ here, {help_description} '{help}'"
                        ),
                    ),
                }
            }
        }
    }

    /// Error for a literal that met end-of-file before its closer.
    /// `start_token` is the literal's begin token when the caller has it;
    /// the opener character is read back out of the source so the message
    /// can name the matching closer.
    pub(crate) fn unterminated_thing(
        &self,
        token: &Token,
        start_token: Option<&Token>,
    ) -> SyntaxError {
        let start = start_token.unwrap_or(token);
        let opener = self.opener_char(start.line, start.column);
        let expected = match opener {
            '(' => "')'".to_string(),
            '[' => "']'".to_string(),
            '{' => "'}'".to_string(),
            '<' => "'>'".to_string(),
            '\'' => "\"'\"".to_string(),
            c => format!("'{c}'"),
        };
        let thing = match token.kind {
            TokenKind::InterpolatedRegexpBegin | TokenKind::UnterminatedRegexp => "regexp",
            TokenKind::InterpolatedShellBegin => "shell",
            TokenKind::InterpolatedSymbolBegin => "symbol",
            TokenKind::UnterminatedWordArray
            | TokenKind::PercentLowerW
            | TokenKind::PercentUpperW
            | TokenKind::PercentLowerI
            | TokenKind::PercentUpperI => "word array",
            _ => "string",
        };
        let file = &start.file;
        let line = start.line + 1;
        let code = self.code_line(start.line);
        let indent = " ".repeat(start.column);
        SyntaxError::new(
            SyntaxErrorKind::UnterminatedLiteral,
            format!(
                "{file}#{line}: syntax error, unterminated {thing} meets end of file (expected: {expected})\n{code}\n{indent}^ starts here, expected closing {expected} somewhere after"
            ),
        )
    }

    /// The delimiter character of the literal that opens at
    /// (`line`, `column`): steps over `%q`-style and `:"` prefixes.
    fn opener_char(&self, line: usize, column: usize) -> char {
        let text = self.code_line(line);
        let mut chars = text.chars().skip(column);
        match chars.next() {
            Some('%') => match chars.next() {
                Some(c) if matches!(c, 'q' | 'Q' | 'r' | 'x' | 'w' | 'W' | 'i' | 'I') => {
                    chars.next().unwrap_or(c)
                }
                Some(c) => c,
                None => '%',
            },
            Some(':') => chars.next().unwrap_or(':'),
            Some(c) => c,
            None => '"',
        }
    }
}

/// Record a binding in the local set, if the node is the kind that binds.
pub(crate) fn add_to_locals(node: &Node, locals: &mut Locals) {
    match &node.kind {
        NodeKind::Identifier { name, .. } => {
            if node.token.kind == TokenKind::BareName {
                locals.insert(name.clone());
            }
        }
        NodeKind::Splat { node: Some(inner) } => add_to_locals(inner, locals),
        NodeKind::MultipleAssignment { targets } => {
            for target in targets {
                add_to_locals(target, locals);
            }
        }
        _ => {}
    }
}

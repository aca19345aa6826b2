//! Ruby Token Definitions
//!
//! This crate provides the shared token definitions used by the Ruby lexer
//! and parser. A [`Token`] pairs a [`TokenKind`] with its optional literal
//! payload and the source location it was read from. Literals are kept in
//! `Arc<str>` so buffering and lookahead can clone tokens cheaply.

use std::fmt;
use std::sync::Arc;

/// Token produced by the lexer and consumed by the parser.
///
/// The kind carries no payload itself; literal text, integer, and float
/// payloads live on the token so that `TokenKind` stays `Copy` and cheap to
/// match on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token classification for parser decision making
    pub kind: TokenKind,
    /// Literal text for identifiers, strings, numeric spellings, doc text
    pub literal: Option<Arc<str>>,
    /// Parsed integer value for `Fixnum` and `NthRef`
    pub fixnum: Option<i64>,
    /// Parsed float value for `Float`
    pub float: Option<f64>,
    /// Documentation comment attached during post-processing
    pub doc: Option<Arc<str>>,
    /// File label this token was read from
    pub file: Arc<str>,
    /// 0-based source line
    pub line: usize,
    /// 0-based source column
    pub column: usize,
    /// True when whitespace separated this token from the previous one
    pub whitespace_precedes: bool,
}

impl Token {
    pub fn new(kind: TokenKind, file: Arc<str>, line: usize, column: usize) -> Self {
        Token {
            kind,
            literal: None,
            fixnum: None,
            float: None,
            doc: None,
            file,
            line,
            column,
            whitespace_precedes: false,
        }
    }

    pub fn with_literal(
        kind: TokenKind,
        literal: impl Into<Arc<str>>,
        file: Arc<str>,
        line: usize,
        column: usize,
    ) -> Self {
        let mut token = Token::new(kind, file, line, column);
        token.literal = Some(literal.into());
        token
    }

    pub fn with_fixnum(kind: TokenKind, value: i64, file: Arc<str>, line: usize, column: usize) -> Self {
        let mut token = Token::new(kind, file, line, column);
        token.fixnum = Some(value);
        token
    }

    pub fn with_float(value: f64, file: Arc<str>, line: usize, column: usize) -> Self {
        let mut token = Token::new(TokenKind::Float, file, line, column);
        token.float = Some(value);
        token
    }

    /// The literal text, or `""` when the kind carries none.
    pub fn literal_or_blank(&self) -> &str {
        self.literal.as_deref().unwrap_or("")
    }

    /// The literal text. Panics in debug builds when absent; literal-bearing
    /// kinds always carry one by the lexer contract.
    pub fn literal_string(&self) -> Arc<str> {
        debug_assert!(self.literal.is_some());
        self.literal.clone().unwrap_or_else(|| Arc::from(""))
    }

    pub fn is_valid(&self) -> bool {
        self.kind.is_valid()
    }

    pub fn is_assignable(&self) -> bool {
        self.kind.is_assignable()
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    pub fn is_operator(&self) -> bool {
        self.kind.is_operator()
    }

    pub fn is_bare_name(&self) -> bool {
        self.kind == TokenKind::BareName
    }

    pub fn is_block_arg_delimiter(&self) -> bool {
        self.kind == TokenKind::BitwiseOr
    }

    pub fn is_comma(&self) -> bool {
        self.kind == TokenKind::Comma
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    pub fn is_def_keyword(&self) -> bool {
        self.kind == TokenKind::DefKeyword
    }

    pub fn is_doc(&self) -> bool {
        self.kind == TokenKind::Doc
    }

    pub fn is_dot(&self) -> bool {
        self.kind == TokenKind::Dot
    }

    pub fn is_else_keyword(&self) -> bool {
        self.kind == TokenKind::ElseKeyword
    }

    pub fn is_elsif_keyword(&self) -> bool {
        self.kind == TokenKind::ElsifKeyword
    }

    pub fn is_end_keyword(&self) -> bool {
        self.kind == TokenKind::EndKeyword
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_eol(&self) -> bool {
        self.kind == TokenKind::Eol
    }

    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Eol
    }

    pub fn is_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon
    }

    pub fn is_hash_rocket(&self) -> bool {
        self.kind == TokenKind::HashRocket
    }

    pub fn is_lparen(&self) -> bool {
        self.kind == TokenKind::LParen
    }

    pub fn is_rparen(&self) -> bool {
        self.kind == TokenKind::RParen
    }

    pub fn is_splat(&self) -> bool {
        self.kind == TokenKind::Multiply || self.kind == TokenKind::Exponent
    }

    pub fn is_when_keyword(&self) -> bool {
        self.kind == TokenKind::WhenKeyword
    }

    /// Modifier keywords that may trail an expression: `if`, `unless`,
    /// `while`, `until`.
    pub fn is_expression_modifier(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::IfKeyword
                | TokenKind::UnlessKeyword
                | TokenKind::WhileKeyword
                | TokenKind::UntilKeyword
        )
    }

    pub fn is_end_of_expression(&self) -> bool {
        matches!(self.kind, TokenKind::EndKeyword | TokenKind::Eol | TokenKind::Eof)
            || self.is_expression_modifier()
    }

    pub fn can_follow_collapsible_newline(&self) -> bool {
        self.kind.can_follow_collapsible_newline()
    }

    pub fn can_precede_collapsible_newline(&self) -> bool {
        self.kind.can_precede_collapsible_newline()
    }

    pub fn can_be_first_arg_of_implicit_call(&self) -> bool {
        self.kind.can_be_first_arg_of_implicit_call()
    }

    pub fn can_have_doc(&self) -> bool {
        self.kind.can_have_doc()
    }
}

/// Token classification for Ruby parsing.
///
/// Covers keywords, operators, delimiters, literals, identifiers, the
/// begin/end boundary kinds of interpolated literals, and the failure kinds
/// the lexer uses instead of raising.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ===== Failure kinds (the lexer never raises) =====
    /// Unrecognized input; literal holds the offending text
    Invalid,
    /// Unsupported `\c`-style escape inside a double-quoted literal
    InvalidCharacterEscape,
    /// Unsupported `\u` escape inside a double-quoted literal
    InvalidUnicodeEscape,
    /// String or heredoc reached end of input before its closer
    UnterminatedString,
    /// Regexp reached end of input before its closer
    UnterminatedRegexp,
    /// `%w`/`%W`/`%i`/`%I` array reached end of input before its closer
    UnterminatedWordArray,

    // ===== Keywords =====
    /// `alias new old`
    AliasKeyword,
    /// Low-precedence conjunction: `and`
    AndKeyword,
    /// `begin` block opener
    BeginKeyword,
    /// Pre-execution block: `BEGIN { }`
    BEGINKeyword,
    /// `break`
    BreakKeyword,
    /// `case`
    CaseKeyword,
    /// `class`
    ClassKeyword,
    /// `def`
    DefKeyword,
    /// `defined?(expr)`
    DefinedKeyword,
    /// Block opener: `do`
    DoKeyword,
    ElseKeyword,
    ElsifKeyword,
    /// `__ENCODING__`
    ENCODINGKeyword,
    /// `end`
    EndKeyword,
    /// Post-execution block: `END { }`
    ENDKeyword,
    EnsureKeyword,
    FalseKeyword,
    /// `__FILE__`
    FILEKeyword,
    /// `for x in list`
    ForKeyword,
    IfKeyword,
    /// Pattern-match arm: `in`
    InKeyword,
    /// `__LINE__`
    LINEKeyword,
    ModuleKeyword,
    NextKeyword,
    NilKeyword,
    /// Low-precedence negation: `not`
    NotKeyword,
    /// Low-precedence disjunction: `or`
    OrKeyword,
    RedoKeyword,
    RescueKeyword,
    RetryKeyword,
    ReturnKeyword,
    SelfKeyword,
    SuperKeyword,
    ThenKeyword,
    TrueKeyword,
    UndefKeyword,
    UnlessKeyword,
    UntilKeyword,
    WhenKeyword,
    WhileKeyword,
    YieldKeyword,

    // ===== Operators =====
    /// Logical AND: `&&`
    And,
    /// AND-assign: `&&=`
    AndEqual,
    /// Stabby-proc arrow: `->`
    Arrow,
    /// Bitwise AND `&`, also block-pass prefix
    BitwiseAnd,
    BitwiseAndEqual,
    /// Bitwise OR `|`, also block-arg delimiter
    BitwiseOr,
    BitwiseOrEqual,
    /// Bitwise XOR `^`, also pattern pin
    BitwiseXor,
    BitwiseXorEqual,
    /// Spaceship: `<=>`
    Comparison,
    /// Scope resolution: `::`
    ConstantResolution,
    /// Division or regexp opener depending on context: `/`
    Divide,
    DivideEqual,
    /// Method send: `.`
    Dot,
    /// Inclusive range: `..`
    DotDot,
    /// Exclusive range `...`, also forward-args
    DotDotDot,
    /// Assignment: `=`
    Equal,
    /// Equality: `==`
    EqualEqual,
    /// Case equality: `===`
    EqualEqualEqual,
    /// Exponentiation `**`, also keyword splat
    Exponent,
    ExponentEqual,
    GreaterThan,
    GreaterThanOrEqual,
    /// Hash pair separator: `=>`
    HashRocket,
    /// Left shift or heredoc opener depending on context: `<<`
    LeftShift,
    LeftShiftEqual,
    LessThan,
    LessThanOrEqual,
    /// Regexp match binding: `=~`
    Match,
    Minus,
    MinusEqual,
    /// Modulus `%`, also percent-literal prefix
    Modulus,
    ModulusEqual,
    /// Multiplication `*`, also splat
    Multiply,
    MultiplyEqual,
    /// Negation: `!`
    Not,
    /// Inequality: `!=`
    NotEqual,
    /// Negated match: `!~`
    NotMatch,
    /// Logical OR: `||`
    Or,
    /// OR-assign: `||=`
    OrEqual,
    Plus,
    PlusEqual,
    RightShift,
    RightShiftEqual,
    /// Safe navigation: `&.`
    SafeNavigation,
    /// Ternary colon, also symbol-ish contexts: `:`
    TernaryColon,
    /// Ternary question mark: `?`
    TernaryQuestion,
    /// Bitwise NOT: `~`
    Tilde,

    // ===== Delimiters and punctuation =====
    Comma,
    LCurlyBrace,
    LBracket,
    /// Element-reference method name: `[]`
    LBracketRBracket,
    /// Element-assignment method name: `[]=`
    LBracketRBracketEqual,
    LParen,
    RCurlyBrace,
    RBracket,
    RParen,
    Semicolon,

    // ===== Literals =====
    /// Back reference: `$&`
    BackRef,
    /// Integer too large for the small-integer ceiling; literal keeps the text
    Bignum,
    /// Integer literal
    Fixnum,
    /// Float literal
    Float,
    /// Integer rational literal: `2r`
    Rational,
    /// Nth match reference: `$1` .. `$9`
    NthRef,
    /// Plain (non-interpolated) string content
    String,
    /// Symbol literal: `:name`, `:+`, `:[]=`
    Symbol,
    /// Hash-key shorthand: `name:`
    SymbolKey,

    // ===== Identifiers =====
    /// Lowercase/underscore-leading bare word
    BareName,
    /// Uppercase-leading constant name
    Constant,
    /// `@@name`
    ClassVariable,
    /// `$name` and the punctuation globals
    GlobalVariable,
    /// `@name`
    InstanceVariable,

    // ===== Interpolation boundaries =====
    /// Start of an embedded `#{ ... }` expression
    EvaluateToStringBegin,
    /// End of an embedded `#{ ... }` expression
    EvaluateToStringEnd,
    InterpolatedRegexpBegin,
    /// Closes a regexp; literal holds trailing option letters if any
    InterpolatedRegexpEnd,
    InterpolatedShellBegin,
    InterpolatedShellEnd,
    InterpolatedStringBegin,
    InterpolatedStringEnd,
    InterpolatedSymbolBegin,
    InterpolatedSymbolEnd,
    /// `%i[` word-symbol array opener
    PercentLowerI,
    /// `%w[` word array opener
    PercentLowerW,
    /// `%I[` interpolated word-symbol array opener
    PercentUpperI,
    /// `%W[` interpolated word array opener
    PercentUpperW,

    // ===== Trivia and stream control =====
    /// Inline comment (dropped during post-processing)
    Comment,
    /// Documentation comment text (attached to the next class/def/module)
    Doc,
    /// Logical end of line; semicolons normalize to this
    Eol,
    Eof,
}

impl TokenKind {
    /// The display spelling used in diagnostics and for operator-to-symbol
    /// conversion (`alias <<`, `def +`, `:<=>`). `None` for the failure
    /// kinds, which have no canonical spelling.
    pub fn value(&self) -> Option<&'static str> {
        let value = match self {
            TokenKind::Invalid
            | TokenKind::InvalidCharacterEscape
            | TokenKind::InvalidUnicodeEscape
            | TokenKind::UnterminatedString
            | TokenKind::UnterminatedRegexp
            | TokenKind::UnterminatedWordArray => return None,
            TokenKind::AliasKeyword => "alias",
            TokenKind::And => "&&",
            TokenKind::AndEqual => "&&=",
            TokenKind::AndKeyword => "and",
            TokenKind::Arrow => "->",
            TokenKind::BackRef => "back_ref",
            TokenKind::BareName => "name",
            TokenKind::BeginKeyword => "begin",
            TokenKind::BEGINKeyword => "BEGIN",
            TokenKind::Bignum => "bignum",
            TokenKind::BitwiseAnd => "&",
            TokenKind::BitwiseAndEqual => "&=",
            TokenKind::BitwiseOr => "|",
            TokenKind::BitwiseOrEqual => "|=",
            TokenKind::BitwiseXor => "^",
            TokenKind::BitwiseXorEqual => "^=",
            TokenKind::BreakKeyword => "break",
            TokenKind::CaseKeyword => "case",
            TokenKind::ClassKeyword => "class",
            TokenKind::ClassVariable => "cvar",
            TokenKind::Comma => ",",
            TokenKind::Comment => "comment",
            TokenKind::Comparison => "<=>",
            TokenKind::Constant => "constant",
            TokenKind::ConstantResolution => "::",
            TokenKind::DefinedKeyword => "defined?",
            TokenKind::DefKeyword => "def",
            TokenKind::Divide => "/",
            TokenKind::DivideEqual => "/=",
            TokenKind::Doc => "doc",
            TokenKind::DoKeyword => "do",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::DotDotDot => "...",
            TokenKind::ElseKeyword => "else",
            TokenKind::ElsifKeyword => "elsif",
            TokenKind::ENCODINGKeyword => "__ENCODING__",
            TokenKind::EndKeyword => "end",
            TokenKind::ENDKeyword => "END",
            TokenKind::EnsureKeyword => "ensure",
            TokenKind::Eof => "EOF",
            TokenKind::Eol => "\n",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::EqualEqualEqual => "===",
            TokenKind::EvaluateToStringBegin => "evstr",
            TokenKind::EvaluateToStringEnd => "evstrend",
            TokenKind::Exponent => "**",
            TokenKind::ExponentEqual => "**=",
            TokenKind::FalseKeyword => "false",
            TokenKind::FILEKeyword => "__FILE__",
            TokenKind::Fixnum => "fixnum",
            TokenKind::Float => "float",
            TokenKind::ForKeyword => "for",
            TokenKind::GlobalVariable => "gvar",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanOrEqual => ">=",
            TokenKind::HashRocket => "=>",
            TokenKind::IfKeyword => "if",
            TokenKind::InKeyword => "in",
            TokenKind::InstanceVariable => "ivar",
            TokenKind::InterpolatedRegexpBegin => "dregx",
            TokenKind::InterpolatedRegexpEnd => "dregxend",
            TokenKind::InterpolatedShellBegin => "dxstr",
            TokenKind::InterpolatedShellEnd => "dxstrend",
            TokenKind::InterpolatedStringBegin => "dstr",
            TokenKind::InterpolatedStringEnd => "dstrend",
            TokenKind::InterpolatedSymbolBegin => "dsym",
            TokenKind::InterpolatedSymbolEnd => "dsymend",
            TokenKind::LCurlyBrace => "{",
            TokenKind::LBracket => "[",
            TokenKind::LBracketRBracket => "[]",
            TokenKind::LBracketRBracketEqual => "[]=",
            TokenKind::LeftShift => "<<",
            TokenKind::LeftShiftEqual => "<<=",
            TokenKind::LessThan => "<",
            TokenKind::LessThanOrEqual => "<=",
            TokenKind::LINEKeyword => "__LINE__",
            TokenKind::LParen => "(",
            TokenKind::Match => "=~",
            TokenKind::Minus => "-",
            TokenKind::MinusEqual => "-=",
            TokenKind::ModuleKeyword => "module",
            TokenKind::Modulus => "%",
            TokenKind::ModulusEqual => "%=",
            TokenKind::Multiply => "*",
            TokenKind::MultiplyEqual => "*=",
            TokenKind::NextKeyword => "next",
            TokenKind::NilKeyword => "nil",
            TokenKind::Not => "!",
            TokenKind::NotEqual => "!=",
            TokenKind::NotKeyword => "not",
            TokenKind::NotMatch => "!~",
            TokenKind::NthRef => "nth_ref",
            TokenKind::Or => "||",
            TokenKind::OrEqual => "||=",
            TokenKind::OrKeyword => "or",
            TokenKind::PercentLowerI => "%i[",
            TokenKind::PercentLowerW => "%w[",
            TokenKind::PercentUpperI => "%I[",
            TokenKind::PercentUpperW => "%W[",
            TokenKind::Plus => "+",
            TokenKind::PlusEqual => "+=",
            TokenKind::Rational => "rational",
            TokenKind::RCurlyBrace => "}",
            TokenKind::RBracket => "]",
            TokenKind::RedoKeyword => "redo",
            TokenKind::RescueKeyword => "rescue",
            TokenKind::RetryKeyword => "retry",
            TokenKind::ReturnKeyword => "return",
            TokenKind::RightShift => ">>",
            TokenKind::RightShiftEqual => ">>=",
            TokenKind::RParen => ")",
            TokenKind::SafeNavigation => "&.",
            TokenKind::SelfKeyword => "self",
            TokenKind::Semicolon => ";",
            TokenKind::String => "string",
            TokenKind::SuperKeyword => "super",
            TokenKind::Symbol => "symbol",
            TokenKind::SymbolKey => "symbol_key",
            TokenKind::TernaryColon => ":",
            TokenKind::TernaryQuestion => "?",
            TokenKind::ThenKeyword => "then",
            TokenKind::Tilde => "~",
            TokenKind::TrueKeyword => "true",
            TokenKind::UndefKeyword => "undef",
            TokenKind::UnlessKeyword => "unless",
            TokenKind::UntilKeyword => "until",
            TokenKind::WhenKeyword => "when",
            TokenKind::WhileKeyword => "while",
            TokenKind::YieldKeyword => "yield",
        };
        Some(value)
    }

    /// Kinds the assignment parser accepts on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            TokenKind::BareName
                | TokenKind::ClassVariable
                | TokenKind::Constant
                | TokenKind::ConstantResolution
                | TokenKind::GlobalVariable
                | TokenKind::InstanceVariable
        )
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::AliasKeyword
                | TokenKind::AndKeyword
                | TokenKind::BeginKeyword
                | TokenKind::BEGINKeyword
                | TokenKind::BreakKeyword
                | TokenKind::CaseKeyword
                | TokenKind::ClassKeyword
                | TokenKind::DefinedKeyword
                | TokenKind::DefKeyword
                | TokenKind::DoKeyword
                | TokenKind::ElseKeyword
                | TokenKind::ElsifKeyword
                | TokenKind::ENCODINGKeyword
                | TokenKind::EndKeyword
                | TokenKind::ENDKeyword
                | TokenKind::EnsureKeyword
                | TokenKind::FalseKeyword
                | TokenKind::FILEKeyword
                | TokenKind::ForKeyword
                | TokenKind::IfKeyword
                | TokenKind::InKeyword
                | TokenKind::LINEKeyword
                | TokenKind::ModuleKeyword
                | TokenKind::NextKeyword
                | TokenKind::NilKeyword
                | TokenKind::NotKeyword
                | TokenKind::OrKeyword
                | TokenKind::RedoKeyword
                | TokenKind::RescueKeyword
                | TokenKind::RetryKeyword
                | TokenKind::ReturnKeyword
                | TokenKind::SelfKeyword
                | TokenKind::SuperKeyword
                | TokenKind::ThenKeyword
                | TokenKind::TrueKeyword
                | TokenKind::UndefKeyword
                | TokenKind::UnlessKeyword
                | TokenKind::UntilKeyword
                | TokenKind::WhenKeyword
                | TokenKind::WhileKeyword
                | TokenKind::YieldKeyword
        )
    }

    /// Operators that double as method names (`def <<`, `alias + plus`).
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
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
                | TokenKind::LBracketRBracket
                | TokenKind::LBracketRBracketEqual
                | TokenKind::LeftShift
                | TokenKind::LessThan
                | TokenKind::LessThanOrEqual
                | TokenKind::Match
                | TokenKind::Minus
                | TokenKind::Modulus
                | TokenKind::Multiply
                | TokenKind::NotEqual
                | TokenKind::NotMatch
                | TokenKind::Plus
                | TokenKind::RightShift
                | TokenKind::Tilde
        )
    }

    pub fn is_valid(&self) -> bool {
        !matches!(
            self,
            TokenKind::Invalid
                | TokenKind::InvalidCharacterEscape
                | TokenKind::InvalidUnicodeEscape
                | TokenKind::UnterminatedRegexp
                | TokenKind::UnterminatedString
                | TokenKind::UnterminatedWordArray
        )
    }

    /// Kinds a newline is folded *into* when they start the next line
    /// (method chains broken before the dot, dangling closers, ternary
    /// colon on its own line).
    pub fn can_follow_collapsible_newline(&self) -> bool {
        matches!(
            self,
            TokenKind::Dot
                | TokenKind::RCurlyBrace
                | TokenKind::RBracket
                | TokenKind::RParen
                | TokenKind::TernaryColon
        )
    }

    /// Kinds after which an end-of-line does not terminate the expression.
    pub fn can_precede_collapsible_newline(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::AndKeyword
                | TokenKind::Arrow
                | TokenKind::BitwiseAnd
                | TokenKind::BitwiseOr
                | TokenKind::BitwiseXor
                | TokenKind::CaseKeyword
                | TokenKind::Comma
                | TokenKind::Comparison
                | TokenKind::ConstantResolution
                | TokenKind::Divide
                | TokenKind::DivideEqual
                | TokenKind::Dot
                | TokenKind::DotDot
                | TokenKind::Equal
                | TokenKind::EqualEqual
                | TokenKind::EqualEqualEqual
                | TokenKind::Exponent
                | TokenKind::ExponentEqual
                | TokenKind::GreaterThan
                | TokenKind::GreaterThanOrEqual
                | TokenKind::HashRocket
                | TokenKind::InKeyword
                | TokenKind::LCurlyBrace
                | TokenKind::LBracket
                | TokenKind::LeftShift
                | TokenKind::LessThan
                | TokenKind::LessThanOrEqual
                | TokenKind::LParen
                | TokenKind::Match
                | TokenKind::Minus
                | TokenKind::MinusEqual
                | TokenKind::Modulus
                | TokenKind::ModulusEqual
                | TokenKind::Multiply
                | TokenKind::MultiplyEqual
                | TokenKind::Not
                | TokenKind::NotEqual
                | TokenKind::NotMatch
                | TokenKind::Or
                | TokenKind::OrKeyword
                | TokenKind::Plus
                | TokenKind::PlusEqual
                | TokenKind::RightShift
                | TokenKind::SafeNavigation
                | TokenKind::TernaryColon
                | TokenKind::TernaryQuestion
                | TokenKind::Tilde
        )
    }

    /// Doc comments attach to the next one of these.
    pub fn can_have_doc(&self) -> bool {
        matches!(
            self,
            TokenKind::ClassKeyword | TokenKind::DefKeyword | TokenKind::ModuleKeyword
        )
    }

    /// Kinds that may begin the first argument of a call without
    /// parentheses (`foo bar`, `foo :sym`, `foo [1]`).
    pub fn can_be_first_arg_of_implicit_call(&self) -> bool {
        matches!(
            self,
            TokenKind::Arrow
                | TokenKind::BareName
                | TokenKind::Bignum
                | TokenKind::ClassVariable
                | TokenKind::Constant
                | TokenKind::ConstantResolution
                | TokenKind::DefKeyword
                | TokenKind::DefinedKeyword
                | TokenKind::DoKeyword
                | TokenKind::ENCODINGKeyword
                | TokenKind::FalseKeyword
                | TokenKind::FILEKeyword
                | TokenKind::Fixnum
                | TokenKind::Float
                | TokenKind::GlobalVariable
                | TokenKind::InstanceVariable
                | TokenKind::InterpolatedRegexpBegin
                | TokenKind::InterpolatedShellBegin
                | TokenKind::InterpolatedStringBegin
                | TokenKind::InterpolatedSymbolBegin
                | TokenKind::LCurlyBrace
                | TokenKind::LBracket
                | TokenKind::LBracketRBracket
                | TokenKind::LINEKeyword
                | TokenKind::LParen
                | TokenKind::Multiply
                | TokenKind::NilKeyword
                | TokenKind::Not
                | TokenKind::NotKeyword
                | TokenKind::PercentLowerI
                | TokenKind::PercentLowerW
                | TokenKind::PercentUpperI
                | TokenKind::PercentUpperW
                | TokenKind::Rational
                | TokenKind::String
                | TokenKind::SuperKeyword
                | TokenKind::Symbol
                | TokenKind::SymbolKey
                | TokenKind::Tilde
                | TokenKind::TrueKeyword
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value().unwrap_or("invalid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind) -> Token {
        Token::new(kind, Arc::from("(test)"), 0, 0)
    }

    #[test]
    fn operator_kinds_are_operators_not_keywords() {
        assert!(TokenKind::LeftShift.is_operator());
        assert!(TokenKind::Comparison.is_operator());
        assert!(!TokenKind::LeftShift.is_keyword());
        assert!(TokenKind::AliasKeyword.is_keyword());
        assert!(!TokenKind::AliasKeyword.is_operator());
    }

    #[test]
    fn failure_kinds_are_invalid_and_nameless() {
        for kind in [
            TokenKind::Invalid,
            TokenKind::InvalidCharacterEscape,
            TokenKind::InvalidUnicodeEscape,
            TokenKind::UnterminatedString,
            TokenKind::UnterminatedRegexp,
            TokenKind::UnterminatedWordArray,
        ] {
            assert!(!kind.is_valid());
            assert_eq!(kind.value(), None);
        }
        assert!(TokenKind::Eof.is_valid());
    }

    #[test]
    fn collapsible_newline_tables() {
        assert!(TokenKind::Dot.can_precede_collapsible_newline());
        assert!(TokenKind::Dot.can_follow_collapsible_newline());
        assert!(TokenKind::Comma.can_precede_collapsible_newline());
        assert!(!TokenKind::Comma.can_follow_collapsible_newline());
        assert!(!TokenKind::BareName.can_precede_collapsible_newline());
    }

    #[test]
    fn end_of_expression_covers_modifiers() {
        assert!(tok(TokenKind::Eol).is_end_of_expression());
        assert!(tok(TokenKind::IfKeyword).is_end_of_expression());
        assert!(tok(TokenKind::UntilKeyword).is_end_of_expression());
        assert!(!tok(TokenKind::Plus).is_end_of_expression());
    }

    #[test]
    fn splat_tokens() {
        assert!(tok(TokenKind::Multiply).is_splat());
        assert!(tok(TokenKind::Exponent).is_splat());
        assert!(!tok(TokenKind::Plus).is_splat());
    }
}

//! Keyword spelling table.

use phf::phf_map;
use ruby_token::TokenKind;

/// Reserved words, including the `?`-suffixed `defined?` and the uppercase
/// phase markers. A spelling is only a keyword when the whole scanned word
/// matches; `inner` is a bare name even though it starts with `in`.
pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "__ENCODING__" => TokenKind::ENCODINGKeyword,
    "__FILE__" => TokenKind::FILEKeyword,
    "__LINE__" => TokenKind::LINEKeyword,
    "BEGIN" => TokenKind::BEGINKeyword,
    "END" => TokenKind::ENDKeyword,
    "alias" => TokenKind::AliasKeyword,
    "and" => TokenKind::AndKeyword,
    "begin" => TokenKind::BeginKeyword,
    "break" => TokenKind::BreakKeyword,
    "case" => TokenKind::CaseKeyword,
    "class" => TokenKind::ClassKeyword,
    "def" => TokenKind::DefKeyword,
    "defined?" => TokenKind::DefinedKeyword,
    "do" => TokenKind::DoKeyword,
    "else" => TokenKind::ElseKeyword,
    "elsif" => TokenKind::ElsifKeyword,
    "end" => TokenKind::EndKeyword,
    "ensure" => TokenKind::EnsureKeyword,
    "false" => TokenKind::FalseKeyword,
    "for" => TokenKind::ForKeyword,
    "if" => TokenKind::IfKeyword,
    "in" => TokenKind::InKeyword,
    "module" => TokenKind::ModuleKeyword,
    "next" => TokenKind::NextKeyword,
    "nil" => TokenKind::NilKeyword,
    "not" => TokenKind::NotKeyword,
    "or" => TokenKind::OrKeyword,
    "redo" => TokenKind::RedoKeyword,
    "rescue" => TokenKind::RescueKeyword,
    "retry" => TokenKind::RetryKeyword,
    "return" => TokenKind::ReturnKeyword,
    "self" => TokenKind::SelfKeyword,
    "super" => TokenKind::SuperKeyword,
    "then" => TokenKind::ThenKeyword,
    "true" => TokenKind::TrueKeyword,
    "undef" => TokenKind::UndefKeyword,
    "unless" => TokenKind::UnlessKeyword,
    "until" => TokenKind::UntilKeyword,
    "when" => TokenKind::WhenKeyword,
    "while" => TokenKind::WhileKeyword,
    "yield" => TokenKind::YieldKeyword,
};

//! Operator precedence, lowest to highest, and the block-attachment rule.

use ruby_ast::{Node, NodeKind};
use ruby_token::{Token, TokenKind};

use crate::Parser;

/// Binding strengths, weakest first. Every level is used by some rule; the
/// ordering is load-bearing down to individual neighbors (`BareCallArg`
/// between `IterBlock` and `OpAssignment`, for example, is what makes
/// paren-less call arguments bind tighter than a trailing `do` block but
/// looser than `+=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `[a, b]` elements, and the comma of multiple assignment
    Array,
    /// words inside `%w[]`
    WordArray,
    /// `{ k => v }` pairs
    Hash,
    /// trailing `if`/`unless`/`while`/`until`/`rescue`
    ExprModifier,
    /// `case` subject
    Case,
    /// `and` / `or`
    Composition,
    /// `_ ? _ : (_)`
    TernaryFalse,
    /// `a = (_)`
    AssignmentRhs,
    /// `do |n| ... end`
    IterBlock,
    /// `foo (_), b` — call arguments without parentheses
    BareCallArg,
    /// `+=` and friends
    OpAssignment,
    /// `_ ? (_) : _`
    TernaryTrue,
    /// `foo( (_), b )`
    CallArg,
    /// `(_) ? _ : _`
    TernaryQuestion,
    LogicalOr,
    LogicalAnd,
    /// `(_) = 1`
    AssignmentLhs,
    /// `*args`, `**kwargs`
    Splat,
    Range,
    /// `not`
    LogicalNot,
    /// `<=> == === != =~ !~`
    Equality,
    LessGreater,
    /// `^ |`
    BitwiseOr,
    BitwiseAnd,
    /// `<< >>`
    BitwiseShift,
    /// `def foo( (_), b )` and `{ |(_), b| ... }` defaults
    DefArg,
    Sum,
    Product,
    /// `2.bar` — a dot on a numeric literal
    NumberDot,
    UnaryMinus,
    Exponent,
    /// `! ~ +`
    UnaryPlus,
    /// `{ |n| ... }`
    IterCurly,
    ConstantResolution,
    /// `foo.bar`
    Dot,
    /// `foo()`
    Call,
    /// `foo[1]`
    Ref,
}

impl Parser {
    /// Binding strength of `token` appearing after `left` (or as a prefix
    /// when `left` is `None`).
    pub(crate) fn get_precedence(&self, token: &Token, left: Option<&Node>) -> Precedence {
        match token.kind {
            TokenKind::Plus => {
                if left.is_some() {
                    Precedence::Sum
                } else {
                    Precedence::UnaryPlus
                }
            }
            TokenKind::Minus => {
                if left.is_some() {
                    Precedence::Sum
                } else {
                    Precedence::UnaryMinus
                }
            }
            TokenKind::Equal => Precedence::AssignmentLhs,
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
            | TokenKind::RightShiftEqual => Precedence::OpAssignment,
            TokenKind::BitwiseAnd => Precedence::BitwiseAnd,
            TokenKind::BitwiseOr | TokenKind::BitwiseXor => Precedence::BitwiseOr,
            // only multiple assignment consults the comma's precedence
            TokenKind::Comma => Precedence::Array,
            TokenKind::LeftShift | TokenKind::RightShift => Precedence::BitwiseShift,
            TokenKind::LParen => Precedence::Call,
            TokenKind::AndKeyword | TokenKind::OrKeyword => Precedence::Composition,
            TokenKind::ConstantResolution => Precedence::ConstantResolution,
            TokenKind::Dot | TokenKind::SafeNavigation => {
                if left.is_some_and(Node::is_numeric) {
                    Precedence::NumberDot
                } else {
                    Precedence::Dot
                }
            }
            TokenKind::EqualEqual
            | TokenKind::EqualEqualEqual
            | TokenKind::NotEqual
            | TokenKind::Match
            | TokenKind::NotMatch => Precedence::Equality,
            TokenKind::Exponent => Precedence::Exponent,
            TokenKind::IfKeyword
            | TokenKind::UnlessKeyword
            | TokenKind::WhileKeyword
            | TokenKind::UntilKeyword
            | TokenKind::RescueKeyword => Precedence::ExprModifier,
            TokenKind::DoKeyword => Precedence::IterBlock,
            TokenKind::LCurlyBrace => Precedence::IterCurly,
            TokenKind::Comparison
            | TokenKind::LessThan
            | TokenKind::LessThanOrEqual
            | TokenKind::GreaterThan
            | TokenKind::GreaterThanOrEqual => Precedence::LessGreater,
            TokenKind::And => Precedence::LogicalAnd,
            TokenKind::NotKeyword => Precedence::LogicalNot,
            TokenKind::Or => Precedence::LogicalOr,
            TokenKind::Divide | TokenKind::Modulus | TokenKind::Multiply => Precedence::Product,
            TokenKind::DotDot | TokenKind::DotDotDot => Precedence::Range,
            TokenKind::LBracket | TokenKind::LBracketRBracket => {
                if let Some(left) = left {
                    if self.treat_left_bracket_as_element_reference(left, token) {
                        return Precedence::Ref;
                    }
                }
                self.implicit_call_or_lowest(left, token)
            }
            TokenKind::TernaryQuestion => Precedence::TernaryQuestion,
            TokenKind::TernaryColon => Precedence::TernaryFalse,
            TokenKind::Not | TokenKind::Tilde => Precedence::UnaryPlus,
            _ => self.implicit_call_or_lowest(left, token),
        }
    }

    fn implicit_call_or_lowest(&self, left: Option<&Node>, token: &Token) -> Precedence {
        if left.is_some_and(|left| is_first_arg_of_call_without_parens(left, token)) {
            Precedence::Call
        } else {
            Precedence::Lowest
        }
    }

    /// Whether the infix handler for `token` should run while parsing at
    /// `current_precedence`.
    ///
    /// Plain neighbor comparison fails for exactly one construct: a `do`
    /// block after a paren-less call. Looking at precedences alone,
    ///
    /// ```text
    ///     bar + baz do ... end
    ///         ^ block would NOT attach here (correct)
    ///     foo bar + baz do ... end
    ///     ^ but here it must attach to foo, three frames out
    /// ```
    ///
    /// so when a `do` would lose the neighbor comparison, walk the whole
    /// precedence stack: if any enclosing frame is a paren-less call
    /// argument, let that call take the block; otherwise attach it to the
    /// nearest candidate now.
    pub(crate) fn higher_precedence(
        &self,
        token: &Token,
        left: &Node,
        current_precedence: Precedence,
    ) -> bool {
        let next_precedence = self.get_precedence(token, Some(left));

        if left.is_symbol_key() {
            // symbol keys belong to parse_hash / parse_call_hash_args;
            // return to them as fast as possible
            return false;
        }

        if next_precedence == Precedence::IterBlock && next_precedence <= current_precedence {
            if self
                .precedence_stack
                .iter()
                .any(|&precedence| precedence == Precedence::BareCallArg)
            {
                return false;
            }
            return true;
        }

        next_precedence > current_precedence
    }

    pub(crate) fn treat_left_bracket_as_element_reference(&self, left: &Node, token: &Token) -> bool {
        !token.whitespace_precedes
            || matches!(&left.kind, NodeKind::Identifier { is_lvar: true, .. })
    }
}

pub(crate) fn is_first_arg_of_call_without_parens(left: &Node, token: &Token) -> bool {
    left.is_callable() && token.can_be_first_arg_of_implicit_call()
}

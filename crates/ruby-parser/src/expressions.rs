//! Expression-level rules: identifiers, assignment in all its forms,
//! operators, calls (with and without parentheses), and blocks.

use std::sync::Arc;

use ruby_ast::{Node, NodeKind};
use ruby_token::{Token, TokenKind};

use crate::{add_to_locals, Locals, ParseResult, Parser, Precedence};

impl Parser {
    pub(crate) fn parse_identifier(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        let name = token.literal_string();
        let is_lvar = locals.contains(&*name);
        self.advance();
        Ok(Node::new(token, NodeKind::Identifier { name, is_lvar }))
    }

    pub(crate) fn parse_constant(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        Ok(Node::new(token, NodeKind::Constant))
    }

    pub(crate) fn parse_top_level_constant(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let name_token = self.current_token();
        match name_token.kind {
            TokenKind::BareName | TokenKind::Constant => {
                self.advance();
                let name = name_token.literal_string();
                Ok(Node::new(token, NodeKind::Colon3 { name }))
            }
            _ => Err(self.unexpected(&name_token, ":: identifier name")),
        }
    }

    pub(crate) fn parse_group(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        if self.current_token().is_rparen() {
            self.advance();
            return Ok(Node::new(token, NodeKind::NilSexp));
        }
        let mut exp = self.parse_expression(Precedence::Lowest, locals)?;
        if self.current_token().is_end_of_expression() {
            let mut nodes = vec![exp];
            while self.current_token().is_end_of_expression() && !self.current_token().is_eof() {
                self.next_expression()?;
                if self.current_token().is_rparen() {
                    break;
                }
                nodes.push(self.parse_expression(Precedence::Lowest, locals)?);
            }
            exp = Node::new(token, NodeKind::Block { nodes });
        }
        self.expect(TokenKind::RParen, "group closing paren")?;
        self.advance();
        Ok(exp)
    }

    pub(crate) fn parse_splat(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let value = self.parse_expression(Precedence::Splat, locals)?;
        Ok(Node::new(token, NodeKind::Splat { node: Some(Box::new(value)) }))
    }

    pub(crate) fn parse_keyword_splat(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let value = self.parse_expression(Precedence::Splat, locals)?;
        Ok(Node::new(token, NodeKind::KeywordSplat { node: Some(Box::new(value)) }))
    }

    pub(crate) fn parse_block_pass(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let value = self.parse_expression(Precedence::UnaryPlus, locals)?;
        Ok(Node::new(token, NodeKind::BlockPass { node: Box::new(value) }))
    }

    pub(crate) fn parse_not(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let precedence = self.get_precedence(&token, None);
        let expression = self.parse_expression(precedence, locals)?;
        Ok(Node::new(token, NodeKind::Not { expression: Box::new(expression) }))
    }

    pub(crate) fn parse_unary_operator(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let precedence = self.get_precedence(&token, None);
        let receiver = self.parse_expression(precedence, locals)?;
        if matches!(token.kind, TokenKind::Minus | TokenKind::Plus) && receiver.is_numeric() {
            if token.kind == TokenKind::Plus {
                return Ok(receiver);
            }
            let mut receiver = receiver;
            match &mut receiver.kind {
                NodeKind::Fixnum { number } => *number = -*number,
                NodeKind::Float { number } => *number = -*number,
                NodeKind::Rational { numerator } => *numerator = -*numerator,
                NodeKind::Bignum { number } => {
                    let negated = format!("-{number}");
                    *number = Arc::from(negated.as_str());
                }
                _ => {}
            }
            return Ok(receiver);
        }
        let op = match token.kind {
            TokenKind::Minus => "-@",
            TokenKind::Plus => "+@",
            _ => "~",
        };
        Ok(Node::new(
            token,
            NodeKind::UnaryOp {
                op: Arc::from(op),
                right: Box::new(receiver),
            },
        ))
    }

    // ----- assignment -----

    pub(crate) fn parse_assignment_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        self.parse_assignment_expression_inner(left, locals, true)
    }

    pub(crate) fn parse_assignment_expression_without_multiple_values(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        self.parse_assignment_expression_inner(left, locals, false)
    }

    fn parse_assignment_expression_inner(
        &mut self,
        left: Node,
        locals: &mut Locals,
        allow_multiple: bool,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        if matches!(left.kind, NodeKind::Splat { .. }) {
            return self.parse_multiple_assignment_expression(left, locals);
        }
        match &left.kind {
            NodeKind::Identifier { .. } => {
                add_to_locals(&left, locals);
                self.advance();
                let value = self.parse_assignment_expression_value(false, locals, allow_multiple)?;
                Ok(Node::new(
                    token,
                    NodeKind::Assignment {
                        identifier: Box::new(left),
                        value: Box::new(value),
                    },
                ))
            }
            NodeKind::Call { .. } | NodeKind::Colon2 { .. } | NodeKind::Colon3 { .. } => {
                self.advance();
                let value = self.parse_assignment_expression_value(false, locals, allow_multiple)?;
                Ok(Node::new(
                    token,
                    NodeKind::Assignment {
                        identifier: Box::new(left),
                        value: Box::new(value),
                    },
                ))
            }
            NodeKind::MultipleAssignment { .. } => {
                add_to_locals(&left, locals);
                self.advance();
                let value = self.parse_assignment_expression_value(true, locals, allow_multiple)?;
                Ok(Node::new(
                    token,
                    NodeKind::Assignment {
                        identifier: Box::new(left),
                        value: Box::new(value),
                    },
                ))
            }
            _ => Err(self.unexpected(&left.token, "left side of assignment")),
        }
    }

    fn parse_assignment_expression_value(
        &mut self,
        to_array: bool,
        locals: &mut Locals,
        allow_multiple: bool,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        let mut value = self.parse_expression(Precedence::AssignmentRhs, locals)?;
        let is_splat;

        if allow_multiple && self.current_token().kind == TokenKind::Comma {
            let mut nodes = vec![value];
            while self.current_token().kind == TokenKind::Comma {
                self.advance();
                nodes.push(self.parse_expression(Precedence::AssignmentRhs, locals)?);
            }
            value = Node::new(token.clone(), NodeKind::Array { nodes });
            is_splat = true;
        } else {
            is_splat = matches!(value.kind, NodeKind::Splat { .. });
        }

        if is_splat {
            if to_array {
                Ok(value)
            } else {
                Ok(Node::new(token, NodeKind::SplatValue { value: Box::new(value) }))
            }
        } else if to_array {
            Ok(Node::new(token, NodeKind::ToArray { value: Box::new(value) }))
        } else {
            Ok(value)
        }
    }

    pub(crate) fn parse_multiple_assignment_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        if !left.is_assignable() {
            return Err(self.unexpected_current("assignment ="));
        }
        let token = left.token.clone();
        let mut targets = vec![left];
        while self.current_token().is_comma() {
            self.advance();
            targets.push(self.parse_assignment_identifier(true, locals)?);
        }
        if !self.current_token().is_rparen() {
            self.expect(TokenKind::Equal, "assignment =")?;
        }
        Ok(Node::new(token, NodeKind::MultipleAssignment { targets }))
    }

    /// One destructuring target: identifier, constant path, splat, indexed
    /// or attribute reference, or a parenthesized nested target list.
    pub(crate) fn parse_assignment_identifier(
        &mut self,
        allow_splat: bool,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        let mut node = match token.kind {
            TokenKind::BareName
            | TokenKind::ClassVariable
            | TokenKind::Constant
            | TokenKind::GlobalVariable
            | TokenKind::InstanceVariable => self.parse_identifier(locals)?,
            TokenKind::ConstantResolution => self.parse_top_level_constant(locals)?,
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_assignment_identifier(true, locals)?;
                let masgn = self.parse_multiple_assignment_expression(inner, locals)?;
                if !self.current_token().is_rparen() {
                    return Err(self.unexpected_current("closing paren for multiple assignment"));
                }
                self.advance();
                masgn
            }
            TokenKind::Multiply => {
                if !allow_splat {
                    return Err(self.unexpected_current("assignment identifier"));
                }
                let splat_token = self.current_token();
                self.advance();
                if self.current_token().is_assignable() {
                    let id = self.parse_assignment_identifier(false, locals)?;
                    Node::new(splat_token, NodeKind::Splat { node: Some(Box::new(id)) })
                } else {
                    Node::new(splat_token, NodeKind::Splat { node: None })
                }
            }
            _ => return Err(self.unexpected_current("assignment identifier")),
        };
        loop {
            let token = self.current_token();
            match token.kind {
                TokenKind::ConstantResolution => {
                    node = self.parse_constant_resolution_expression(node, locals)?;
                }
                TokenKind::Dot => {
                    node = self.parse_send_expression(node, locals)?;
                }
                TokenKind::LBracket
                    if self.treat_left_bracket_as_element_reference(&node, &token) =>
                {
                    node = self.parse_ref_expression(node, locals)?;
                }
                _ => break,
            }
        }
        Ok(node)
    }

    // ----- op-assign -----

    pub(crate) fn parse_op_assign_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        if matches!(left.kind, NodeKind::Call { .. }) {
            return self.parse_op_attr_assign_expression(left, locals);
        }
        let mut left = left;
        match &mut left.kind {
            NodeKind::Identifier { is_lvar, .. } => *is_lvar = true,
            _ => return Err(self.unexpected(&left.token, "identifier")),
        }
        add_to_locals(&left, locals);
        let token = self.current_token();
        self.advance();
        match token.kind {
            TokenKind::AndEqual => {
                let value = self.parse_expression(Precedence::AssignmentRhs, locals)?;
                Ok(Node::new(
                    token,
                    NodeKind::OpAssignAnd {
                        name: Box::new(left),
                        value: Box::new(value),
                    },
                ))
            }
            TokenKind::OrEqual => {
                let value = self.parse_expression(Precedence::AssignmentRhs, locals)?;
                Ok(Node::new(
                    token,
                    NodeKind::OpAssignOr {
                        name: Box::new(left),
                        value: Box::new(value),
                    },
                ))
            }
            _ => {
                let op = chomped_op(&token);
                let value = self.parse_expression(Precedence::AssignmentRhs, locals)?;
                Ok(Node::new(
                    token,
                    NodeKind::OpAssign {
                        op,
                        name: Box::new(left),
                        value: Box::new(value),
                    },
                ))
            }
        }
    }

    fn parse_op_attr_assign_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let left_token = left.token.clone();
        let NodeKind::Call {
            receiver,
            message,
            args,
        } = left.kind
        else {
            return Err(self.unexpected(&left_token, "call"));
        };
        let token = self.current_token();
        self.advance();
        let value = self.parse_expression(Precedence::OpAssignment, locals)?;
        let op = chomped_op(&token);
        let message = format!("{message}=");
        Ok(Node::new(
            token,
            NodeKind::OpAssignAccessor {
                op,
                receiver,
                message: Arc::from(message.as_str()),
                args,
                value: Box::new(value),
            },
        ))
    }

    // ----- operators -----

    pub(crate) fn parse_infix_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        let precedence = self.get_precedence(&token, Some(&left));
        self.advance();
        let right = self.parse_expression(precedence, locals)?;
        let op: Arc<str> = Arc::from(token.kind.value().unwrap_or(""));
        Ok(Node::new(
            token,
            NodeKind::InfixOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
        ))
    }

    pub(crate) fn parse_logical_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        let (precedence, and) = match token.kind {
            TokenKind::And => (Precedence::LogicalAnd, true),
            TokenKind::AndKeyword => (Precedence::Composition, true),
            TokenKind::Or => (Precedence::LogicalOr, false),
            TokenKind::OrKeyword => (Precedence::Composition, false),
            _ => return Err(self.unexpected(&token, "logical operator")),
        };
        self.advance();
        let right = self.parse_expression(precedence, locals)?;
        Ok(regroup_logical(token, left, right, and))
    }

    pub(crate) fn parse_match_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let arg = self.parse_expression(Precedence::Equality, locals)?;
        if matches!(left.kind, NodeKind::Regexp { .. } | NodeKind::InterpolatedRegexp { .. }) {
            Ok(Node::new(
                token,
                NodeKind::Match {
                    regexp: Box::new(left),
                    arg: Box::new(arg),
                    regexp_on_left: true,
                },
            ))
        } else if matches!(arg.kind, NodeKind::Regexp { .. } | NodeKind::InterpolatedRegexp { .. }) {
            Ok(Node::new(
                token,
                NodeKind::Match {
                    regexp: Box::new(arg),
                    arg: Box::new(left),
                    regexp_on_left: false,
                },
            ))
        } else {
            Ok(Node::new(
                token,
                NodeKind::Call {
                    receiver: Box::new(left),
                    message: Arc::from("=~"),
                    args: vec![arg],
                },
            ))
        }
    }

    pub(crate) fn parse_not_match_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        let match_expression = self.parse_match_expression(left, locals)?;
        Ok(Node::new(
            token,
            NodeKind::NotMatch {
                expression: Box::new(match_expression),
            },
        ))
    }

    pub(crate) fn parse_ternary_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        self.expect(TokenKind::TernaryQuestion, "ternary question")?;
        self.advance();
        let true_expr = self.parse_expression(Precedence::TernaryTrue, locals)?;
        self.expect(TokenKind::TernaryColon, "ternary colon")?;
        self.advance();
        let false_expr = self.parse_expression(Precedence::TernaryFalse, locals)?;
        Ok(Node::new(
            token,
            NodeKind::If {
                condition: Box::new(left),
                true_expr: Box::new(true_expr),
                false_expr: Box::new(false_expr),
            },
        ))
    }

    pub(crate) fn parse_range_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        // an endless range has nothing parseable on the right; rewind the
        // failed attempt and substitute nil
        let saved_index = self.index;
        let saved_depth = self.precedence_stack.len();
        let right = match self.parse_expression(Precedence::Range, locals) {
            Ok(right) => right,
            Err(_) => {
                self.index = saved_index;
                self.precedence_stack.truncate(saved_depth);
                Node::new(token.clone(), NodeKind::Nil)
            }
        };
        Ok(Node::new(
            token.clone(),
            NodeKind::Range {
                first: Box::new(left),
                last: Box::new(right),
                exclude_end: token.kind == TokenKind::DotDotDot,
            },
        ))
    }

    pub(crate) fn parse_beginless_range(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let end_node = self.parse_expression(Precedence::Lowest, locals)?;
        Ok(Node::new(
            token.clone(),
            NodeKind::Range {
                first: Box::new(Node::new(token.clone(), NodeKind::Nil)),
                last: Box::new(end_node),
                exclude_end: token.kind == TokenKind::DotDotDot,
            },
        ))
    }

    // ----- calls -----

    /// Identifiers become calls when arguments arrive; nodes that already
    /// take args pass through.
    pub(crate) fn to_node_with_args(&self, node: Node) -> ParseResult<Node> {
        match node.kind {
            NodeKind::Identifier { name, .. } => {
                let token = node.token.clone();
                let nil = Node::new(token.clone(), NodeKind::Nil);
                Ok(Node::new(
                    token,
                    NodeKind::Call {
                        receiver: Box::new(nil),
                        message: name,
                        args: vec![],
                    },
                ))
            }
            NodeKind::Call { .. }
            | NodeKind::SafeCall { .. }
            | NodeKind::Super { .. }
            | NodeKind::Undef { .. }
            | NodeKind::Yield { .. } => Ok(node),
            _ => Err(self.unexpected_error(&self.current_token(), "left-hand-side is not callable")),
        }
    }

    fn push_arg(node: &mut Node, arg: Node) {
        match &mut node.kind {
            NodeKind::Call { args, .. }
            | NodeKind::SafeCall { args, .. }
            | NodeKind::Super { args, .. }
            | NodeKind::Undef { args }
            | NodeKind::Yield { args } => args.push(arg),
            _ => {}
        }
    }

    pub(crate) fn parse_call_expression_with_parens(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let mut call_node = self.to_node_with_args(left)?;
        self.advance();
        if !self.current_token().is_rparen() {
            self.parse_call_args(&mut call_node, locals, false)?;
        }
        self.expect(TokenKind::RParen, "call rparen")?;
        self.advance();
        Ok(call_node)
    }

    pub(crate) fn parse_call_expression_without_parens(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let mut call_node = self.to_node_with_args(left)?;
        match self.current_token().kind {
            TokenKind::Comma
            | TokenKind::Eof
            | TokenKind::Eol
            | TokenKind::RBracket
            | TokenKind::RCurlyBrace
            | TokenKind::RParen => {}
            _ => self.parse_call_args(&mut call_node, locals, true)?,
        }
        Ok(call_node)
    }

    pub(crate) fn parse_call_args(
        &mut self,
        node: &mut Node,
        locals: &mut Locals,
        bare: bool,
    ) -> ParseResult<()> {
        let precedence = if bare {
            Precedence::BareCallArg
        } else {
            Precedence::CallArg
        };
        let arg = self.parse_expression(precedence, locals)?;
        if self.current_token().is_hash_rocket() || arg.is_symbol_key() {
            let hash = self.parse_call_hash_args(locals, bare, arg)?;
            Self::push_arg(node, hash);
            return Ok(());
        }
        Self::push_arg(node, arg);
        while self.current_token().is_comma() {
            self.advance();
            if self.current_token().is_rparen() {
                // trailing comma with no additional arg
                break;
            }
            let arg = self.parse_expression(precedence, locals)?;
            if self.current_token().is_hash_rocket() || arg.is_symbol_key() {
                let hash = self.parse_call_hash_args(locals, bare, arg)?;
                Self::push_arg(node, hash);
                break;
            }
            Self::push_arg(node, arg);
        }
        Ok(())
    }

    fn parse_call_hash_args(
        &mut self,
        locals: &mut Locals,
        bare: bool,
        first_arg: Node,
    ) -> ParseResult<Node> {
        if bare {
            self.parse_hash_inner(locals, Precedence::BareCallArg, None, Some(first_arg), true)
        } else {
            self.parse_hash_inner(
                locals,
                Precedence::CallArg,
                Some(TokenKind::RParen),
                Some(first_arg),
                true,
            )
        }
    }

    pub(crate) fn parse_constant_resolution_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        self.advance();
        let name_token = self.current_token();
        match name_token.kind {
            TokenKind::BareName => {
                self.advance();
                let message = name_token.literal_string();
                Ok(Node::new(
                    name_token,
                    NodeKind::Call {
                        receiver: Box::new(left),
                        message,
                        args: vec![],
                    },
                ))
            }
            TokenKind::Constant => {
                self.advance();
                let name = name_token.literal_string();
                Ok(Node::new(
                    name_token,
                    NodeKind::Colon2 {
                        left: Box::new(left),
                        name,
                    },
                ))
            }
            TokenKind::LParen => {
                self.advance();
                let mut call_node = Node::new(
                    name_token,
                    NodeKind::Call {
                        receiver: Box::new(left),
                        message: Arc::from("call"),
                        args: vec![],
                    },
                );
                if !self.current_token().is_rparen() {
                    self.parse_call_args(&mut call_node, locals, false)?;
                }
                self.expect(TokenKind::RParen, "::() call right paren")?;
                self.advance();
                Ok(call_node)
            }
            _ => Err(self.unexpected(&name_token, ":: identifier name")),
        }
    }

    pub(crate) fn parse_send_expression(
        &mut self,
        left: Node,
        _locals: &mut Locals,
    ) -> ParseResult<Node> {
        let dot_token = self.current_token();
        self.advance();
        let name_token = self.current_token();
        let name: Arc<str> = match name_token.kind {
            TokenKind::BareName | TokenKind::Constant => {
                self.advance();
                name_token.literal_string()
            }
            _ => {
                if name_token.is_operator() || name_token.is_keyword() {
                    self.advance();
                    Arc::from(name_token.kind.value().unwrap_or(""))
                } else {
                    return Err(self.unexpected_current("send method name"));
                }
            }
        };
        Ok(Node::new(
            dot_token,
            NodeKind::Call {
                receiver: Box::new(left),
                message: name,
                args: vec![],
            },
        ))
    }

    pub(crate) fn parse_safe_send_expression(
        &mut self,
        left: Node,
        _locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        self.expect(TokenKind::BareName, "safe navigator method name")?;
        let name_token = self.current_token();
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::SafeCall {
                receiver: Box::new(left),
                message: name_token.literal_string(),
                args: vec![],
            },
        ))
    }

    pub(crate) fn parse_proc_call_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance(); // .
        self.advance(); // (
        let mut call_node = Node::new(
            token,
            NodeKind::Call {
                receiver: Box::new(left),
                message: Arc::from("call"),
                args: vec![],
            },
        );
        if !self.current_token().is_rparen() {
            self.parse_call_args(&mut call_node, locals, false)?;
        }
        self.expect(TokenKind::RParen, "proc call right paren")?;
        self.advance();
        Ok(call_node)
    }

    pub(crate) fn parse_ref_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let mut call_node = Node::new(
            token.clone(),
            NodeKind::Call {
                receiver: Box::new(left),
                message: Arc::from("[]"),
                args: vec![],
            },
        );
        if token.kind == TokenKind::LBracketRBracket {
            return Ok(call_node);
        }
        if self.current_token().kind != TokenKind::RBracket {
            self.parse_call_args(&mut call_node, locals, false)?;
        }
        self.expect(TokenKind::RBracket, "element reference right bracket")?;
        self.advance();
        Ok(call_node)
    }

    // ----- blocks -----

    pub(crate) fn parse_iter_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        let mut our_locals = locals.clone(); // inner bindings stay inner
        let curly_brace = token.kind == TokenKind::LCurlyBrace;
        let mut has_args = false;
        let mut args: Vec<Node> = Vec::new();
        if let NodeKind::StabbyProc {
            has_args: proc_has_args,
            args: proc_args,
        } = &left.kind
        {
            self.advance();
            has_args = *proc_has_args;
            args = proc_args.clone();
        } else if left.can_accept_a_block() {
            self.advance();
            if self.current_token().kind == TokenKind::Or {
                has_args = true;
                self.advance();
            } else if self.current_token().is_block_arg_delimiter() {
                has_args = true;
                self.advance();
                self.parse_iter_args(&mut args, &mut our_locals)?;
                self.expect(TokenKind::BitwiseOr, "end of block args")?;
                self.advance();
            }
        } else {
            return Err(self.unexpected(&left.token, "call to accept block"));
        }
        let end_kind = if curly_brace {
            TokenKind::RCurlyBrace
        } else {
            TokenKind::EndKeyword
        };
        let body = self.parse_body(&mut our_locals, Precedence::Lowest, end_kind, true)?;
        self.expect(end_kind, if curly_brace { "}" } else { "end" })?;
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::Iter {
                call: Box::new(left),
                has_args,
                args,
                body: Box::new(body),
            },
        ))
    }

    fn parse_iter_args(&mut self, args: &mut Vec<Node>, locals: &mut Locals) -> ParseResult<()> {
        args.push(self.parse_def_single_arg(locals)?);
        while self.current_token().is_comma() {
            self.advance();
            if self.current_token().is_block_arg_delimiter() {
                // trailing comma with no additional arg
                args.push(Node::new(self.current_token(), NodeKind::Nil));
                break;
            }
            if self.current_token().is_eol() {
                break;
            }
            args.push(self.parse_def_single_arg(locals)?);
        }
        // block-local variables after a semicolon: { |a; b| ... }
        if self.current_token().is_eol() {
            self.advance();
            loop {
                self.expect(TokenKind::BareName, "shadow arg name")?;
                let token = self.current_token();
                self.advance();
                let name = token.literal_string();
                locals.insert(name.clone());
                args.push(Node::new(token, NodeKind::ShadowArg { name }));
                if !self.current_token().is_comma() {
                    break;
                }
                self.advance();
            }
        }
        Ok(())
    }

    pub(crate) fn parse_stabby_proc(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let mut has_args = false;
        let mut args: Vec<Node> = Vec::new();
        if self.current_token().is_lparen() {
            has_args = true;
            self.advance();
            if self.current_token().is_rparen() {
                self.advance();
            } else {
                self.parse_def_args(&mut args, locals)?;
                self.expect(TokenKind::RParen, "proc args closing paren")?;
                self.advance();
            }
        } else if self.current_token().is_bare_name()
            || self.current_token().kind == TokenKind::Multiply
        {
            has_args = true;
            self.parse_def_args(&mut args, locals)?;
        }
        let current = self.current_token();
        if current.kind != TokenKind::DoKeyword && current.kind != TokenKind::LCurlyBrace {
            return Err(self.unexpected(&current, "block"));
        }
        Ok(Node::new(token, NodeKind::StabbyProc { has_args, args }))
    }

    pub(crate) fn parse_def_args(
        &mut self,
        args: &mut Vec<Node>,
        locals: &mut Locals,
    ) -> ParseResult<()> {
        args.push(self.parse_def_single_arg(locals)?);
        while self.current_token().is_comma() {
            self.advance();
            args.push(self.parse_def_single_arg(locals)?);
        }
        Ok(())
    }

    pub(crate) fn parse_def_single_arg(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        match token.kind {
            TokenKind::BareName => {
                let name = token.literal_string();
                self.advance();
                locals.insert(name.clone());
                let mut value = None;
                if self.current_token().kind == TokenKind::Equal {
                    self.advance();
                    value = Some(Box::new(self.parse_expression(Precedence::DefArg, locals)?));
                }
                Ok(Node::new(
                    token,
                    NodeKind::Arg {
                        name: Some(name),
                        block_arg: false,
                        splat: false,
                        kwsplat: false,
                        value,
                    },
                ))
            }
            TokenKind::LParen => {
                self.advance();
                let mut sub_args = Vec::new();
                self.parse_def_args(&mut sub_args, locals)?;
                self.expect(TokenKind::RParen, "nested args closing paren")?;
                self.advance();
                Ok(Node::new(token, NodeKind::MultipleAssignmentArg { nodes: sub_args }))
            }
            TokenKind::Multiply | TokenKind::Exponent => {
                let kwsplat = token.kind == TokenKind::Exponent;
                self.advance();
                let name = if self.current_token().is_bare_name() {
                    let name = self.current_token().literal_string();
                    self.advance();
                    locals.insert(name.clone());
                    Some(name)
                } else {
                    None
                };
                Ok(Node::new(
                    token,
                    NodeKind::Arg {
                        name,
                        block_arg: false,
                        splat: !kwsplat,
                        kwsplat,
                        value: None,
                    },
                ))
            }
            TokenKind::BitwiseAnd => {
                self.advance();
                self.expect(TokenKind::BareName, "block name")?;
                let name = self.current_token().literal_string();
                self.advance();
                locals.insert(name.clone());
                Ok(Node::new(
                    token,
                    NodeKind::Arg {
                        name: Some(name),
                        block_arg: true,
                        splat: false,
                        kwsplat: false,
                        value: None,
                    },
                ))
            }
            TokenKind::SymbolKey => {
                let name = token.literal_string();
                self.advance();
                let value = match self.current_token().kind {
                    TokenKind::Comma
                    | TokenKind::RParen
                    | TokenKind::Eol
                    | TokenKind::BitwiseOr => None,
                    _ => Some(Box::new(self.parse_expression(Precedence::DefArg, locals)?)),
                };
                locals.insert(name.clone());
                Ok(Node::new(token, NodeKind::KeywordArg { name, value }))
            }
            TokenKind::DotDotDot => {
                self.advance();
                locals.insert(Arc::from("..."));
                Ok(Node::new(token, NodeKind::ForwardArgs))
            }
            _ => Err(self.unexpected_current("argument")),
        }
    }
}

fn chomped_op(token: &Token) -> Arc<str> {
    let value = token.kind.value().unwrap_or("");
    Arc::from(value.trim_end_matches('='))
}

/// `((x and y) and z)` regroups to `(x and (y and z))`.
fn regroup_logical(token: Token, left: Node, right: Node, and: bool) -> Node {
    if and {
        if let NodeKind::LogicalAnd {
            left: inner_left,
            right: inner_right,
        } = left.kind
        {
            let inner = Node::new(
                token,
                NodeKind::LogicalAnd {
                    left: inner_right,
                    right: Box::new(right),
                },
            );
            return Node::new(
                left.token,
                NodeKind::LogicalAnd {
                    left: inner_left,
                    right: Box::new(inner),
                },
            );
        }
        Node::new(
            token,
            NodeKind::LogicalAnd {
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    } else {
        if let NodeKind::LogicalOr {
            left: inner_left,
            right: inner_right,
        } = left.kind
        {
            let inner = Node::new(
                token,
                NodeKind::LogicalOr {
                    left: inner_right,
                    right: Box::new(right),
                },
            );
            return Node::new(
                left.token,
                NodeKind::LogicalOr {
                    left: inner_left,
                    right: Box::new(inner),
                },
            );
        }
        Node::new(
            token,
            NodeKind::LogicalOr {
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }
}

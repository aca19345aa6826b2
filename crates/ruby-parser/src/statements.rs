//! Statement-shaped constructs: conditionals, loops, `case` (both `when`
//! and `in` forms), method/class/module definitions, exception handling,
//! `alias`/`undef`, and the argument-less control keywords.

use std::sync::Arc;

use ruby_ast::{Node, NodeKind};
use ruby_token::{Token, TokenKind};

use crate::{add_to_locals, Locals, ParseResult, Parser, Precedence, SyntaxError, SyntaxErrorKind};

impl Parser {
    // ----- conditionals -----

    pub(crate) fn parse_if(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest, locals)?;
        self.next_expression()?;
        let true_expr = self.parse_if_body(locals)?;
        if self.current_token().is_elsif_keyword() {
            let false_expr = self.parse_if(locals)?;
            return Ok(Node::new(
                token,
                NodeKind::If {
                    condition: Box::new(condition),
                    true_expr: Box::new(true_expr),
                    false_expr: Box::new(false_expr),
                },
            ));
        }
        let false_expr = if self.current_token().is_else_keyword() {
            self.advance();
            self.parse_if_body(locals)?
        } else {
            Node::new(self.current_token(), NodeKind::Nil)
        };
        self.expect(TokenKind::EndKeyword, "if end")?;
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::If {
                condition: Box::new(condition),
                true_expr: Box::new(true_expr),
                false_expr: Box::new(false_expr),
            },
        ))
    }

    pub(crate) fn parse_unless(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest, locals)?;
        self.next_expression()?;
        let false_expr = self.parse_if_body(locals)?;
        let true_expr = if self.current_token().is_else_keyword() {
            self.advance();
            self.parse_if_body(locals)?
        } else {
            Node::new(self.current_token(), NodeKind::Nil)
        };
        self.expect(TokenKind::EndKeyword, "unless end")?;
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::If {
                condition: Box::new(condition),
                true_expr: Box::new(true_expr),
                false_expr: Box::new(false_expr),
            },
        ))
    }

    fn parse_if_body(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let body_token = self.current_token();
        let mut nodes = Vec::new();
        self.validate_current_token()?;
        self.skip_newlines();
        while !self.current_token().is_eof()
            && !self.current_token().is_elsif_keyword()
            && !self.current_token().is_else_keyword()
            && !self.current_token().is_end_keyword()
        {
            let exp = self.parse_expression(Precedence::Lowest, locals)?;
            nodes.push(exp);
            self.validate_current_token()?;
            self.next_expression()?;
        }
        let current = self.current_token();
        if !current.is_elsif_keyword() && !current.is_else_keyword() && !current.is_end_keyword() {
            return Err(self.unexpected_current("if end"));
        }
        if nodes.len() == 1 {
            Ok(nodes.remove(0))
        } else {
            Ok(Node::new(body_token, NodeKind::Block { nodes }))
        }
    }

    pub(crate) fn parse_modifier_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        match token.kind {
            TokenKind::IfKeyword => {
                self.advance();
                let condition = self.parse_expression(Precedence::Lowest, locals)?;
                let nil = Node::new(token.clone(), NodeKind::Nil);
                Ok(Node::new(
                    token,
                    NodeKind::If {
                        condition: Box::new(condition),
                        true_expr: Box::new(left),
                        false_expr: Box::new(nil),
                    },
                ))
            }
            TokenKind::UnlessKeyword => {
                self.advance();
                let condition = self.parse_expression(Precedence::Lowest, locals)?;
                let nil = Node::new(token.clone(), NodeKind::Nil);
                Ok(Node::new(
                    token,
                    NodeKind::If {
                        condition: Box::new(condition),
                        true_expr: Box::new(nil),
                        false_expr: Box::new(left),
                    },
                ))
            }
            TokenKind::WhileKeyword | TokenKind::UntilKeyword => {
                self.advance();
                let condition = self.parse_expression(Precedence::Lowest, locals)?;
                // `begin ... end while cond` runs the body first
                let pre = !matches!(left.kind, NodeKind::Block { .. } | NodeKind::Begin { .. });
                let body = if matches!(left.kind, NodeKind::Block { .. }) {
                    left
                } else {
                    Node::new(token.clone(), NodeKind::Block { nodes: vec![left] })
                };
                let kind = if token.kind == TokenKind::UntilKeyword {
                    NodeKind::Until {
                        condition: Box::new(condition),
                        body: Box::new(body),
                        pre,
                    }
                } else {
                    NodeKind::While {
                        condition: Box::new(condition),
                        body: Box::new(body),
                        pre,
                    }
                };
                Ok(Node::new(token, kind))
            }
            _ => Err(self.unexpected(&token, "expression modifier")),
        }
    }

    // ----- loops -----

    pub(crate) fn parse_while(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest, locals)?;
        if self.current_token().kind == TokenKind::DoKeyword {
            self.advance();
        } else {
            self.next_expression()?;
        }
        let body = self.parse_body(locals, Precedence::Lowest, TokenKind::EndKeyword, false)?;
        self.expect(TokenKind::EndKeyword, "while end")?;
        self.advance();
        let kind = match token.kind {
            TokenKind::UntilKeyword => NodeKind::Until {
                condition: Box::new(condition),
                body: Box::new(body),
                pre: true,
            },
            _ => NodeKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
                pre: true,
            },
        };
        Ok(Node::new(token, kind))
    }

    pub(crate) fn parse_for(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let mut vars = self.parse_assignment_identifier(true, locals)?;
        if self.current_token().is_comma() {
            let first_token = vars.token.clone();
            let mut targets = vec![vars];
            while self.current_token().is_comma() {
                self.advance();
                targets.push(self.parse_assignment_identifier(true, locals)?);
            }
            vars = Node::new(first_token, NodeKind::MultipleAssignment { targets });
        }
        add_to_locals(&vars, locals);
        self.expect(TokenKind::InKeyword, "for in")?;
        self.advance();
        let expr = self.parse_expression(Precedence::BareCallArg, locals)?;
        if self.current_token().kind == TokenKind::DoKeyword {
            self.advance();
        } else {
            self.next_expression()?;
        }
        let body = self.parse_body(locals, Precedence::Lowest, TokenKind::EndKeyword, false)?;
        self.expect(TokenKind::EndKeyword, "for end")?;
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::For {
                expr: Box::new(expr),
                vars: Box::new(vars),
                body: Box::new(body),
            },
        ))
    }

    // ----- case -----

    pub(crate) fn parse_case(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let case_token = self.current_token();
        self.advance();
        let subject = if self.current_token().kind == TokenKind::WhenKeyword {
            Node::new(case_token.clone(), NodeKind::Nil)
        } else {
            let subject = self.parse_expression(Precedence::Case, locals)?;
            self.next_expression()?;
            subject
        };
        let mut arms = Vec::new();
        let mut else_body = None;
        while !self.current_token().is_end_keyword() {
            let token = self.current_token();
            match token.kind {
                TokenKind::WhenKeyword => {
                    self.advance();
                    let mut condition_nodes = Vec::new();
                    condition_nodes.push(self.parse_expression(Precedence::Array, locals)?);
                    while self.current_token().is_comma() {
                        self.advance();
                        condition_nodes.push(self.parse_expression(Precedence::Array, locals)?);
                    }
                    if self.current_token().kind == TokenKind::ThenKeyword {
                        self.advance();
                        self.skip_newlines();
                    } else {
                        self.next_expression()?;
                    }
                    let body = self.parse_case_when_body(locals)?;
                    let condition =
                        Node::new(token.clone(), NodeKind::Array { nodes: condition_nodes });
                    arms.push(Node::new(
                        token,
                        NodeKind::CaseWhen {
                            condition: Box::new(condition),
                            body: Box::new(body),
                        },
                    ));
                }
                TokenKind::InKeyword => {
                    self.advance();
                    let pattern = self.parse_case_in_patterns(locals)?;
                    if self.current_token().kind == TokenKind::ThenKeyword {
                        self.advance();
                        self.skip_newlines();
                    } else {
                        self.next_expression()?;
                    }
                    let body = self.parse_case_when_body(locals)?;
                    arms.push(Node::new(
                        token,
                        NodeKind::CaseIn {
                            pattern: Box::new(pattern),
                            body: Box::new(body),
                        },
                    ));
                }
                TokenKind::ElseKeyword => {
                    if arms.is_empty() {
                        return Err(self.unexpected_current("case 'when' or 'in'"));
                    }
                    self.advance();
                    self.skip_newlines();
                    let body =
                        self.parse_body(locals, Precedence::Lowest, TokenKind::EndKeyword, false)?;
                    else_body = Some(Box::new(body));
                    self.expect(TokenKind::EndKeyword, "case end")?;
                }
                _ => return Err(self.unexpected_current("case when keyword")),
            }
        }
        self.expect(TokenKind::EndKeyword, "case end")?;
        self.advance();
        Ok(Node::new(
            case_token,
            NodeKind::Case {
                subject: Box::new(subject),
                arms,
                else_body,
            },
        ))
    }

    fn parse_case_when_body(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let body_token = self.current_token();
        let mut nodes = Vec::new();
        self.validate_current_token()?;
        self.skip_newlines();
        while !self.current_token().is_eof()
            && !self.current_token().is_when_keyword()
            && self.current_token().kind != TokenKind::InKeyword
            && !self.current_token().is_else_keyword()
            && !self.current_token().is_end_keyword()
        {
            let exp = self.parse_expression(Precedence::Lowest, locals)?;
            nodes.push(exp);
            self.validate_current_token()?;
            self.next_expression()?;
        }
        let current = self.current_token();
        if !current.is_when_keyword()
            && current.kind != TokenKind::InKeyword
            && !current.is_else_keyword()
            && !current.is_end_keyword()
        {
            return Err(self.unexpected_current("case: when, else, or end"));
        }
        Ok(Node::new(body_token, NodeKind::Block { nodes }))
    }

    fn parse_case_in_patterns(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let mut patterns = vec![self.parse_case_in_pattern(locals)?];
        while self.current_token().kind == TokenKind::BitwiseOr {
            self.advance();
            patterns.push(self.parse_case_in_pattern(locals)?);
        }
        while self.current_token().is_comma() {
            // a bare comma-separated pattern list is one array pattern
            self.advance();
            let next_pattern = self.parse_case_in_pattern(locals)?;
            let last_pattern = patterns.pop().unwrap_or_else(|| next_pattern.clone());
            match last_pattern.kind {
                NodeKind::ArrayPattern { mut nodes } => {
                    nodes.push(next_pattern);
                    patterns.push(Node::new(last_pattern.token, NodeKind::ArrayPattern { nodes }));
                }
                _ => {
                    let token = last_pattern.token.clone();
                    patterns.push(Node::new(
                        token,
                        NodeKind::ArrayPattern {
                            nodes: vec![last_pattern, next_pattern],
                        },
                    ));
                }
            }
        }
        let mut iter = patterns.into_iter();
        let Some(first) = iter.next() else {
            return Err(self.unexpected_current("case in pattern"));
        };
        let mut pattern = first;
        for next in iter {
            let token = pattern.token.clone();
            pattern = Node::new(
                token,
                NodeKind::LogicalOr {
                    left: Box::new(pattern),
                    right: Box::new(next),
                },
            );
        }
        Ok(pattern)
    }

    fn parse_case_in_pattern(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        let mut node = match token.kind {
            TokenKind::BareName => {
                self.advance();
                let name = token.literal_string();
                locals.insert(name.clone());
                Node::new(token, NodeKind::Identifier { name, is_lvar: true })
            }
            TokenKind::BitwiseXor => {
                // pinned variable
                self.advance();
                self.expect(TokenKind::BareName, "pinned variable name")?;
                let name_token = self.current_token();
                let name = name_token.literal_string();
                let identifier = Node::new(name_token, NodeKind::Identifier { name, is_lvar: true });
                self.advance();
                Node::new(token, NodeKind::Pin { identifier: Box::new(identifier) })
            }
            TokenKind::Constant => self.parse_constant(locals)?,
            TokenKind::LBracketRBracket => {
                self.advance();
                Node::new(token, NodeKind::ArrayPattern { nodes: vec![] })
            }
            TokenKind::LBracket => {
                self.advance();
                let mut nodes = Vec::new();
                if self.current_token().kind != TokenKind::RBracket {
                    nodes.push(self.parse_case_in_element(locals)?);
                    while self.current_token().is_comma() {
                        self.advance();
                        nodes.push(self.parse_case_in_element(locals)?);
                    }
                }
                self.expect(TokenKind::RBracket, "array pattern closing bracket")?;
                self.advance();
                Node::new(token, NodeKind::ArrayPattern { nodes })
            }
            TokenKind::LCurlyBrace => {
                self.advance();
                let mut nodes = Vec::new();
                if self.current_token().kind != TokenKind::RCurlyBrace {
                    self.parse_hash_pattern_entry(&mut nodes, locals)?;
                    while self.current_token().is_comma() {
                        self.advance();
                        self.parse_hash_pattern_entry(&mut nodes, locals)?;
                    }
                }
                self.expect(TokenKind::RCurlyBrace, "hash pattern closing brace")?;
                self.advance();
                Node::new(token, NodeKind::HashPattern { nodes })
            }
            TokenKind::Bignum | TokenKind::Fixnum | TokenKind::Float | TokenKind::Rational => {
                self.parse_lit(locals)?
            }
            TokenKind::Multiply => {
                // a bare rest pattern opens its own array pattern
                let splat = self.parse_case_in_splat(locals)?;
                Node::new(token, NodeKind::ArrayPattern { nodes: vec![splat] })
            }
            TokenKind::String => self.parse_string(locals)?,
            TokenKind::Symbol => self.parse_symbol(locals)?,
            _ => return Err(self.unexpected_current("case in pattern")),
        };
        if self.current_token().is_hash_rocket() {
            // `pattern => name` binds the matched value
            self.advance();
            self.expect(TokenKind::BareName, "pattern name")?;
            let name_token = self.current_token();
            self.advance();
            let name = name_token.literal_string();
            locals.insert(name.clone());
            let identifier = Node::new(
                name_token.clone(),
                NodeKind::Identifier { name, is_lvar: true },
            );
            node = Node::new(
                name_token,
                NodeKind::Assignment {
                    identifier: Box::new(identifier),
                    value: Box::new(node),
                },
            );
        }
        Ok(node)
    }

    /// An element of a bracketed array pattern; a `*rest` stays flat inside
    /// the enclosing pattern.
    fn parse_case_in_element(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        if self.current_token().kind == TokenKind::Multiply {
            self.parse_case_in_splat(locals)
        } else {
            self.parse_case_in_pattern(locals)
        }
    }

    /// `*rest` in a pattern: an identifier spelled with its star.
    fn parse_case_in_splat(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let splat_token = self.current_token();
        self.advance();
        let (name_token, splat_name): (Token, Arc<str>) = match self.current_token().kind {
            TokenKind::BareName | TokenKind::Constant => {
                let name_token = self.current_token();
                let name = name_token.literal_string();
                let spelled = format!("*{name}");
                locals.insert(name);
                self.advance();
                (name_token, Arc::from(spelled.as_str()))
            }
            _ => (splat_token, Arc::from("*")),
        };
        Ok(Node::new(
            name_token,
            NodeKind::Identifier {
                name: splat_name,
                is_lvar: true,
            },
        ))
    }

    /// One `key:`/`key: pattern`/`**rest` entry of a hash pattern.
    fn parse_hash_pattern_entry(
        &mut self,
        nodes: &mut Vec<Node>,
        locals: &mut Locals,
    ) -> ParseResult<()> {
        let token = self.current_token();
        if token.kind == TokenKind::Exponent {
            self.advance();
            let name = match self.current_token().kind {
                TokenKind::BareName => {
                    let name = self.current_token().literal_string();
                    locals.insert(name.clone());
                    self.advance();
                    Some(name)
                }
                TokenKind::NilKeyword => {
                    self.advance();
                    Some(Arc::from("nil"))
                }
                _ => None,
            };
            nodes.push(Node::new(token, NodeKind::KeywordRestPattern { name }));
            return Ok(());
        }
        self.expect(TokenKind::SymbolKey, "hash pattern symbol key")?;
        let key_token = self.current_token();
        self.advance();
        let name = key_token.literal_string();
        nodes.push(Node::new(key_token.clone(), NodeKind::Symbol { name: name.clone() }));
        match self.current_token().kind {
            TokenKind::Comma | TokenKind::RCurlyBrace => {
                // key-only entry binds the key's name
                locals.insert(name);
                nodes.push(Node::new(key_token, NodeKind::Nil));
            }
            _ => nodes.push(self.parse_case_in_pattern(locals)?),
        }
        Ok(())
    }

    // ----- definitions -----

    fn parse_class_or_module_name(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let name_token = if self.current_token().kind == TokenKind::ConstantResolution {
            self.peek_token()
        } else {
            self.current_token()
        };
        if name_token.kind != TokenKind::Constant {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken,
                "class/module name must be CONSTANT",
            ));
        }
        self.parse_expression(Precedence::LessGreater, locals)
    }

    pub(crate) fn parse_class(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        if self.peek_token().kind == TokenKind::LeftShift {
            return self.parse_sclass(locals);
        }
        self.advance();
        let mut our_locals = Locals::default();
        let name = self.parse_class_or_module_name(&mut our_locals)?;
        let superclass = if self.current_token().kind == TokenKind::LessThan {
            self.advance();
            self.parse_expression(Precedence::Lowest, &mut our_locals)?
        } else {
            Node::new(token.clone(), NodeKind::Nil)
        };
        let body =
            self.parse_body(&mut our_locals, Precedence::Lowest, TokenKind::EndKeyword, true)?;
        self.expect(TokenKind::EndKeyword, "class end")?;
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::Class {
                name: Box::new(name),
                superclass: Box::new(superclass),
                body: Box::new(body),
            },
        ))
    }

    fn parse_sclass(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance(); // class
        self.advance(); // <<
        let klass = self.parse_expression(Precedence::BareCallArg, locals)?;
        let body = self.parse_body(locals, Precedence::Lowest, TokenKind::EndKeyword, false)?;
        self.expect(TokenKind::EndKeyword, "sclass end")?;
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::Sclass {
                klass: Box::new(klass),
                body: Box::new(body),
            },
        ))
    }

    pub(crate) fn parse_module(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let mut our_locals = Locals::default();
        let name = self.parse_class_or_module_name(&mut our_locals)?;
        let body =
            self.parse_body(&mut our_locals, Precedence::Lowest, TokenKind::EndKeyword, true)?;
        self.expect(TokenKind::EndKeyword, "module end")?;
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::Module {
                name: Box::new(name),
                body: Box::new(body),
            },
        ))
    }

    pub(crate) fn parse_def(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let def_token = self.current_token();
        self.advance();
        let mut our_locals = Locals::default();
        let mut self_node = None;
        let token = self.current_token();
        let mut name = match token.kind {
            TokenKind::BareName => {
                if self.peek_token().kind == TokenKind::Dot {
                    self_node = Some(Box::new(self.parse_identifier(locals)?));
                    self.advance(); // dot
                }
                self.parse_method_name()?
            }
            TokenKind::Constant => {
                if self.peek_token().kind == TokenKind::Dot {
                    self_node = Some(Box::new(self.parse_constant(locals)?));
                    self.advance(); // dot
                }
                self.parse_method_name()?
            }
            TokenKind::SelfKeyword => {
                if self.peek_token().kind == TokenKind::Dot {
                    self_node = Some(Box::new(Node::new(token, NodeKind::Self_)));
                    self.advance(); // self
                    self.advance(); // dot
                }
                self.parse_method_name()?
            }
            _ => {
                if token.is_operator() || token.is_keyword() {
                    self.parse_method_name()?
                } else {
                    let receiver = self.parse_expression(Precedence::Dot, locals)?;
                    self_node = Some(Box::new(receiver));
                    self.expect(TokenKind::Dot, "dot followed by method name")?;
                    self.advance();
                    self.parse_method_name()?
                }
            }
        };
        if self.current_token().kind == TokenKind::Equal && !self.current_token().whitespace_precedes
        {
            self.advance();
            let appended = format!("{name}=");
            name = appended;
        }
        let mut args = Vec::new();
        if self.current_token().is_lparen() {
            self.advance();
            if self.current_token().is_rparen() {
                self.advance();
            } else {
                self.parse_def_args(&mut args, &mut our_locals)?;
                self.expect(TokenKind::RParen, "args closing paren")?;
                self.advance();
            }
        } else if self.current_token().is_bare_name()
            || self.current_token().is_splat()
            || self.current_token().kind == TokenKind::SymbolKey
        {
            self.parse_def_args(&mut args, &mut our_locals)?;
        }
        let body = self.parse_def_body(&mut our_locals)?;
        self.expect(TokenKind::EndKeyword, "def end")?;
        self.advance();
        Ok(Node::new(
            def_token,
            NodeKind::Def {
                self_node,
                name: Arc::from(name.as_str()),
                args,
                body: Box::new(body),
            },
        ))
    }

    fn parse_method_name(&mut self) -> ParseResult<String> {
        let token = self.current_token();
        let name = match token.kind {
            TokenKind::BareName | TokenKind::Constant => token.literal_or_blank().to_string(),
            _ => {
                if token.is_operator() || token.is_keyword() {
                    token.kind.value().unwrap_or("").to_string()
                } else {
                    return Err(self.unexpected_current("method name"));
                }
            }
        };
        self.advance();
        Ok(name)
    }

    // ----- begin/rescue -----

    pub(crate) fn parse_begin(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        self.next_expression()?;
        let begin_ending = [
            TokenKind::RescueKeyword,
            TokenKind::ElseKeyword,
            TokenKind::EnsureKeyword,
            TokenKind::EndKeyword,
        ];
        let body = self.parse_body_until(
            locals,
            Precedence::Lowest,
            &begin_ending,
            "case: rescue, else, ensure, or end",
        )?;
        let begin_node = self.parse_rest_of_begin(token.clone(), body, locals)?;

        // a begin/end with nothing else is just a block
        if let NodeKind::Begin {
            body,
            rescue_nodes,
            else_body,
            ensure_body,
        } = &begin_node.kind
        {
            if rescue_nodes.is_empty() && else_body.is_none() && ensure_body.is_none() {
                let nodes = body.block_nodes().to_vec();
                return Ok(Node::new(token, NodeKind::Block { nodes }));
            }
        }
        Ok(begin_node)
    }

    /// Everything from an optional `rescue` through the closing `end`,
    /// wrapping `body` into a `Begin`.
    pub(crate) fn parse_rest_of_begin(
        &mut self,
        token: Token,
        body: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let rescue_ending = [
            TokenKind::RescueKeyword,
            TokenKind::ElseKeyword,
            TokenKind::EnsureKeyword,
            TokenKind::EndKeyword,
        ];
        let else_ending = [TokenKind::EnsureKeyword, TokenKind::EndKeyword];
        let mut rescue_nodes = Vec::new();
        let mut else_body = None;
        let mut ensure_body = None;
        while !self.current_token().is_eof() && !self.current_token().is_end_keyword() {
            match self.current_token().kind {
                TokenKind::RescueKeyword => {
                    let rescue_token = self.current_token();
                    self.advance();
                    let mut exceptions = Vec::new();
                    if !self.current_token().is_eol() && !self.current_token().is_hash_rocket() {
                        exceptions.push(self.parse_expression(Precedence::BareCallArg, locals)?);
                        while self.current_token().is_comma() {
                            self.advance();
                            exceptions
                                .push(self.parse_expression(Precedence::BareCallArg, locals)?);
                        }
                    }
                    let mut name = None;
                    if self.current_token().is_hash_rocket() {
                        self.advance();
                        self.expect(TokenKind::BareName, "exception name")?;
                        let name_token = self.current_token();
                        self.advance();
                        let spelled = name_token.literal_string();
                        locals.insert(spelled.clone());
                        name = Some(Box::new(Node::new(
                            name_token,
                            NodeKind::Identifier {
                                name: spelled,
                                is_lvar: true,
                            },
                        )));
                    }
                    self.next_expression()?;
                    let rescue_body = self.parse_body_until(
                        locals,
                        Precedence::Lowest,
                        &rescue_ending,
                        "case: rescue, else, ensure, or end",
                    )?;
                    rescue_nodes.push(Node::new(
                        rescue_token,
                        NodeKind::BeginRescue {
                            exceptions,
                            name,
                            body: Box::new(rescue_body),
                        },
                    ));
                }
                TokenKind::ElseKeyword => {
                    self.advance();
                    self.next_expression()?;
                    let body = self.parse_body_until(
                        locals,
                        Precedence::Lowest,
                        &else_ending,
                        "case: ensure or end",
                    )?;
                    else_body = Some(Box::new(body));
                }
                TokenKind::EnsureKeyword => {
                    self.advance();
                    self.next_expression()?;
                    let body =
                        self.parse_body(locals, Precedence::Lowest, TokenKind::EndKeyword, false)?;
                    ensure_body = Some(Box::new(body));
                }
                _ => return Err(self.unexpected_current("begin end")),
            }
        }
        self.expect(TokenKind::EndKeyword, "begin/rescue/ensure end")?;
        self.advance();
        Ok(Node::new(
            token,
            NodeKind::Begin {
                body: Box::new(body),
                rescue_nodes,
                else_body,
                ensure_body,
            },
        ))
    }

    /// Trailing-`rescue` modifier: `expr rescue fallback`.
    pub(crate) fn parse_rescue_expression(
        &mut self,
        left: Node,
        locals: &mut Locals,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let value = self.parse_expression(Precedence::Lowest, locals)?;
        let body = Node::new(left.token.clone(), NodeKind::Block { nodes: vec![left] });
        let rescue_body = Node::new(value.token.clone(), NodeKind::Block { nodes: vec![value] });
        let rescue_node = Node::new(
            token.clone(),
            NodeKind::BeginRescue {
                exceptions: vec![],
                name: None,
                body: Box::new(rescue_body),
            },
        );
        Ok(Node::new(
            token,
            NodeKind::Begin {
                body: Box::new(body),
                rescue_nodes: vec![rescue_node],
                else_body: None,
                ensure_body: None,
            },
        ))
    }

    // ----- control keywords -----

    pub(crate) fn parse_break(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let arg = self.parse_control_arg(&token, locals)?;
        Ok(Node::new(token, NodeKind::Break { arg }))
    }

    pub(crate) fn parse_next(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let arg = self.parse_control_arg(&token, locals)?;
        Ok(Node::new(token, NodeKind::Next { arg }))
    }

    /// Optional argument of `break`/`next`: parenthesized, bare, or a bare
    /// comma list (which becomes an array).
    fn parse_control_arg(
        &mut self,
        token: &Token,
        locals: &mut Locals,
    ) -> ParseResult<Option<Box<Node>>> {
        if self.current_token().is_lparen() {
            self.advance();
            if self.current_token().is_rparen() {
                self.advance();
                return Ok(Some(Box::new(Node::new(token.clone(), NodeKind::NilSexp))));
            }
            let arg = self.parse_expression(Precedence::BareCallArg, locals)?;
            self.expect(TokenKind::RParen, "closing paren")?;
            self.advance();
            return Ok(Some(Box::new(arg)));
        }
        if self.current_token().can_be_first_arg_of_implicit_call() {
            let mut value = self.parse_expression(Precedence::BareCallArg, locals)?;
            if self.current_token().is_comma() {
                let mut nodes = vec![value];
                while self.current_token().is_comma() {
                    self.advance();
                    nodes.push(self.parse_expression(Precedence::BareCallArg, locals)?);
                }
                value = Node::new(token.clone(), NodeKind::Array { nodes });
            }
            return Ok(Some(Box::new(value)));
        }
        Ok(None)
    }

    pub(crate) fn parse_return(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let mut value = if self.current_token().is_end_of_expression() {
            Node::new(token.clone(), NodeKind::Nil)
        } else {
            self.parse_expression(Precedence::BareCallArg, locals)?
        };
        if self.current_token().is_comma() {
            let array_token = self.current_token();
            let mut nodes = vec![value];
            while self.current_token().is_comma() {
                self.advance();
                nodes.push(self.parse_expression(Precedence::BareCallArg, locals)?);
            }
            value = Node::new(array_token, NodeKind::Array { nodes });
        }
        Ok(Node::new(token, NodeKind::Return { value: Box::new(value) }))
    }

    pub(crate) fn parse_redo(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        Ok(Node::new(token, NodeKind::Redo))
    }

    pub(crate) fn parse_retry(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        Ok(Node::new(token, NodeKind::Retry))
    }

    pub(crate) fn parse_yield(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        Ok(Node::new(token, NodeKind::Yield { args: vec![] }))
    }

    pub(crate) fn parse_super(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let parens = self.current_token().is_lparen();
        Ok(Node::new(token, NodeKind::Super { parens, args: vec![] }))
    }

    pub(crate) fn parse_defined(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let arg = self.parse_expression(Precedence::BareCallArg, locals)?;
        Ok(Node::new(token, NodeKind::Defined { arg: Box::new(arg) }))
    }

    /// `BEGIN { }` / `END { }`; the block attaches like any other iter.
    pub(crate) fn parse_statement_keyword(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let kind = match token.kind {
            TokenKind::BEGINKeyword => NodeKind::BeginBlock,
            _ => NodeKind::EndBlock,
        };
        Ok(Node::new(token, kind))
    }

    // ----- alias / undef -----

    pub(crate) fn parse_alias(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let new_name = self.parse_alias_arg(locals, "alias new name (first argument)", false)?;
        let existing_name =
            self.parse_alias_arg(locals, "alias existing name (second argument)", true)?;
        Ok(Node::new(
            token,
            NodeKind::Alias {
                new_name: Box::new(new_name),
                existing_name: Box::new(existing_name),
            },
        ))
    }

    fn parse_alias_arg(
        &mut self,
        locals: &mut Locals,
        expected_message: &str,
        reinsert_collapsed_newline: bool,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        match token.kind {
            TokenKind::BareName => {
                self.advance();
                let name = token.literal_string();
                Ok(Node::new(token, NodeKind::Symbol { name }))
            }
            TokenKind::Symbol => self.parse_symbol(locals),
            TokenKind::InterpolatedSymbolBegin => self.parse_interpolated_symbol(locals),
            _ => {
                if token.is_operator() || token.is_keyword() {
                    self.advance();
                    if token.can_precede_collapsible_newline() && reinsert_collapsed_newline {
                        // Operators at the end of a line collapse the
                        // newline:
                        //
                        //     foo <<
                        //       bar
                        //
                        // but in `alias foo <<` the newline was real, so put
                        // it back.
                        self.tokens.insert(
                            self.index,
                            Token::new(TokenKind::Eol, token.file.clone(), token.line, token.column),
                        );
                    }
                    let name: Arc<str> = Arc::from(token.kind.value().unwrap_or(""));
                    Ok(Node::new(token, NodeKind::Symbol { name }))
                } else {
                    Err(self.unexpected_current(expected_message))
                }
            }
        }
    }

    pub(crate) fn parse_undef(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let undef_token = self.current_token();
        self.advance();
        let first = self.parse_undef_arg(locals)?;
        let first_undef = Node::new(undef_token.clone(), NodeKind::Undef { args: vec![first] });
        if !self.current_token().is_comma() {
            return Ok(first_undef);
        }
        // `undef a, b` becomes one undef per name
        let mut nodes = vec![first_undef];
        while self.current_token().is_comma() {
            self.advance();
            let arg = self.parse_undef_arg(locals)?;
            nodes.push(Node::new(undef_token.clone(), NodeKind::Undef { args: vec![arg] }));
        }
        Ok(Node::new(undef_token, NodeKind::Block { nodes }))
    }

    fn parse_undef_arg(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        match token.kind {
            TokenKind::BareName | TokenKind::Constant => {
                self.advance();
                let name = token.literal_string();
                Ok(Node::new(token, NodeKind::Symbol { name }))
            }
            TokenKind::Symbol => self.parse_symbol(locals),
            TokenKind::InterpolatedSymbolBegin => self.parse_interpolated_symbol(locals),
            _ => Err(self.unexpected_current("method name for undef")),
        }
    }
}

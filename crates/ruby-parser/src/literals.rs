//! Literal parsing: numbers, strings and their interpolated forms, symbols,
//! arrays, hashes, and word arrays.

use std::sync::Arc;

use ruby_ast::{Node, NodeKind};
use ruby_token::{Token, TokenKind};

use crate::{Locals, ParseResult, Parser, Precedence, SyntaxError};

impl Parser {
    pub(crate) fn parse_lit(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        let kind = match token.kind {
            TokenKind::Bignum => NodeKind::Bignum {
                number: token.literal_string(),
            },
            TokenKind::Fixnum => NodeKind::Fixnum {
                number: token.fixnum.unwrap_or_default(),
            },
            TokenKind::Float => NodeKind::Float {
                number: token.float.unwrap_or_default(),
            },
            TokenKind::Rational => NodeKind::Rational {
                numerator: token.fixnum.unwrap_or_default(),
            },
            _ => return Err(self.unexpected(&token, "literal")),
        };
        self.advance();
        Ok(Node::new(token, kind))
    }

    pub(crate) fn parse_bool(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        let kind = match token.kind {
            TokenKind::TrueKeyword => NodeKind::True,
            TokenKind::FalseKeyword => NodeKind::False,
            _ => return Err(self.unexpected(&token, "true or false")),
        };
        self.advance();
        Ok(Node::new(token, kind))
    }

    pub(crate) fn parse_nil(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        Ok(Node::new(token, NodeKind::NilSexp))
    }

    pub(crate) fn parse_self(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        Ok(Node::new(token, NodeKind::Self_))
    }

    pub(crate) fn parse_encoding(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        Ok(Node::new(token, NodeKind::Encoding))
    }

    pub(crate) fn parse_file_constant(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let file = token.file.clone();
        Ok(Node::new(token, NodeKind::String { string: file }))
    }

    pub(crate) fn parse_line_number(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let line = token.line as i64 + 1;
        Ok(Node::new(token, NodeKind::Fixnum { number: line }))
    }

    pub(crate) fn parse_back_ref(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let choice = token.literal_or_blank().chars().next().unwrap_or('&');
        Ok(Node::new(token, NodeKind::BackRef { choice }))
    }

    pub(crate) fn parse_nth_ref(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let num = token.fixnum.unwrap_or_default();
        Ok(Node::new(token, NodeKind::NthRef { num }))
    }

    pub(crate) fn parse_symbol(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let name = token.literal_string();
        Ok(Node::new(token, NodeKind::Symbol { name }))
    }

    pub(crate) fn parse_symbol_key(&mut self, _locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let name = token.literal_string();
        Ok(Node::new(token, NodeKind::SymbolKey { name }))
    }

    // ----- strings -----

    pub(crate) fn parse_string(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let string_token = self.current_token();
        let string = string_token.literal_string();
        self.advance();
        let string = Node::new(string_token, NodeKind::String { string });
        self.finish_string(string, locals)
    }

    /// Merge adjacent string literals and recognize the `"key":` hash-key
    /// form. Inside a word array neither applies.
    fn finish_string(&mut self, string: Node, locals: &mut Locals) -> ParseResult<Node> {
        let in_word_array = self.precedence_stack.last() == Some(&Precedence::WordArray);
        let mut strings_were_appended = false;
        let string = if in_word_array {
            string
        } else {
            self.concat_adjacent_strings(string, locals, &mut strings_were_appended)?
        };

        let colon = self.current_token();
        if !strings_were_appended
            && colon.kind == TokenKind::TernaryColon
            && !colon.whitespace_precedes
        {
            self.advance();
            return Ok(convert_string_to_symbol_key(string));
        }

        Ok(string)
    }

    fn concat_adjacent_strings(
        &mut self,
        mut string: Node,
        locals: &mut Locals,
        strings_were_appended: &mut bool,
    ) -> ParseResult<Node> {
        loop {
            let token = self.current_token();
            match token.kind {
                TokenKind::String => {
                    let next_string = self.parse_string(locals)?;
                    string = append_string_nodes(string, next_string);
                }
                TokenKind::InterpolatedStringBegin => {
                    let next_string = self.parse_interpolated_string(locals)?;
                    string = append_string_nodes(string, next_string);
                }
                _ => break,
            }
            *strings_were_appended = true;
        }
        Ok(string)
    }

    // ----- interpolated literals -----

    pub(crate) fn parse_interpolated_string(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        let string = if self.current_token().kind == TokenKind::InterpolatedStringEnd {
            self.advance();
            Node::new(token, NodeKind::String { string: Arc::from("") })
        } else if self.current_token().kind == TokenKind::String
            && self.peek_token().kind == TokenKind::InterpolatedStringEnd
        {
            let string = self.current_token().literal_string();
            self.advance();
            self.advance();
            Node::new(token, NodeKind::String { string })
        } else {
            let nodes =
                self.parse_interpolated_body(locals, TokenKind::InterpolatedStringEnd, &token)?;
            self.advance();
            Node::new(token, NodeKind::InterpolatedString { nodes })
        };
        self.finish_string(string, locals)
    }

    pub(crate) fn parse_interpolated_symbol(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        if self.current_token().kind == TokenKind::InterpolatedSymbolEnd {
            self.advance();
            Ok(Node::new(token, NodeKind::Symbol { name: Arc::from("") }))
        } else if self.current_token().kind == TokenKind::String
            && self.peek_token().kind == TokenKind::InterpolatedSymbolEnd
        {
            let name = self.current_token().literal_string();
            self.advance();
            self.advance();
            Ok(Node::new(token, NodeKind::Symbol { name }))
        } else {
            let nodes =
                self.parse_interpolated_body(locals, TokenKind::InterpolatedSymbolEnd, &token)?;
            self.advance();
            Ok(Node::new(token, NodeKind::InterpolatedSymbol { nodes }))
        }
    }

    pub(crate) fn parse_interpolated_shell(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        if self.current_token().kind == TokenKind::InterpolatedShellEnd {
            self.advance();
            Ok(Node::new(token, NodeKind::Shell { string: Arc::from("") }))
        } else if self.current_token().kind == TokenKind::String
            && self.peek_token().kind == TokenKind::InterpolatedShellEnd
        {
            let string = self.current_token().literal_string();
            self.advance();
            self.advance();
            Ok(Node::new(token, NodeKind::Shell { string }))
        } else {
            let nodes =
                self.parse_interpolated_body(locals, TokenKind::InterpolatedShellEnd, &token)?;
            self.advance();
            Ok(Node::new(token, NodeKind::InterpolatedShell { nodes }))
        }
    }

    pub(crate) fn parse_interpolated_regexp(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        self.advance();
        if self.current_token().kind == TokenKind::InterpolatedRegexpEnd {
            let options = self.take_regexp_options();
            self.advance();
            Ok(Node::new(
                token,
                NodeKind::Regexp {
                    pattern: Arc::from(""),
                    options,
                },
            ))
        } else if self.current_token().kind == TokenKind::String
            && self.peek_token().kind == TokenKind::InterpolatedRegexpEnd
        {
            let pattern = self.current_token().literal_string();
            self.advance();
            let options = self.take_regexp_options();
            self.advance();
            Ok(Node::new(token, NodeKind::Regexp { pattern, options }))
        } else {
            let nodes =
                self.parse_interpolated_body(locals, TokenKind::InterpolatedRegexpEnd, &token)?;
            let options = self.take_regexp_options();
            self.advance();
            Ok(Node::new(token, NodeKind::InterpolatedRegexp { nodes, options }))
        }
    }

    /// Option letters riding the regexp end token, folded to the bitmask.
    fn take_regexp_options(&self) -> i32 {
        match &self.current_token().literal {
            Some(options) => parse_regexp_options(options),
            None => 0,
        }
    }

    /// The `String`-fragment / `#{ … }` alternation between a begin and end
    /// token.
    fn parse_interpolated_body(
        &mut self,
        locals: &mut Locals,
        end_kind: TokenKind,
        begin_token: &Token,
    ) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        while self.current_token().is_valid() && self.current_token().kind != end_kind {
            let token = self.current_token();
            match token.kind {
                TokenKind::EvaluateToStringBegin => {
                    self.advance();
                    let block_token = self.current_token();
                    let mut block_nodes = Vec::new();
                    while self.current_token().kind != TokenKind::EvaluateToStringEnd {
                        if !self.current_token().is_valid() {
                            return Err(self.unterminated_thing(begin_token, Some(begin_token)));
                        }
                        block_nodes.push(self.parse_expression(Precedence::Lowest, locals)?);
                        self.skip_newlines();
                    }
                    self.advance();
                    if block_nodes.len() == 1 {
                        let first = block_nodes.remove(0);
                        if matches!(first.kind, NodeKind::String { .. }) {
                            nodes.push(first);
                        } else {
                            nodes.push(Node::new(
                                block_token,
                                NodeKind::EvaluateToString { node: Box::new(first) },
                            ));
                        }
                    } else {
                        let block = Node::new(
                            block_token.clone(),
                            NodeKind::Block { nodes: block_nodes },
                        );
                        nodes.push(Node::new(
                            block_token,
                            NodeKind::EvaluateToString { node: Box::new(block) },
                        ));
                    }
                }
                TokenKind::String => {
                    let string = token.literal_string();
                    self.advance();
                    nodes.push(Node::new(token, NodeKind::String { string }));
                }
                _ => return Err(self.unexpected(&token, "string interpolation")),
            }
        }
        if self.current_token().kind != end_kind {
            let token = self.current_token();
            return match token.kind {
                TokenKind::UnterminatedRegexp
                | TokenKind::UnterminatedString
                | TokenKind::UnterminatedWordArray => {
                    Err(self.unterminated_thing(begin_token, Some(begin_token)))
                }
                _ => match self.token_validation_error(&token) {
                    Some(err) => Err(err),
                    None => Err(self.unexpected(&token, "end of string interpolation")),
                },
            };
        }
        Ok(nodes)
    }

    // ----- arrays, word arrays, hashes -----

    pub(crate) fn parse_array(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        let mut nodes = Vec::new();
        if token.kind == TokenKind::LBracketRBracket {
            self.advance();
            return Ok(Node::new(token, NodeKind::Array { nodes }));
        }
        self.advance();
        loop {
            let current = self.current_token();
            if current.kind == TokenKind::RBracket {
                self.advance();
                return Ok(Node::new(token, NodeKind::Array { nodes }));
            }
            if current.kind == TokenKind::SymbolKey {
                let hash =
                    self.parse_hash_inner(locals, Precedence::Hash, Some(TokenKind::RBracket), None, false)?;
                nodes.push(hash);
                self.expect(TokenKind::RBracket, "array closing bracket")?;
                self.advance();
                return Ok(Node::new(token, NodeKind::Array { nodes }));
            }
            let value = self.parse_expression(Precedence::Array, locals)?;
            if self.current_token().is_hash_rocket() {
                let hash = self.parse_hash_inner(
                    locals,
                    Precedence::Hash,
                    Some(TokenKind::RBracket),
                    Some(value),
                    false,
                )?;
                nodes.push(hash);
                self.expect(TokenKind::RBracket, "array closing bracket")?;
                self.advance();
                return Ok(Node::new(token, NodeKind::Array { nodes }));
            }
            nodes.push(value);
            if !self.current_token().is_comma() {
                break;
            }
            self.advance();
        }
        self.expect(TokenKind::RBracket, "array closing bracket")?;
        self.advance();
        Ok(Node::new(token, NodeKind::Array { nodes }))
    }

    pub(crate) fn parse_word_array(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        let mut nodes = Vec::new();
        self.advance();
        while !self.current_token().is_eof() && self.current_token().kind != TokenKind::RBracket {
            if self.current_token().kind == TokenKind::UnterminatedWordArray {
                return Err(self.unterminated_thing(&self.current_token(), Some(&token)));
            }
            nodes.push(self.parse_expression(Precedence::WordArray, locals)?);
        }
        self.expect(TokenKind::RBracket, "closing array bracket")?;
        self.advance();
        Ok(Node::new(token, NodeKind::Array { nodes }))
    }

    pub(crate) fn parse_word_symbol_array(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        let token = self.current_token();
        let mut nodes = Vec::new();
        self.advance();
        while !self.current_token().is_eof() && self.current_token().kind != TokenKind::RBracket {
            if self.current_token().kind == TokenKind::UnterminatedWordArray {
                return Err(self.unterminated_thing(&self.current_token(), Some(&token)));
            }
            let string = self.parse_expression(Precedence::WordArray, locals)?;
            nodes.push(string_to_symbol_node(self, string)?);
        }
        self.expect(TokenKind::RBracket, "closing array bracket")?;
        self.advance();
        Ok(Node::new(token, NodeKind::Array { nodes }))
    }

    pub(crate) fn parse_hash(&mut self, locals: &mut Locals) -> ParseResult<Node> {
        self.expect(TokenKind::LCurlyBrace, "hash opening curly brace")?;
        let token = self.current_token();
        self.advance();
        let hash = if self.current_token().kind == TokenKind::RCurlyBrace {
            Node::new(token, NodeKind::Hash { bare: false, nodes: vec![] })
        } else {
            self.parse_hash_inner(locals, Precedence::Hash, Some(TokenKind::RCurlyBrace), None, false)?
        };
        self.expect(TokenKind::RCurlyBrace, "hash closing curly brace")?;
        self.advance();
        Ok(hash)
    }

    /// Key/value pairs (symbol-key or `=>` form), already past any opening
    /// delimiter. `closing` bounds trailing commas; `first_key` is a key the
    /// caller already parsed.
    pub(crate) fn parse_hash_inner(
        &mut self,
        locals: &mut Locals,
        precedence: Precedence,
        closing: Option<TokenKind>,
        first_key: Option<Node>,
        bare: bool,
    ) -> ParseResult<Node> {
        let token = self.current_token();
        let mut nodes = Vec::new();
        let first_key = match first_key {
            Some(key) => key,
            None => self.parse_expression(precedence, locals)?,
        };
        let first_is_symbol_key = first_key.is_symbol_key();
        let first_is_kwsplat = matches!(first_key.kind, NodeKind::KeywordSplat { .. });
        nodes.push(first_key);
        if !first_is_symbol_key && !first_is_kwsplat {
            self.expect(TokenKind::HashRocket, "hash rocket")?;
            self.advance();
        }
        if !first_is_kwsplat {
            nodes.push(self.parse_expression(precedence, locals)?);
        }
        while self.current_token().kind == TokenKind::Comma {
            self.advance();
            if closing.is_some_and(|closing| self.current_token().kind == closing) {
                break;
            }
            let key = self.parse_expression(precedence, locals)?;
            if matches!(key.kind, NodeKind::KeywordSplat { .. }) {
                nodes.push(key);
                continue;
            }
            let key_is_symbol_key = key.is_symbol_key();
            nodes.push(key);
            if !key_is_symbol_key {
                self.expect(TokenKind::HashRocket, "hash rocket")?;
                self.advance();
            }
            nodes.push(self.parse_expression(precedence, locals)?);
        }
        Ok(Node::new(token, NodeKind::Hash { bare, nodes }))
    }
}

pub(crate) fn convert_string_to_symbol_key(string: Node) -> Node {
    let token = string.token.clone();
    match string.kind {
        NodeKind::String { string } => Node::new(token, NodeKind::SymbolKey { name: string }),
        NodeKind::InterpolatedString { nodes } => {
            Node::new(token, NodeKind::InterpolatedSymbolKey { nodes })
        }
        kind => Node::new(token, kind),
    }
}

fn string_to_symbol_node(parser: &Parser, string: Node) -> Result<Node, SyntaxError> {
    let token = string.token.clone();
    match string.kind {
        NodeKind::String { string } => Ok(Node::new(token, NodeKind::Symbol { name: string })),
        NodeKind::InterpolatedString { nodes } => {
            Ok(Node::new(token, NodeKind::InterpolatedSymbol { nodes }))
        }
        _ => Err(parser.unexpected(&token, "word array symbol")),
    }
}

/// Merge two adjacent string literals into one node, preserving the
/// interpolated structure the reference parser produces.
pub(crate) fn append_string_nodes(string1: Node, string2: Node) -> Node {
    let token1 = string1.token.clone();
    match (string1.kind, string2.kind) {
        (NodeKind::String { string: s1 }, NodeKind::String { string: s2 }) => {
            let mut merged = s1.to_string();
            merged.push_str(&s2);
            Node::new(token1, NodeKind::String { string: Arc::from(merged.as_str()) })
        }
        (NodeKind::String { string: s1 }, NodeKind::InterpolatedString { mut nodes }) => {
            match nodes.first_mut() {
                Some(first) if matches!(first.kind, NodeKind::String { .. }) => {
                    if let NodeKind::String { string } = &mut first.kind {
                        let mut merged = s1.to_string();
                        merged.push_str(string);
                        *string = Arc::from(merged.as_str());
                    }
                }
                _ => {
                    nodes.insert(0, Node::new(token1.clone(), NodeKind::String { string: s1 }));
                }
            }
            Node::new(string2.token, NodeKind::InterpolatedString { nodes })
        }
        (NodeKind::InterpolatedString { mut nodes }, NodeKind::String { string: s2 }) => {
            let percolate = match nodes.last() {
                // the reference parser does not merge two string nodes when
                // an evstr is already present
                Some(last) => nodes.len() == 1 && matches!(last.kind, NodeKind::String { .. }),
                None => false,
            };
            if percolate {
                if let Some(NodeKind::String { string }) = nodes.last_mut().map(|n| &mut n.kind) {
                    let mut merged = string.to_string();
                    merged.push_str(&s2);
                    *string = Arc::from(merged.as_str());
                }
            } else {
                nodes.push(Node::new(string2.token, NodeKind::String { string: s2 }));
            }
            Node::new(token1, NodeKind::InterpolatedString { nodes })
        }
        (
            NodeKind::InterpolatedString { mut nodes },
            NodeKind::InterpolatedString { nodes: nodes2 },
        ) => {
            nodes.extend(nodes2);
            Node::new(token1, NodeKind::InterpolatedString { nodes })
        }
        (kind1, _) => Node::new(token1, kind1),
    }
}

/// Trailing regexp option letters to the reference bitmask.
pub(crate) fn parse_regexp_options(options_string: &str) -> i32 {
    let mut options = 0;
    for c in options_string.chars() {
        match c {
            'i' => options |= 1,
            'x' => options |= 2,
            'm' => options |= 4,
            'e' | 's' | 'u' => options |= 16,
            'n' => options |= 32,
            _ => {}
        }
    }
    options
}

//! Native-value Creator: builds [`Sexp`] trees a host can walk directly.

use std::sync::Arc;

use ruby_token::Token;

use crate::creator::Creator;
use crate::node::{Node, NodeKind};

/// One atom or nested sexp inside a [`Sexp`].
#[derive(Debug, Clone, PartialEq)]
pub enum SexpValue {
    Sexp(Sexp),
    Symbol(Arc<str>),
    String(Arc<str>),
    Integer(i64),
    /// Spelling of an integer past the small-integer ceiling
    Bignum(Arc<str>),
    Float(f64),
    Rational {
        numerator: i64,
        denominator: i64,
    },
    Complex {
        real: f64,
        imaginary: f64,
    },
    Range {
        first: i64,
        last: i64,
        exclude_end: bool,
    },
    Regexp {
        pattern: Arc<str>,
        options: i32,
    },
    True,
    False,
    Nil,
}

/// An array-like sexp: head symbol plus children, with source metadata
/// attached out-of-band. Line and column are 1-based here, matching what
/// hosts and diagnostics expect.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sexp {
    pub items: Vec<SexpValue>,
    pub file: Arc<str>,
    pub line: usize,
    pub column: usize,
    /// Documentation text for `class`/`def`/`module` sexps
    pub comments: Option<Arc<str>>,
}

impl Sexp {
    /// The head symbol, if set.
    pub fn type_name(&self) -> Option<&str> {
        match self.items.first() {
            Some(SexpValue::Symbol(name)) => Some(name),
            _ => None,
        }
    }
}

/// Builds [`Sexp`] values. Each appended node gets a fresh sub-creator
/// seeded with that node's location.
#[derive(Debug, Default)]
pub struct SexpCreator {
    sexp: Sexp,
    assignment: bool,
}

impl SexpCreator {
    pub fn new() -> Self {
        SexpCreator::default()
    }

    fn for_token(token: &Token) -> Self {
        let mut creator = SexpCreator::new();
        creator.sexp.file = token.file.clone();
        creator.sexp.line = token.line + 1;
        creator.sexp.column = token.column + 1;
        creator
    }

    /// Render a whole tree to a [`Sexp`].
    pub fn render(node: &Node) -> Sexp {
        let mut creator = SexpCreator::for_token(&node.token);
        node.transform(&mut creator);
        if let Some(doc) = &node.token.doc {
            creator.set_comments(doc);
        }
        creator.into_sexp()
    }

    pub fn into_sexp(self) -> Sexp {
        self.sexp
    }

    fn push(&mut self, value: SexpValue) {
        self.sexp.items.push(value);
    }
}

impl Creator for SexpCreator {
    fn set_type(&mut self, type_name: &str) {
        let tag = SexpValue::Symbol(Arc::from(type_name));
        if self.sexp.items.is_empty() {
            self.sexp.items.push(tag);
        } else {
            self.sexp.items[0] = tag;
        }
    }

    fn set_comments(&mut self, comments: &str) {
        self.sexp.comments = Some(Arc::from(comments));
    }

    fn append(&mut self, node: &Node) {
        if matches!(node.kind, NodeKind::Nil) {
            self.push(SexpValue::Nil);
            return;
        }
        let mut creator = SexpCreator::for_token(&node.token);
        creator.set_assignment(self.assignment());
        node.transform(&mut creator);
        if let Some(doc) = &node.token.doc {
            creator.set_comments(doc);
        }
        self.push(SexpValue::Sexp(creator.into_sexp()));
    }

    fn append_array(&mut self, array: &Node) {
        let mut creator = SexpCreator::for_token(&array.token);
        creator.set_assignment(self.assignment());
        match &array.kind {
            NodeKind::MultipleAssignment { targets } => {
                creator.set_type("array");
                for target in targets {
                    creator.append(target);
                }
            }
            _ => array.transform(&mut creator),
        }
        self.push(SexpValue::Sexp(creator.into_sexp()));
    }

    fn append_false(&mut self) {
        self.push(SexpValue::False);
    }

    fn append_true(&mut self) {
        self.push(SexpValue::True);
    }

    fn append_nil(&mut self) {
        self.push(SexpValue::Nil);
    }

    fn append_nil_sexp(&mut self) {
        let mut sexp = Sexp {
            file: self.sexp.file.clone(),
            line: self.sexp.line,
            column: self.sexp.column,
            ..Sexp::default()
        };
        sexp.items.push(SexpValue::Symbol(Arc::from("nil")));
        self.push(SexpValue::Sexp(sexp));
    }

    fn append_float(&mut self, number: f64) {
        self.push(SexpValue::Float(number));
    }

    fn append_integer(&mut self, number: i64) {
        self.push(SexpValue::Integer(number));
    }

    fn append_bignum(&mut self, number: &str) {
        self.push(SexpValue::Bignum(Arc::from(number)));
    }

    fn append_range(&mut self, first: i64, last: i64, exclude_end: bool) {
        self.push(SexpValue::Range {
            first,
            last,
            exclude_end,
        });
    }

    fn append_regexp(&mut self, pattern: &str, options: i32) {
        self.push(SexpValue::Regexp {
            pattern: Arc::from(pattern),
            options,
        });
    }

    fn append_string(&mut self, string: &str) {
        self.push(SexpValue::String(Arc::from(string)));
    }

    fn append_symbol(&mut self, name: &str) {
        self.push(SexpValue::Symbol(Arc::from(name)));
    }

    fn append_sexp(&mut self, f: &mut dyn FnMut(&mut dyn Creator)) {
        let mut creator = SexpCreator::new();
        creator.sexp.file = self.sexp.file.clone();
        creator.sexp.line = self.sexp.line;
        creator.sexp.column = self.sexp.column;
        f(&mut creator);
        self.push(SexpValue::Sexp(creator.into_sexp()));
    }

    fn make_rational_number(&mut self, numerator: i64, denominator: i64) {
        self.push(SexpValue::Rational {
            numerator,
            denominator,
        });
    }

    fn make_complex_number(&mut self, real: f64, imaginary: f64) {
        self.push(SexpValue::Complex { real, imaginary });
    }

    fn wrap(&mut self, type_name: &str) {
        let inner_sexp = Sexp {
            items: std::mem::take(&mut self.sexp.items),
            file: self.sexp.file.clone(),
            line: self.sexp.line,
            column: self.sexp.column,
            comments: self.sexp.comments.take(),
        };
        self.set_type(type_name);
        self.push(SexpValue::Sexp(inner_sexp));
    }

    fn assignment(&self) -> bool {
        self.assignment
    }

    fn set_assignment(&mut self, assignment: bool) {
        self.assignment = assignment;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ruby_token::TokenKind;

    use super::*;

    fn token(kind: TokenKind) -> Token {
        Token::new(kind, Arc::from("(test)"), 2, 4)
    }

    #[test]
    fn locations_are_one_based() {
        let node = Node::new(
            token(TokenKind::Fixnum),
            NodeKind::Fixnum { number: 7 },
        );
        let sexp = SexpCreator::render(&node);
        assert_eq!(sexp.line, 3);
        assert_eq!(sexp.column, 5);
        assert_eq!(sexp.type_name(), Some("lit"));
        assert_eq!(sexp.items[1], SexpValue::Integer(7));
    }

    #[test]
    fn doc_comments_surface_on_the_sexp() {
        let mut tok = token(TokenKind::ClassKeyword);
        tok.doc = Some(Arc::from("# a class\n"));
        let name = Node::new(
            Token::with_literal(TokenKind::Constant, "Foo", tok.file.clone(), 2, 10),
            NodeKind::Constant,
        );
        let node = Node::new(
            tok,
            NodeKind::Class {
                name: Box::new(name),
                superclass: Box::new(Node::new(
                    Token::new(TokenKind::NilKeyword, Arc::from("(test)"), 2, 4),
                    NodeKind::Nil,
                )),
                body: Box::new(Node::new(
                    Token::new(TokenKind::Eol, Arc::from("(test)"), 2, 4),
                    NodeKind::Block { nodes: vec![] },
                )),
            },
        );
        let sexp = SexpCreator::render(&node);
        assert_eq!(sexp.comments.as_deref(), Some("# a class\n"));
    }
}

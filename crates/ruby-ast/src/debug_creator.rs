//! Text renderer for sexps, used by the test suites.

use crate::creator::Creator;
use crate::node::{Node, NodeKind};

/// Renders `(:type, child, …)` text. Atoms render as `:symbol`, `"string"`,
/// decimal numbers, `nil`/`true`/`false`, `/regexp/flags`, and `a..b` ranges.
#[derive(Debug, Default)]
pub struct DebugCreator {
    nodes: Vec<String>,
    assignment: bool,
}

impl DebugCreator {
    pub fn new() -> Self {
        DebugCreator::default()
    }

    /// Render a whole tree to text.
    pub fn render(node: &Node) -> String {
        let mut creator = DebugCreator::new();
        node.transform(&mut creator);
        creator.to_string()
    }

    pub fn to_string(&self) -> String {
        let mut buf = String::from("(");
        for (i, node) in self.nodes.iter().enumerate() {
            buf.push_str(node);
            if i + 1 < self.nodes.len() {
                buf.push_str(", ");
            }
        }
        buf.push(')');
        buf
    }

    fn push(&mut self, rendered: String) {
        self.nodes.push(rendered);
    }
}

fn regexp_flags(options: i32) -> String {
    let mut flags = String::new();
    if options & 1 != 0 {
        flags.push('i');
    }
    if options & 2 != 0 {
        flags.push('x');
    }
    if options & 4 != 0 {
        flags.push('m');
    }
    if options & 32 != 0 {
        flags.push('n');
    }
    flags
}

impl Creator for DebugCreator {
    fn set_type(&mut self, type_name: &str) {
        let tag = format!(":{type_name}");
        if self.nodes.is_empty() {
            self.nodes.push(tag);
        } else {
            self.nodes[0] = tag;
        }
    }

    fn set_comments(&mut self, _comments: &str) {
        // not rendered in the text form
    }

    fn append(&mut self, node: &Node) {
        if matches!(node.kind, NodeKind::Nil) {
            self.push("nil".to_string());
            return;
        }
        let mut creator = DebugCreator::new();
        creator.set_assignment(self.assignment());
        node.transform(&mut creator);
        self.push(creator.to_string());
    }

    fn append_array(&mut self, array: &Node) {
        let mut creator = DebugCreator::new();
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
        self.push(creator.to_string());
    }

    fn append_false(&mut self) {
        self.push("false".to_string());
    }

    fn append_true(&mut self) {
        self.push("true".to_string());
    }

    fn append_nil(&mut self) {
        self.push("nil".to_string());
    }

    fn append_nil_sexp(&mut self) {
        self.push("(:nil)".to_string());
    }

    fn append_float(&mut self, number: f64) {
        self.push(format!("{number:?}"));
    }

    fn append_integer(&mut self, number: i64) {
        self.push(number.to_string());
    }

    fn append_bignum(&mut self, number: &str) {
        self.push(number.to_string());
    }

    fn append_range(&mut self, first: i64, last: i64, exclude_end: bool) {
        let dots = if exclude_end { "..." } else { ".." };
        self.push(format!("{first}{dots}{last}"));
    }

    fn append_regexp(&mut self, pattern: &str, options: i32) {
        self.push(format!("/{pattern}/{}", regexp_flags(options)));
    }

    fn append_string(&mut self, string: &str) {
        self.push(format!("{string:?}"));
    }

    fn append_symbol(&mut self, name: &str) {
        self.push(format!(":{name}"));
    }

    fn append_sexp(&mut self, f: &mut dyn FnMut(&mut dyn Creator)) {
        let mut creator = DebugCreator::new();
        f(&mut creator);
        self.push(creator.to_string());
    }

    fn make_rational_number(&mut self, numerator: i64, denominator: i64) {
        self.push(format!("({numerator}/{denominator})"));
    }

    fn make_complex_number(&mut self, real: f64, imaginary: f64) {
        self.push(format!("({real:?}+{imaginary:?}i)"));
    }

    fn wrap(&mut self, type_name: &str) {
        let inner = self.to_string();
        self.nodes.clear();
        self.set_type(type_name);
        self.push(inner);
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
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use ruby_token::{Token, TokenKind};

    use super::*;
    use crate::creator::with_assignment;

    fn token(kind: TokenKind) -> Token {
        Token::new(kind, Arc::from("(test)"), 0, 0)
    }

    #[test]
    fn wrap_nests_the_built_sexp() {
        let mut creator = DebugCreator::new();
        creator.set_type("colon2");
        creator.append_symbol("B");
        creator.wrap("cdecl");
        assert_eq!(creator.to_string(), "(:cdecl, (:colon2, :B))");
    }

    #[test]
    fn assignment_bit_switches_identifier_rendering() {
        let node = Node::new(
            Token::with_literal(TokenKind::BareName, "x", Arc::from("(test)"), 0, 0),
            NodeKind::Identifier {
                name: Arc::from("x"),
                is_lvar: true,
            },
        );
        let mut read = DebugCreator::new();
        node.transform(&mut read);
        assert_eq!(read.to_string(), "(:lvar, :x)");

        let mut write = DebugCreator::new();
        with_assignment(&mut write, true, |c| node.transform(c));
        assert_eq!(write.to_string(), "(:lasgn, :x)");
    }

    #[test]
    fn nil_nodes_render_as_the_atom() {
        let mut creator = DebugCreator::new();
        creator.set_type("if");
        creator.append(&Node::new(token(TokenKind::NilKeyword), NodeKind::Nil));
        assert_eq!(creator.to_string(), "(:if, nil)");
    }

    #[test]
    fn regexp_options_render_as_flags() {
        let mut creator = DebugCreator::new();
        creator.set_type("lit");
        creator.append_regexp("foo", 1 | 4);
        assert_eq!(creator.to_string(), "(:lit, /foo/im)");
    }
}

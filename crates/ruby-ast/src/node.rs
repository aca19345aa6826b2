//! The AST node model.
//!
//! Every node owns its children outright (tree ownership, `Box`/`Vec`), and
//! every node is `Clone`: wherever the parser needs a synthetic subtree that
//! reuses an identifier living elsewhere (op-assign expansion, rescue `$!`
//! binding), it clones the node instead of sharing it.

use std::sync::Arc;

use ruby_token::{Token, TokenKind};

use crate::creator::{with_assignment, Creator};

/// A parse-tree node: its originating token (for diagnostics and source
/// locations) plus the variant payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub token: Token,
    pub kind: NodeKind,
}

/// The closed sum of node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // ===== Literals =====
    Nil,
    /// `()` and valueless `break()`/`next()` — renders as the `(:nil)` sexp
    /// rather than the bare atom
    NilSexp,
    True,
    False,
    Self_,
    Fixnum {
        number: i64,
    },
    /// Integer past the small-integer ceiling; spelling kept as text
    Bignum {
        number: Arc<str>,
    },
    Float {
        number: f64,
    },
    /// Integer rational literal `2r`
    Rational {
        numerator: i64,
    },
    String {
        string: Arc<str>,
    },
    Symbol {
        name: Arc<str>,
    },
    /// `name:` in hash-literal position
    SymbolKey {
        name: Arc<str>,
    },
    Regexp {
        pattern: Arc<str>,
        options: i32,
    },
    Shell {
        string: Arc<str>,
    },
    /// `$&`
    BackRef {
        choice: char,
    },
    /// `$1` .. `$9`
    NthRef {
        num: i64,
    },
    /// `__ENCODING__`
    Encoding,

    // ===== Interpolated literals =====
    InterpolatedString {
        nodes: Vec<Node>,
    },
    InterpolatedSymbol {
        nodes: Vec<Node>,
    },
    InterpolatedSymbolKey {
        nodes: Vec<Node>,
    },
    InterpolatedRegexp {
        nodes: Vec<Node>,
        options: i32,
    },
    InterpolatedShell {
        nodes: Vec<Node>,
    },
    /// One `#{ … }` fragment
    EvaluateToString {
        node: Box<Node>,
    },

    // ===== Collections =====
    Array {
        nodes: Vec<Node>,
    },
    ArrayPattern {
        nodes: Vec<Node>,
    },
    Hash {
        /// true for braceless keyword args in a call
        bare: bool,
        nodes: Vec<Node>,
    },
    HashPattern {
        nodes: Vec<Node>,
    },
    /// `**h` in call args
    KeywordSplat {
        node: Option<Box<Node>>,
    },
    /// `**rest` in a hash pattern
    KeywordRestPattern {
        name: Option<Arc<str>>,
    },
    Splat {
        node: Option<Box<Node>>,
    },
    /// Splat-shaped RHS of a single-target assignment (`a = b, c`)
    SplatValue {
        value: Box<Node>,
    },
    /// Array-coercing RHS of a destructuring assignment
    ToArray {
        value: Box<Node>,
    },
    Range {
        first: Box<Node>,
        last: Box<Node>,
        exclude_end: bool,
    },

    // ===== Identifiers =====
    Identifier {
        name: Arc<str>,
        is_lvar: bool,
    },
    Constant,
    Colon2 {
        left: Box<Node>,
        name: Arc<str>,
    },
    Colon3 {
        name: Arc<str>,
    },
    /// `...` as a parameter
    ForwardArgs,

    // ===== Calls =====
    Call {
        receiver: Box<Node>,
        message: Arc<str>,
        args: Vec<Node>,
    },
    SafeCall {
        receiver: Box<Node>,
        message: Arc<str>,
        args: Vec<Node>,
    },
    Super {
        parens: bool,
        args: Vec<Node>,
    },
    Yield {
        args: Vec<Node>,
    },
    BlockPass {
        node: Box<Node>,
    },
    InfixOp {
        left: Box<Node>,
        op: Arc<str>,
        right: Box<Node>,
    },
    UnaryOp {
        op: Arc<str>,
        right: Box<Node>,
    },
    Match {
        regexp: Box<Node>,
        arg: Box<Node>,
        regexp_on_left: bool,
    },
    NotMatch {
        expression: Box<Node>,
    },
    Defined {
        arg: Box<Node>,
    },
    Not {
        expression: Box<Node>,
    },

    // ===== Assignment =====
    Assignment {
        identifier: Box<Node>,
        value: Box<Node>,
    },
    MultipleAssignment {
        targets: Vec<Node>,
    },
    /// Nested destructuring inside a parameter list: `def f((a, b))`
    MultipleAssignmentArg {
        nodes: Vec<Node>,
    },
    OpAssign {
        op: Arc<str>,
        name: Box<Node>,
        value: Box<Node>,
    },
    OpAssignAnd {
        name: Box<Node>,
        value: Box<Node>,
    },
    OpAssignOr {
        name: Box<Node>,
        value: Box<Node>,
    },
    OpAssignAccessor {
        op: Arc<str>,
        receiver: Box<Node>,
        message: Arc<str>,
        args: Vec<Node>,
        value: Box<Node>,
    },

    // ===== Control flow =====
    If {
        condition: Box<Node>,
        true_expr: Box<Node>,
        false_expr: Box<Node>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
        pre: bool,
    },
    Until {
        condition: Box<Node>,
        body: Box<Node>,
        pre: bool,
    },
    For {
        expr: Box<Node>,
        vars: Box<Node>,
        body: Box<Node>,
    },
    Case {
        subject: Box<Node>,
        arms: Vec<Node>,
        else_body: Option<Box<Node>>,
    },
    CaseWhen {
        condition: Box<Node>,
        body: Box<Node>,
    },
    CaseIn {
        pattern: Box<Node>,
        body: Box<Node>,
    },
    Break {
        arg: Option<Box<Node>>,
    },
    Next {
        arg: Option<Box<Node>>,
    },
    Return {
        value: Box<Node>,
    },
    Redo,
    Retry,
    LogicalAnd {
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalOr {
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `^name` in a pattern
    Pin {
        identifier: Box<Node>,
    },

    // ===== Structural =====
    Block {
        nodes: Vec<Node>,
    },
    Begin {
        body: Box<Node>,
        rescue_nodes: Vec<Node>,
        else_body: Option<Box<Node>>,
        ensure_body: Option<Box<Node>>,
    },
    BeginRescue {
        exceptions: Vec<Node>,
        name: Option<Box<Node>>,
        body: Box<Node>,
    },
    /// `BEGIN { }`
    BeginBlock,
    /// `END { }`
    EndBlock,
    Sclass {
        klass: Box<Node>,
        body: Box<Node>,
    },
    Class {
        name: Box<Node>,
        superclass: Box<Node>,
        body: Box<Node>,
    },
    Module {
        name: Box<Node>,
        body: Box<Node>,
    },
    Def {
        self_node: Option<Box<Node>>,
        name: Arc<str>,
        args: Vec<Node>,
        body: Box<Node>,
    },
    Iter {
        call: Box<Node>,
        has_args: bool,
        args: Vec<Node>,
        body: Box<Node>,
    },
    StabbyProc {
        has_args: bool,
        args: Vec<Node>,
    },
    Arg {
        name: Option<Arc<str>>,
        block_arg: bool,
        splat: bool,
        kwsplat: bool,
        value: Option<Box<Node>>,
    },
    KeywordArg {
        name: Arc<str>,
        value: Option<Box<Node>>,
    },
    /// Block-local variable: `{ |a; b| }`
    ShadowArg {
        name: Arc<str>,
    },
    Alias {
        new_name: Box<Node>,
        existing_name: Box<Node>,
    },
    Undef {
        args: Vec<Node>,
    },
}

impl Node {
    pub fn new(token: Token, kind: NodeKind) -> Self {
        Node { token, kind }
    }

    pub fn file(&self) -> Arc<str> {
        self.token.file.clone()
    }

    pub fn line(&self) -> usize {
        self.token.line
    }

    pub fn column(&self) -> usize {
        self.token.column
    }

    /// Nodes the parser can hang a paren-less argument list off of.
    pub fn is_callable(&self) -> bool {
        match &self.kind {
            NodeKind::Identifier { is_lvar, .. } => {
                matches!(self.token.kind, TokenKind::BareName | TokenKind::Constant) && !is_lvar
            }
            NodeKind::Call { .. }
            | NodeKind::SafeCall { .. }
            | NodeKind::Super { .. }
            | NodeKind::Yield { .. } => true,
            _ => false,
        }
    }

    /// Nodes that may appear on the left of `=` (including destructuring
    /// targets).
    pub fn is_assignable(&self) -> bool {
        match &self.kind {
            NodeKind::Identifier { .. } => self.token.is_assignable(),
            NodeKind::Call { .. }
            | NodeKind::Colon2 { .. }
            | NodeKind::Colon3 { .. }
            | NodeKind::Splat { .. }
            | NodeKind::MultipleAssignment { .. } => true,
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Fixnum { .. }
                | NodeKind::Bignum { .. }
                | NodeKind::Float { .. }
                | NodeKind::Rational { .. }
        )
    }

    pub fn is_symbol_key(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::SymbolKey { .. } | NodeKind::InterpolatedSymbolKey { .. }
        )
    }

    pub fn can_accept_a_block(&self) -> bool {
        match &self.kind {
            NodeKind::Identifier { .. }
            | NodeKind::Call { .. }
            | NodeKind::SafeCall { .. }
            | NodeKind::Super { .. }
            | NodeKind::Yield { .. }
            | NodeKind::BeginBlock
            | NodeKind::EndBlock => true,
            _ => false,
        }
    }

    /// Children of a `Block` node; any other node acts as its own
    /// single-statement body.
    pub fn block_nodes(&self) -> &[Node] {
        if let NodeKind::Block { nodes } = &self.kind {
            nodes
        } else {
            std::slice::from_ref(self)
        }
    }

    pub fn is_empty_block(&self) -> bool {
        matches!(&self.kind, NodeKind::Block { nodes } if nodes.is_empty())
    }

    /// A one-statement `Block` renders as the statement itself.
    pub fn without_unnecessary_nesting(&self) -> &Node {
        match &self.kind {
            NodeKind::Block { nodes } if nodes.len() == 1 => &nodes[0],
            _ => self,
        }
    }

    /// Render this node through `creator`.
    pub fn transform(&self, creator: &mut dyn Creator) {
        match &self.kind {
            NodeKind::Nil | NodeKind::NilSexp => creator.set_type("nil"),
            NodeKind::True => creator.set_type("true"),
            NodeKind::False => creator.set_type("false"),
            NodeKind::Self_ => creator.set_type("self"),
            NodeKind::Fixnum { number } => {
                creator.set_type("lit");
                creator.append_integer(*number);
            }
            NodeKind::Bignum { number } => {
                creator.set_type("lit");
                creator.append_bignum(number);
            }
            NodeKind::Float { number } => {
                creator.set_type("lit");
                creator.append_float(*number);
            }
            NodeKind::Rational { numerator } => {
                creator.set_type("lit");
                creator.make_rational_number(*numerator, 1);
            }
            NodeKind::String { string } => {
                creator.set_type("str");
                creator.append_string(string);
            }
            NodeKind::Symbol { name } | NodeKind::SymbolKey { name } => {
                creator.set_type("lit");
                creator.append_symbol(name);
            }
            NodeKind::Regexp { pattern, options } => {
                creator.set_type("lit");
                creator.append_regexp(pattern, *options);
            }
            NodeKind::Shell { string } => {
                creator.set_type("xstr");
                creator.append_string(string);
            }
            NodeKind::BackRef { choice } => {
                creator.set_type("back_ref");
                creator.append_symbol(&choice.to_string());
            }
            NodeKind::NthRef { num } => {
                creator.set_type("nth_ref");
                creator.append_integer(*num);
            }
            NodeKind::Encoding => {
                creator.set_type("colon2");
                creator.append_sexp(&mut |c| {
                    c.set_type("const");
                    c.append_symbol("Encoding");
                });
                creator.append_symbol("UTF_8");
            }

            NodeKind::InterpolatedString { nodes } => {
                transform_interpolated(creator, "dstr", nodes);
            }
            NodeKind::InterpolatedSymbol { nodes } | NodeKind::InterpolatedSymbolKey { nodes } => {
                transform_interpolated(creator, "dsym", nodes);
            }
            NodeKind::InterpolatedShell { nodes } => {
                transform_interpolated(creator, "dxstr", nodes);
            }
            NodeKind::InterpolatedRegexp { nodes, options } => {
                transform_interpolated(creator, "dregx", nodes);
                if *options != 0 {
                    creator.append_integer(i64::from(*options));
                }
            }
            NodeKind::EvaluateToString { node } => {
                creator.set_type("evstr");
                creator.append(node);
            }

            NodeKind::Array { nodes } => {
                creator.set_type("array");
                for node in nodes {
                    creator.append(node);
                }
            }
            NodeKind::ArrayPattern { nodes } => {
                creator.set_type("array_pat");
                if !nodes.is_empty() {
                    // RubyParser emits this filler slot; keep it verbatim.
                    creator.append_nil();
                }
                for node in nodes {
                    creator.append(node);
                }
            }
            NodeKind::Hash { bare, nodes } => {
                creator.set_type(if *bare { "bare_hash" } else { "hash" });
                for node in nodes {
                    creator.append(node);
                }
            }
            NodeKind::HashPattern { nodes } => {
                creator.set_type("hash_pat");
                creator.append_nil();
                for node in nodes {
                    creator.append(node);
                }
            }
            NodeKind::KeywordSplat { node } => {
                creator.set_type("kwsplat");
                if let Some(node) = node {
                    creator.append(node);
                }
            }
            NodeKind::KeywordRestPattern { name } => {
                creator.set_type("kwrest");
                let mut spelled = String::from("**");
                if let Some(name) = name {
                    spelled.push_str(name);
                }
                creator.append_symbol(&spelled);
            }
            NodeKind::Splat { node } => {
                creator.set_type("splat");
                if let Some(node) = node {
                    creator.append(node);
                }
            }
            NodeKind::SplatValue { value } => {
                creator.set_type("svalue");
                creator.append(value);
            }
            NodeKind::ToArray { value } => {
                creator.set_type("to_ary");
                creator.append(value);
            }
            NodeKind::Range {
                first,
                last,
                exclude_end,
            } => {
                match (&first.kind, &last.kind) {
                    (NodeKind::Fixnum { number: a }, NodeKind::Fixnum { number: b }) => {
                        creator.set_type("lit");
                        creator.append_range(*a, *b, *exclude_end);
                    }
                    _ => {
                        creator.set_type(if *exclude_end { "dot3" } else { "dot2" });
                        creator.append(first);
                        creator.append(last);
                    }
                }
            }

            NodeKind::Identifier { name, is_lvar } => {
                if creator.assignment() {
                    transform_identifier_assignment(creator, self.token.kind, name);
                } else {
                    match self.token.kind {
                        TokenKind::BareName => {
                            if *is_lvar {
                                creator.set_type("lvar");
                                creator.append_symbol(name);
                            } else {
                                creator.set_type("call");
                                creator.append_nil();
                                creator.append_symbol(name);
                            }
                        }
                        TokenKind::ClassVariable => {
                            creator.set_type("cvar");
                            creator.append_symbol(name);
                        }
                        TokenKind::Constant => {
                            creator.set_type("const");
                            creator.append_symbol(name);
                        }
                        TokenKind::GlobalVariable => {
                            creator.set_type("gvar");
                            creator.append_symbol(name);
                        }
                        TokenKind::InstanceVariable => {
                            creator.set_type("ivar");
                            creator.append_symbol(name);
                        }
                        _ => {
                            creator.set_type("lvar");
                            creator.append_symbol(name);
                        }
                    }
                }
            }
            NodeKind::Constant => {
                creator.set_type("const");
                creator.append_symbol(self.token.literal_or_blank());
            }
            NodeKind::Colon2 { left, name } => {
                creator.set_type("colon2");
                with_assignment(creator, false, |c| c.append(left));
                creator.append_symbol(name);
                if creator.assignment() {
                    creator.wrap("cdecl");
                }
            }
            NodeKind::Colon3 { name } => {
                creator.set_type("colon3");
                creator.append_symbol(name);
                if creator.assignment() {
                    creator.wrap("cdecl");
                }
            }
            NodeKind::ForwardArgs => creator.set_type("forward_args"),

            NodeKind::Call {
                receiver,
                message,
                args,
            } => {
                transform_call(creator, receiver, message, args);
            }
            NodeKind::SafeCall {
                receiver,
                message,
                args,
            } => {
                transform_call(creator, receiver, message, args);
                creator.set_type("safe_call");
            }
            NodeKind::Super { parens, args } => {
                if *parens && args.is_empty() {
                    creator.set_type("super");
                } else if args.is_empty() {
                    creator.set_type("zsuper");
                } else {
                    creator.set_type("super");
                    for arg in args {
                        creator.append(arg);
                    }
                }
            }
            NodeKind::Yield { args } => {
                creator.set_type("yield");
                for arg in args {
                    creator.append(arg);
                }
            }
            NodeKind::BlockPass { node } => {
                creator.set_type("block_pass");
                creator.append(node);
            }
            NodeKind::InfixOp { left, op, right } => {
                creator.set_type("call");
                creator.append(left);
                creator.append_symbol(op);
                creator.append(right);
            }
            NodeKind::UnaryOp { op, right } => {
                creator.set_type("call");
                creator.append(right);
                creator.append_symbol(op);
            }
            NodeKind::Match {
                regexp,
                arg,
                regexp_on_left,
            } => {
                creator.set_type(if *regexp_on_left { "match2" } else { "match3" });
                creator.append(regexp);
                creator.append(arg);
            }
            NodeKind::NotMatch { expression } | NodeKind::Not { expression } => {
                creator.set_type("not");
                creator.append(expression);
            }
            NodeKind::Defined { arg } => {
                creator.set_type("defined");
                creator.append(arg);
            }

            NodeKind::Assignment { identifier, value } => {
                match &identifier.kind {
                    NodeKind::MultipleAssignment { .. } => {
                        identifier.transform(creator);
                        creator.append(value);
                    }
                    _ => {
                        with_assignment(creator, true, |c| identifier.transform(c));
                        creator.append(value);
                    }
                }
            }
            NodeKind::MultipleAssignment { .. } => {
                with_assignment(creator, true, |c| {
                    c.set_type("masgn");
                    c.append_array(self);
                });
            }
            NodeKind::MultipleAssignmentArg { nodes } => {
                creator.set_type("masgn");
                for arg in nodes {
                    if let NodeKind::Arg { .. } = &arg.kind {
                        append_arg_name(creator, arg);
                    } else {
                        creator.append(arg);
                    }
                }
            }
            NodeKind::OpAssign { op, name, value } => match &name.kind {
                NodeKind::Identifier { .. } => {
                    with_assignment(creator, true, |c| name.transform(c));
                    let call = Node::new(
                        self.token.clone(),
                        NodeKind::Call {
                            receiver: name.clone(),
                            message: op.clone(),
                            args: vec![value.as_ref().clone()],
                        },
                    );
                    creator.append(&call);
                }
                _ => {
                    creator.set_type("op_asgn");
                    creator.append(name);
                    creator.append_symbol(op);
                    creator.append(value);
                }
            },
            NodeKind::OpAssignAnd { name, value } => {
                transform_op_assign_logical(creator, "op_asgn_and", &self.token, name, value);
            }
            NodeKind::OpAssignOr { name, value } => {
                transform_op_assign_logical(creator, "op_asgn_or", &self.token, name, value);
            }
            NodeKind::OpAssignAccessor {
                op,
                receiver,
                message,
                args,
                value,
            } => {
                if &**message == "[]=" {
                    creator.set_type("op_asgn1");
                    creator.append(receiver);
                    creator.append_sexp(&mut |c| {
                        c.set_type("arglist");
                        for arg in args {
                            c.append(arg);
                        }
                    });
                    creator.append_symbol(op);
                    creator.append(value);
                } else {
                    creator.set_type("op_asgn2");
                    creator.append(receiver);
                    creator.append_symbol(message);
                    creator.append_symbol(op);
                    creator.append(value);
                }
            }

            NodeKind::If {
                condition,
                true_expr,
                false_expr,
            } => {
                creator.set_type("if");
                creator.append(condition);
                creator.append(true_expr);
                creator.append(false_expr);
            }
            NodeKind::While {
                condition,
                body,
                pre,
            } => transform_loop(creator, "while", condition, body, *pre),
            NodeKind::Until {
                condition,
                body,
                pre,
            } => transform_loop(creator, "until", condition, body, *pre),
            NodeKind::For { expr, vars, body } => {
                creator.set_type("for");
                creator.append(expr);
                with_assignment(creator, true, |c| c.append(vars));
                if !body.is_empty_block() {
                    creator.append(body.without_unnecessary_nesting());
                }
            }
            NodeKind::Case {
                subject,
                arms,
                else_body,
            } => {
                creator.set_type("case");
                creator.append(subject);
                for arm in arms {
                    creator.append(arm);
                }
                match else_body {
                    Some(else_body) => creator.append(else_body.without_unnecessary_nesting()),
                    None => creator.append_nil(),
                }
            }
            NodeKind::CaseWhen { condition, body } => {
                creator.set_type("when");
                creator.append(condition);
                transform_arm_body(creator, body);
            }
            NodeKind::CaseIn { pattern, body } => {
                creator.set_type("in");
                creator.append(pattern);
                transform_arm_body(creator, body);
            }
            NodeKind::Break { arg } => {
                creator.set_type("break");
                if let Some(arg) = arg {
                    creator.append(arg);
                }
            }
            NodeKind::Next { arg } => {
                creator.set_type("next");
                if let Some(arg) = arg {
                    creator.append(arg);
                }
            }
            NodeKind::Return { value } => {
                creator.set_type("return");
                if !matches!(value.kind, NodeKind::Nil) {
                    creator.append(value);
                }
            }
            NodeKind::Redo => creator.set_type("redo"),
            NodeKind::Retry => creator.set_type("retry"),
            NodeKind::LogicalAnd { left, right } => {
                creator.set_type("and");
                creator.append(left);
                creator.append(right);
            }
            NodeKind::LogicalOr { left, right } => {
                creator.set_type("or");
                creator.append(left);
                creator.append(right);
            }
            NodeKind::Pin { identifier } => {
                creator.set_type("pin");
                creator.append(identifier);
            }

            NodeKind::Block { nodes } => {
                creator.set_type("block");
                for node in nodes {
                    creator.append(node);
                }
            }
            NodeKind::Begin {
                body,
                rescue_nodes,
                else_body,
                ensure_body,
            } => {
                creator.set_type("rescue");
                if !body.is_empty_block() {
                    creator.append(body.without_unnecessary_nesting());
                }
                for rescue_node in rescue_nodes {
                    creator.append(rescue_node);
                }
                if let Some(else_body) = else_body {
                    creator.append(else_body.without_unnecessary_nesting());
                }
                if let Some(ensure_body) = ensure_body {
                    if rescue_nodes.is_empty() {
                        creator.set_type("ensure");
                    } else {
                        creator.wrap("ensure");
                    }
                    creator.append(ensure_body.without_unnecessary_nesting());
                }
            }
            NodeKind::BeginRescue {
                exceptions,
                name,
                body,
            } => {
                creator.set_type("resbody");
                let mut array_nodes: Vec<Node> = exceptions.clone();
                if let Some(name) = name {
                    array_nodes.push(rescue_name_to_node(name));
                }
                let array = Node::new(self.token.clone(), NodeKind::Array { nodes: array_nodes });
                creator.append(&array);
                for node in body.block_nodes() {
                    creator.append(node);
                }
            }
            NodeKind::BeginBlock => creator.set_type("preexe"),
            NodeKind::EndBlock => creator.set_type("postexe"),
            NodeKind::Sclass { klass, body } => {
                creator.set_type("sclass");
                creator.append(klass);
                for node in body.block_nodes() {
                    creator.append(node);
                }
            }
            NodeKind::Class {
                name,
                superclass,
                body,
            } => {
                creator.set_type("class");
                append_definition_name(creator, name);
                creator.append(superclass);
                for node in body.block_nodes() {
                    creator.append(node);
                }
            }
            NodeKind::Module { name, body } => {
                creator.set_type("module");
                append_definition_name(creator, name);
                for node in body.block_nodes() {
                    creator.append(node);
                }
            }
            NodeKind::Def {
                self_node,
                name,
                args,
                body,
            } => {
                match self_node {
                    Some(self_node) => {
                        creator.set_type("defs");
                        creator.append(self_node);
                    }
                    None => creator.set_type("defn"),
                }
                creator.append_symbol(name);
                append_method_or_block_args(creator, args);
                if body.is_empty_block() {
                    creator.append_sexp(&mut |c| c.set_type("nil"));
                } else {
                    for node in body.block_nodes() {
                        creator.append(node);
                    }
                }
            }
            NodeKind::Iter {
                call,
                has_args,
                args,
                body,
            } => {
                creator.set_type("iter");
                creator.append(call);
                if *has_args {
                    append_method_or_block_args(creator, args);
                } else {
                    creator.append_integer(0);
                }
                if !body.is_empty_block() {
                    creator.append(body.without_unnecessary_nesting());
                }
            }
            NodeKind::StabbyProc { .. } => creator.set_type("lambda"),
            NodeKind::Arg { value, .. } => {
                creator.set_type("lasgn");
                append_arg_name(creator, self);
                if let Some(value) = value {
                    creator.append(value);
                }
            }
            NodeKind::KeywordArg { name, value } => {
                creator.set_type("kwarg");
                creator.append_symbol(name);
                if let Some(value) = value {
                    creator.append(value);
                }
            }
            NodeKind::ShadowArg { name } => {
                creator.set_type("shadow");
                creator.append_symbol(name);
            }
            NodeKind::Alias {
                new_name,
                existing_name,
            } => {
                creator.set_type("alias");
                creator.append(new_name);
                creator.append(existing_name);
            }
            NodeKind::Undef { args } => {
                creator.set_type("undef");
                for arg in args {
                    creator.append(arg);
                }
            }
        }
    }
}

fn transform_identifier_assignment(creator: &mut dyn Creator, kind: TokenKind, name: &str) {
    match kind {
        TokenKind::BareName => creator.set_type("lasgn"),
        TokenKind::ClassVariable => creator.set_type("cvdecl"),
        TokenKind::Constant | TokenKind::ConstantResolution => creator.set_type("cdecl"),
        TokenKind::GlobalVariable => creator.set_type("gasgn"),
        TokenKind::InstanceVariable => creator.set_type("iasgn"),
        _ => creator.set_type("lasgn"),
    }
    creator.append_symbol(name);
}

fn transform_call(creator: &mut dyn Creator, receiver: &Node, message: &str, args: &[Node]) {
    if creator.assignment() {
        creator.set_type("attrasgn");
        with_assignment(creator, false, |c| c.append(receiver));
        let mut spelled = String::from(message);
        spelled.push('=');
        creator.append_symbol(&spelled);
    } else {
        creator.set_type("call");
        creator.append(receiver);
        creator.append_symbol(message);
    }
    with_assignment(creator, false, |c| {
        for arg in args {
            c.append(arg);
        }
    });
}

fn transform_interpolated(creator: &mut dyn Creator, type_name: &str, nodes: &[Node]) {
    creator.set_type(type_name);
    for (i, node) in nodes.iter().enumerate() {
        match &node.kind {
            NodeKind::String { string } if i == 0 => creator.append_string(string),
            _ => creator.append(node),
        }
    }
}

fn transform_loop(creator: &mut dyn Creator, type_name: &str, condition: &Node, body: &Node, pre: bool) {
    creator.set_type(type_name);
    creator.append(condition);
    if body.is_empty_block() {
        creator.append_nil();
    } else {
        creator.append(body.without_unnecessary_nesting());
    }
    if pre {
        creator.append_true();
    } else {
        creator.append_false();
    }
}

fn transform_arm_body(creator: &mut dyn Creator, body: &Node) {
    let nodes = body.block_nodes();
    if body.is_empty_block() {
        creator.append_nil();
    } else {
        for node in nodes {
            creator.append(node);
        }
    }
}

fn transform_op_assign_logical(
    creator: &mut dyn Creator,
    type_name: &str,
    token: &Token,
    name: &Node,
    value: &Node,
) {
    // s(:op_asgn_or, s(:lvar, :x), s(:lasgn, :x, value))
    creator.set_type(type_name);
    creator.append(name);
    let assignment = Node::new(
        token.clone(),
        NodeKind::Assignment {
            identifier: Box::new(name.clone()),
            value: Box::new(value.clone()),
        },
    );
    creator.append(&assignment);
}

/// The `=> e` binding of a rescue clause assigns `$!` to the name.
fn rescue_name_to_node(name: &Node) -> Node {
    let gvar_token = Token::with_literal(
        TokenKind::GlobalVariable,
        "$!",
        name.token.file.clone(),
        name.token.line,
        name.token.column,
    );
    Node::new(
        name.token.clone(),
        NodeKind::Assignment {
            identifier: Box::new(name.clone()),
            value: Box::new(Node::new(
                gvar_token,
                NodeKind::Identifier {
                    name: Arc::from("$!"),
                    is_lvar: false,
                },
            )),
        },
    )
}

/// `class Foo` and `module Foo` take a bare symbol; `class A::B` keeps the
/// colon2 node.
fn append_definition_name(creator: &mut dyn Creator, name: &Node) {
    if let NodeKind::Identifier { name: spelled, .. } = &name.kind {
        creator.append_symbol(spelled);
    } else if let NodeKind::Constant = &name.kind {
        creator.append_symbol(name.token.literal_or_blank());
    } else {
        creator.append(name);
    }
}

/// Render an `(:args, …)` spec for a `def` or block.
pub fn append_method_or_block_args(creator: &mut dyn Creator, args: &[Node]) {
    // Manual closure-over-slice because append_sexp takes a dyn FnMut.
    let mut f = |c: &mut dyn Creator| {
        c.set_type("args");
        for arg in args {
            match &arg.kind {
                NodeKind::Arg { value, .. } => {
                    if value.is_some() {
                        c.append(arg);
                    } else {
                        append_arg_name(c, arg);
                    }
                }
                NodeKind::KeywordArg { .. }
                | NodeKind::MultipleAssignmentArg { .. }
                | NodeKind::ShadowArg { .. }
                | NodeKind::ForwardArgs => c.append(arg),
                NodeKind::Nil => c.append_nil(),
                _ => c.append(arg),
            }
        }
    };
    creator.append_sexp(&mut f);
}

/// Render an arg's name with its `*`/`**`/`&` prefix as a bare symbol.
fn append_arg_name(creator: &mut dyn Creator, arg: &Node) {
    if let NodeKind::Arg {
        name,
        block_arg,
        splat,
        kwsplat,
        ..
    } = &arg.kind
    {
        let mut spelled = String::new();
        if *splat {
            spelled.push('*');
        } else if *kwsplat {
            spelled.push_str("**");
        } else if *block_arg {
            spelled.push('&');
        }
        if let Some(name) = name {
            spelled.push_str(name);
        }
        creator.append_symbol(&spelled);
    }
}

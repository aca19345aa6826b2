//! Golden S-expression tests: parse a fragment, render it through the
//! debug creator, compare text.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use ruby_ast::DebugCreator;
use ruby_parser::Parser;

fn parse(code: &str) -> String {
    let mut parser = Parser::new(code, "(string)");
    let tree = parser.tree().expect("parse failed");
    DebugCreator::render(&tree)
}

/// Render the first (usually only) top-level expression.
fn parse_expr(code: &str) -> String {
    let rendered = parse(code);
    let inner = rendered
        .strip_prefix("(:block, ")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(&rendered);
    inner.to_string()
}

#[test]
fn literals() {
    assert_eq!(parse_expr("1"), "(:lit, 1)");
    assert_eq!(parse_expr("1_000_000"), "(:lit, 1000000)");
    assert_eq!(parse_expr("0x1f"), "(:lit, 31)");
    assert_eq!(parse_expr("0b101"), "(:lit, 5)");
    assert_eq!(parse_expr("0o17"), "(:lit, 15)");
    assert_eq!(parse_expr("017"), "(:lit, 15)");
    assert_eq!(parse_expr("1.5"), "(:lit, 1.5)");
    assert_eq!(parse_expr("1e3"), "(:lit, 1000.0)");
    assert_eq!(parse_expr("2r"), "(:lit, (2/1))");
    assert_eq!(
        parse_expr("18446744073709551616"),
        "(:lit, 18446744073709551616)"
    );
    assert_eq!(parse_expr("nil"), "(:nil)");
    assert_eq!(parse_expr("true"), "(:true)");
    assert_eq!(parse_expr("false"), "(:false)");
    assert_eq!(parse_expr("self"), "(:self)");
    assert_eq!(parse_expr(":sym"), "(:lit, :sym)");
    assert_eq!(parse_expr(":<<"), "(:lit, :<<)");
    assert_eq!(parse_expr(":[]="), "(:lit, :[]=)");
    assert_eq!(parse_expr("'str'"), "(:str, \"str\")");
    assert_eq!(parse_expr("\"str\""), "(:str, \"str\")");
    assert_eq!(parse_expr("$1"), "(:nth_ref, 1)");
    assert_eq!(parse_expr("$&"), "(:back_ref, :&)");
    assert_eq!(parse_expr("$!"), "(:gvar, :$!)");
    assert_eq!(parse_expr("@foo"), "(:ivar, :@foo)");
    assert_eq!(parse_expr("@@foo"), "(:cvar, :@@foo)");
}

#[test]
fn magic_keywords() {
    assert_eq!(parse_expr("__FILE__"), "(:str, \"(string)\")");
    assert_eq!(parse_expr("__LINE__"), "(:lit, 1)");
    assert_eq!(
        parse_expr("__ENCODING__"),
        "(:colon2, (:const, :Encoding), :UTF_8)"
    );
}

#[test]
fn precedence_groups_tighter_operators_first() {
    assert_eq!(
        parse_expr("1 + 2 * 3"),
        "(:call, (:lit, 1), :+, (:call, (:lit, 2), :*, (:lit, 3)))"
    );
    assert_eq!(
        parse_expr("1 * 2 + 3"),
        "(:call, (:call, (:lit, 1), :*, (:lit, 2)), :+, (:lit, 3))"
    );
    assert_eq!(
        parse_expr("2 ** 3 ** 2"),
        "(:call, (:call, (:lit, 2), :**, (:lit, 3)), :**, (:lit, 2))"
    );
    assert_eq!(
        parse_expr("1 | 2 & 3"),
        "(:call, (:lit, 1), :|, (:call, (:lit, 2), :&, (:lit, 3)))"
    );
    assert_eq!(
        parse_expr("1 << 2 + 3"),
        "(:call, (:lit, 1), :<<, (:call, (:lit, 2), :+, (:lit, 3)))"
    );
}

#[test]
fn unary_operators() {
    assert_eq!(parse_expr("-2"), "(:lit, -2)");
    assert_eq!(parse_expr("-2.5"), "(:lit, -2.5)");
    assert_eq!(parse_expr("+2"), "(:lit, 2)");
    assert_eq!(parse_expr("-x"), "(:call, (:call, nil, :x), :-@)");
    assert_eq!(parse_expr("~x"), "(:call, (:call, nil, :x), :~)");
    assert_eq!(parse_expr("!x"), "(:not, (:call, nil, :x))");
    assert_eq!(parse_expr("not x"), "(:not, (:call, nil, :x))");
    assert_eq!(parse_expr("-2.abs"), "(:call, (:lit, -2), :abs)");
}

#[test]
fn number_dot_binds_the_literal() {
    assert_eq!(parse_expr("2.even?"), "(:call, (:lit, 2), :even?)");
}

#[test]
fn assignment() {
    assert_eq!(parse_expr("a = 1"), "(:lasgn, :a, (:lit, 1))");
    assert_eq!(parse_expr("@a = 1"), "(:iasgn, :@a, (:lit, 1))");
    assert_eq!(parse_expr("@@a = 1"), "(:cvdecl, :@@a, (:lit, 1))");
    assert_eq!(parse_expr("$a = 1"), "(:gasgn, :$a, (:lit, 1))");
    assert_eq!(parse_expr("A = 1"), "(:cdecl, :A, (:lit, 1))");
    assert_eq!(
        parse_expr("A::B = 1"),
        "(:cdecl, (:colon2, (:const, :A), :B), (:lit, 1))"
    );
}

#[test]
fn assignment_rhs_list_becomes_svalue() {
    assert_eq!(
        parse_expr("a = b, c"),
        "(:lasgn, :a, (:svalue, (:array, (:call, nil, :b), (:call, nil, :c))))"
    );
    assert_eq!(
        parse_expr("a = *b"),
        "(:lasgn, :a, (:svalue, (:splat, (:call, nil, :b))))"
    );
}

#[test]
fn multiple_assignment() {
    assert_eq!(
        parse_expr("a, b = 1, 2"),
        "(:masgn, (:array, (:lasgn, :a), (:lasgn, :b)), (:array, (:lit, 1), (:lit, 2)))"
    );
    assert_eq!(
        parse_expr("a, b = c"),
        "(:masgn, (:array, (:lasgn, :a), (:lasgn, :b)), (:to_ary, (:call, nil, :c)))"
    );
    assert_eq!(
        parse_expr("a, *b = 1, 2, 3"),
        "(:masgn, (:array, (:lasgn, :a), (:splat, (:lasgn, :b))), (:array, (:lit, 1), (:lit, 2), (:lit, 3)))"
    );
    assert_eq!(
        parse_expr("a, b = *c"),
        "(:masgn, (:array, (:lasgn, :a), (:lasgn, :b)), (:splat, (:call, nil, :c)))"
    );
    assert_eq!(
        parse_expr("a, (b, c) = d"),
        "(:masgn, (:array, (:lasgn, :a), (:masgn, (:array, (:lasgn, :b), (:lasgn, :c)))), (:to_ary, (:call, nil, :d)))"
    );
}

#[test]
fn op_assign() {
    assert_eq!(
        parse_expr("x += 1"),
        "(:lasgn, :x, (:call, (:lvar, :x), :+, (:lit, 1)))"
    );
    assert_eq!(
        parse_expr("x <<= 1"),
        "(:lasgn, :x, (:call, (:lvar, :x), :<<, (:lit, 1)))"
    );
    assert_eq!(
        parse_expr("x ||= 1"),
        "(:op_asgn_or, (:lvar, :x), (:lasgn, :x, (:lit, 1)))"
    );
    assert_eq!(
        parse_expr("x &&= 1"),
        "(:op_asgn_and, (:lvar, :x), (:lasgn, :x, (:lit, 1)))"
    );
    assert_eq!(
        parse_expr("a[i] += 2"),
        "(:op_asgn1, (:call, nil, :a), (:arglist, (:call, nil, :i)), :+, (:lit, 2))"
    );
    assert_eq!(
        parse_expr("a.b += 2"),
        "(:op_asgn2, (:call, nil, :a), :b=, :+, (:lit, 2))"
    );
}

#[test]
fn attribute_and_index_assignment() {
    assert_eq!(
        parse_expr("foo.bar = 1"),
        "(:attrasgn, (:call, nil, :foo), :bar=, (:lit, 1))"
    );
    assert_eq!(
        parse_expr("a[i] = 1"),
        "(:attrasgn, (:call, nil, :a), :[]=, (:call, nil, :i), (:lit, 1))"
    );
}

#[test]
fn calls() {
    assert_eq!(parse_expr("foo"), "(:call, nil, :foo)");
    assert_eq!(parse_expr("foo()"), "(:call, nil, :foo)");
    assert_eq!(
        parse_expr("foo(1, 2)"),
        "(:call, nil, :foo, (:lit, 1), (:lit, 2))"
    );
    assert_eq!(
        parse_expr("foo 1, 2"),
        "(:call, nil, :foo, (:lit, 1), (:lit, 2))"
    );
    assert_eq!(parse_expr("a.b"), "(:call, (:call, nil, :a), :b)");
    assert_eq!(
        parse_expr("a.b.c"),
        "(:call, (:call, (:call, nil, :a), :b), :c)"
    );
    assert_eq!(parse_expr("a&.b"), "(:safe_call, (:call, nil, :a), :b)");
    assert_eq!(parse_expr("a.()"), "(:call, (:call, nil, :a), :call)");
    assert_eq!(
        parse_expr("obj.go arg"),
        "(:call, (:call, nil, :obj), :go, (:call, nil, :arg))"
    );
    assert_eq!(
        parse_expr("a[1]"),
        "(:call, (:call, nil, :a), :[], (:lit, 1))"
    );
    assert_eq!(
        parse_expr("foo(*args)"),
        "(:call, nil, :foo, (:splat, (:call, nil, :args)))"
    );
    assert_eq!(
        parse_expr("foo(**opts)"),
        "(:call, nil, :foo, (:kwsplat, (:call, nil, :opts)))"
    );
    assert_eq!(
        parse_expr("foo(&blk)"),
        "(:call, nil, :foo, (:block_pass, (:call, nil, :blk)))"
    );
    assert_eq!(
        parse_expr("foo a: 1"),
        "(:call, nil, :foo, (:bare_hash, (:lit, :a), (:lit, 1)))"
    );
}

#[test]
fn constants() {
    assert_eq!(parse_expr("A"), "(:const, :A)");
    assert_eq!(parse_expr("A::B"), "(:colon2, (:const, :A), :B)");
    assert_eq!(parse_expr("::A"), "(:colon3, :A)");
    assert_eq!(parse_expr("A::b"), "(:call, (:const, :A), :b)");
}

#[test]
fn local_variables_shadow_calls() {
    assert_eq!(parse("a"), "(:block, (:call, nil, :a))");
    assert_eq!(
        parse("a = 1\na"),
        "(:block, (:lasgn, :a, (:lit, 1)), (:lvar, :a))"
    );
}

#[test]
fn block_bindings_do_not_leak() {
    assert_eq!(
        parse("foo { a = 1 }\na"),
        "(:block, (:iter, (:call, nil, :foo), 0, (:lasgn, :a, (:lit, 1))), (:call, nil, :a))"
    );
}

#[test]
fn blocks_and_iterators() {
    assert_eq!(parse_expr("bar do end"), "(:iter, (:call, nil, :bar), 0)");
    assert_eq!(
        parse_expr("foo bar do end"),
        "(:iter, (:call, nil, :foo, (:call, nil, :bar)), 0)"
    );
    assert_eq!(
        parse_expr("foo { |a, b| a + b }"),
        "(:iter, (:call, nil, :foo), (:args, :a, :b), (:call, (:lvar, :a), :+, (:lvar, :b)))"
    );
    assert_eq!(
        parse_expr("loop { |i; j| j }"),
        "(:iter, (:call, nil, :loop), (:args, :i, (:shadow, :j)), (:lvar, :j))"
    );
    assert_eq!(
        parse_expr("foo(1) { 2 }"),
        "(:iter, (:call, nil, :foo, (:lit, 1)), 0, (:lit, 2))"
    );
}

#[test]
fn block_attaches_past_an_operator_to_the_bare_call() {
    assert_eq!(
        parse_expr("foo bar + baz do end"),
        "(:iter, (:call, nil, :foo, (:call, (:call, nil, :bar), :+, (:call, nil, :baz))), 0)"
    );
}

#[test]
fn stabby_procs() {
    assert_eq!(
        parse_expr("-> { 1 }"),
        "(:iter, (:lambda), 0, (:lit, 1))"
    );
    assert_eq!(
        parse_expr("->(x) { x }"),
        "(:iter, (:lambda), (:args, :x), (:lvar, :x))"
    );
}

#[test]
fn method_definitions() {
    assert_eq!(parse_expr("def foo\nend"), "(:defn, :foo, (:args), (:nil))");
    assert_eq!(
        parse_expr("def foo(a, b = 1, *c, d:, **e, &f)\nend"),
        "(:defn, :foo, (:args, :a, (:lasgn, :b, (:lit, 1)), :*c, (:kwarg, :d), :**e, :&f), (:nil))"
    );
    assert_eq!(
        parse_expr("def foo((a, b))\nend"),
        "(:defn, :foo, (:args, (:masgn, :a, :b)), (:nil))"
    );
    assert_eq!(
        parse_expr("def foo(...)\nend"),
        "(:defn, :foo, (:args, (:forward_args)), (:nil))"
    );
    assert_eq!(
        parse_expr("def self.foo\n1\nend"),
        "(:defs, (:self), :foo, (:args), (:lit, 1))"
    );
    assert_eq!(
        parse_expr("def name=(value)\nend"),
        "(:defn, :name=, (:args, :value), (:nil))"
    );
    assert_eq!(parse_expr("def <<(x)\nend"), "(:defn, :<<, (:args, :x), (:nil))");
    assert_eq!(parse_expr("def -@\nend"), "(:defn, :-@, (:args), (:nil))");
    assert_eq!(parse_expr("def [](i)\nend"), "(:defn, :[], (:args, :i), (:nil))");
}

#[test]
fn classes_and_modules() {
    assert_eq!(parse_expr("class Foo\nend"), "(:class, :Foo, nil)");
    assert_eq!(
        parse_expr("class Foo < Bar\nend"),
        "(:class, :Foo, (:const, :Bar))"
    );
    assert_eq!(
        parse_expr("class A::B\nend"),
        "(:class, (:colon2, (:const, :A), :B), nil)"
    );
    assert_eq!(parse_expr("module M\nend"), "(:module, :M)");
    assert_eq!(parse_expr("class << self\nend"), "(:sclass, (:self))");
}

#[test]
fn conditionals() {
    assert_eq!(
        parse_expr("if a\nb\nend"),
        "(:if, (:call, nil, :a), (:call, nil, :b), nil)"
    );
    assert_eq!(
        parse_expr("if a\nb\nelse\nc\nend"),
        "(:if, (:call, nil, :a), (:call, nil, :b), (:call, nil, :c))"
    );
    assert_eq!(
        parse_expr("unless a\nb\nend"),
        "(:if, (:call, nil, :a), nil, (:call, nil, :b))"
    );
    assert_eq!(
        parse_expr("a ? b : c"),
        "(:if, (:call, nil, :a), (:call, nil, :b), (:call, nil, :c))"
    );
    assert_eq!(
        parse_expr("b if a"),
        "(:if, (:call, nil, :a), (:call, nil, :b), nil)"
    );
    assert_eq!(
        parse_expr("b unless a"),
        "(:if, (:call, nil, :a), nil, (:call, nil, :b))"
    );
}

#[test]
fn loops() {
    assert_eq!(
        parse_expr("while a\nb\nend"),
        "(:while, (:call, nil, :a), (:call, nil, :b), true)"
    );
    assert_eq!(
        parse_expr("until a\nb\nend"),
        "(:until, (:call, nil, :a), (:call, nil, :b), true)"
    );
    assert_eq!(
        parse_expr("b while a"),
        "(:while, (:call, nil, :a), (:call, nil, :b), true)"
    );
    assert_eq!(
        parse_expr("begin\nb\nend while a"),
        "(:while, (:call, nil, :a), (:call, nil, :b), false)"
    );
    assert_eq!(
        parse_expr("for x in list\nx\nend"),
        "(:for, (:call, nil, :list), (:lasgn, :x), (:lvar, :x))"
    );
}

#[test]
fn logical_operators_regroup_right() {
    assert_eq!(
        parse_expr("a && b"),
        "(:and, (:call, nil, :a), (:call, nil, :b))"
    );
    assert_eq!(
        parse_expr("a and b"),
        "(:and, (:call, nil, :a), (:call, nil, :b))"
    );
    assert_eq!(
        parse_expr("a || b"),
        "(:or, (:call, nil, :a), (:call, nil, :b))"
    );
    assert_eq!(
        parse_expr("a && b && c"),
        "(:and, (:call, nil, :a), (:and, (:call, nil, :b), (:call, nil, :c)))"
    );
    assert_eq!(
        parse_expr("a || b || c"),
        "(:or, (:call, nil, :a), (:or, (:call, nil, :b), (:call, nil, :c)))"
    );
}

#[test]
fn ranges() {
    assert_eq!(parse_expr("1..3"), "(:lit, 1..3)");
    assert_eq!(parse_expr("1...3"), "(:lit, 1...3)");
    assert_eq!(
        parse_expr("a..b"),
        "(:dot2, (:call, nil, :a), (:call, nil, :b))"
    );
    assert_eq!(
        parse_expr("a...b"),
        "(:dot3, (:call, nil, :a), (:call, nil, :b))"
    );
    assert_eq!(parse_expr("..5"), "(:dot2, nil, (:lit, 5))");
    assert_eq!(parse_expr("(1..)"), "(:dot2, (:lit, 1), nil)");
}

#[test]
fn regexps_and_matching() {
    assert_eq!(parse_expr("/foo/"), "(:lit, /foo/)");
    assert_eq!(parse_expr("/foo/i"), "(:lit, /foo/i)");
    assert_eq!(
        parse_expr("/foo/i =~ s"),
        "(:match2, (:lit, /foo/i), (:call, nil, :s))"
    );
    assert_eq!(
        parse_expr("s =~ /foo/"),
        "(:match3, (:lit, /foo/), (:call, nil, :s))"
    );
    assert_eq!(
        parse_expr("a !~ b"),
        "(:not, (:call, (:call, nil, :a), :=~, (:call, nil, :b)))"
    );
    assert_eq!(
        parse_expr("/a#{b}c/"),
        "(:dregx, \"a\", (:evstr, (:call, nil, :b)), (:str, \"c\"))"
    );
}

#[test]
fn interpolated_strings() {
    assert_eq!(
        parse_expr("\"x#{y}z\""),
        "(:dstr, \"x\", (:evstr, (:call, nil, :y)), (:str, \"z\"))"
    );
    assert_eq!(
        parse_expr("\"#{y}\""),
        "(:dstr, \"\", (:evstr, (:call, nil, :y)))"
    );
    assert_eq!(parse_expr("\"\""), "(:str, \"\")");
    assert_eq!(
        parse_expr(":\"a#{b}\""),
        "(:dsym, \"a\", (:evstr, (:call, nil, :b)))"
    );
    assert_eq!(parse_expr("`ls`"), "(:xstr, \"ls\")");
    assert_eq!(
        parse_expr("`ls #{d}`"),
        "(:dxstr, \"ls \", (:evstr, (:call, nil, :d)))"
    );
}

#[test]
fn adjacent_strings_merge() {
    assert_eq!(parse_expr("\"a\" \"b\""), "(:str, \"ab\")");
    assert_eq!(parse_expr("\"a\" 'b'"), "(:str, \"ab\")");
    assert_eq!(
        parse_expr("\"a#{b}\" \"c\""),
        "(:dstr, \"a\", (:evstr, (:call, nil, :b)), (:str, \"c\"))"
    );
}

#[test]
fn arrays_and_hashes() {
    assert_eq!(parse_expr("[]"), "(:array)");
    assert_eq!(parse_expr("[1, 2]"), "(:array, (:lit, 1), (:lit, 2))");
    assert_eq!(
        parse_expr("{ a: 1, \"b\" => 2 }"),
        "(:hash, (:lit, :a), (:lit, 1), (:str, \"b\"), (:lit, 2))"
    );
    assert_eq!(parse_expr("{}"), "(:hash)");
    assert_eq!(
        parse_expr("%w[a b]"),
        "(:array, (:str, \"a\"), (:str, \"b\"))"
    );
    assert_eq!(parse_expr("%i[a b]"), "(:array, (:lit, :a), (:lit, :b))");
    assert_eq!(
        parse_expr("[1, a: 2]"),
        "(:array, (:lit, 1), (:hash, (:lit, :a), (:lit, 2)))"
    );
    assert_eq!(
        parse_expr("{ \"k\": 1 }"),
        "(:hash, (:lit, :k), (:lit, 1))"
    );
}

#[test]
fn case_when() {
    assert_eq!(
        parse_expr("case x\nwhen 1, 2\ny\nend"),
        "(:case, (:call, nil, :x), (:when, (:array, (:lit, 1), (:lit, 2)), (:call, nil, :y)), nil)"
    );
    assert_eq!(
        parse_expr("case x\nwhen 1\ny\nelse\nz\nend"),
        "(:case, (:call, nil, :x), (:when, (:array, (:lit, 1)), (:call, nil, :y)), (:call, nil, :z))"
    );
}

#[test]
fn case_in_patterns() {
    assert_eq!(
        parse_expr("case x\nin [a, *b]\nend"),
        "(:case, (:call, nil, :x), (:in, (:array_pat, nil, (:lvar, :a), (:lvar, :*b)), nil), nil)"
    );
    assert_eq!(
        parse_expr("case x\nin { a:, b: 1 }\nend"),
        "(:case, (:call, nil, :x), (:in, (:hash_pat, nil, (:lit, :a), nil, (:lit, :b), (:lit, 1)), nil), nil)"
    );
    assert_eq!(
        parse_expr("case x\nin 1 | 2\nend"),
        "(:case, (:call, nil, :x), (:in, (:or, (:lit, 1), (:lit, 2)), nil), nil)"
    );
    assert_eq!(
        parse_expr("case x\nin Foo => f\nend"),
        "(:case, (:call, nil, :x), (:in, (:lasgn, :f, (:const, :Foo)), nil), nil)"
    );
    assert_eq!(
        parse_expr("case x\nin ^y\nend"),
        "(:case, (:call, nil, :x), (:in, (:pin, (:lvar, :y)), nil), nil)"
    );
    assert_eq!(
        parse_expr("case x\nin { **rest }\nend"),
        "(:case, (:call, nil, :x), (:in, (:hash_pat, nil, (:kwrest, :**rest)), nil), nil)"
    );
}

#[test]
fn begin_rescue_ensure() {
    assert_eq!(
        parse_expr("begin\na\nrescue E => ex\nb\nelse\nc\nensure\nd\nend"),
        "(:ensure, (:rescue, (:call, nil, :a), (:resbody, (:array, (:const, :E), (:lasgn, :ex, (:gvar, :$!))), (:call, nil, :b)), (:call, nil, :c)), (:call, nil, :d))"
    );
    assert_eq!(
        parse_expr("begin\na\nrescue\nb\nend"),
        "(:rescue, (:call, nil, :a), (:resbody, (:array), (:call, nil, :b)))"
    );
    assert_eq!(
        parse_expr("x rescue 0"),
        "(:rescue, (:call, nil, :x), (:resbody, (:array), (:lit, 0)))"
    );
    assert_eq!(parse("begin\n1\nend"), "(:block, (:block, (:lit, 1)))");
}

#[test]
fn method_bodies_allow_inline_rescue() {
    assert_eq!(
        parse_expr("def foo\na\nrescue\nb\nend"),
        "(:defn, :foo, (:args), (:rescue, (:call, nil, :a), (:resbody, (:array), (:call, nil, :b))))"
    );
}

#[test]
fn control_keywords() {
    assert_eq!(parse_expr("break"), "(:break)");
    assert_eq!(parse_expr("break 1"), "(:break, (:lit, 1))");
    assert_eq!(parse_expr("next()"), "(:next, (:nil))");
    assert_eq!(parse_expr("redo"), "(:redo)");
    assert_eq!(parse_expr("retry"), "(:retry)");
    assert_eq!(parse_expr("return"), "(:return)");
    assert_eq!(
        parse_expr("return 1, 2"),
        "(:return, (:array, (:lit, 1), (:lit, 2)))"
    );
    assert_eq!(parse_expr("yield"), "(:yield)");
    assert_eq!(parse_expr("yield 1"), "(:yield, (:lit, 1))");
    assert_eq!(parse_expr("super"), "(:zsuper)");
    assert_eq!(parse_expr("super()"), "(:super)");
    assert_eq!(parse_expr("super(1)"), "(:super, (:lit, 1))");
    assert_eq!(parse_expr("super 1"), "(:super, (:lit, 1))");
    assert_eq!(parse_expr("defined?(x)"), "(:defined, (:call, nil, :x))");
}

#[test]
fn phase_blocks() {
    assert_eq!(
        parse_expr("BEGIN { 1 }"),
        "(:iter, (:preexe), 0, (:lit, 1))"
    );
    assert_eq!(
        parse_expr("END { 1 }"),
        "(:iter, (:postexe), 0, (:lit, 1))"
    );
}

#[test]
fn alias_and_undef() {
    assert_eq!(parse_expr("alias a b"), "(:alias, (:lit, :a), (:lit, :b))");
    assert_eq!(
        parse_expr("alias << push"),
        "(:alias, (:lit, :<<), (:lit, :push))"
    );
    assert_eq!(parse_expr("undef a"), "(:undef, (:lit, :a))");
    assert_eq!(
        parse_expr("undef a, b"),
        "(:block, (:undef, (:lit, :a)), (:undef, (:lit, :b)))"
    );
}

#[test]
fn alias_reinserts_the_folded_newline() {
    assert_eq!(
        parse("alias foo <<\ndef bar\nend"),
        "(:block, (:alias, (:lit, :foo), (:lit, :<<)), (:defn, :bar, (:args), (:nil)))"
    );
}

#[test]
fn heredocs() {
    assert_eq!(
        parse_expr("s = <<~EOF\n  hi\nEOF"),
        "(:lasgn, :s, (:str, \"hi\\n\"))"
    );
    assert_eq!(
        parse_expr("s = <<'EOF'\nraw\nEOF"),
        "(:lasgn, :s, (:str, \"raw\\n\"))"
    );
    assert_eq!(
        parse_expr("s = <<EOF\na#{b}c\nEOF"),
        "(:lasgn, :s, (:dstr, \"a\", (:evstr, (:call, nil, :b)), (:str, \"c\\n\")))"
    );
    // a method call on the opener line applies to the heredoc string
    assert_eq!(
        parse_expr("x = <<-EOF.size\nabc\nEOF"),
        "(:lasgn, :x, (:call, (:str, \"abc\\n\"), :size))"
    );
}

#[test]
fn groups_and_empty_parens() {
    assert_eq!(parse_expr("()"), "(:nil)");
    assert_eq!(parse_expr("(1)"), "(:lit, 1)");
    assert_eq!(
        parse_expr("(a\nb)"),
        "(:block, (:call, nil, :a), (:call, nil, :b))"
    );
}

#[test]
fn collapsed_newlines_keep_chains_together() {
    assert_eq!(
        parse_expr("foo\n.bar"),
        "(:call, (:call, nil, :foo), :bar)"
    );
    assert_eq!(
        parse_expr("1 +\n2"),
        "(:call, (:lit, 1), :+, (:lit, 2))"
    );
}

#[test]
fn keyword_method_names_after_dot() {
    assert_eq!(parse_expr("a.class"), "(:call, (:call, nil, :a), :class)");
    assert_eq!(parse_expr("a.nil?"), "(:call, (:call, nil, :a), :nil?)");
}

//! The visitor interface the AST drives to materialize output.

use crate::node::Node;

/// Output-construction vocabulary.
///
/// `Node::transform` calls back into this trait to build one sexp; nested
/// nodes recurse through [`Creator::append`], which hands each child a fresh
/// sub-creator in the concrete implementations.
///
/// The `assignment` bit threads write-position context down the tree: an
/// identifier renders as `lvar`/`ivar`/… in read position and as
/// `lasgn`/`iasgn`/… when the bit is set. Use [`with_assignment`] to flip it
/// for a sub-render and restore the surrounding context afterwards.
pub trait Creator {
    /// Set or replace the sexp's head symbol.
    fn set_type(&mut self, type_name: &str);
    /// Attach documentation text (from `=begin`/full-line comments) to the
    /// sexp under construction. Implementations may ignore it.
    fn set_comments(&mut self, comments: &str);
    /// Render `node` and push the result as the next child.
    fn append(&mut self, node: &Node);
    /// Render `array` with the plain `array` tag even when the node's own
    /// transform would pick a different head (pattern forms).
    fn append_array(&mut self, array: &Node);
    fn append_false(&mut self);
    fn append_true(&mut self);
    /// Push the `nil` atom.
    fn append_nil(&mut self);
    /// Push an explicit `(:nil)` sexp (the empty-parentheses form), as
    /// opposed to the bare `nil` atom.
    fn append_nil_sexp(&mut self);
    fn append_float(&mut self, number: f64);
    fn append_integer(&mut self, number: i64);
    /// Push an integer that exceeded the small-integer ceiling; the textual
    /// spelling is authoritative.
    fn append_bignum(&mut self, number: &str);
    fn append_range(&mut self, first: i64, last: i64, exclude_end: bool);
    fn append_regexp(&mut self, pattern: &str, options: i32);
    fn append_string(&mut self, string: &str);
    fn append_symbol(&mut self, name: &str);
    /// Build a nested sexp with a fresh sub-creator and push it.
    fn append_sexp(&mut self, f: &mut dyn FnMut(&mut dyn Creator));
    /// Push a rational value (`make_rational_number` in the reference
    /// vocabulary).
    fn make_rational_number(&mut self, numerator: i64, denominator: i64);
    /// Push a complex value. The core parser never produces one; the method
    /// exists so host adapters can cover the full vocabulary.
    fn make_complex_number(&mut self, real: f64, imaginary: f64);
    /// Replace the sexp built so far with `(type_name, <old sexp>)`.
    fn wrap(&mut self, type_name: &str);

    fn assignment(&self) -> bool;
    fn set_assignment(&mut self, assignment: bool);
}

/// Run `f` with the assignment bit set to `assignment`, restoring the
/// surrounding value on exit.
pub fn with_assignment<F>(creator: &mut dyn Creator, assignment: bool, f: F)
where
    F: FnOnce(&mut dyn Creator),
{
    let assignment_was = creator.assignment();
    creator.set_assignment(assignment);
    f(creator);
    creator.set_assignment(assignment_was);
}

//! AST definitions for the Ruby parser.
//!
//! The tree is a closed sum ([`NodeKind`]) wrapped with its originating
//! token ([`Node`]). Output happens exclusively through the [`Creator`]
//! visitor: every node knows how to render itself as an S-expression in the
//! RubyParser convention via [`Node::transform`], and the consumer decides
//! what a sexp *is* by picking a `Creator` implementation — text for tests
//! ([`DebugCreator`]) or native values ([`SexpCreator`]).

pub mod creator;
pub mod debug_creator;
pub mod node;
pub mod sexp_creator;

pub use creator::{with_assignment, Creator};
pub use debug_creator::DebugCreator;
pub use node::{Node, NodeKind};
pub use sexp_creator::{Sexp, SexpCreator, SexpValue};

//! Syntax layer for the retype return-type repair engine.
//!
//! This crate provides:
//! - A scanner producing tokens with full-fidelity trivia attachment
//!   (leading/trailing whitespace and comments are part of every token's
//!   full span, so token full texts concatenate back to the source).
//! - An arena-indexed immutable AST with parent pointers, covering a small
//!   C#-flavored method grammar: classes, method declarations with
//!   modifiers and return types, blocks, return statements, and the few
//!   expression shapes the repair engine needs to see.
//! - The `SyntaxFacts` capability trait that parameterizes the repair core
//!   over the four node kinds it cares about, implemented once per grammar.

pub mod scanner;
pub use scanner::{Scanner, Token, TokenIndex, TokenKind};

pub mod node;
pub use node::{
    ModifierFlags, Node, NodeArena, NodeIndex, NodeList, SyntaxKind, SyntaxTree,
};

pub mod parser;
pub use parser::{ParserState, parse_source};

pub mod facts;
pub use facts::{CsFacts, SyntaxFacts};

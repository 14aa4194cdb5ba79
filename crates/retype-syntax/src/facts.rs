//! Grammar capability interface.
//!
//! The repair core never pattern-matches on grammar-specific node shapes.
//! It sees exactly four node kinds — method declaration, method return type,
//! return statement, return expression — through this trait, implemented
//! once per source grammar.

use crate::node::{ModifierFlags, Node, NodeIndex, SyntaxTree};

pub trait SyntaxFacts {
    fn is_method_declaration(&self, tree: &SyntaxTree, node: NodeIndex) -> bool;

    fn is_return_statement(&self, tree: &SyntaxTree, node: NodeIndex) -> bool;

    /// The return-type annotation node of a method declaration.
    fn method_return_type(&self, tree: &SyntaxTree, method: NodeIndex) -> Option<NodeIndex>;

    /// Whether the method is declared to execute asynchronously.
    fn method_is_async(&self, tree: &SyntaxTree, method: NodeIndex) -> bool;

    /// The returned expression of a return statement, if any.
    fn return_expression(&self, tree: &SyntaxTree, ret: NodeIndex) -> Option<NodeIndex>;
}

/// `SyntaxFacts` for the C#-flavored grammar in this crate.
#[derive(Copy, Clone, Debug, Default)]
pub struct CsFacts;

impl SyntaxFacts for CsFacts {
    fn is_method_declaration(&self, tree: &SyntaxTree, node: NodeIndex) -> bool {
        matches!(tree.arena.get(node), Some(Node::MethodDeclaration(_)))
    }

    fn is_return_statement(&self, tree: &SyntaxTree, node: NodeIndex) -> bool {
        matches!(tree.arena.get(node), Some(Node::ReturnStatement(_)))
    }

    fn method_return_type(&self, tree: &SyntaxTree, method: NodeIndex) -> Option<NodeIndex> {
        match tree.arena.get(method) {
            Some(Node::MethodDeclaration(data)) if data.return_type.is_some() => {
                Some(data.return_type)
            }
            _ => None,
        }
    }

    fn method_is_async(&self, tree: &SyntaxTree, method: NodeIndex) -> bool {
        match tree.arena.get(method) {
            Some(Node::MethodDeclaration(data)) => {
                data.modifier_flags.contains(ModifierFlags::ASYNC)
            }
            _ => false,
        }
    }

    fn return_expression(&self, tree: &SyntaxTree, ret: NodeIndex) -> Option<NodeIndex> {
        match tree.arena.get(ret) {
            Some(Node::ReturnStatement(data)) if data.expression.is_some() => {
                Some(data.expression)
            }
            _ => None,
        }
    }
}

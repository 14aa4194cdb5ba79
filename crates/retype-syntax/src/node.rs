//! Arena-based AST storage.
//!
//! Nodes are stored contiguously in a `NodeArena` and referenced by
//! `NodeIndex`. Trees are immutable once parsed; every node carries its
//! parent index so ancestor walks are iterative parent-pointer traversals
//! rather than recursive descents.

use crate::scanner::{Token, TokenIndex, TokenKind};
use bitflags::bitflags;
use retype_common::Span;
use serde::{Serialize, Serializer};

/// Index of a node in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub fn is_none(self) -> bool {
        self == NodeIndex::NONE
    }

    pub fn is_some(self) -> bool {
        self != NodeIndex::NONE
    }
}

/// An ordered list of child nodes.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SyntaxKind {
    SourceFile,
    ClassDeclaration,
    MethodDeclaration,
    Parameter,
    TypeRef,
    Block,
    ReturnStatement,
    ExpressionStatement,
    LiteralExpression,
    IdentifierExpression,
    NewExpression,
    AnonymousObjectExpression,
}

bitflags! {
    /// Cached modifier flags for declarations.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct ModifierFlags: u32 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL = 1 << 3;
        const STATIC = 1 << 4;
        const ASYNC = 1 << 5;
        const ABSTRACT = 1 << 6;
        const VIRTUAL = 1 << 7;
        const OVERRIDE = 1 << 8;
        const SEALED = 1 << 9;
    }
}

// bitflags types carry no serde impls; serialize as the raw bits so the
// wire shape stays a plain integer.
impl Serialize for ModifierFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl ModifierFlags {
    pub fn from_token(kind: TokenKind) -> ModifierFlags {
        match kind {
            TokenKind::PublicKeyword => ModifierFlags::PUBLIC,
            TokenKind::PrivateKeyword => ModifierFlags::PRIVATE,
            TokenKind::ProtectedKeyword => ModifierFlags::PROTECTED,
            TokenKind::InternalKeyword => ModifierFlags::INTERNAL,
            TokenKind::StaticKeyword => ModifierFlags::STATIC,
            TokenKind::AsyncKeyword => ModifierFlags::ASYNC,
            TokenKind::AbstractKeyword => ModifierFlags::ABSTRACT,
            TokenKind::VirtualKeyword => ModifierFlags::VIRTUAL,
            TokenKind::OverrideKeyword => ModifierFlags::OVERRIDE,
            TokenKind::SealedKeyword => ModifierFlags::SEALED,
            _ => ModifierFlags::empty(),
        }
    }
}

/// Common fields present in all AST nodes.
///
/// `pos`/`end` bound the node's own text; `full_pos`/`full_end` include the
/// trivia owned by its first and last tokens.
#[derive(Clone, Debug, Serialize)]
pub struct NodeBase {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    pub full_pos: u32,
    pub full_end: u32,
    pub parent: NodeIndex,
}

impl NodeBase {
    pub fn new(kind: SyntaxKind, first: &Token, last: &Token) -> NodeBase {
        NodeBase {
            kind,
            pos: first.start,
            end: last.end,
            full_pos: first.full_start,
            full_end: last.full_end,
            parent: NodeIndex::NONE,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.pos, self.end)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub base: NodeBase,
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub base: NodeBase,
    pub name: TokenIndex,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct MethodData {
    pub base: NodeBase,
    pub modifier_tokens: Vec<TokenIndex>,
    pub modifier_flags: ModifierFlags,
    pub return_type: NodeIndex,
    pub name: TokenIndex,
    pub parameters: NodeList,
    /// Block body, or NONE for abstract/extern members ending in `;`.
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    pub base: NodeBase,
    pub type_node: NodeIndex,
    pub name: TokenIndex,
}

/// A type reference: a predefined keyword, a (possibly dotted) name, and
/// optional type arguments, e.g. `int`, `N.C`, `Task<int>`.
#[derive(Clone, Debug, Serialize)]
pub struct TypeRefData {
    pub base: NodeBase,
    /// The identifier/keyword tokens of the dotted name, in source order.
    pub name_parts: Vec<TokenIndex>,
    pub type_args: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct BlockData {
    pub base: NodeBase,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReturnData {
    pub base: NodeBase,
    pub keyword: TokenIndex,
    /// NONE for a bare `return;`.
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExpressionStatementData {
    pub base: NodeBase,
    pub expression: NodeIndex,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum LiteralKind {
    Int,
    String,
    Bool,
    Null,
}

#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    pub base: NodeBase,
    pub token: TokenIndex,
    pub literal_kind: LiteralKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub base: NodeBase,
    pub token: TokenIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewExpressionData {
    pub base: NodeBase,
    pub type_node: NodeIndex,
}

/// `new { ... }` — an anonymous object creation. The member initializers are
/// not modeled; the expression's type is nameless by construction.
#[derive(Clone, Debug, Serialize)]
pub struct AnonymousObjectData {
    pub base: NodeBase,
}

#[derive(Clone, Debug, Serialize)]
pub enum Node {
    SourceFile(SourceFileData),
    ClassDeclaration(ClassData),
    MethodDeclaration(MethodData),
    Parameter(ParameterData),
    TypeRef(TypeRefData),
    Block(BlockData),
    ReturnStatement(ReturnData),
    ExpressionStatement(ExpressionStatementData),
    LiteralExpression(LiteralData),
    IdentifierExpression(IdentifierData),
    NewExpression(NewExpressionData),
    AnonymousObjectExpression(AnonymousObjectData),
}

impl Node {
    pub fn base(&self) -> &NodeBase {
        match self {
            Node::SourceFile(n) => &n.base,
            Node::ClassDeclaration(n) => &n.base,
            Node::MethodDeclaration(n) => &n.base,
            Node::Parameter(n) => &n.base,
            Node::TypeRef(n) => &n.base,
            Node::Block(n) => &n.base,
            Node::ReturnStatement(n) => &n.base,
            Node::ExpressionStatement(n) => &n.base,
            Node::LiteralExpression(n) => &n.base,
            Node::IdentifierExpression(n) => &n.base,
            Node::NewExpression(n) => &n.base,
            Node::AnonymousObjectExpression(n) => &n.base,
        }
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        match self {
            Node::SourceFile(n) => &mut n.base,
            Node::ClassDeclaration(n) => &mut n.base,
            Node::MethodDeclaration(n) => &mut n.base,
            Node::Parameter(n) => &mut n.base,
            Node::TypeRef(n) => &mut n.base,
            Node::Block(n) => &mut n.base,
            Node::ReturnStatement(n) => &mut n.base,
            Node::ExpressionStatement(n) => &mut n.base,
            Node::LiteralExpression(n) => &mut n.base,
            Node::IdentifierExpression(n) => &mut n.base,
            Node::NewExpression(n) => &mut n.base,
            Node::AnonymousObjectExpression(n) => &mut n.base,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.base().kind
    }
}

/// Arena-based storage for AST nodes.
#[derive(Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    /// Add a node to the arena and return its index. Children are created
    /// before parents, so parent pointers for the node's children are
    /// stamped here.
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        for child in self.children_of(index) {
            if let Some(n) = self.nodes.get_mut(child.0 as usize) {
                n.base_mut().parent = index;
            }
        }
        index
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    pub fn kind(&self, index: NodeIndex) -> Option<SyntaxKind> {
        self.get(index).map(|n| n.kind())
    }

    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index)
            .map(|n| n.base().parent)
            .unwrap_or(NodeIndex::NONE)
    }

    /// Iterate ancestors from `index` itself up to the root.
    pub fn ancestors_and_self(
        &self,
        index: NodeIndex,
    ) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut current = index;
        std::iter::from_fn(move || {
            if current.is_none() {
                return None;
            }
            let result = current;
            current = self.parent(current);
            Some(result)
        })
    }

    /// Direct children of a node, in source order.
    pub fn children_of(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let Some(node) = self.get(index) else {
            return Vec::new();
        };

        let mut children = Vec::new();
        let add_opt = |children: &mut Vec<NodeIndex>, idx: NodeIndex| {
            if idx.is_some() {
                children.push(idx);
            }
        };
        let add_list = |children: &mut Vec<NodeIndex>, list: &NodeList| {
            children.extend(list.nodes.iter().copied());
        };

        match node {
            Node::SourceFile(n) => add_list(&mut children, &n.declarations),
            Node::ClassDeclaration(n) => add_list(&mut children, &n.members),
            Node::MethodDeclaration(n) => {
                add_opt(&mut children, n.return_type);
                add_list(&mut children, &n.parameters);
                add_opt(&mut children, n.body);
            }
            Node::Parameter(n) => add_opt(&mut children, n.type_node),
            Node::TypeRef(n) => add_list(&mut children, &n.type_args),
            Node::Block(n) => add_list(&mut children, &n.statements),
            Node::ReturnStatement(n) => add_opt(&mut children, n.expression),
            Node::ExpressionStatement(n) => add_opt(&mut children, n.expression),
            Node::NewExpression(n) => add_opt(&mut children, n.type_node),
            Node::LiteralExpression(_)
            | Node::IdentifierExpression(_)
            | Node::AnonymousObjectExpression(_) => {}
        }

        children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A parsed source file: the immutable snapshot a repair invocation runs
/// against.
#[derive(Debug, Serialize)]
pub struct SyntaxTree {
    pub file_name: String,
    pub source: String,
    pub tokens: Vec<Token>,
    pub arena: NodeArena,
    pub root: NodeIndex,
}

impl SyntaxTree {
    pub fn token(&self, index: TokenIndex) -> &Token {
        &self.tokens[index.0 as usize]
    }

    pub fn token_text(&self, index: TokenIndex) -> &str {
        self.token(index).text(&self.source)
    }

    /// Find the token whose text span intersects `pos` (end-inclusive, the
    /// editor caret convention). Trivia positions resolve to no token.
    pub fn token_at(&self, pos: u32) -> Option<TokenIndex> {
        // Tokens are sorted by position; partition on text start.
        let idx = self.tokens.partition_point(|t| t.start <= pos);
        if idx == 0 {
            return None;
        }
        let candidate = idx - 1;
        let token = &self.tokens[candidate];
        if token.kind != TokenKind::EndOfFile && token.span().intersects_pos(pos) {
            Some(TokenIndex(candidate as u32))
        } else {
            None
        }
    }

    /// Find the smallest node whose text span contains the token at `index`.
    pub fn node_covering_token(&self, index: TokenIndex) -> NodeIndex {
        let pos = self.token(index).start;
        let mut best = NodeIndex::NONE;
        let mut best_len = u32::MAX;
        for (i, node) in self.arena.nodes.iter().enumerate() {
            let span = node.base().span();
            if span.contains_pos(pos) && span.len() < best_len {
                best = NodeIndex(i as u32);
                best_len = span.len();
            }
        }
        best
    }

    pub fn node_text(&self, index: NodeIndex) -> &str {
        match self.arena.get(index) {
            Some(node) => node.base().span().text(&self.source),
            None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_flags_serialize_as_raw_bits() {
        let flags = ModifierFlags::PUBLIC | ModifierFlags::ASYNC;
        let value = serde_json::to_value(flags).unwrap();
        assert_eq!(value, serde_json::json!(flags.bits()));
    }

    #[test]
    fn parsed_trees_serialize() {
        let tree = crate::parser::parse_source("class C { public async void M() { return; } }");
        let json = serde_json::to_value(&tree).unwrap();
        let text = json.to_string();
        assert!(text.contains("MethodDeclaration"));
        let flags = ModifierFlags::PUBLIC | ModifierFlags::ASYNC;
        assert!(text.contains(&format!("\"modifier_flags\":{}", flags.bits())));
    }
}

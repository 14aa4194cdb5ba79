//! Recursive-descent parser for the C#-flavored method grammar.
//!
//! The grammar covers exactly what the repair engine needs to see: class
//! declarations containing methods with modifiers, a return type, parameters,
//! and a block body; return statements; and the handful of expression shapes
//! the oracle can type. The parser is lenient — unrecognized tokens are
//! skipped at recovery points rather than failing the parse, since the
//! engine only ever anchors on well-formed spans.

use crate::node::{
    AnonymousObjectData, BlockData, ClassData, ExpressionStatementData, IdentifierData,
    LiteralData, LiteralKind, MethodData, ModifierFlags, NewExpressionData, Node, NodeArena,
    NodeBase, NodeIndex, NodeList, ParameterData, ReturnData, SourceFileData, SyntaxKind,
    SyntaxTree, TypeRefData,
};
use crate::scanner::{Scanner, Token, TokenIndex, TokenKind};

pub struct ParserState {
    file_name: String,
    source: String,
    tokens: Vec<Token>,
    pos: usize,
    arena: NodeArena,
}

impl ParserState {
    pub fn new(file_name: String, source: String) -> ParserState {
        let tokens = Scanner::new(&source).scan_all();
        ParserState {
            file_name,
            source,
            tokens,
            pos: 0,
            arena: NodeArena::new(),
        }
    }

    /// Parse the whole source into an immutable tree.
    pub fn parse(mut self) -> SyntaxTree {
        let first = self.current_index();
        let mut declarations = NodeList::default();

        while !self.at(TokenKind::EndOfFile) {
            if let Some(class) = self.parse_class_declaration() {
                declarations.nodes.push(class);
            } else {
                // Recovery: skip a token we don't understand at top level.
                self.bump();
            }
        }

        let base = self.node_base(SyntaxKind::SourceFile, first, self.last_consumed());
        let root = self.arena.add(Node::SourceFile(SourceFileData {
            base,
            declarations,
        }));

        SyntaxTree {
            file_name: self.file_name,
            source: self.source,
            tokens: self.tokens,
            arena: self.arena,
            root,
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_class_declaration(&mut self) -> Option<NodeIndex> {
        let first = self.current_index();

        while self.current_kind().is_modifier() {
            self.bump();
        }
        if !self.at(TokenKind::ClassKeyword) {
            return None;
        }
        self.bump();

        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::OpenBrace)?;

        let mut members = NodeList::default();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::EndOfFile) {
            if let Some(member) = self.parse_method_declaration() {
                members.nodes.push(member);
            } else {
                self.bump();
            }
        }
        let _ = self.expect(TokenKind::CloseBrace);

        let base = self.node_base(SyntaxKind::ClassDeclaration, first, self.last_consumed());
        Some(self.arena.add(Node::ClassDeclaration(ClassData {
            base,
            name,
            members,
        })))
    }

    fn parse_method_declaration(&mut self) -> Option<NodeIndex> {
        let first = self.current_index();

        let mut modifier_tokens = Vec::new();
        let mut modifier_flags = ModifierFlags::empty();
        while self.current_kind().is_modifier() {
            modifier_flags |= ModifierFlags::from_token(self.current_kind());
            modifier_tokens.push(self.bump());
        }

        let return_type = self.parse_type_ref()?;
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::OpenParen)?;

        let mut parameters = NodeList::default();
        while !self.at(TokenKind::CloseParen) && !self.at(TokenKind::EndOfFile) {
            if let Some(param) = self.parse_parameter() {
                parameters.nodes.push(param);
            } else {
                self.bump();
            }
            if self.at(TokenKind::Comma) {
                self.bump();
            }
        }
        let _ = self.expect(TokenKind::CloseParen);

        let body = if self.at(TokenKind::Semicolon) {
            self.bump();
            NodeIndex::NONE
        } else {
            self.parse_block()?
        };

        let base = self.node_base(SyntaxKind::MethodDeclaration, first, self.last_consumed());
        Some(self.arena.add(Node::MethodDeclaration(MethodData {
            base,
            modifier_tokens,
            modifier_flags,
            return_type,
            name,
            parameters,
            body,
        })))
    }

    fn parse_parameter(&mut self) -> Option<NodeIndex> {
        let first = self.current_index();
        let type_node = self.parse_type_ref()?;
        let name = self.expect(TokenKind::Identifier)?;
        let base = self.node_base(SyntaxKind::Parameter, first, self.last_consumed());
        Some(self.arena.add(Node::Parameter(ParameterData {
            base,
            type_node,
            name,
        })))
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn parse_type_ref(&mut self) -> Option<NodeIndex> {
        let first = self.current_index();
        let mut name_parts = Vec::new();

        if self.current_kind().is_predefined_type() {
            name_parts.push(self.bump());
        } else if self.at(TokenKind::Identifier) {
            name_parts.push(self.bump());
            while self.at(TokenKind::Dot) {
                self.bump();
                name_parts.push(self.expect(TokenKind::Identifier)?);
            }
        } else {
            return None;
        }

        let mut type_args = NodeList::default();
        if self.at(TokenKind::LessThan) {
            self.bump();
            while !self.at(TokenKind::GreaterThan) && !self.at(TokenKind::EndOfFile) {
                if let Some(arg) = self.parse_type_ref() {
                    type_args.nodes.push(arg);
                } else {
                    self.bump();
                }
                if self.at(TokenKind::Comma) {
                    self.bump();
                }
            }
            let _ = self.expect(TokenKind::GreaterThan);
        }

        let base = self.node_base(SyntaxKind::TypeRef, first, self.last_consumed());
        Some(self.arena.add(Node::TypeRef(TypeRefData {
            base,
            name_parts,
            type_args,
        })))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_block(&mut self) -> Option<NodeIndex> {
        let first = self.current_index();
        if !self.at(TokenKind::OpenBrace) {
            return None;
        }
        self.bump();

        let mut statements = NodeList::default();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::EndOfFile) {
            if let Some(stmt) = self.parse_statement() {
                statements.nodes.push(stmt);
            } else {
                self.bump();
            }
        }
        let _ = self.expect(TokenKind::CloseBrace);

        let base = self.node_base(SyntaxKind::Block, first, self.last_consumed());
        Some(self.arena.add(Node::Block(BlockData { base, statements })))
    }

    fn parse_statement(&mut self) -> Option<NodeIndex> {
        match self.current_kind() {
            TokenKind::ReturnKeyword => self.parse_return_statement(),
            TokenKind::OpenBrace => self.parse_block(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_return_statement(&mut self) -> Option<NodeIndex> {
        let first = self.current_index();
        let keyword = self.bump();

        let expression = if self.at(TokenKind::Semicolon) {
            NodeIndex::NONE
        } else {
            self.parse_expression()?
        };
        let _ = self.expect(TokenKind::Semicolon);

        let base = self.node_base(SyntaxKind::ReturnStatement, first, self.last_consumed());
        Some(self.arena.add(Node::ReturnStatement(ReturnData {
            base,
            keyword,
            expression,
        })))
    }

    fn parse_expression_statement(&mut self) -> Option<NodeIndex> {
        let first = self.current_index();
        let expression = self.parse_expression()?;
        let _ = self.expect(TokenKind::Semicolon);
        let base = self.node_base(
            SyntaxKind::ExpressionStatement,
            first,
            self.last_consumed(),
        );
        Some(self
            .arena
            .add(Node::ExpressionStatement(ExpressionStatementData {
                base,
                expression,
            })))
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> Option<NodeIndex> {
        match self.current_kind() {
            TokenKind::IntLiteral => self.parse_literal(LiteralKind::Int),
            TokenKind::StringLiteral => self.parse_literal(LiteralKind::String),
            TokenKind::TrueKeyword | TokenKind::FalseKeyword => {
                self.parse_literal(LiteralKind::Bool)
            }
            TokenKind::NullKeyword => self.parse_literal(LiteralKind::Null),
            TokenKind::NewKeyword => self.parse_new_expression(),
            TokenKind::Identifier => {
                let first = self.current_index();
                let token = self.bump();
                let base = self.node_base(
                    SyntaxKind::IdentifierExpression,
                    first,
                    self.last_consumed(),
                );
                Some(self
                    .arena
                    .add(Node::IdentifierExpression(IdentifierData { base, token })))
            }
            _ => None,
        }
    }

    fn parse_literal(&mut self, literal_kind: LiteralKind) -> Option<NodeIndex> {
        let first = self.current_index();
        let token = self.bump();
        let base = self.node_base(SyntaxKind::LiteralExpression, first, self.last_consumed());
        Some(self.arena.add(Node::LiteralExpression(LiteralData {
            base,
            token,
            literal_kind,
        })))
    }

    fn parse_new_expression(&mut self) -> Option<NodeIndex> {
        let first = self.current_index();
        self.bump(); // new

        // `new { ... }` creates an anonymous type.
        if self.at(TokenKind::OpenBrace) {
            self.skip_balanced(TokenKind::OpenBrace, TokenKind::CloseBrace);
            let base = self.node_base(
                SyntaxKind::AnonymousObjectExpression,
                first,
                self.last_consumed(),
            );
            return Some(self
                .arena
                .add(Node::AnonymousObjectExpression(AnonymousObjectData { base })));
        }

        let type_node = self.parse_type_ref()?;
        if self.at(TokenKind::OpenParen) {
            self.skip_balanced(TokenKind::OpenParen, TokenKind::CloseParen);
        }

        let base = self.node_base(SyntaxKind::NewExpression, first, self.last_consumed());
        Some(self.arena.add(Node::NewExpression(NewExpressionData {
            base,
            type_node,
        })))
    }

    /// Consume `open`, then tokens up to and including the balancing `close`.
    /// Constructor arguments and anonymous-object initializers are opaque to
    /// the repair engine, so their contents are not modeled.
    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        debug_assert!(self.at(open));
        let mut depth = 0u32;
        while !self.at(TokenKind::EndOfFile) {
            let kind = self.current_kind();
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn current_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    fn current_index(&self) -> TokenIndex {
        TokenIndex(self.pos as u32)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn bump(&mut self) -> TokenIndex {
        let index = self.current_index();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        index
    }

    fn expect(&mut self, kind: TokenKind) -> Option<TokenIndex> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    fn last_consumed(&self) -> TokenIndex {
        TokenIndex(self.pos.saturating_sub(1) as u32)
    }

    fn node_base(&self, kind: SyntaxKind, first: TokenIndex, last: TokenIndex) -> NodeBase {
        NodeBase::new(
            kind,
            &self.tokens[first.0 as usize],
            &self.tokens[last.0 as usize],
        )
    }
}

/// Parse a source string with a default file name (test convenience).
pub fn parse_source(source: &str) -> SyntaxTree {
    ParserState::new("test.cs".to_string(), source.to_string()).parse()
}

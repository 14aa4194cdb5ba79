//! Semantic binding: the bridge from syntax nodes to type symbols.
//!
//! `SemanticModel::bind` runs one pass over a parsed tree and records a
//! type for every node the oracle can resolve: type annotations by name
//! lookup, literals by shape, object creations by their type reference,
//! anonymous object creations as fresh anonymous types, and identifiers by
//! enclosing-method parameter binding. Everything else stays unresolved —
//! an unresolved node is an answerable "none", not an error.

use crate::table::TypeTable;
use crate::types::{TypeId, TypeTag};
use crate::{TypeOracle, lineage};
use retype_syntax::node::{LiteralKind, Node, NodeIndex, SyntaxTree};
use rustc_hash::FxHashMap;
use tracing::trace;

pub struct SemanticModel<'a> {
    tree: &'a SyntaxTree,
    table: &'a TypeTable,
    node_types: FxHashMap<NodeIndex, TypeId>,
}

impl<'a> SemanticModel<'a> {
    /// Bind every resolvable node in `tree` against `table`.
    pub fn bind(tree: &'a SyntaxTree, table: &'a TypeTable) -> SemanticModel<'a> {
        let mut model = SemanticModel {
            tree,
            table,
            node_types: FxHashMap::default(),
        };

        // Children precede parents in the arena, so one forward pass sees
        // type annotations before the expressions that may refer to them.
        for i in 0..tree.arena.len() {
            let index = NodeIndex(i as u32);
            if let Some(ty) = model.bind_node(index) {
                model.node_types.insert(index, ty);
            }
        }

        model
    }

    fn bind_node(&self, index: NodeIndex) -> Option<TypeId> {
        match self.tree.arena.get(index)? {
            Node::TypeRef(_) => self.resolve_type_ref(index),
            Node::LiteralExpression(data) => match data.literal_kind {
                LiteralKind::Int => Some(TypeId::INT),
                LiteralKind::String => Some(TypeId::STRING),
                LiteralKind::Bool => Some(TypeId::BOOL),
                // The null literal has no type of its own.
                LiteralKind::Null => None,
            },
            Node::NewExpression(data) => self.node_types.get(&data.type_node).copied(),
            Node::AnonymousObjectExpression(_) => Some(self.table.anonymous()),
            Node::IdentifierExpression(data) => {
                let name = self.tree.token_text(data.token);
                self.bind_identifier(index, name)
            }
            _ => None,
        }
    }

    fn resolve_type_ref(&self, index: NodeIndex) -> Option<TypeId> {
        let Some(Node::TypeRef(data)) = self.tree.arena.get(index) else {
            return None;
        };

        let parts: Vec<&str> = data
            .name_parts
            .iter()
            .map(|t| self.tree.token_text(*t))
            .collect();

        if data.type_args.nodes.is_empty() {
            let resolved = self.table.lookup(&parts);
            if resolved.is_none() {
                trace!(name = %parts.join("."), "unresolved type reference");
            }
            return resolved;
        }

        // The only constructed type the oracle models is Task<T>.
        if parts == ["Task"] && data.type_args.nodes.len() == 1 {
            let arg = self.node_types.get(&data.type_args.nodes[0]).copied()?;
            return Some(self.table.task_of(arg));
        }
        None
    }

    /// Bind an identifier to the declared type of a same-named parameter of
    /// the innermost enclosing method.
    fn bind_identifier(&self, index: NodeIndex, name: &str) -> Option<TypeId> {
        let method = self
            .tree
            .arena
            .ancestors_and_self(index)
            .find(|idx| {
                matches!(self.tree.arena.get(*idx), Some(Node::MethodDeclaration(_)))
            })?;
        let Some(Node::MethodDeclaration(data)) = self.tree.arena.get(method) else {
            return None;
        };

        for param in &data.parameters.nodes {
            let Some(Node::Parameter(param_data)) = self.tree.arena.get(*param) else {
                continue;
            };
            if self.tree.token_text(param_data.name) == name {
                return self.node_types.get(&param_data.type_node).copied();
            }
        }
        None
    }

    pub fn tree(&self) -> &SyntaxTree {
        self.tree
    }

    pub fn table(&self) -> &TypeTable {
        self.table
    }
}

impl TypeOracle for SemanticModel<'_> {
    fn type_of(&self, node: NodeIndex) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    fn resolve_type_node(&self, node: NodeIndex) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    fn tag(&self, ty: TypeId) -> TypeTag {
        self.table.tag(ty)
    }

    fn base_types_and_self(&self, ty: TypeId) -> Vec<TypeId> {
        lineage::base_types_and_self(self.table, ty).into_vec()
    }

    fn all_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        lineage::all_interfaces(self.table, ty).into_iter().collect()
    }

    fn direct_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        lineage::direct_interfaces(self.table, ty)
    }

    fn task_of(&self, ty: TypeId) -> TypeId {
        self.table.task_of(ty)
    }

    fn task_arg(&self, ty: TypeId) -> Option<TypeId> {
        self.table.data(ty).task_arg
    }

    fn is_plain_task(&self, ty: TypeId) -> bool {
        ty == TypeId::TASK
    }

    fn minimal_display(&self, ty: TypeId) -> String {
        self.table.minimal_display(ty)
    }
}

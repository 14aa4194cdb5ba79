//! Semantic oracle: type symbols, inheritance lineage, and node binding.
//!
//! The oracle answers two questions for the repair engine: "what type does
//! this node have?" and "how do these two types relate?". It never mutates
//! syntax and it never refuses to answer — unresolved is a value, not a
//! failure.

pub mod bind;
pub mod lineage;
pub mod table;
pub mod types;

pub use bind::SemanticModel;
pub use table::TypeTable;
pub use types::{TypeData, TypeId, TypeTag};

use retype_syntax::node::NodeIndex;

/// Everything the repair engine needs from semantics, behind one seam so
/// the engine stays independent of how binding is implemented.
pub trait TypeOracle {
    /// The computed type of an expression node, if resolvable.
    fn type_of(&self, node: NodeIndex) -> Option<TypeId>;

    /// The type a type-annotation node denotes, if resolvable.
    fn resolve_type_node(&self, node: NodeIndex) -> Option<TypeId>;

    fn tag(&self, ty: TypeId) -> TypeTag;

    /// Base-type chain including `ty` itself, most-derived first.
    fn base_types_and_self(&self, ty: TypeId) -> Vec<TypeId>;

    /// All interfaces of `ty`, direct and transitive, deduplicated and
    /// discovery-ordered.
    fn all_interfaces(&self, ty: TypeId) -> Vec<TypeId>;

    fn direct_interfaces(&self, ty: TypeId) -> Vec<TypeId>;

    /// The constructed asynchronous wrapper around `ty`.
    fn task_of(&self, ty: TypeId) -> TypeId;

    /// For a constructed `Task<T>`, the `T`.
    fn task_arg(&self, ty: TypeId) -> Option<TypeId>;

    /// Whether `ty` is the non-generic asynchronous wrapper.
    fn is_plain_task(&self, ty: TypeId) -> bool;

    /// The narrowest legal spelling of `ty` at a signature position.
    fn minimal_display(&self, ty: TypeId) -> String;
}

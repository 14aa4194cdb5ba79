//! Type lineage queries.
//!
//! A type's lineage is its base-type chain (most-derived first, ending at
//! the root object type) plus the set of all interfaces it implements,
//! directly or transitively. The interface set is deduplicated by interned
//! identity and keeps discovery order, so lineage scans are deterministic.

use crate::table::TypeTable;
use crate::types::{TypeId, TypeTag};
use indexmap::IndexSet;
use smallvec::SmallVec;

/// The base-type chain including `ty` itself, ordered most-derived to
/// least-derived. For resolvable class types the chain ends at the root
/// object type; interfaces, void, and dynamic have only themselves.
pub fn base_types_and_self(table: &TypeTable, ty: TypeId) -> SmallVec<[TypeId; 8]> {
    let mut chain = SmallVec::new();
    let mut current = Some(ty);
    while let Some(id) = current {
        // The chain is acyclic by construction; the guard is for tables
        // built from hostile inputs.
        if chain.contains(&id) {
            break;
        }
        chain.push(id);
        current = table.data(id).base;
    }
    chain
}

/// All interfaces implemented by `ty`, directly and transitively, across
/// its whole base chain. Deduplicated, discovery-ordered.
pub fn all_interfaces(table: &TypeTable, ty: TypeId) -> IndexSet<TypeId> {
    let mut result = IndexSet::new();
    let mut queue: Vec<TypeId> = Vec::new();

    for base in base_types_and_self(table, ty) {
        queue.extend(table.data(base).interfaces.iter().copied());
    }

    // Breadth-first so interfaces nearer the type come before ones
    // inherited through other interfaces.
    let mut next = 0;
    while next < queue.len() {
        let iface = queue[next];
        next += 1;
        if result.insert(iface) {
            let extends = table.data(iface).interfaces;
            queue.extend(extends);
        }
    }

    result
}

/// Interfaces listed directly on `ty` (no base-chain or transitive
/// expansion).
pub fn direct_interfaces(table: &TypeTable, ty: TypeId) -> Vec<TypeId> {
    table.data(ty).interfaces
}

/// Whether `ty` can appear as a declared-lineage candidate. The value-type
/// root is never a valid return-type target.
pub fn is_lineage_candidate(table: &TypeTable, ty: TypeId) -> bool {
    table.tag(ty) != TypeTag::ValueTypeRoot
}

//! Type symbol representation.
//!
//! Types are interned: equal types get equal `TypeId`s, so symbol
//! equivalence is O(1) id comparison regardless of how a type was spelled
//! at a use site.

/// Interned type identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The universal root: every resolvable type's lineage ends here.
    pub const OBJECT: TypeId = TypeId(0);
    /// The value-type root. Never a valid repair target.
    pub const VALUE_TYPE: TypeId = TypeId(1);
    pub const VOID: TypeId = TypeId(2);
    pub const DYNAMIC: TypeId = TypeId(3);
    pub const INT: TypeId = TypeId(4);
    pub const LONG: TypeId = TypeId(5);
    pub const DOUBLE: TypeId = TypeId(6);
    pub const BOOL: TypeId = TypeId(7);
    pub const STRING: TypeId = TypeId(8);
    /// The non-generic asynchronous wrapper (an async "void").
    pub const TASK: TypeId = TypeId(9);

    pub(crate) const FIRST_USER: u32 = 10;
}

/// Special-case classification of a type symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeTag {
    /// An ordinary reference type (class).
    Ordinary,
    /// The universal root object type.
    RootObject,
    /// The value-type root itself.
    ValueTypeRoot,
    /// A value type (struct-like); its only meaningful ancestor is the root.
    Value,
    /// The dynamic type; ineligible on either side of a repair.
    Dynamic,
    /// A compiler-generated anonymous type; not nameable in a signature.
    Anonymous,
    /// The "no value" return type.
    Void,
    Interface,
}

/// Resolved data for one type symbol.
#[derive(Clone, Debug)]
pub struct TypeData {
    pub name: String,
    pub namespace: Option<String>,
    pub tag: TypeTag,
    /// Direct base type. `None` for roots, interfaces, void, and dynamic.
    pub base: Option<TypeId>,
    /// Directly implemented (or, for interfaces, directly extended)
    /// interfaces.
    pub interfaces: Vec<TypeId>,
    /// For constructed `Task<T>`, the `T`.
    pub task_arg: Option<TypeId>,
}

impl TypeData {
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

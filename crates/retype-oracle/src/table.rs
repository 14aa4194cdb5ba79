//! Append-only type interner.
//!
//! The table is the per-snapshot universe of types. Builtins are
//! pre-registered; named types intern by (namespace, name) so repeated
//! definitions and differently-spelled references resolve to one `TypeId`.
//! Constructed `Task<T>` types intern by argument. Reads are lock-cheap and
//! safe from concurrent invocations; the table only ever grows.

use crate::types::{TypeData, TypeId, TypeTag};
use dashmap::DashMap;
use smallvec::SmallVec;
use std::sync::RwLock;

pub struct TypeTable {
    types: RwLock<Vec<TypeData>>,
    named: DashMap<(Option<String>, String), TypeId>,
    /// Short name -> all ids carrying it, for minimal-display ambiguity.
    short_names: DashMap<String, SmallVec<[TypeId; 2]>>,
    tasks: DashMap<TypeId, TypeId>,
}

impl TypeTable {
    pub fn new() -> TypeTable {
        let table = TypeTable {
            types: RwLock::new(Vec::new()),
            named: DashMap::new(),
            short_names: DashMap::new(),
            tasks: DashMap::new(),
        };
        table.install_builtins();
        table
    }

    fn install_builtins(&self) {
        let builtin = |name: &str, tag: TypeTag, base: Option<TypeId>| TypeData {
            name: name.to_string(),
            namespace: Some("System".to_string()),
            tag,
            base,
            interfaces: Vec::new(),
            task_arg: None,
        };

        let mut types = self.types.write().expect("type table poisoned");
        // Order must match the TypeId constants.
        types.push(builtin("Object", TypeTag::RootObject, None));
        types.push(builtin("ValueType", TypeTag::ValueTypeRoot, Some(TypeId::OBJECT)));
        types.push(builtin("Void", TypeTag::Void, None));
        types.push(TypeData {
            name: "dynamic".to_string(),
            namespace: None,
            tag: TypeTag::Dynamic,
            base: None,
            interfaces: Vec::new(),
            task_arg: None,
        });
        types.push(builtin("Int32", TypeTag::Value, Some(TypeId::VALUE_TYPE)));
        types.push(builtin("Int64", TypeTag::Value, Some(TypeId::VALUE_TYPE)));
        types.push(builtin("Double", TypeTag::Value, Some(TypeId::VALUE_TYPE)));
        types.push(builtin("Boolean", TypeTag::Value, Some(TypeId::VALUE_TYPE)));
        types.push(builtin("String", TypeTag::Ordinary, Some(TypeId::OBJECT)));
        types.push(builtin("Task", TypeTag::Ordinary, Some(TypeId::OBJECT)));
        debug_assert_eq!(types.len() as u32, TypeId::FIRST_USER);
        drop(types);

        self.named
            .insert((None, "Task".to_string()), TypeId::TASK);
        self.short_names
            .entry("Task".to_string())
            .or_default()
            .push(TypeId::TASK);
    }

    fn push(&self, data: TypeData) -> TypeId {
        let mut types = self.types.write().expect("type table poisoned");
        let id = TypeId(types.len() as u32);
        types.push(data);
        id
    }

    /// Resolved data for a type. Data is small and cloned out so readers
    /// never hold the table lock.
    pub fn data(&self, ty: TypeId) -> TypeData {
        let types = self.types.read().expect("type table poisoned");
        types[ty.0 as usize].clone()
    }

    pub fn tag(&self, ty: TypeId) -> TypeTag {
        let types = self.types.read().expect("type table poisoned");
        types[ty.0 as usize].tag
    }

    fn define_named(&self, data: TypeData) -> TypeId {
        let key = (data.namespace.clone(), data.name.clone());
        if let Some(existing) = self.named.get(&key) {
            return *existing;
        }
        let short = data.name.clone();
        let id = self.push(data);
        self.named.insert(key, id);
        self.short_names.entry(short).or_default().push(id);
        id
    }

    /// Define (or re-resolve) a class. `base` defaults to the root object
    /// type.
    pub fn define_class(
        &self,
        name: &str,
        base: Option<TypeId>,
        interfaces: &[TypeId],
    ) -> TypeId {
        self.define_class_in(None, name, base, interfaces)
    }

    pub fn define_class_in(
        &self,
        namespace: Option<&str>,
        name: &str,
        base: Option<TypeId>,
        interfaces: &[TypeId],
    ) -> TypeId {
        self.define_named(TypeData {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            tag: TypeTag::Ordinary,
            base: Some(base.unwrap_or(TypeId::OBJECT)),
            interfaces: interfaces.to_vec(),
            task_arg: None,
        })
    }

    /// Define a value type; its base chain is ValueType -> object.
    pub fn define_value_type(&self, name: &str, interfaces: &[TypeId]) -> TypeId {
        self.define_named(TypeData {
            name: name.to_string(),
            namespace: None,
            tag: TypeTag::Value,
            base: Some(TypeId::VALUE_TYPE),
            interfaces: interfaces.to_vec(),
            task_arg: None,
        })
    }

    pub fn define_interface(&self, name: &str, extends: &[TypeId]) -> TypeId {
        self.define_named(TypeData {
            name: name.to_string(),
            namespace: None,
            tag: TypeTag::Interface,
            base: None,
            interfaces: extends.to_vec(),
            task_arg: None,
        })
    }

    /// A fresh anonymous type. Never interned by name, never nameable.
    pub fn anonymous(&self) -> TypeId {
        self.push(TypeData {
            name: "<anonymous type>".to_string(),
            namespace: None,
            tag: TypeTag::Anonymous,
            base: Some(TypeId::OBJECT),
            interfaces: Vec::new(),
            task_arg: None,
        })
    }

    /// The constructed asynchronous wrapper `Task<T>`, interned by argument.
    pub fn task_of(&self, arg: TypeId) -> TypeId {
        if let Some(existing) = self.tasks.get(&arg) {
            return *existing;
        }
        let id = self.push(TypeData {
            name: "Task".to_string(),
            namespace: None,
            tag: TypeTag::Ordinary,
            base: Some(TypeId::TASK),
            interfaces: Vec::new(),
            task_arg: Some(arg),
        });
        self.tasks.insert(arg, id);
        id
    }

    /// Look up a (possibly qualified) name. Predefined keywords resolve to
    /// builtins; a bare short name resolves only when unambiguous.
    pub fn lookup(&self, parts: &[&str]) -> Option<TypeId> {
        match parts {
            [single] => {
                if let Some(builtin) = keyword_type(single) {
                    return Some(builtin);
                }
                let ids = self.short_names.get(*single)?;
                if ids.len() == 1 {
                    Some(ids[0])
                } else {
                    None
                }
            }
            [namespace @ .., name] => {
                let namespace = namespace.join(".");
                self.named
                    .get(&(Some(namespace), name.to_string()))
                    .map(|id| *id)
            }
            [] => None,
        }
    }

    /// The narrowest legal spelling of a type at a return-type position:
    /// language keywords for builtins, the short name when it is
    /// unambiguous in this universe, the qualified name otherwise.
    pub fn minimal_display(&self, ty: TypeId) -> String {
        if let Some(keyword) = builtin_keyword(ty) {
            return keyword.to_string();
        }

        let data = self.data(ty);
        if let Some(arg) = data.task_arg {
            return format!("Task<{}>", self.minimal_display(arg));
        }

        let unambiguous = self
            .short_names
            .get(&data.name)
            .map(|ids| ids.len() == 1)
            .unwrap_or(false);
        if unambiguous || data.namespace.is_none() {
            data.name
        } else {
            data.qualified_name()
        }
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        TypeTable::new()
    }
}

fn keyword_type(text: &str) -> Option<TypeId> {
    let ty = match text {
        "object" => TypeId::OBJECT,
        "void" => TypeId::VOID,
        "dynamic" => TypeId::DYNAMIC,
        "int" => TypeId::INT,
        "long" => TypeId::LONG,
        "double" => TypeId::DOUBLE,
        "bool" => TypeId::BOOL,
        "string" => TypeId::STRING,
        _ => return None,
    };
    Some(ty)
}

fn builtin_keyword(ty: TypeId) -> Option<&'static str> {
    let keyword = match ty {
        TypeId::OBJECT => "object",
        TypeId::VOID => "void",
        TypeId::DYNAMIC => "dynamic",
        TypeId::INT => "int",
        TypeId::LONG => "long",
        TypeId::DOUBLE => "double",
        TypeId::BOOL => "bool",
        TypeId::STRING => "string",
        _ => return None,
    };
    Some(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_types_intern_to_one_id() {
        let table = TypeTable::new();
        let first = table.define_class("C", None, &[]);
        let second = table.define_class("C", None, &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn anonymous_types_are_always_fresh() {
        let table = TypeTable::new();
        assert_ne!(table.anonymous(), table.anonymous());
    }

    #[test]
    fn task_constructions_intern_by_argument() {
        let table = TypeTable::new();
        let a = table.task_of(TypeId::INT);
        let b = table.task_of(TypeId::INT);
        let c = table.task_of(TypeId::STRING);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.data(a).task_arg, Some(TypeId::INT));
    }

    #[test]
    fn minimal_display_prefers_keywords_and_short_names() {
        let table = TypeTable::new();
        assert_eq!(table.minimal_display(TypeId::INT), "int");
        assert_eq!(table.minimal_display(TypeId::OBJECT), "object");

        let c = table.define_class("Widget", None, &[]);
        assert_eq!(table.minimal_display(c), "Widget");

        let task = table.task_of(TypeId::INT);
        assert_eq!(table.minimal_display(task), "Task<int>");
    }

    #[test]
    fn minimal_display_qualifies_ambiguous_names() {
        let table = TypeTable::new();
        let a = table.define_class_in(Some("A"), "Widget", None, &[]);
        let b = table.define_class_in(Some("B"), "Widget", None, &[]);
        assert_eq!(table.minimal_display(a), "A.Widget");
        assert_eq!(table.minimal_display(b), "B.Widget");
        // Ambiguous short lookups fail rather than guessing.
        assert_eq!(table.lookup(&["Widget"]), None);
        assert_eq!(table.lookup(&["A", "Widget"]), Some(a));
    }
}

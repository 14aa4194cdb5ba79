use retype_oracle::{SemanticModel, TypeId, TypeOracle, TypeTable, TypeTag};
use retype_oracle::lineage::{all_interfaces, base_types_and_self, is_lineage_candidate};
use retype_syntax::node::Node;
use retype_syntax::parse_source;

#[test]
fn base_chain_runs_most_derived_to_root() {
    let table = TypeTable::new();
    let animal = table.define_class("Animal", None, &[]);
    let dog = table.define_class("Dog", Some(animal), &[]);
    let puppy = table.define_class("Puppy", Some(dog), &[]);

    let chain: Vec<_> = base_types_and_self(&table, puppy).into_vec();
    assert_eq!(chain, vec![puppy, dog, animal, TypeId::OBJECT]);
}

#[test]
fn value_type_chain_passes_through_value_root() {
    let table = TypeTable::new();
    let chain: Vec<_> = base_types_and_self(&table, TypeId::INT).into_vec();
    assert_eq!(chain, vec![TypeId::INT, TypeId::VALUE_TYPE, TypeId::OBJECT]);
    assert!(!is_lineage_candidate(&table, TypeId::VALUE_TYPE));
    assert!(is_lineage_candidate(&table, TypeId::INT));
}

#[test]
fn interfaces_collect_across_base_chain() {
    let table = TypeTable::new();
    let disposable = table.define_interface("IDisposable", &[]);
    let printable = table.define_interface("IPrintable", &[]);
    let base = table.define_class("Resource", None, &[disposable]);
    let derived = table.define_class("FileResource", Some(base), &[printable]);

    let ifaces: Vec<_> = all_interfaces(&table, derived).into_iter().collect();
    assert!(ifaces.contains(&disposable));
    assert!(ifaces.contains(&printable));
    assert_eq!(ifaces.len(), 2);
}

#[test]
fn diamond_interface_inheritance_deduplicates() {
    let table = TypeTable::new();
    let root = table.define_interface("IRoot", &[]);
    let left = table.define_interface("ILeft", &[root]);
    let right = table.define_interface("IRight", &[root]);
    let impl_both = table.define_class("Both", None, &[left, right]);

    let ifaces: Vec<_> = all_interfaces(&table, impl_both).into_iter().collect();
    assert_eq!(ifaces, vec![left, right, root]);
}

#[test]
fn direct_interfaces_come_before_inherited_ones() {
    let table = TypeTable::new();
    let inner = table.define_interface("IInner", &[]);
    let outer = table.define_interface("IOuter", &[inner]);
    let c = table.define_class("C", None, &[outer]);

    let ifaces: Vec<_> = all_interfaces(&table, c).into_iter().collect();
    assert_eq!(ifaces, vec![outer, inner]);
}

#[test]
fn anonymous_lineage_reaches_only_object() {
    let table = TypeTable::new();
    let anon = table.anonymous();
    assert_eq!(table.tag(anon), TypeTag::Anonymous);

    let chain: Vec<_> = base_types_and_self(&table, anon).into_vec();
    assert_eq!(chain, vec![anon, TypeId::OBJECT]);
    assert!(all_interfaces(&table, anon).is_empty());
}

fn find_node(
    tree: &retype_syntax::node::SyntaxTree,
    pred: impl Fn(&Node) -> bool,
) -> retype_syntax::node::NodeIndex {
    for (i, node) in tree.arena.nodes.iter().enumerate() {
        if pred(node) {
            return retype_syntax::node::NodeIndex(i as u32);
        }
    }
    panic!("node not found");
}

#[test]
fn binding_types_literals_and_annotations() {
    let table = TypeTable::new();
    let tree = parse_source("class C { int M() { return 1; } }");
    let model = SemanticModel::bind(&tree, &table);

    let ret_type = find_node(&tree, |n| matches!(n, Node::TypeRef(_)));
    assert_eq!(model.resolve_type_node(ret_type), Some(TypeId::INT));

    let literal = find_node(&tree, |n| matches!(n, Node::LiteralExpression(_)));
    assert_eq!(model.type_of(literal), Some(TypeId::INT));
}

#[test]
fn binding_resolves_new_expressions_by_declared_name() {
    let table = TypeTable::new();
    let widget = table.define_class("Widget", None, &[]);
    let tree = parse_source("class C { void M() { return new Widget(); } }");
    let model = SemanticModel::bind(&tree, &table);

    let new_expr = find_node(&tree, |n| matches!(n, Node::NewExpression(_)));
    assert_eq!(model.type_of(new_expr), Some(widget));
}

#[test]
fn binding_gives_anonymous_objects_fresh_nameless_types() {
    let table = TypeTable::new();
    let tree = parse_source("class C { void M() { return new { X = 1 }; } }");
    let model = SemanticModel::bind(&tree, &table);

    let anon = find_node(&tree, |n| matches!(n, Node::AnonymousObjectExpression(_)));
    let ty = model.type_of(anon).unwrap();
    assert_eq!(model.tag(ty), TypeTag::Anonymous);
}

#[test]
fn binding_resolves_identifiers_to_parameter_types() {
    let table = TypeTable::new();
    let tree = parse_source("class C { void M(string name) { return name; } }");
    let model = SemanticModel::bind(&tree, &table);

    let ident = find_node(&tree, |n| matches!(n, Node::IdentifierExpression(_)));
    assert_eq!(model.type_of(ident), Some(TypeId::STRING));
}

#[test]
fn binding_leaves_unknown_names_unresolved() {
    let table = TypeTable::new();
    let tree = parse_source("class C { Mystery M() { return other; } }");
    let model = SemanticModel::bind(&tree, &table);

    let ret_type = find_node(&tree, |n| matches!(n, Node::TypeRef(_)));
    assert_eq!(model.resolve_type_node(ret_type), None);

    let ident = find_node(&tree, |n| matches!(n, Node::IdentifierExpression(_)));
    assert_eq!(model.type_of(ident), None);
}

#[test]
fn binding_constructs_task_types_from_generic_annotations() {
    let table = TypeTable::new();
    let tree = parse_source("class C { async Task<int> M() { return 1; } }");
    let model = SemanticModel::bind(&tree, &table);

    let ret_type = find_node(&tree, |n| {
        matches!(n, Node::TypeRef(d) if !d.type_args.nodes.is_empty())
    });
    let ty = model.resolve_type_node(ret_type).unwrap();
    assert_eq!(ty, table.task_of(TypeId::INT));
    assert_eq!(model.task_arg(ty), Some(TypeId::INT));
    assert_eq!(model.minimal_display(ty), "Task<int>");
}

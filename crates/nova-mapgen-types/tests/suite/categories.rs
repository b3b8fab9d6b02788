use nova_mapgen_types::{ClassDecl, TypeFactory};

#[test]
fn collection_hierarchy_predicates() {
    let types = TypeFactory::with_jdk();

    let list = types.parse("java.util.List<String>").unwrap();
    assert!(list.is_collection());
    assert!(list.is_iterable());
    assert!(!list.is_map());
    assert!(list.is_interface());

    let map = types.parse("java.util.TreeMap<String, Integer>").unwrap();
    assert!(map.is_map());
    assert!(!map.is_collection());
    assert!(!map.is_iterable());

    let iterable = types.parse("java.lang.Iterable<String>").unwrap();
    assert!(iterable.is_iterable());
    assert!(!iterable.is_collection());
}

#[test]
fn enum_set_is_a_collection_and_flagged() {
    let mut types = TypeFactory::with_jdk();
    types.declare(ClassDecl::enumeration("com.example.Color", ["RED", "GREEN"]));

    let enum_set = types.parse("java.util.EnumSet<com.example.Color>").unwrap();
    assert!(enum_set.is_enum_set());
    assert!(enum_set.is_collection());
    assert!(enum_set.implementation_type().is_none());

    let set = types.parse("java.util.Set<com.example.Color>").unwrap();
    assert!(!set.is_enum_set());
}

#[test]
fn user_subclasses_inherit_categories() {
    let mut types = TypeFactory::with_jdk();
    types.declare(
        ClassDecl::class("com.example.StringList").extends("java.util.ArrayList<String>"),
    );
    types.declare(ClassDecl::class("com.example.Frozen").extends("java.util.List<String>").immutable());

    let list = types.get_type("com.example.StringList");
    assert!(list.is_collection());
    assert!(!list.is_immutable());
    assert!(types.get_type("com.example.Frozen").is_immutable());
}

#[test]
fn redeclaring_a_class_refreshes_categories() {
    let mut types = TypeFactory::with_jdk();
    types.declare(ClassDecl::class("com.example.Bag"));
    assert!(!types.get_type("com.example.Bag").is_collection());

    types.declare(ClassDecl::class("com.example.Bag").extends("java.util.Collection<String>"));
    assert!(types.get_type("com.example.Bag").is_collection());
}

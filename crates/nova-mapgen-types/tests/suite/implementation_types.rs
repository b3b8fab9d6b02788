use nova_mapgen_types::{jdk, TypeFactory};

use pretty_assertions::assert_eq;

#[test]
fn list_interface_resolves_to_array_list_with_same_arguments() {
    let types = TypeFactory::with_jdk();
    let list = types.parse("java.util.List<String>").unwrap();

    let implementation = list.implementation_type().expect("List has a default implementation");
    assert_eq!(
        implementation.to_string(),
        "java.util.ArrayList<java.lang.String>"
    );
}

#[test]
fn implementation_lookup_is_idempotent() {
    let types = TypeFactory::with_jdk();
    let first = types.parse("java.util.Set<Integer>").unwrap();
    let second = types.parse("java.util.Set<Integer>").unwrap();

    assert_eq!(first.implementation_type(), second.implementation_type());
    assert_eq!(first.implementation_type(), first.implementation_type());
    assert_eq!(
        first.implementation_type().map(|t| t.qualified_name()),
        Some(jdk::LINKED_HASH_SET.to_string())
    );
}

#[test]
fn concrete_types_have_no_implementation_type() {
    let types = TypeFactory::with_jdk();
    for name in [
        "java.util.ArrayList<String>",
        "java.util.HashMap<String, Integer>",
        "java.lang.String",
        "int",
    ] {
        let ty = types.parse(name).unwrap();
        assert!(
            ty.implementation_type().is_none(),
            "{name} should not have an implementation type"
        );
    }
}

#[test]
fn sorted_and_concurrent_maps_use_matching_implementations() {
    let types = TypeFactory::with_jdk();
    let cases = [
        ("java.util.Map<String, Integer>", jdk::LINKED_HASH_MAP),
        ("java.util.SortedMap<String, Integer>", "java.util.TreeMap"),
        ("java.util.NavigableSet<String>", "java.util.TreeSet"),
        (
            "java.util.concurrent.ConcurrentMap<String, Integer>",
            "java.util.concurrent.ConcurrentHashMap",
        ),
        ("java.lang.Iterable<String>", jdk::ARRAY_LIST),
    ];
    for (declared, expected) in cases {
        let ty = types.parse(declared).unwrap();
        assert_eq!(
            ty.implementation_type().map(|t| t.qualified_name()),
            Some(expected.to_string()),
            "implementation of {declared}"
        );
    }
}

#[test]
fn import_types_cover_type_arguments_and_skip_primitives() {
    let mut types = TypeFactory::with_jdk();
    types.declare(nova_mapgen_types::ClassDecl::class("com.example.Wheel"));

    let ty = types
        .parse("java.util.Map<String, java.util.List<com.example.Wheel>>")
        .unwrap();
    let imports: Vec<String> = ty.import_types().iter().map(|t| t.to_string()).collect();
    assert_eq!(
        imports,
        vec![
            "java.util.Map",
            "java.lang.String",
            "java.util.List",
            "com.example.Wheel",
        ]
    );

    assert!(types.parse("int[]").unwrap().import_types().is_empty());
}

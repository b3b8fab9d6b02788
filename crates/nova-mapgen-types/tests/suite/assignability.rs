use nova_mapgen_types::{jdk, ClassDecl, TypeFactory};

use pretty_assertions::assert_eq;

fn factory() -> TypeFactory {
    let mut types = TypeFactory::with_jdk();
    types.declare(ClassDecl::class("com.example.Vehicle"));
    types.declare(ClassDecl::class("com.example.Car").extends("com.example.Vehicle"));
    types.declare(ClassDecl::class("com.example.SportsCar").extends("com.example.Car"));
    types
}

#[test]
fn subclasses_are_assignable_to_superclasses() {
    let types = factory();
    let car = types.get_type("com.example.Car");
    let vehicle = types.get_type("com.example.Vehicle");

    assert!(types.is_assignable(&car, &vehicle));
    assert!(!types.is_assignable(&vehicle, &car));
    assert!(types.is_assignable(&car, &types.get_type(jdk::OBJECT)));
}

#[test]
fn generic_arguments_must_match_exactly() {
    let types = factory();
    let array_list = types.parse("java.util.ArrayList<String>").unwrap();

    assert!(types.is_assignable(&array_list, &types.parse("java.util.List<String>").unwrap()));
    assert!(types.is_assignable(&array_list, &types.parse("java.util.Collection<String>").unwrap()));
    assert!(!types.is_assignable(&array_list, &types.parse("java.util.List<Integer>").unwrap()));
    assert!(types.is_assignable(&array_list, &types.get_type(jdk::LIST)));
}

#[test]
fn primitives_are_not_assignable_to_boxed_types() {
    let types = factory();
    let int = types.parse("int").unwrap();
    let integer = types.parse("Integer").unwrap();

    assert!(!types.is_assignable(&int, &integer));
    assert!(types.is_assignable(&int, &int));
}

#[test]
fn as_supertype_substitutes_arguments() {
    let types = factory();
    let map = types.parse("java.util.TreeMap<String, Integer>").unwrap();

    let viewed = types.as_supertype(&map, jdk::MAP).expect("TreeMap is a Map");
    assert_eq!(viewed.to_string(), "java.util.Map<java.lang.String, java.lang.Integer>");

    let (key, value) = types.map_entry_types(&map).unwrap();
    assert_eq!(key, types.get_type(jdk::STRING));
    assert_eq!(value, types.get_type("java.lang.Integer"));
}

#[test]
fn element_type_of_lists_and_arrays() {
    let types = factory();
    let list = types.parse("java.util.LinkedList<com.example.Car>").unwrap();
    assert_eq!(types.element_type(&list), Some(types.get_type("com.example.Car")));

    let array = types.parse("int[]").unwrap();
    assert_eq!(types.element_type(&array), Some(types.parse("int").unwrap()));
}

#[test]
fn supertype_distance_counts_edges() {
    let types = factory();
    let sports = types.get_type("com.example.SportsCar");

    assert_eq!(types.supertype_distance(&sports, "com.example.SportsCar"), Some(0));
    assert_eq!(types.supertype_distance(&sports, "com.example.Car"), Some(1));
    assert_eq!(types.supertype_distance(&sports, "com.example.Vehicle"), Some(2));
    assert_eq!(types.supertype_distance(&types.get_type("com.example.Vehicle"), "com.example.Car"), None);
}

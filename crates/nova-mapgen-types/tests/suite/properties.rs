use nova_mapgen_types::{ClassDecl, PropertyDecl, TypeFactory};

use pretty_assertions::assert_eq;

#[test]
fn properties_include_inherited_ones_after_own_declarations() {
    let mut types = TypeFactory::with_jdk();
    types.declare(
        ClassDecl::class("com.example.Base")
            .property(PropertyDecl::new("id", "long"))
            .property(PropertyDecl::new("name", "String")),
    );
    types.declare(
        ClassDecl::class("com.example.Car")
            .extends("com.example.Base")
            .property(PropertyDecl::new("name", "String").read_only())
            .property(PropertyDecl::new("seats", "int")),
    );

    let props = types.properties(&types.get_type("com.example.Car")).unwrap();
    let names: Vec<&str> = props.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["name", "seats", "id"]);
    assert!(!props[0].writable, "subclass declaration shadows the inherited one");
}

#[test]
fn generic_owner_arguments_are_substituted() {
    let mut types = TypeFactory::with_jdk();
    types.declare(
        ClassDecl::class("com.example.Box")
            .with_type_params(["T"])
            .property(PropertyDecl::new("items", "java.util.List<T>")),
    );

    let owner = types.parse("com.example.Box<String>").unwrap();
    let items = types.property(&owner, "items").unwrap().expect("items exists");
    assert_eq!(items.ty.to_string(), "java.util.List<java.lang.String>");
}

#[test]
fn accessor_names_follow_bean_conventions() {
    let mut types = TypeFactory::with_jdk();
    types.declare(
        ClassDecl::class("com.example.Flags")
            .property(PropertyDecl::new("active", "boolean"))
            .property(PropertyDecl::new("label", "String").with_presence_checker()),
    );
    let props = types.properties(&types.get_type("com.example.Flags")).unwrap();

    assert_eq!(props[0].getter_name(), "isActive");
    assert_eq!(props[1].getter_name(), "getLabel");
    assert_eq!(props[1].setter_name(), "setLabel");
    assert_eq!(props[1].presence_checker_name().as_deref(), Some("hasLabel"));
    assert_eq!(props[0].presence_checker_name(), None);
}

use nova_mapgen::{AnnotateWith, GeneratedMapper, MapperDecl, MapperProcessor};
use nova_mapgen_config::{ComponentModel, OptionsScope};
use nova_mapgen_types::TypeFactory;

use pretty_assertions::assert_eq;

use super::fixtures;

const COMPONENT: &str = "org.springframework.stereotype.Component";
const SERVICE: &str = "org.springframework.stereotype.Service";

fn spring(types: &TypeFactory, decl: &MapperDecl) -> GeneratedMapper {
    let config = fixtures::config_with(OptionsScope {
        component_model: Some(ComponentModel::Spring),
        ..OptionsScope::default()
    });
    MapperProcessor::new(types, &config).process(decl)
}

fn names(types: &[nova_mapgen_types::Type]) -> Vec<String> {
    types.iter().map(|t| t.qualified_name()).collect()
}

#[test]
fn service_stereotype_replaces_the_component_annotation() {
    let types = fixtures::types();
    let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types)]).annotate_with(
        AnnotateWith::new(types.get_type(SERVICE)).strings("value", ["AnnotateWithService"]),
    );

    let generated = spring(&types, &decl);
    assert!(!generated.has_errors(), "{:#?}", generated.diagnostics);

    assert!(generated.component_annotations.is_empty());
    assert_eq!(generated.annotate_with.len(), 1);
    let service = &generated.annotate_with[0];
    assert_eq!(service.annotation.qualified_name(), SERVICE);
    assert_eq!(
        service.element_named("value").map(|e| e.values.clone()),
        Some(vec!["\"AnnotateWithService\"".to_string()])
    );

    let imports: Vec<String> = generated.import_types.iter().map(|t| t.qualified_name()).collect();
    assert!(imports.contains(&SERVICE.to_string()), "{imports:?}");
    assert!(!imports.contains(&COMPONENT.to_string()), "{imports:?}");

    let json: serde_json::Value = serde_json::from_str(&generated.to_json().unwrap()).unwrap();
    assert_eq!(
        json["annotate_with"][0]["elements"][0]["values"][0],
        "\"AnnotateWithService\""
    );
}

#[test]
fn spring_without_stereotype_gets_component() {
    let types = fixtures::types();
    let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types)]);

    let generated = spring(&types, &decl);

    assert_eq!(names(&generated.component_annotations), vec![COMPONENT.to_string()]);
    assert!(generated.annotate_with.is_empty());
    assert!(generated.import_types.iter().any(|t| t.qualified_name() == COMPONENT));
}

#[test]
fn component_models_add_their_annotations() {
    let types = fixtures::types();
    let cases = [
        (ComponentModel::Default, vec![]),
        (ComponentModel::Cdi, vec!["javax.enterprise.context.ApplicationScoped"]),
        (ComponentModel::Jsr330, vec!["javax.inject.Named", "javax.inject.Singleton"]),
        (ComponentModel::Jakarta, vec!["jakarta.inject.Named", "jakarta.inject.Singleton"]),
    ];
    for (model, expected) in cases {
        let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types)]).with_options(OptionsScope {
            component_model: Some(model),
            ..OptionsScope::default()
        });
        let generated = spring(&types, &decl);
        assert_eq!(names(&generated.component_annotations), expected, "{model:?}");
    }
}

#[test]
fn repeating_a_non_repeatable_annotation_is_an_error() {
    let types = fixtures::types();
    let deprecated = types.get_type("java.lang.Deprecated");
    let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types)])
        .annotate_with(AnnotateWith::new(deprecated.clone()))
        .annotate_with(AnnotateWith::new(deprecated));

    let generated = spring(&types, &decl);

    let codes: Vec<&str> = generated.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["MAPGEN_ANNOTATION_NOT_REPEATABLE"]);
    assert_eq!(generated.diagnostics[0].element.as_deref(), Some("CarMapper"));
    assert_eq!(generated.annotate_with.len(), 1);
}

#[test]
fn repeatable_annotations_and_duplicate_elements() {
    let types = fixtures::types();
    let tag = types.get_type("com.example.Tag");
    let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types)])
        .annotate_with(AnnotateWith::new(tag.clone()).repeatable().strings("value", ["a"]))
        .annotate_with(AnnotateWith::new(tag.clone()).repeatable().strings("value", ["b"]))
        .annotate_with(
            AnnotateWith::new(tag)
                .repeatable()
                .element("order", ["1"])
                .element("order", ["2"]),
        );

    let generated = spring(&types, &decl);

    let codes: Vec<&str> = generated.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["MAPGEN_DUPLICATE_ANNOTATION_ELEMENT"]);
    assert_eq!(
        generated.diagnostics[0].message,
        "Parameter \"order\" must not be defined more than once for annotation \"com.example.Tag\"."
    );
    assert_eq!(generated.annotate_with.len(), 2);
}

use nova_mapgen::{GeneratedMapper, MapperDecl, MapperProcessor, SourceMethod};
use nova_mapgen_config::{ComponentModel, NullValueMappingStrategy, OptionsScope};
use nova_mapgen_types::TypeFactory;

use pretty_assertions::assert_eq;

use super::fixtures::{self, ty};

fn process(types: &TypeFactory, decl: &MapperDecl, defaults: OptionsScope) -> GeneratedMapper {
    let config = fixtures::config_with(defaults);
    let generated = MapperProcessor::new(types, &config).process(decl);
    assert!(!generated.has_errors(), "{:#?}", generated.diagnostics);
    generated
}

fn map_strategy(generated: &GeneratedMapper) -> NullValueMappingStrategy {
    generated
        .method("mapTags")
        .and_then(|m| m.as_map())
        .map(|m| m.null_value_mapping_strategy)
        .unwrap()
}

fn iterable_strategy(generated: &GeneratedMapper) -> NullValueMappingStrategy {
    generated
        .method("mapStrings")
        .and_then(|m| m.as_iterable())
        .map(|m| m.null_value_mapping_strategy)
        .unwrap()
}

#[test]
fn map_specific_strategy_from_config_beats_general_mapper_strategy() {
    let types = fixtures::types();
    let decl = fixtures::decl(
        &types,
        vec![fixtures::tags_method(&types), fixtures::strings_method(&types, false)],
    )
    .with_options(OptionsScope {
        null_value_mapping_strategy: Some(NullValueMappingStrategy::ReturnNull),
        ..OptionsScope::default()
    })
    .with_config(OptionsScope {
        null_value_map_mapping_strategy: Some(NullValueMappingStrategy::ReturnDefault),
        ..OptionsScope::default()
    });

    let generated = process(&types, &decl, OptionsScope::default());

    assert_eq!(map_strategy(&generated), NullValueMappingStrategy::ReturnDefault);
    assert_eq!(iterable_strategy(&generated), NullValueMappingStrategy::ReturnNull);
}

#[test]
fn general_strategy_applies_to_both_containers() {
    let types = fixtures::types();
    let decl = fixtures::decl(
        &types,
        vec![fixtures::tags_method(&types), fixtures::strings_method(&types, false)],
    );
    let defaults = OptionsScope {
        null_value_mapping_strategy: Some(NullValueMappingStrategy::ReturnDefault),
        ..OptionsScope::default()
    };

    let generated = process(&types, &decl, defaults);

    assert_eq!(map_strategy(&generated), NullValueMappingStrategy::ReturnDefault);
    assert_eq!(iterable_strategy(&generated), NullValueMappingStrategy::ReturnDefault);
}

#[test]
fn method_options_override_the_mapper() {
    let types = fixtures::types();
    let map = ty(&types, "java.util.Map<String, String>");
    let local = SourceMethod::builder("mapTags", fixtures::mapper(&types), map.clone())
        .source_parameter("tags", map)
        .options(OptionsScope {
            null_value_map_mapping_strategy: Some(NullValueMappingStrategy::ReturnNull),
            ..OptionsScope::default()
        })
        .build()
        .unwrap();
    let decl = fixtures::decl(&types, vec![local]).with_options(OptionsScope {
        null_value_map_mapping_strategy: Some(NullValueMappingStrategy::ReturnDefault),
        ..OptionsScope::default()
    });

    let generated = process(&types, &decl, OptionsScope::default());

    assert_eq!(map_strategy(&generated), NullValueMappingStrategy::ReturnNull);
}

#[test]
fn implementation_naming_and_component_model_come_from_the_global_layer() {
    let types = fixtures::types();
    let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types)]);
    let defaults = OptionsScope {
        implementation_name: Some("<CLASS_NAME>Generated".into()),
        implementation_package: Some("<PACKAGE_NAME>.impl".into()),
        component_model: Some(ComponentModel::Spring),
        ..OptionsScope::default()
    };

    let generated = process(&types, &decl, defaults);

    assert_eq!(generated.implementation_name, "CarMapperGenerated");
    assert_eq!(generated.implementation_package.as_deref(), Some("com.example.impl"));
    assert_eq!(generated.component_model, ComponentModel::Spring);

    let imports: Vec<String> = generated
        .import_types
        .iter()
        .map(|t| t.qualified_name())
        .collect();
    assert!(imports.contains(&fixtures::MAPPER.to_string()), "{imports:?}");
    assert!(imports.contains(&fixtures::CAR_DTO.to_string()), "{imports:?}");
}

#[test]
fn mapper_layer_beats_the_global_layer() {
    let types = fixtures::types();
    let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types)]).with_options(OptionsScope {
        component_model: Some(ComponentModel::Cdi),
        ..OptionsScope::default()
    });
    let defaults = OptionsScope {
        component_model: Some(ComponentModel::Spring),
        ..OptionsScope::default()
    };

    let generated = process(&types, &decl, defaults);

    assert_eq!(generated.component_model, ComponentModel::Cdi);
}

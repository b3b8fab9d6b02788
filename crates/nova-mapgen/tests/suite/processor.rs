use nova_mapgen::{
    Assignment, AssignmentType, MapperProcessor, MethodProvenance, PropertyMappingOptions,
    SourceMethod,
};
use nova_mapgen_config::GeneratorConfig;
use nova_mapgen_types::{ClassDecl, PropertyDecl, Severity, TypeFactory};

use pretty_assertions::assert_eq;

use super::fixtures::{self, CAR, CAR_DTO};

fn qualified_names<'a>(types: impl IntoIterator<Item = &'a nova_mapgen_types::Type>) -> Vec<String> {
    types.into_iter().map(|t| t.qualified_name()).collect()
}

#[test]
fn create_method_maps_same_named_properties() {
    let types = fixtures::types();
    let config = GeneratorConfig::default();
    let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types)]);

    let generated = MapperProcessor::new(&types, &config).process(&decl);
    assert!(!generated.has_errors(), "{:#?}", generated.diagnostics);
    assert_eq!(generated.implementation_name, "CarMapperImpl");
    assert_eq!(generated.implementation_package.as_deref(), Some("com.example"));

    let bean = generated.method("toDto").and_then(|m| m.as_bean()).unwrap();
    let names: Vec<&str> = bean.property_mappings.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["name", "wheels", "tags"]);
    assert_eq!(
        bean.instantiation_type.as_ref().map(|t| t.qualified_name()),
        Some(CAR_DTO.to_string())
    );

    let name = &bean.property_mapping("name").unwrap().assignment;
    let Assignment::Setter(setter) = name else {
        panic!("expected a setter, got {name:?}");
    };
    assert!(!setter.is_include_source_null_check());
    assert_eq!(name.assignment_type(), AssignmentType::Direct);

    let wheels = bean.property_mapping("wheels").unwrap();
    assert!(matches!(wheels.assignment, Assignment::NullCheck(_)));
    assert_eq!(wheels.target_write_accessor, "setWheels");
    assert_eq!(wheels.source_path.as_deref(), Some("car.wheels"));

    let imports = qualified_names(&generated.import_types);
    for expected in ["java.util.ArrayList", "java.util.List", "java.util.LinkedHashMap", "java.util.Map"] {
        assert!(imports.contains(&expected.to_string()), "{expected} missing from {imports:?}");
    }
    assert!(!imports.iter().any(|i| i.starts_with("com.example.")), "{imports:?}");
    assert!(!imports.contains(&"java.lang.String".to_string()));
}

#[test]
fn duplicate_context_types_skip_only_that_method() {
    let types = fixtures::types();
    let config = GeneratorConfig::default();
    let locale = types.get_type("java.util.Locale");
    let broken = SourceMethod::builder("withContext", fixtures::mapper(&types), types.get_type(CAR_DTO))
        .source_parameter("car", types.get_type(CAR))
        .context("first", locale.clone())
        .context("second", locale)
        .build()
        .unwrap();
    let decl = fixtures::decl(&types, vec![broken, fixtures::to_dto(&types)]);

    let generated = MapperProcessor::new(&types, &config).process(&decl);

    assert!(generated.has_errors());
    let errors: Vec<_> = generated.diagnostics.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "The types of @Context parameters must be unique.");
    assert_eq!(errors[0].element.as_deref(), Some("CarMapper#withContext"));
    assert!(generated.method("withContext").is_none());
    assert!(generated.method("toDto").is_some());
}

#[test]
fn void_method_without_mapping_target_is_rejected() {
    let types = fixtures::types();
    let config = GeneratorConfig::default();
    let method = SourceMethod::builder("sink", fixtures::mapper(&types), types.void())
        .source_parameter("car", types.get_type(CAR))
        .build()
        .unwrap();

    let generated = MapperProcessor::new(&types, &config).process(&fixtures::decl(&types, vec![method]));

    let codes: Vec<&str> = generated.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["MAPGEN_VOID_WITHOUT_TARGET"]);
    assert!(generated.methods.is_empty());
}

#[test]
fn unknown_explicit_target_is_an_error() {
    let types = fixtures::types();
    let config = GeneratorConfig::default();
    let method = SourceMethod::builder("toDto", fixtures::mapper(&types), types.get_type(CAR_DTO))
        .source_parameter("car", types.get_type(CAR))
        .mapping(PropertyMappingOptions::new("colour").source("name"))
        .build()
        .unwrap();

    let generated = MapperProcessor::new(&types, &config).process(&fixtures::decl(&types, vec![method]));

    assert!(generated.has_errors());
    assert!(generated
        .diagnostics
        .iter()
        .any(|d| d.code == "MAPGEN_UNKNOWN_TARGET_PROPERTY" && d.message.contains("colour")));
    assert!(generated.methods.is_empty());
}

#[test]
fn unmapped_target_properties_only_warn() {
    let mut types = fixtures::types();
    types.declare(
        ClassDecl::class("com.example.Summary")
            .property(PropertyDecl::new("name", "String"))
            .property(PropertyDecl::new("color", "String")),
    );
    let config = GeneratorConfig::default();
    let method = SourceMethod::builder("summarize", fixtures::mapper(&types), types.get_type("com.example.Summary"))
        .source_parameter("car", types.get_type(CAR))
        .build()
        .unwrap();

    let generated = MapperProcessor::new(&types, &config).process(&fixtures::decl(&types, vec![method]));

    assert!(!generated.has_errors());
    assert_eq!(generated.diagnostics.len(), 1);
    assert_eq!(generated.diagnostics[0].severity, Severity::Warning);
    assert_eq!(generated.diagnostics[0].message, "Unmapped target properties: \"color\".");
    assert!(generated.method("summarize").is_some());
}

#[test]
fn explicit_constant_becomes_a_string_literal() {
    let types = fixtures::types();
    let config = GeneratorConfig::default();
    let method = SourceMethod::builder("toDto", fixtures::mapper(&types), types.get_type(CAR_DTO))
        .source_parameter("car", types.get_type(CAR))
        .mapping(PropertyMappingOptions::new("name").constant("unnamed"))
        .build()
        .unwrap();

    let generated = MapperProcessor::new(&types, &config).process(&fixtures::decl(&types, vec![method]));
    let bean = generated.method("toDto").and_then(|m| m.as_bean()).unwrap();
    let name = bean.property_mapping("name").unwrap();

    assert!(name.source_path.is_none());
    let rhs = name.assignment.source_rhs().unwrap();
    assert!(rhs.is_constant);
    assert_eq!(rhs.source_reference, "\"unnamed\"");
}

#[test]
fn lifecycle_callbacks_and_factories_are_attached() {
    let types = fixtures::types();
    let config = GeneratorConfig::default();
    let mapper = fixtures::mapper(&types);
    let dto = types.get_type(CAR_DTO);
    let factory = SourceMethod::builder("createDto", mapper.clone(), dto.clone())
        .object_factory()
        .build()
        .unwrap();
    let after = SourceMethod::builder("afterMapping", mapper, types.void())
        .mapping_target("dto", dto)
        .after_mapping()
        .build()
        .unwrap();
    let decl = fixtures::decl(&types, vec![fixtures::to_dto(&types), factory, after]);

    let generated = MapperProcessor::new(&types, &config).process(&decl);
    assert!(!generated.has_errors(), "{:#?}", generated.diagnostics);
    assert_eq!(generated.methods.len(), 1);

    let bean = generated.method("toDto").and_then(|m| m.as_bean()).unwrap();
    assert_eq!(bean.factory.as_ref().map(|f| f.name.as_str()), Some("createDto"));
    assert!(bean.instantiation_type.is_none());
    assert!(bean.before_mappings.is_empty());
    let after: Vec<&str> = bean.after_mappings.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(after, vec!["afterMapping"]);
}

fn garage_types() -> TypeFactory {
    let mut types = fixtures::types();
    types.declare(ClassDecl::class("com.example.Person").property(PropertyDecl::new("name", "String")));
    types.declare(ClassDecl::class("com.example.PersonDto").property(PropertyDecl::new("name", "String")));
    types.declare(
        ClassDecl::class("com.example.Garage")
            .property(PropertyDecl::new("owner", "com.example.Person"))
            .property(PropertyDecl::new("built", "java.util.Calendar")),
    );
    types.declare(
        ClassDecl::class("com.example.GarageDto")
            .property(PropertyDecl::new("owner", "com.example.PersonDto"))
            .property(PropertyDecl::new("built", "java.util.Date")),
    );
    types
}

#[test]
fn used_mappers_and_built_ins_are_recorded() {
    let types = garage_types();
    let config = GeneratorConfig::default();
    let person_mapper = types.get_type("com.other.PersonMapper");
    let person_to_dto = SourceMethod::builder("toDto", person_mapper.clone(), types.get_type("com.example.PersonDto"))
        .source_parameter("person", types.get_type("com.example.Person"))
        .implemented()
        .build()
        .unwrap();
    let garage = SourceMethod::builder("toDto", fixtures::mapper(&types), types.get_type("com.example.GarageDto"))
        .source_parameter("garage", types.get_type("com.example.Garage"))
        .build()
        .unwrap();
    let decl = fixtures::decl(&types, vec![garage]).uses(person_mapper.clone(), vec![person_to_dto]);

    let generated = MapperProcessor::new(&types, &config).process(&decl);
    assert!(!generated.has_errors(), "{:#?}", generated.diagnostics);

    let bean = generated.method("toDto").and_then(|m| m.as_bean()).unwrap();
    let owner = bean.property_mapping("owner").unwrap().assignment.innermost();
    let Assignment::MethodReference(call) = owner else {
        panic!("expected a method call, got {owner:?}");
    };
    assert_eq!(
        call.provenance,
        MethodProvenance::UsedMapper {
            mapper: person_mapper.clone()
        }
    );

    let built = bean.property_mapping("built").unwrap().assignment.innermost();
    let Assignment::MethodReference(call) = built else {
        panic!("expected a built-in call, got {built:?}");
    };
    assert_eq!(call.provenance, MethodProvenance::BuiltIn);

    assert_eq!(generated.used_mappers, vec![person_mapper]);
    assert_eq!(generated.used_built_in_methods, vec!["calendarToDate".to_string()]);
    let imports = qualified_names(&generated.import_types);
    assert!(imports.contains(&"com.other.PersonMapper".to_string()), "{imports:?}");
    assert!(imports.contains(&"java.util.Calendar".to_string()), "{imports:?}");
}

#[test]
fn output_serializes_to_json() {
    let types = fixtures::types();
    let config = GeneratorConfig::default();
    let generated = MapperProcessor::new(&types, &config)
        .process(&fixtures::decl(&types, vec![fixtures::to_dto(&types)]));

    let json: serde_json::Value = serde_json::from_str(&generated.to_json().unwrap()).unwrap();
    assert_eq!(json["implementation_name"], "CarMapperImpl");
    assert_eq!(json["methods"][0]["kind"], "bean");
    assert_eq!(json["methods"][0]["name"], "toDto");
}

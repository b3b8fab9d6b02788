use nova_mapgen::simulate::{SimulationError, Simulator, Value};
use nova_mapgen::{
    Assignment, AssignmentType, BeanMappingMethod, GeneratedMapper, MapperProcessor,
    PropertyMappingOptions, SourceMethod,
};
use nova_mapgen_config::GeneratorConfig;
use nova_mapgen_types::{ClassDecl, PropertyDecl, TypeFactory};

use pretty_assertions::assert_eq;

use super::fixtures::{self, CAR};

fn process(types: &TypeFactory, methods: Vec<SourceMethod>) -> GeneratedMapper {
    let config = GeneratorConfig::default();
    MapperProcessor::new(types, &config).process(&fixtures::decl(types, methods))
}

fn bean<'g>(generated: &'g GeneratedMapper, name: &str) -> &'g BeanMappingMethod {
    assert!(!generated.has_errors(), "{:#?}", generated.diagnostics);
    generated.method(name).and_then(|m| m.as_bean()).unwrap()
}

fn called<'a>(assignment: &'a Assignment) -> Vec<&'a str> {
    let mut names = Vec::new();
    let mut current = assignment.innermost();
    loop {
        match current {
            Assignment::MethodReference(call) => {
                names.push(call.name.as_str());
                match call.argument.as_deref() {
                    Some(argument) => current = argument,
                    None => break,
                }
            }
            Assignment::TypeConversion(conversion) => current = &conversion.argument,
            _ => break,
        }
    }
    names
}

/// `<name>(<source>) -> <target>`, provided by the mapper's author.
fn user_method(types: &TypeFactory, name: &str, source: &str, target: &str) -> SourceMethod {
    SourceMethod::builder(name, fixtures::mapper(types), fixtures::ty(types, target))
        .source_parameter("value", fixtures::ty(types, source))
        .implemented()
        .build()
        .unwrap()
}

#[test]
fn user_method_wins_over_direct_assignment() {
    let types = fixtures::types();
    let trim = user_method(&types, "trim", "String", "String");
    let generated = process(&types, vec![fixtures::to_dto(&types), trim]);
    let bean = bean(&generated, "toDto");

    let name = &bean.property_mapping("name").unwrap().assignment;
    assert_eq!(called(name), vec!["trim"]);
    assert_eq!(name.assignment_type(), AssignmentType::Mapped);

    let simulator = Simulator::new().with_method("trim", |value| match value {
        Value::Str(text) => Ok(Value::str(text.trim())),
        other => Ok(other.clone()),
    });
    let mut slot = Value::Null;
    simulator
        .apply_property_assignment(name, &mut slot, &Value::str("  Beetle "))
        .unwrap();
    assert_eq!(slot, Value::str("Beetle"));
}

#[test]
fn unregistered_methods_cannot_be_simulated() {
    let types = fixtures::types();
    let trim = user_method(&types, "trim", "String", "String");
    let generated = process(&types, vec![fixtures::to_dto(&types), trim]);
    let name = &bean(&generated, "toDto").property_mapping("name").unwrap().assignment;

    let mut slot = Value::Null;
    assert_eq!(
        Simulator::new().apply_property_assignment(name, &mut slot, &Value::str("a")),
        Err(SimulationError::UnsupportedMethod("trim".to_string()))
    );
}

fn vehicle_types() -> TypeFactory {
    let mut types = fixtures::types();
    for (name, property, ty) in [
        ("com.example.Engine", "power", "int"),
        ("com.example.EngineSpec", "power", "int"),
        ("com.example.EngineDto", "power", "int"),
        ("com.example.PowerDto", "value", "String"),
        ("com.example.Code", "value", "int"),
        ("com.example.PowerView", "power", "int"),
        ("com.example.EngineView", "power", "com.example.PowerDto"),
        ("com.example.VehicleDto", "engine", "com.example.EngineDto"),
        ("com.example.VehicleLabel", "code", "String"),
    ] {
        types.declare(ClassDecl::class(name).property(PropertyDecl::new(property, ty)));
    }
    types.declare(
        ClassDecl::class("com.example.Vehicle")
            .property(PropertyDecl::new("engine", "com.example.Engine"))
            .property(PropertyDecl::new("code", "com.example.Code")),
    );
    types
}

/// An abstract `map(Vehicle vehicle)` producing `target`.
fn vehicle_method(types: &TypeFactory, target: &str) -> SourceMethod {
    SourceMethod::builder("map", fixtures::mapper(types), types.get_type(target))
        .source_parameter("vehicle", types.get_type("com.example.Vehicle"))
        .build()
        .unwrap()
}

#[test]
fn nested_source_path_guards_every_intermediate_getter() {
    let types = vehicle_types();
    let method = SourceMethod::builder("view", fixtures::mapper(&types), types.get_type("com.example.PowerView"))
        .source_parameter("vehicle", types.get_type("com.example.Vehicle"))
        .mapping(PropertyMappingOptions::new("power").source("engine.power"))
        .build()
        .unwrap();
    let generated = process(&types, vec![method]);
    let power = bean(&generated, "view").property_mapping("power").unwrap();

    assert_eq!(power.source_path.as_deref(), Some("vehicle.engine.power"));
    let rhs = power.assignment.source_rhs().unwrap();
    assert_eq!(rhs.source_reference, "vehicle.getEngine().getPower()");
    assert_eq!(rhs.path_null_checks, vec!["vehicle.getEngine()".to_string()]);
    let Assignment::Setter(setter) = &power.assignment else {
        panic!("expected a setter, got {:?}", power.assignment);
    };
    assert!(setter.is_include_source_null_check());

    // A missing engine leaves the primitive target untouched.
    let mut slot = Value::Int(7);
    Simulator::new()
        .apply_property_assignment(&power.assignment, &mut slot, &Value::Null)
        .unwrap();
    assert_eq!(slot, Value::Int(7));
}

#[test]
fn top_level_property_has_no_path_guards() {
    let types = fixtures::types();
    let generated = process(&types, vec![fixtures::to_dto(&types)]);
    let name = &bean(&generated, "toDto").property_mapping("name").unwrap().assignment;

    assert!(name.source_rhs().unwrap().path_null_checks.is_empty());
}

#[test]
fn two_methods_for_one_property_are_ambiguous() {
    let types = fixtures::types();
    let first = user_method(&types, "f", "String", "String");
    let second = user_method(&types, "g", "String", "String");
    let generated = process(&types, vec![fixtures::to_dto(&types), first, second]);

    let errors: Vec<_> = generated.diagnostics.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1, "{errors:#?}");
    assert_eq!(errors[0].code, "MAPGEN_AMBIGUOUS_MAPPING_METHODS");
    assert!(errors[0].message.contains("car.name"), "{}", errors[0].message);
    assert!(errors[0].message.contains("f("), "{}", errors[0].message);
    assert!(errors[0].message.contains("g("), "{}", errors[0].message);
}

#[test]
fn two_chained_methods() {
    let types = vehicle_types();
    let methods = vec![
        vehicle_method(&types, "com.example.VehicleDto"),
        user_method(&types, "toSpec", "com.example.Engine", "com.example.EngineSpec"),
        user_method(&types, "specToDto", "com.example.EngineSpec", "com.example.EngineDto"),
    ];

    let generated = process(&types, methods);
    let engine = &bean(&generated, "map").property_mapping("engine").unwrap().assignment;

    assert_eq!(called(engine), vec!["specToDto", "toSpec"]);
    assert_eq!(engine.assignment_type(), AssignmentType::MappedTwice);
}

#[test]
fn method_after_a_conversion() {
    let types = vehicle_types();
    let view = SourceMethod::builder("view", fixtures::mapper(&types), types.get_type("com.example.EngineView"))
        .source_parameter("engine", types.get_type("com.example.Engine"))
        .build()
        .unwrap();
    let to_power = user_method(&types, "toPower", "String", "com.example.PowerDto");

    let generated = process(&types, vec![view, to_power]);
    let power = &bean(&generated, "view").property_mapping("power").unwrap().assignment;

    assert_eq!(called(power), vec!["toPower"]);
    assert_eq!(power.assignment_type(), AssignmentType::TypeConvertedMapped);

    let simulator = Simulator::new().with_method("toPower", |value| match value {
        Value::Str(text) => Ok(Value::str(format!("{text} hp"))),
        other => Err(SimulationError::Conversion {
            value: other.clone(),
            target: "String".to_string(),
        }),
    });
    assert_eq!(simulator.evaluate(power, &Value::Int(150)).unwrap(), Value::str("150 hp"));
}

#[test]
fn conversion_after_a_method() {
    let types = vehicle_types();
    let methods = vec![
        vehicle_method(&types, "com.example.VehicleLabel"),
        user_method(&types, "codeValue", "com.example.Code", "int"),
    ];

    let generated = process(&types, methods);
    let code = &bean(&generated, "map").property_mapping("code").unwrap().assignment;

    assert_eq!(called(code), vec!["codeValue"]);
    assert_eq!(code.assignment_type(), AssignmentType::MappedTypeConverted);
    let Assignment::TypeConversion(_) = code.innermost() else {
        panic!("expected a conversion of the method result, got {code:?}");
    };

    let simulator = Simulator::new().with_method("codeValue", |_| Ok(Value::Int(42)));
    assert_eq!(simulator.evaluate(code, &Value::str("code")).unwrap(), Value::str("42"));
}

#[test]
fn properties_without_user_methods_stay_direct() {
    let types = fixtures::types();
    let generated = process(&types, vec![fixtures::to_dto(&types)]);
    let bean = bean(&generated, "toDto");

    assert_eq!(bean.parameters[0].ty, types.get_type(CAR));
    for property in ["name", "wheels", "tags"] {
        let assignment = &bean.property_mapping(property).unwrap().assignment;
        assert!(called(assignment).is_empty(), "{property}: {assignment:?}");
        assert_eq!(assignment.assignment_type(), AssignmentType::Direct, "{property}");
    }
}

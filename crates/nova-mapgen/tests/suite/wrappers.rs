use nova_mapgen::{
    Assignment, AssignmentType, ExistingInstanceMergeWrapper, NullCheckWrapper, PresenceCheck,
    SetterWrapper, SourceRhs, TypeConversion,
};
use nova_mapgen_config::{NullValueCheckStrategy, NullValuePropertyMappingStrategy};
use nova_mapgen_types::{Type, TypeFactory};

use pretty_assertions::assert_eq;

use super::fixtures::{self, ty};

fn wheels_rhs(types: &TypeFactory, text: &str) -> SourceRhs {
    SourceRhs::property("car", "car.wheels", "car.getWheels()", ty(types, text))
}

/// A non-direct value: the source list passed through a conversion.
fn converted(types: &TypeFactory, source: &str, target: &str) -> Assignment {
    Assignment::TypeConversion(TypeConversion {
        source_type: ty(types, source),
        target_type: ty(types, target),
        expression: "copy( <SOURCE> )".into(),
        import_types: Vec::new(),
        thrown_types: Vec::new(),
        argument: Box::new(Assignment::Direct(wheels_rhs(types, source))),
    })
}

fn merge(
    types: &TypeFactory,
    decorated: Assignment,
    target: &Type,
    nvcs: NullValueCheckStrategy,
    nvpms: NullValuePropertyMappingStrategy,
) -> ExistingInstanceMergeWrapper {
    ExistingInstanceMergeWrapper::new(decorated, Vec::new(), target.clone(), nvcs, nvpms, types, false)
}

#[test]
fn else_branch_grid() {
    let types = fixtures::types();
    let target = ty(&types, "java.util.List<com.example.Wheel>");
    let direct = Assignment::Direct(wheels_rhs(&types, "java.util.List<com.example.Wheel>"));

    for nvcs in [NullValueCheckStrategy::OnImplicitConversion, NullValueCheckStrategy::Always] {
        for nvpms in [
            NullValuePropertyMappingStrategy::SetToNull,
            NullValuePropertyMappingStrategy::SetToDefault,
            NullValuePropertyMappingStrategy::Ignore,
        ] {
            let wrapper = merge(&types, direct.clone(), &target, nvcs, nvpms);
            let expected = nvcs != NullValueCheckStrategy::Always
                && nvpms != NullValuePropertyMappingStrategy::Ignore;
            assert_eq!(
                wrapper.is_include_else_branch(),
                expected,
                "nvcs={nvcs:?} nvpms={nvpms:?}"
            );
            assert_eq!(
                wrapper.is_map_null_to_default(),
                nvpms == NullValuePropertyMappingStrategy::SetToDefault,
                "nvcs={nvcs:?} nvpms={nvpms:?}"
            );
        }
    }
}

#[test]
fn map_null_to_default_imports_the_implementation_type() {
    let types = fixtures::types();
    let array_list = types.get_type("java.util.ArrayList");
    let target = ty(&types, "java.util.List<com.example.Wheel>");
    let value = converted(
        &types,
        "java.util.List<com.example.Wheel>",
        "java.util.List<com.example.Wheel>",
    );

    let defaulting = merge(
        &types,
        value.clone(),
        &target,
        NullValueCheckStrategy::OnImplicitConversion,
        NullValuePropertyMappingStrategy::SetToDefault,
    );
    let nulling = merge(
        &types,
        value,
        &target,
        NullValueCheckStrategy::OnImplicitConversion,
        NullValuePropertyMappingStrategy::SetToNull,
    );

    assert!(defaulting.import_types().contains(&array_list));
    assert!(!nulling.import_types().contains(&array_list));
}

#[test]
fn map_null_to_default_adds_nothing_for_concrete_targets() {
    let types = fixtures::types();
    let target = ty(&types, "java.util.ArrayList<com.example.Wheel>");
    assert!(target.implementation_type().is_none());
    let value = converted(
        &types,
        "java.util.List<com.example.Wheel>",
        "java.util.ArrayList<com.example.Wheel>",
    );

    let defaulting = merge(
        &types,
        value.clone(),
        &target,
        NullValueCheckStrategy::OnImplicitConversion,
        NullValuePropertyMappingStrategy::SetToDefault,
    );
    let nulling = merge(
        &types,
        value,
        &target,
        NullValueCheckStrategy::OnImplicitConversion,
        NullValuePropertyMappingStrategy::SetToNull,
    );

    assert!(defaulting.is_map_null_to_default());
    assert_eq!(defaulting.import_types(), nulling.import_types());
}

#[test]
fn wrapper_imports_contain_inner_imports() {
    let types = fixtures::types();
    let targets = [
        "java.util.List<com.example.Wheel>",
        "java.util.Map<String, com.example.Wheel>",
        "java.util.ArrayList<com.example.Wheel>",
    ];

    for target_text in targets {
        let target = ty(&types, target_text);
        let plain = Assignment::Direct(wheels_rhs(&types, target_text));
        let checked = Assignment::Direct(wheels_rhs(&types, target_text).with_presence_checker(
            PresenceCheck::Accessor {
                expression: "car.hasWheels()".into(),
            },
        ));
        let conversion = converted(&types, target_text, target_text);

        for inner in [plain, checked, conversion] {
            let inner_imports = inner.import_types();
            let wrappers = [
                Assignment::NullCheck(NullCheckWrapper::new(
                    inner.clone(),
                    Vec::new(),
                    target.clone(),
                    &types,
                    false,
                )),
                Assignment::ExistingInstanceMerge(merge(
                    &types,
                    inner.clone(),
                    &target,
                    NullValueCheckStrategy::Always,
                    NullValuePropertyMappingStrategy::SetToDefault,
                )),
                Assignment::Setter(SetterWrapper::new(inner.clone(), target.clone(), Vec::new())),
            ];
            for wrapper in wrappers {
                let outer = wrapper.import_types();
                for import in &inner_imports {
                    assert!(
                        outer.contains(import),
                        "{import} missing from {:?} over {:?}",
                        wrapper.assignment_type(),
                        inner.assignment_type()
                    );
                }
            }
        }
    }
}

#[test]
fn wrappers_report_their_innermost_assignment_type() {
    let types = fixtures::types();
    let target = ty(&types, "java.util.List<com.example.Wheel>");
    let value = converted(
        &types,
        "java.util.List<com.example.Wheel>",
        "java.util.List<com.example.Wheel>",
    );
    let wrapped = Assignment::NullCheck(NullCheckWrapper::new(
        Assignment::Setter(SetterWrapper::new(value, target.clone(), Vec::new())),
        Vec::new(),
        target,
        &types,
        false,
    ));

    assert_eq!(wrapped.assignment_type(), AssignmentType::TypeConverted);
    assert!(wrapped.is_wrapper());
    assert!(matches!(wrapped.innermost(), Assignment::TypeConversion(_)));
}

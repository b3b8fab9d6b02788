use nova_mapgen_config::{
    NullValueMappingStrategy, NullValuePropertyMappingStrategy, OptionsScope, ReportingPolicy,
    ResolvedOptions,
};

use pretty_assertions::assert_eq;

#[test]
fn defaults_apply_when_no_layer_sets_a_value() {
    let resolved = ResolvedOptions::resolve(&[]);
    assert_eq!(
        resolved.null_value_property_mapping_strategy,
        NullValuePropertyMappingStrategy::SetToNull
    );
    assert_eq!(
        resolved.null_value_mapping_strategy,
        NullValueMappingStrategy::ReturnNull
    );
    assert_eq!(resolved.unmapped_target_policy, ReportingPolicy::Warn);
    assert_eq!(resolved.implementation_name, "<CLASS_NAME>Impl");
}

#[test]
fn local_beats_mapper_beats_config_beats_global() {
    let global = OptionsScope {
        unmapped_target_policy: Some(ReportingPolicy::Ignore),
        null_value_mapping_strategy: Some(NullValueMappingStrategy::ReturnDefault),
        null_value_property_mapping_strategy: Some(NullValuePropertyMappingStrategy::Ignore),
        ..OptionsScope::default()
    };
    let mapper_config = OptionsScope {
        unmapped_target_policy: Some(ReportingPolicy::Error),
        ..OptionsScope::default()
    };
    let mapper = OptionsScope {
        null_value_property_mapping_strategy: Some(NullValuePropertyMappingStrategy::SetToDefault),
        ..OptionsScope::default()
    };
    let local = OptionsScope {
        null_value_property_mapping_strategy: Some(NullValuePropertyMappingStrategy::SetToNull),
        ..OptionsScope::default()
    };

    let resolved = ResolvedOptions::resolve(&[&local, &mapper, &mapper_config, &global]);
    assert_eq!(
        resolved.null_value_property_mapping_strategy,
        NullValuePropertyMappingStrategy::SetToNull
    );
    assert_eq!(resolved.unmapped_target_policy, ReportingPolicy::Error);
    assert_eq!(
        resolved.null_value_mapping_strategy,
        NullValueMappingStrategy::ReturnDefault
    );

    let without_local = ResolvedOptions::resolve(&[&mapper, &mapper_config, &global]);
    assert_eq!(
        without_local.null_value_property_mapping_strategy,
        NullValuePropertyMappingStrategy::SetToDefault
    );
}

#[test]
fn map_specific_strategy_overrides_general_strategy_from_any_layer() {
    // A shared mapper config asking for empty results in general but `null` for maps.
    let central = OptionsScope {
        null_value_mapping_strategy: Some(NullValueMappingStrategy::ReturnDefault),
        null_value_map_mapping_strategy: Some(NullValueMappingStrategy::ReturnNull),
        ..OptionsScope::default()
    };

    let resolved = ResolvedOptions::resolve(&[&OptionsScope::default(), &central]);
    assert_eq!(
        resolved.null_value_map_mapping_strategy,
        NullValueMappingStrategy::ReturnNull
    );
    assert_eq!(
        resolved.null_value_iterable_mapping_strategy,
        NullValueMappingStrategy::ReturnDefault
    );
    assert_eq!(
        resolved.null_value_mapping_strategy,
        NullValueMappingStrategy::ReturnDefault
    );
}

use nova_mapgen_config::{
    ConfigError, ConfigWarning, GeneratorConfig, NullValueCheckStrategy,
    NullValuePropertyMappingStrategy,
};

use pretty_assertions::assert_eq;

#[test]
fn strategies_use_annotation_constant_names() {
    let text = r#"
suppress_generator_timestamp = true

[defaults]
null_value_check_strategy = "ALWAYS"
null_value_property_mapping_strategy = "SET_TO_DEFAULT"
component_model = "spring"
"#;

    let config = GeneratorConfig::load_from_str(text).expect("config should parse");
    assert!(config.suppress_generator_timestamp);
    assert_eq!(
        config.defaults.null_value_check_strategy,
        Some(NullValueCheckStrategy::Always)
    );
    assert_eq!(
        config.defaults.null_value_property_mapping_strategy,
        Some(NullValuePropertyMappingStrategy::SetToDefault)
    );
    assert_eq!(config.logging.level, "info");
}

#[test]
fn unknown_keys_are_reported_not_rejected() {
    let text = r#"
[defaults]
null_value_check_strategyy = "ALWAYS"

[logging]
level = "debug"
"#;

    let (config, diagnostics) =
        GeneratorConfig::load_from_str_with_diagnostics(text).expect("config should parse");
    assert_eq!(config.defaults.null_value_check_strategy, None);
    assert_eq!(
        diagnostics.unknown_keys,
        vec!["defaults.null_value_check_strategyy".to_string()]
    );
    assert_eq!(
        diagnostics.warnings,
        vec![ConfigWarning::UnknownOption {
            key: "defaults.null_value_check_strategyy".to_string(),
            suggestion: Some("defaults.null_value_check_strategy".to_string()),
        }]
    );
}

#[test]
fn implementation_name_without_placeholder_warns() {
    let text = r#"
[defaults]
implementation_name = "SharedImpl"
"#;

    let (_config, diagnostics) =
        GeneratorConfig::load_from_str_with_diagnostics(text).expect("config should parse");
    assert_eq!(
        diagnostics.warnings,
        vec![ConfigWarning::ImplementationNameWithoutPlaceholder {
            value: "SharedImpl".to_string()
        }]
    );
}

#[test]
fn invalid_strategy_value_is_a_parse_error() {
    let text = r#"
[defaults]
null_value_mapping_strategy = "RETURN_SOMETHING"
"#;

    let err = GeneratorConfig::load_from_str(text).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "unexpected error: {err:?}");
}

#[test]
fn loads_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mapgen.toml");
    std::fs::write(&path, "verbose = true\n").expect("write config");

    let config = GeneratorConfig::load_from_path(&path).expect("config should load");
    assert!(config.verbose);

    let missing = GeneratorConfig::load_from_path(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
}

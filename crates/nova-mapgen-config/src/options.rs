use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::strategy::{
    CollectionMappingStrategy, ComponentModel, InjectionStrategy, NullValueCheckStrategy,
    NullValueMappingStrategy, NullValuePropertyMappingStrategy, ReportingPolicy,
};

/// Placeholder replaced with the mapper's simple name in `implementation_name`.
pub const CLASS_NAME_PLACEHOLDER: &str = "<CLASS_NAME>";
/// Placeholder replaced with the mapper's package in `implementation_package`.
pub const PACKAGE_NAME_PLACEHOLDER: &str = "<PACKAGE_NAME>";

/// One layer of mapping options.
///
/// Layers exist for a single mapping (property or method level), a mapper, a shared mapper
/// configuration, and the global configuration file. Unset values fall through to the next layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct OptionsScope {
    #[serde(default)]
    pub null_value_check_strategy: Option<NullValueCheckStrategy>,
    #[serde(default)]
    pub null_value_property_mapping_strategy: Option<NullValuePropertyMappingStrategy>,
    #[serde(default)]
    pub null_value_mapping_strategy: Option<NullValueMappingStrategy>,
    /// Overrides `null_value_mapping_strategy` for iterable mapping methods.
    #[serde(default)]
    pub null_value_iterable_mapping_strategy: Option<NullValueMappingStrategy>,
    /// Overrides `null_value_mapping_strategy` for map mapping methods.
    #[serde(default)]
    pub null_value_map_mapping_strategy: Option<NullValueMappingStrategy>,
    #[serde(default)]
    pub collection_mapping_strategy: Option<CollectionMappingStrategy>,
    #[serde(default)]
    pub unmapped_target_policy: Option<ReportingPolicy>,
    #[serde(default)]
    pub unmapped_source_policy: Option<ReportingPolicy>,
    #[serde(default)]
    pub component_model: Option<ComponentModel>,
    #[serde(default)]
    pub injection_strategy: Option<InjectionStrategy>,
    #[serde(default)]
    pub implementation_name: Option<String>,
    #[serde(default)]
    pub implementation_package: Option<String>,
}

impl OptionsScope {
    /// Config keys of every option, as they appear in a `[defaults]` table.
    pub const KEYS: &'static [&'static str] = &[
        "null_value_check_strategy",
        "null_value_property_mapping_strategy",
        "null_value_mapping_strategy",
        "null_value_iterable_mapping_strategy",
        "null_value_map_mapping_strategy",
        "collection_mapping_strategy",
        "unmapped_target_policy",
        "unmapped_source_policy",
        "component_model",
        "injection_strategy",
        "implementation_name",
        "implementation_package",
    ];

    /// Combine two layers; values set on `self` win over `lower`.
    #[must_use]
    pub fn overlay(&self, lower: &OptionsScope) -> OptionsScope {
        OptionsScope {
            null_value_check_strategy: self
                .null_value_check_strategy
                .or(lower.null_value_check_strategy),
            null_value_property_mapping_strategy: self
                .null_value_property_mapping_strategy
                .or(lower.null_value_property_mapping_strategy),
            null_value_mapping_strategy: self
                .null_value_mapping_strategy
                .or(lower.null_value_mapping_strategy),
            null_value_iterable_mapping_strategy: self
                .null_value_iterable_mapping_strategy
                .or(lower.null_value_iterable_mapping_strategy),
            null_value_map_mapping_strategy: self
                .null_value_map_mapping_strategy
                .or(lower.null_value_map_mapping_strategy),
            collection_mapping_strategy: self
                .collection_mapping_strategy
                .or(lower.collection_mapping_strategy),
            unmapped_target_policy: self.unmapped_target_policy.or(lower.unmapped_target_policy),
            unmapped_source_policy: self.unmapped_source_policy.or(lower.unmapped_source_policy),
            component_model: self.component_model.or(lower.component_model),
            injection_strategy: self.injection_strategy.or(lower.injection_strategy),
            implementation_name: self
                .implementation_name
                .clone()
                .or_else(|| lower.implementation_name.clone()),
            implementation_package: self
                .implementation_package
                .clone()
                .or_else(|| lower.implementation_package.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &OptionsScope::default()
    }
}

/// Fully resolved options for one mapping method or property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedOptions {
    pub null_value_check_strategy: NullValueCheckStrategy,
    pub null_value_property_mapping_strategy: NullValuePropertyMappingStrategy,
    pub null_value_mapping_strategy: NullValueMappingStrategy,
    pub null_value_iterable_mapping_strategy: NullValueMappingStrategy,
    pub null_value_map_mapping_strategy: NullValueMappingStrategy,
    pub collection_mapping_strategy: CollectionMappingStrategy,
    pub unmapped_target_policy: ReportingPolicy,
    pub unmapped_source_policy: ReportingPolicy,
    pub component_model: ComponentModel,
    pub injection_strategy: InjectionStrategy,
    pub implementation_name: String,
    pub implementation_package: String,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self::resolve(&[])
    }
}

impl ResolvedOptions {
    /// Resolve `layers`, ordered from highest to lowest precedence
    /// (local > mapper > mapper config > global), falling back to the built-in defaults.
    ///
    /// The iterable and map specific null-value strategies consult every layer before falling
    /// back to the general `null_value_mapping_strategy`.
    pub fn resolve(layers: &[&OptionsScope]) -> Self {
        let merged = layers
            .iter()
            .rev()
            .fold(OptionsScope::default(), |lower, layer| layer.overlay(&lower));

        let general = merged.null_value_mapping_strategy.unwrap_or_default();
        Self {
            null_value_check_strategy: merged.null_value_check_strategy.unwrap_or_default(),
            null_value_property_mapping_strategy: merged
                .null_value_property_mapping_strategy
                .unwrap_or_default(),
            null_value_mapping_strategy: general,
            null_value_iterable_mapping_strategy: merged
                .null_value_iterable_mapping_strategy
                .unwrap_or(general),
            null_value_map_mapping_strategy: merged
                .null_value_map_mapping_strategy
                .unwrap_or(general),
            collection_mapping_strategy: merged.collection_mapping_strategy.unwrap_or_default(),
            unmapped_target_policy: merged.unmapped_target_policy.unwrap_or_default(),
            unmapped_source_policy: merged.unmapped_source_policy.unwrap_or(ReportingPolicy::Ignore),
            component_model: merged.component_model.unwrap_or_default(),
            injection_strategy: merged.injection_strategy.unwrap_or_default(),
            implementation_name: merged
                .implementation_name
                .unwrap_or_else(|| format!("{CLASS_NAME_PLACEHOLDER}Impl")),
            implementation_package: merged
                .implementation_package
                .unwrap_or_else(|| PACKAGE_NAME_PLACEHOLDER.to_string()),
        }
    }

    /// Implementation class name with placeholders applied.
    pub fn implementation_name_for(&self, mapper_simple_name: &str) -> String {
        self.implementation_name
            .replace(CLASS_NAME_PLACEHOLDER, mapper_simple_name)
    }

    /// Implementation package with placeholders applied; `None` for the default package.
    pub fn implementation_package_for(&self, mapper_package: Option<&str>) -> Option<String> {
        let resolved = self
            .implementation_package
            .replace(PACKAGE_NAME_PLACEHOLDER, mapper_package.unwrap_or_default());
        let resolved = resolved.trim_matches('.');
        (!resolved.is_empty()).then(|| resolved.to_string())
    }
}

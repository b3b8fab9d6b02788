use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// When a null guard is emitted around a source value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NullValueCheckStrategy {
    /// Only check for null when a conversion or mapping method is involved, or when the target
    /// cannot hold null.
    #[default]
    OnImplicitConversion,
    /// Always guard the assignment with a null (or presence) check.
    Always,
}

/// What happens to a target property of an update method when the source value is null.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NullValuePropertyMappingStrategy {
    #[default]
    SetToNull,
    SetToDefault,
    Ignore,
}

/// What a mapping method returns when its source argument is null.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NullValueMappingStrategy {
    #[default]
    ReturnNull,
    ReturnDefault,
}

/// How collection-typed target properties are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionMappingStrategy {
    /// Setter for create methods; existing collections are merged in place for update methods.
    #[default]
    AccessorOnly,
    SetterPreferred,
    /// Target collections are never mutated in place.
    TargetImmutable,
}

/// How unmapped properties are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportingPolicy {
    Ignore,
    #[default]
    Warn,
    Error,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentModel {
    #[default]
    Default,
    Spring,
    Cdi,
    Jsr330,
    Jakarta,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InjectionStrategy {
    #[default]
    Field,
    Constructor,
    Setter,
}

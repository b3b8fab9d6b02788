use std::fmt;

use nova_mapgen_config::OptionsScope;
use nova_mapgen_types::Type;
use serde::Serialize;
use thiserror::Error;

/// How a parameter participates in a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterRole {
    /// Receives the value being mapped.
    Source,
    /// `@MappingTarget`: the existing instance being updated.
    MappingTarget,
    /// `@TargetType`: receives the `Class` of the requested target.
    TargetType,
    /// `@Context`: passed through unchanged from the calling mapping method.
    Context,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
    pub role: ParameterRole,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type, role: ParameterRole) -> Self {
        Self {
            name: name.into(),
            ty,
            role,
        }
    }

    pub fn source(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, ty, ParameterRole::Source)
    }

    pub fn mapping_target(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, ty, ParameterRole::MappingTarget)
    }

    pub fn target_type(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, ty, ParameterRole::TargetType)
    }

    pub fn context(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, ty, ParameterRole::Context)
    }

    pub fn is_source(&self) -> bool {
        self.role == ParameterRole::Source
    }

    pub fn is_mapping_target(&self) -> bool {
        self.role == ParameterRole::MappingTarget
    }

    pub fn is_target_type(&self) -> bool {
        self.role == ParameterRole::TargetType
    }

    pub fn is_context(&self) -> bool {
        self.role == ParameterRole::Context
    }
}

/// The mutually exclusive kinds of candidate method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodFamily {
    Mapping,
    ObjectFactory,
    LifecycleCallback,
    PresenceCheck,
}

impl fmt::Display for MethodFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MethodFamily::Mapping => "mapping method",
            MethodFamily::ObjectFactory => "object factory",
            MethodFamily::LifecycleCallback => "lifecycle callback",
            MethodFamily::PresenceCheck => "presence check",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleTiming {
    BeforeMapping,
    AfterMapping,
}

/// A candidate method as seen by the selection pipeline.
pub trait Method: fmt::Debug {
    fn name(&self) -> &str;

    /// `None` for methods that are not declared on any type (built-ins rendered inline).
    fn declaring_type(&self) -> Option<&Type>;

    fn parameters(&self) -> &[Parameter];

    fn return_type(&self) -> &Type;

    fn thrown_types(&self) -> &[Type] {
        &[]
    }

    /// Generic method type parameters (`<T>` in `<T> List<T> copy(List<T> in)`).
    fn type_parameters(&self) -> &[String] {
        &[]
    }

    fn qualifiers(&self) -> &[String] {
        &[]
    }

    fn is_object_factory(&self) -> bool;

    fn is_lifecycle_callback(&self) -> bool;

    fn is_presence_check(&self) -> bool;

    fn is_built_in(&self) -> bool {
        false
    }

    /// Types the generated code needs besides those in the signature.
    fn extra_import_types(&self) -> Vec<Type> {
        Vec::new()
    }

    fn family(&self) -> MethodFamily {
        if self.is_object_factory() {
            MethodFamily::ObjectFactory
        } else if self.is_lifecycle_callback() {
            MethodFamily::LifecycleCallback
        } else if self.is_presence_check() {
            MethodFamily::PresenceCheck
        } else {
            MethodFamily::Mapping
        }
    }

    fn source_parameters(&self) -> Vec<&Parameter> {
        self.parameters().iter().filter(|p| p.is_source()).collect()
    }

    fn mapping_target_parameter(&self) -> Option<&Parameter> {
        self.parameters().iter().find(|p| p.is_mapping_target())
    }

    fn context_parameters(&self) -> Vec<&Parameter> {
        self.parameters().iter().filter(|p| p.is_context()).collect()
    }

    fn is_update_method(&self) -> bool {
        self.mapping_target_parameter().is_some()
    }

    /// The type this method produces: the mapping target for update methods, the return type
    /// otherwise.
    fn result_type(&self) -> &Type {
        match self.mapping_target_parameter() {
            Some(target) => &target.ty,
            None => self.return_type(),
        }
    }

    /// Human readable signature, used in diagnostics.
    fn signature(&self) -> String {
        let params = self
            .parameters()
            .iter()
            .map(|p| format!("{} {}", p.ty.simple_name(), p.name))
            .collect::<Vec<_>>()
            .join(", ");
        let owner = self
            .declaring_type()
            .map(|ty| format!("{}.", ty.simple_name()))
            .unwrap_or_default();
        format!(
            "{} {owner}{}({params})",
            self.return_type().simple_name(),
            self.name()
        )
    }
}

/// Per-element selection options for iterable and map mapping methods.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ElementMappingOptions {
    pub qualifiers: Vec<String>,
    pub result_type: Option<Type>,
}

impl ElementMappingOptions {
    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_empty() && self.result_type.is_none()
    }
}

/// Explicit configuration for a single target property.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PropertyMappingOptions {
    pub target: String,
    /// Source property path, optionally prefixed with a parameter name (`car.engine.power`).
    pub source: Option<String>,
    pub constant: Option<String>,
    pub default_value: Option<String>,
    pub ignore: bool,
    pub qualifiers: Vec<String>,
    pub result_type: Option<Type>,
    pub options: OptionsScope,
}

impl PropertyMappingOptions {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn ignored(target: impl Into<String>) -> Self {
        Self {
            ignore: true,
            ..Self::new(target)
        }
    }

    pub fn source(mut self, path: impl Into<String>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn constant(mut self, value: impl Into<String>) -> Self {
        self.constant = Some(value.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn qualified_by(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifiers.push(qualifier.into());
        self
    }

    pub fn result_type(mut self, ty: Type) -> Self {
        self.result_type = Some(ty);
        self
    }

    pub fn with_options(mut self, options: OptionsScope) -> Self {
        self.options = options;
        self
    }
}

/// Method-level configuration (`@Mapping`, `@BeanMapping`, `@IterableMapping`, `@MapMapping`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MethodOptions {
    pub options: OptionsScope,
    pub mappings: Vec<PropertyMappingOptions>,
    pub element: ElementMappingOptions,
    pub key: ElementMappingOptions,
    pub value: ElementMappingOptions,
}

impl MethodOptions {
    pub fn mapping_for(&self, target: &str) -> Option<&PropertyMappingOptions> {
        self.mappings.iter().find(|m| m.target == target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodDeclError {
    #[error("method `{method}` is declared as both {first} and {second}")]
    ConflictingFamilies {
        method: String,
        first: MethodFamily,
        second: MethodFamily,
    },
    #[error("lifecycle method `{method}` must return void or its mapping target")]
    LifecycleWithResult { method: String },
}

/// A method declared on a mapper, a used mapper, or a shared configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourceMethod {
    name: String,
    declaring_type: Type,
    parameters: Vec<Parameter>,
    return_type: Type,
    thrown_types: Vec<Type>,
    type_parameters: Vec<String>,
    qualifiers: Vec<String>,
    family: MethodFamily,
    lifecycle_timing: Option<LifecycleTiming>,
    is_abstract: bool,
    #[serde(skip)]
    options: MethodOptions,
}

impl SourceMethod {
    /// Start describing an abstract mapping method.
    pub fn builder(
        name: impl Into<String>,
        declaring_type: Type,
        return_type: Type,
    ) -> SourceMethodBuilder {
        SourceMethodBuilder {
            name: name.into(),
            declaring_type,
            return_type,
            parameters: Vec::new(),
            thrown_types: Vec::new(),
            type_parameters: Vec::new(),
            qualifiers: Vec::new(),
            families: Vec::new(),
            lifecycle_timing: None,
            is_abstract: true,
            options: MethodOptions::default(),
        }
    }

    pub fn lifecycle_timing(&self) -> Option<LifecycleTiming> {
        self.lifecycle_timing
    }

    /// Abstract methods are the ones the mapper implementation has to generate.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn options(&self) -> &MethodOptions {
        &self.options
    }
}

impl Method for SourceMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn declaring_type(&self) -> Option<&Type> {
        Some(&self.declaring_type)
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn return_type(&self) -> &Type {
        &self.return_type
    }

    fn thrown_types(&self) -> &[Type] {
        &self.thrown_types
    }

    fn type_parameters(&self) -> &[String] {
        &self.type_parameters
    }

    fn qualifiers(&self) -> &[String] {
        &self.qualifiers
    }

    fn is_object_factory(&self) -> bool {
        self.family == MethodFamily::ObjectFactory
    }

    fn is_lifecycle_callback(&self) -> bool {
        self.family == MethodFamily::LifecycleCallback
    }

    fn is_presence_check(&self) -> bool {
        self.family == MethodFamily::PresenceCheck
    }

    fn family(&self) -> MethodFamily {
        self.family
    }
}

#[derive(Debug, Clone)]
pub struct SourceMethodBuilder {
    name: String,
    declaring_type: Type,
    return_type: Type,
    parameters: Vec<Parameter>,
    thrown_types: Vec<Type>,
    type_parameters: Vec<String>,
    qualifiers: Vec<String>,
    families: Vec<MethodFamily>,
    lifecycle_timing: Option<LifecycleTiming>,
    is_abstract: bool,
    options: MethodOptions,
}

impl SourceMethodBuilder {
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn source_parameter(self, name: impl Into<String>, ty: Type) -> Self {
        self.parameter(Parameter::source(name, ty))
    }

    pub fn mapping_target(self, name: impl Into<String>, ty: Type) -> Self {
        self.parameter(Parameter::mapping_target(name, ty))
    }

    pub fn target_type_parameter(self, name: impl Into<String>, ty: Type) -> Self {
        self.parameter(Parameter::target_type(name, ty))
    }

    pub fn context(self, name: impl Into<String>, ty: Type) -> Self {
        self.parameter(Parameter::context(name, ty))
    }

    pub fn throws(mut self, ty: Type) -> Self {
        self.thrown_types.push(ty);
        self
    }

    pub fn type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn qualifier(mut self, name: impl Into<String>) -> Self {
        self.qualifiers.push(name.into());
        self
    }

    pub fn object_factory(mut self) -> Self {
        self.families.push(MethodFamily::ObjectFactory);
        self.is_abstract = false;
        self
    }

    pub fn before_mapping(mut self) -> Self {
        self.families.push(MethodFamily::LifecycleCallback);
        self.lifecycle_timing = Some(LifecycleTiming::BeforeMapping);
        self.is_abstract = false;
        self
    }

    pub fn after_mapping(mut self) -> Self {
        self.families.push(MethodFamily::LifecycleCallback);
        self.lifecycle_timing = Some(LifecycleTiming::AfterMapping);
        self.is_abstract = false;
        self
    }

    pub fn presence_check(mut self) -> Self {
        self.families.push(MethodFamily::PresenceCheck);
        self.is_abstract = false;
        self
    }

    /// A hand-written (non-abstract) mapping method: a candidate, never generated.
    pub fn implemented(mut self) -> Self {
        self.is_abstract = false;
        self
    }

    pub fn options(mut self, options: OptionsScope) -> Self {
        self.options.options = options;
        self
    }

    pub fn mapping(mut self, mapping: PropertyMappingOptions) -> Self {
        self.options.mappings.push(mapping);
        self
    }

    pub fn element_options(mut self, element: ElementMappingOptions) -> Self {
        self.options.element = element;
        self
    }

    pub fn key_options(mut self, key: ElementMappingOptions) -> Self {
        self.options.key = key;
        self
    }

    pub fn value_options(mut self, value: ElementMappingOptions) -> Self {
        self.options.value = value;
        self
    }

    pub fn build(self) -> Result<SourceMethod, MethodDeclError> {
        let mut families = self.families.iter().copied();
        let family = families.next().unwrap_or(MethodFamily::Mapping);
        if let Some(second) = families.find(|other| *other != family) {
            return Err(MethodDeclError::ConflictingFamilies {
                method: self.name,
                first: family,
                second,
            });
        }
        if family == MethodFamily::LifecycleCallback && !self.return_type.is_void() {
            let returns_target = self
                .parameters
                .iter()
                .any(|p| p.is_mapping_target() && p.ty == self.return_type);
            if !returns_target {
                return Err(MethodDeclError::LifecycleWithResult { method: self.name });
            }
        }

        Ok(SourceMethod {
            name: self.name,
            declaring_type: self.declaring_type,
            parameters: self.parameters,
            return_type: self.return_type,
            thrown_types: self.thrown_types,
            type_parameters: self.type_parameters,
            qualifiers: self.qualifiers,
            family,
            lifecycle_timing: self.lifecycle_timing,
            is_abstract: self.is_abstract,
            options: self.options,
        })
    }
}

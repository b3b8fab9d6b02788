use std::collections::HashSet;

use indexmap::IndexSet;
use nova_mapgen_config::{
    CollectionMappingStrategy, NullValueCheckStrategy, NullValueMappingStrategy,
    NullValuePropertyMappingStrategy, ReportingPolicy, ResolvedOptions,
};
use nova_mapgen_types::{jdk, Property, Type, TypeParseError};
use serde::Serialize;

use crate::assignment::{
    Assignment, ExistingInstanceMergeWrapper, MethodReference, NullCheckWrapper, PresenceCheck,
    SetterWrapper, SourceRhs,
};
use crate::context::MappingContext;
use crate::diagnostics::{Message, Reporter};
use crate::method::{LifecycleTiming, Method, Parameter, PropertyMappingOptions, SourceMethod};
use crate::resolver::ResolutionError;
use crate::selector::SelectionCriteria;

/// One target property of a bean mapping method.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyMapping {
    pub name: String,
    pub target_type: Type,
    pub target_write_accessor: String,
    pub target_read_accessor: Option<String>,
    /// `None` for constants.
    pub source_path: Option<String>,
    pub assignment: Assignment,
}

/// A generated method mapping one or more source beans onto a target bean.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BeanMappingMethod {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    /// The bean being populated: the mapping target for update methods, the return type
    /// otherwise.
    pub result_type: Type,
    pub is_update: bool,
    pub factory: Option<MethodReference>,
    /// Type passed to `new` when no factory creates the result.
    pub instantiation_type: Option<Type>,
    pub before_mappings: Vec<MethodReference>,
    pub after_mappings: Vec<MethodReference>,
    pub property_mappings: Vec<PropertyMapping>,
    pub null_value_mapping_strategy: NullValueMappingStrategy,
    pub thrown_types: Vec<Type>,
}

impl BeanMappingMethod {
    pub fn import_types(&self) -> IndexSet<Type> {
        let mut out = IndexSet::new();
        for parameter in &self.parameters {
            out.extend(parameter.ty.import_types());
        }
        out.extend(self.return_type.import_types());
        if let Some(instantiation) = &self.instantiation_type {
            out.extend(instantiation.import_types());
        }
        for method in self
            .factory
            .iter()
            .chain(&self.before_mappings)
            .chain(&self.after_mappings)
        {
            out.extend(method.import_types());
        }
        for mapping in &self.property_mappings {
            out.extend(mapping.assignment.import_types());
        }
        out
    }

    pub fn property_mapping(&self, name: &str) -> Option<&PropertyMapping> {
        self.property_mappings.iter().find(|m| m.name == name)
    }

    pub(crate) fn build(
        ctx: &MappingContext<'_>,
        method: &SourceMethod,
        reporter: &mut Reporter,
    ) -> Option<Self> {
        BeanBuilder::new(ctx, method, reporter)?.build()
    }
}

struct SourceBean<'m> {
    parameter: &'m Parameter,
    properties: Vec<Property>,
}

struct BeanBuilder<'c, 'a, 'm, 'r> {
    ctx: &'c MappingContext<'a>,
    method: &'m SourceMethod,
    reporter: &'r mut Reporter,
    element: String,
    options: ResolvedOptions,
    result_type: Type,
    sources: Vec<SourceBean<'m>>,
    context: Vec<Parameter>,
    used_sources: HashSet<(String, String)>,
    failed: bool,
}

impl<'c, 'a, 'm, 'r> BeanBuilder<'c, 'a, 'm, 'r> {
    fn new(
        ctx: &'c MappingContext<'a>,
        method: &'m SourceMethod,
        reporter: &'r mut Reporter,
    ) -> Option<Self> {
        let element = ctx.element(method);
        let options = ctx.resolve_options(&[&method.options().options]);
        let mut sources = Vec::new();
        for parameter in method.source_parameters() {
            match ctx.types().properties(&parameter.ty) {
                Ok(properties) => sources.push(SourceBean {
                    parameter,
                    properties,
                }),
                Err(err) => {
                    reporter.error(&element, invalid_type(&parameter.ty, &err));
                    return None;
                }
            }
        }

        Some(Self {
            ctx,
            method,
            element,
            options,
            result_type: method.result_type().clone(),
            sources,
            context: method.context_parameters().into_iter().cloned().collect(),
            used_sources: HashSet::new(),
            failed: false,
            reporter,
        })
    }

    fn build(mut self) -> Option<BeanMappingMethod> {
        let targets = match self.ctx.types().properties(&self.result_type) {
            Ok(targets) => targets,
            Err(err) => {
                let message = invalid_type(&self.result_type, &err);
                self.error(message);
                return None;
            }
        };
        let writable: Vec<&Property> = targets.iter().filter(|p| p.writable).collect();

        self.validate_explicit_mappings(&writable);

        let method = self.method;
        let mut property_mappings = Vec::new();
        let mut unmapped = Vec::new();
        for target in &writable {
            let explicit = method.options().mapping_for(&target.name);
            if explicit.is_some_and(|m| m.ignore) {
                continue;
            }
            let Some(rhs) = self.source_rhs(target, explicit) else {
                if explicit.is_none() {
                    unmapped.push(target.name.clone());
                }
                continue;
            };
            if let Some(mapping) = self.property_mapping(target, rhs, explicit) {
                property_mappings.push(mapping);
            }
        }

        self.report_unmapped_targets(&unmapped);
        self.report_unmapped_sources();

        let is_update = self.method.is_update_method();
        let (factory, instantiation_type) = if is_update {
            (None, None)
        } else {
            self.instantiation()
        };

        if self.failed {
            return None;
        }

        let source = self.sources.first().map(|s| s.parameter.ty.clone());
        let resolver = self.ctx.resolver();
        let before_mappings = resolver.find_lifecycle_callbacks(
            LifecycleTiming::BeforeMapping,
            source.as_ref(),
            &self.result_type,
            &self.context,
        );
        let after_mappings = resolver.find_lifecycle_callbacks(
            LifecycleTiming::AfterMapping,
            source.as_ref(),
            &self.result_type,
            &self.context,
        );

        tracing::debug!(
            target: "nova.mapgen",
            method = %self.element,
            properties = property_mappings.len(),
            before = before_mappings.len(),
            after = after_mappings.len(),
            "bean mapping method built"
        );

        Some(BeanMappingMethod {
            name: self.method.name().to_string(),
            parameters: self.method.parameters().to_vec(),
            return_type: self.method.return_type().clone(),
            result_type: self.result_type.clone(),
            is_update,
            factory,
            instantiation_type,
            before_mappings,
            after_mappings,
            property_mappings,
            null_value_mapping_strategy: self.options.null_value_mapping_strategy,
            thrown_types: self.method.thrown_types().to_vec(),
        })
    }

    fn error(&mut self, message: Message) {
        self.failed = true;
        self.reporter.error(&self.element, message);
    }

    fn validate_explicit_mappings(&mut self, writable: &[&Property]) {
        let method = self.method;
        let mut seen = HashSet::new();
        for mapping in &method.options().mappings {
            if !seen.insert(mapping.target.as_str()) {
                self.error(Message::DuplicateTargetMapping {
                    property: mapping.target.clone(),
                });
            }
            if !mapping.ignore && !writable.iter().any(|p| p.name == mapping.target) {
                self.error(Message::UnknownTargetProperty {
                    property: mapping.target.clone(),
                    target_type: self.result_type.to_string(),
                });
            }
            if mapping.source.is_some() && mapping.constant.is_some() {
                self.error(Message::SourceAndConstant {
                    property: mapping.target.clone(),
                });
            }
        }
    }

    /// Where the value of `target` comes from; `None` if nothing provides it.
    fn source_rhs(
        &mut self,
        target: &Property,
        explicit: Option<&PropertyMappingOptions>,
    ) -> Option<SourceRhs> {
        if let Some(constant) = explicit.and_then(|m| m.constant.as_deref()) {
            return Some(SourceRhs::constant(
                string_literal(constant),
                self.ctx.types().get_type(jdk::STRING),
            ));
        }

        let rhs = match explicit.and_then(|m| m.source.as_deref()) {
            Some(path) => match self.resolve_source_path(path) {
                Ok(Some(rhs)) => rhs,
                Ok(None) => {
                    self.error(Message::UnknownSourceProperty {
                        path: path.to_string(),
                    });
                    return None;
                }
                Err(err) => {
                    self.error(Message::InvalidType {
                        text: path.to_string(),
                        reason: err.to_string(),
                    });
                    return None;
                }
            },
            None => {
                let mut candidates = self.implicit_sources(&target.name);
                if candidates.len() > 1 {
                    self.error(Message::AmbiguousSourceProperty {
                        property: target.name.clone(),
                    });
                    return None;
                }
                candidates.pop()?
            }
        };
        self.with_presence_check(rhs)
    }

    fn implicit_sources(&mut self, name: &str) -> Vec<SourceRhs> {
        let mut out = Vec::new();
        for source in &self.sources {
            let parameter = source.parameter;
            if let Some(property) = source
                .properties
                .iter()
                .find(|p| p.readable && p.name == name)
            {
                out.push(property_rhs(parameter, property));
                self.used_sources
                    .insert((parameter.name.clone(), property.name.clone()));
            } else if parameter.name == name && self.sources.len() > 1 {
                out.push(SourceRhs::parameter(&parameter.name, parameter.ty.clone()));
            }
        }
        out
    }

    /// Resolve `param.a.b` (or `a.b` for a single source parameter) through readable properties.
    fn resolve_source_path(&mut self, path: &str) -> Result<Option<SourceRhs>, TypeParseError> {
        let segments: Vec<&str> = path.split('.').collect();
        let named = self
            .sources
            .iter()
            .find(|s| segments.first() == Some(&s.parameter.name.as_str()));
        let (parameter, rest) = match named {
            Some(source) => (source.parameter, &segments[1..]),
            None if self.sources.len() == 1 => (self.sources[0].parameter, &segments[..]),
            None => return Ok(None),
        };
        if rest.is_empty() {
            return Ok(Some(SourceRhs::parameter(&parameter.name, parameter.ty.clone())));
        }

        let types = self.ctx.types();
        let mut ty = parameter.ty.clone();
        let mut reference = parameter.name.clone();
        let mut presence = None;
        let mut path_null_checks = Vec::new();
        for (index, segment) in rest.iter().enumerate() {
            if index > 0 {
                path_null_checks.push(reference.clone());
            }
            let Some(property) = types.property(&ty, segment)?.filter(|p| p.readable) else {
                return Ok(None);
            };
            presence = property
                .presence_checker_name()
                .map(|checker| format!("{reference}.{checker}()"));
            reference = format!("{reference}.{}()", property.getter_name());
            ty = property.ty;
        }
        self.used_sources
            .insert((parameter.name.clone(), rest[0].to_string()));

        let mut rhs = SourceRhs::property(
            &parameter.name,
            format!("{}.{}", parameter.name, rest.join(".")),
            reference,
            ty,
        )
        .with_path_null_checks(path_null_checks);
        if let Some(expression) = presence {
            rhs = rhs.with_presence_checker(PresenceCheck::Accessor { expression });
        }
        Ok(Some(rhs))
    }

    /// A user presence check method replaces the source bean's `has<Prop>()` accessor.
    fn with_presence_check(&mut self, rhs: SourceRhs) -> Option<SourceRhs> {
        if rhs.is_constant || rhs.source_type.is_primitive() {
            return Some(rhs);
        }
        match self
            .ctx
            .resolver()
            .find_presence_check(&rhs.source_type, &self.context)
        {
            Ok(Some(check)) => {
                let argument = SourceRhs {
                    presence_checker: None,
                    ..rhs.clone()
                };
                let check = check.with_argument(Assignment::Direct(argument));
                Some(rhs.with_presence_checker(PresenceCheck::Method(Box::new(check))))
            }
            Ok(None) => Some(rhs),
            Err(err) => {
                self.error(Message::AmbiguousPresenceChecks {
                    source_type: rhs.source_type.to_string(),
                    candidates: candidates_of(&err),
                });
                None
            }
        }
    }

    fn property_mapping(
        &mut self,
        target: &Property,
        rhs: SourceRhs,
        explicit: Option<&PropertyMappingOptions>,
    ) -> Option<PropertyMapping> {
        let options = match explicit {
            Some(mapping) => self
                .ctx
                .resolve_options(&[&mapping.options, &self.method.options().options]),
            None => self.options.clone(),
        };
        let criteria = SelectionCriteria::for_mapping_methods()
            .with_qualifiers(explicit.map(|m| m.qualifiers.clone()).unwrap_or_default())
            .with_result_type(explicit.and_then(|m| m.result_type.clone()));

        let source_path = (!rhs.is_constant).then(|| rhs.source_path.clone());
        let nullable = rhs.is_nullable();
        let source_guarded = rhs.presence_checker.is_some() || rhs.is_nested();
        let assignment = match self.ctx.resolver().resolve_assignment(
            rhs.clone(),
            &target.ty,
            &criteria,
            &self.context,
        ) {
            Ok(assignment) => assignment,
            Err(err) => {
                self.report_resolution_error(&rhs, target, err);
                return None;
            }
        };

        let default_value = match explicit.and_then(|m| m.default_value.as_deref()) {
            Some(value) => Some(self.default_value(target, value)?),
            None => None,
        };

        let wrapped = self.wrap(
            target,
            &options,
            assignment,
            nullable,
            source_guarded,
            default_value,
        );

        if self.ctx.is_verbose() {
            tracing::info!(
                target: "nova.mapgen",
                method = %self.element,
                property = %target.name,
                assignment_type = ?wrapped.assignment_type(),
                "property mapped"
            );
        }

        Some(PropertyMapping {
            name: target.name.clone(),
            target_type: target.ty.clone(),
            target_write_accessor: target.setter_name(),
            target_read_accessor: target.readable.then(|| target.getter_name()),
            source_path,
            assignment: wrapped,
        })
    }

    fn default_value(&mut self, target: &Property, value: &str) -> Option<Assignment> {
        let rhs = SourceRhs::constant(string_literal(value), self.ctx.types().get_type(jdk::STRING));
        match self.ctx.resolver().resolve_assignment(
            rhs.clone(),
            &target.ty,
            &SelectionCriteria::for_mapping_methods(),
            &self.context,
        ) {
            Ok(assignment) => Some(assignment),
            Err(err) => {
                self.report_resolution_error(&rhs, target, err);
                None
            }
        }
    }

    fn report_resolution_error(&mut self, rhs: &SourceRhs, target: &Property, err: ResolutionError) {
        let message = match err {
            ResolutionError::NoMatch { .. } => Message::PropertyMappingNotFound {
                source_type: rhs.source_type.to_string(),
                source_path: rhs.source_path.clone(),
                target_type: target.ty.to_string(),
                property: target.name.clone(),
            },
            ResolutionError::Ambiguous { candidates, .. } => Message::AmbiguousMappingMethods {
                source_path: rhs.source_path.clone(),
                target_type: target.ty.to_string(),
                candidates: candidates.join(", "),
            },
        };
        self.error(message);
    }

    /// Choose the wrapper writing `assignment` into `target`.
    fn wrap(
        &self,
        target: &Property,
        options: &ResolvedOptions,
        assignment: Assignment,
        nullable: bool,
        source_guarded: bool,
        default_value: Option<Assignment>,
    ) -> Assignment {
        let types = self.ctx.types();
        let excluded = self.method.thrown_types().to_vec();
        let nvcs = options.null_value_check_strategy;
        let nvpms = options.null_value_property_mapping_strategy;
        let is_update = self.method.is_update_method();
        let converted = assignment.assignment_type().is_converted();

        if target.ty.is_collection_or_map() {
            let merge = is_update
                && target.readable
                && !target.ty.is_immutable()
                && options.collection_mapping_strategy != CollectionMappingStrategy::TargetImmutable;
            if merge {
                return Assignment::ExistingInstanceMerge(ExistingInstanceMergeWrapper::new(
                    assignment,
                    excluded,
                    target.ty.clone(),
                    nvcs,
                    nvpms,
                    types,
                    false,
                ));
            }
            if assignment.is_direct()
                || nvcs == NullValueCheckStrategy::Always
                || source_guarded
                || converted
            {
                return Assignment::NullCheck(NullCheckWrapper::new(
                    assignment,
                    excluded,
                    target.ty.clone(),
                    types,
                    false,
                ));
            }
            return Assignment::Setter(SetterWrapper::new(assignment, target.ty.clone(), excluded));
        }

        let has_default = default_value.is_some();
        let null_check = source_guarded
            || (nullable
                && (nvcs == NullValueCheckStrategy::Always
                    || converted
                    || target.ty.is_primitive()
                    || has_default
                    || (is_update && nvpms != NullValuePropertyMappingStrategy::SetToNull)));
        let else_branch = null_check && is_update && !has_default;
        Assignment::Setter(
            SetterWrapper::new(assignment, target.ty.clone(), excluded)
                .with_source_null_check(null_check)
                .set_explicitly_to_null(
                    else_branch
                        && nvpms == NullValuePropertyMappingStrategy::SetToNull
                        && !target.ty.is_primitive(),
                )
                .set_explicitly_to_default(
                    else_branch && nvpms == NullValuePropertyMappingStrategy::SetToDefault,
                )
                .with_default_value(default_value),
        )
    }

    fn instantiation(&mut self) -> (Option<MethodReference>, Option<Type>) {
        let source = self.sources.first().map(|s| s.parameter.ty.clone());
        match self.ctx.resolver().find_object_factory(
            &self.result_type,
            source.as_ref(),
            &self.context,
        ) {
            Ok(Some(factory)) => (Some(factory), None),
            Ok(None) => {
                let instantiation = self.result_type.effective_instantiation_type().clone();
                if instantiation.is_abstract() || instantiation.is_interface() {
                    self.error(Message::AbstractResultType {
                        target_type: self.result_type.to_string(),
                    });
                    (None, None)
                } else if !self.ctx.types().is_instantiable(&instantiation) {
                    self.error(Message::NoDefaultConstructor {
                        target_type: instantiation.to_string(),
                    });
                    (None, None)
                } else {
                    (None, Some(instantiation))
                }
            }
            Err(err) => {
                self.error(Message::AmbiguousFactoryMethods {
                    target_type: self.result_type.to_string(),
                    candidates: candidates_of(&err),
                });
                (None, None)
            }
        }
    }

    fn report_unmapped_targets(&mut self, unmapped: &[String]) {
        if unmapped.is_empty() {
            return;
        }
        let message = Message::UnmappedTargetProperties {
            properties: unmapped.join(", "),
        };
        match self.options.unmapped_target_policy {
            ReportingPolicy::Ignore => {}
            ReportingPolicy::Warn => self.reporter.warning(&self.element, message),
            ReportingPolicy::Error => self.error(message),
        }
    }

    fn report_unmapped_sources(&mut self) {
        if self.options.unmapped_source_policy == ReportingPolicy::Ignore {
            return;
        }
        let unmapped: Vec<String> = self
            .sources
            .iter()
            .flat_map(|source| {
                source
                    .properties
                    .iter()
                    .filter(|p| p.readable)
                    .filter(|p| {
                        !self
                            .used_sources
                            .contains(&(source.parameter.name.clone(), p.name.clone()))
                    })
                    .map(|p| p.name.clone())
            })
            .collect();
        if unmapped.is_empty() {
            return;
        }
        let message = Message::UnmappedSourceProperties {
            properties: unmapped.join(", "),
        };
        match self.options.unmapped_source_policy {
            ReportingPolicy::Ignore => {}
            ReportingPolicy::Warn => self.reporter.warning(&self.element, message),
            ReportingPolicy::Error => self.error(message),
        }
    }
}

fn property_rhs(parameter: &Parameter, property: &Property) -> SourceRhs {
    let rhs = SourceRhs::property(
        &parameter.name,
        format!("{}.{}", parameter.name, property.name),
        format!("{}.{}()", parameter.name, property.getter_name()),
        property.ty.clone(),
    );
    match property.presence_checker_name() {
        Some(checker) => rhs.with_presence_checker(PresenceCheck::Accessor {
            expression: format!("{}.{checker}()", parameter.name),
        }),
        None => rhs,
    }
}

pub(crate) fn invalid_type(ty: &Type, err: &TypeParseError) -> Message {
    Message::InvalidType {
        text: ty.to_string(),
        reason: err.to_string(),
    }
}

pub(crate) fn candidates_of(err: &ResolutionError) -> String {
    match err {
        ResolutionError::Ambiguous { candidates, .. } => candidates.join(", "),
        ResolutionError::NoMatch { .. } => String::new(),
    }
}

pub(crate) fn string_literal(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

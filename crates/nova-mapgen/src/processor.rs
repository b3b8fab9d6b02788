use std::collections::HashSet;

use indexmap::IndexSet;
use nova_mapgen_config::{ComponentModel, GeneratorConfig, InjectionStrategy};
use nova_mapgen_types::{Diagnostic, Type, TypeFactory};
use serde::Serialize;

use crate::assignment::MethodProvenance;
use crate::bean::BeanMappingMethod;
use crate::builtin::{built_in_methods, BuiltInMethod};
use crate::context::MappingContext;
use crate::diagnostics::{Message, Reporter};
use crate::iterable::IterableMappingMethod;
use crate::map::MapMappingMethod;
use crate::mapper::{AnnotateWith, MapperDecl, MappingMethod};
use crate::method::{Method, SourceMethod};

/// Everything a source-emission backend needs to write one mapper implementation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedMapper {
    pub mapper_type: Type,
    pub implementation_name: String,
    /// `None` for the default package.
    pub implementation_package: Option<String>,
    pub component_model: ComponentModel,
    pub injection_strategy: InjectionStrategy,
    pub suppress_generator_timestamp: bool,
    /// Annotations the component model puts on the implementation type.
    pub component_annotations: Vec<Type>,
    /// User annotations copied onto the implementation type.
    pub annotate_with: Vec<AnnotateWith>,
    pub methods: Vec<MappingMethod>,
    /// Names of built-in helpers the implementation has to carry.
    pub used_built_in_methods: Vec<String>,
    /// Used mappers the implementation holds instances of.
    pub used_mappers: Vec<Type>,
    pub import_types: IndexSet<Type>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedMapper {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn method(&self, name: &str) -> Option<&MappingMethod> {
        self.methods.iter().find(|m| m.name() == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Turns mapper declarations into implementation models.
///
/// A method that fails to build is dropped from the output; its diagnostics are kept and the
/// remaining methods are still processed.
#[derive(Debug)]
pub struct MapperProcessor<'a> {
    types: &'a TypeFactory,
    config: &'a GeneratorConfig,
    built_ins: Vec<BuiltInMethod>,
}

impl<'a> MapperProcessor<'a> {
    pub fn new(types: &'a TypeFactory, config: &'a GeneratorConfig) -> Self {
        Self {
            types,
            config,
            built_ins: built_in_methods(types),
        }
    }

    pub fn process(&self, decl: &MapperDecl) -> GeneratedMapper {
        let _span =
            tracing::debug_span!("process_mapper", mapper = %decl.ty.qualified_name()).entered();

        let mut layers = vec![&decl.options];
        if let Some(config) = &decl.config {
            layers.push(config);
        }
        layers.push(&self.config.defaults);

        let candidates = decl.candidate_methods();
        let ctx = MappingContext::new(self.types, &decl.ty, &candidates, &self.built_ins, layers)
            .verbose(self.config.verbose);
        let mapper_options = ctx.resolve_options(&[]);

        let mut reporter = Reporter::default();
        let mut methods = Vec::new();
        for method in decl.abstract_methods() {
            let errors_before = reporter.error_count();
            if !validate(&ctx, method, &mut reporter) {
                continue;
            }
            match build_method(&ctx, method, &mut reporter) {
                Some(built) if reporter.error_count() == errors_before => {
                    if ctx.is_verbose() {
                        tracing::info!(target: "nova.mapgen", method = %ctx.element(method), "generated");
                    }
                    methods.push(built);
                }
                _ => {
                    tracing::warn!(
                        target: "nova.mapgen",
                        method = %ctx.element(method),
                        errors = reporter.error_count() - errors_before,
                        "skipping mapping method"
                    );
                }
            }
        }

        let mut used_built_ins = IndexSet::new();
        let mut used_mappers = IndexSet::new();
        for method in &methods {
            method.for_each_method_reference(&mut |reference| match &reference.provenance {
                MethodProvenance::BuiltIn => {
                    used_built_ins.insert(reference.name.clone());
                }
                MethodProvenance::UsedMapper { mapper } => {
                    used_mappers.insert(mapper.clone());
                }
                MethodProvenance::Mapper => {}
            });
        }

        let implementation_name = mapper_options.implementation_name_for(&decl.ty.simple_name());
        let implementation_package =
            mapper_options.implementation_package_for(decl.ty.package_name());

        let annotate_with = checked_annotations(decl, &mut reporter);
        let component_annotations =
            component_annotations(self.types, mapper_options.component_model, &annotate_with);

        let mut import_types = IndexSet::new();
        import_types.extend(decl.ty.import_types());
        for annotation in &component_annotations {
            import_types.extend(annotation.import_types());
        }
        for annotation in &annotate_with {
            import_types.extend(annotation.annotation.import_types());
        }
        for method in &methods {
            import_types.extend(method.import_types());
        }
        import_types.retain(|ty: &Type| {
            ty.requires_import() && ty.package_name() != implementation_package.as_deref()
        });

        let diagnostics = reporter.into_diagnostics();
        tracing::debug!(
            target: "nova.mapgen",
            methods = methods.len(),
            diagnostics = diagnostics.len(),
            imports = import_types.len(),
            "mapper processed"
        );

        GeneratedMapper {
            mapper_type: decl.ty.clone(),
            implementation_name,
            implementation_package,
            component_model: mapper_options.component_model,
            injection_strategy: mapper_options.injection_strategy,
            suppress_generator_timestamp: self.config.suppress_generator_timestamp,
            component_annotations,
            annotate_with,
            methods,
            used_built_in_methods: used_built_ins.into_iter().collect(),
            used_mappers: used_mappers.into_iter().collect(),
            import_types,
            diagnostics,
        }
    }
}

/// Spring stereotypes; any of them already registers the implementation as a bean.
const SPRING_STEREOTYPES: &[&str] = &[
    "org.springframework.stereotype.Component",
    "org.springframework.stereotype.Service",
    "org.springframework.stereotype.Repository",
    "org.springframework.stereotype.Controller",
    "org.springframework.web.bind.annotation.RestController",
    "org.springframework.context.annotation.Configuration",
];

/// The `annotate_with` entries that can be applied. Repeating a non-repeatable annotation or
/// an element within one annotation is an error and the repeated entry is dropped.
fn checked_annotations(decl: &MapperDecl, reporter: &mut Reporter) -> Vec<AnnotateWith> {
    let element = decl.ty.simple_name();
    let mut kept: Vec<AnnotateWith> = Vec::new();
    for annotation in &decl.annotate_with {
        let name = annotation.annotation.qualified_name();
        if !annotation.repeatable && kept.iter().any(|k| k.annotation == annotation.annotation) {
            reporter.error(&element, Message::AnnotationNotRepeatable { annotation: name });
            continue;
        }
        let mut seen = HashSet::new();
        let duplicate = annotation
            .elements
            .iter()
            .find(|e| !seen.insert(e.name.as_str()));
        if let Some(duplicate) = duplicate {
            reporter.error(
                &element,
                Message::DuplicateAnnotationElement {
                    annotation: name,
                    element: duplicate.name.clone(),
                },
            );
            continue;
        }
        kept.push(annotation.clone());
    }
    kept
}

/// Annotations the component model adds. Spring's `@Component` is left out when a user
/// annotation is already a stereotype.
fn component_annotations(
    types: &TypeFactory,
    model: ComponentModel,
    annotate_with: &[AnnotateWith],
) -> Vec<Type> {
    let names: &[&str] = match model {
        ComponentModel::Default => &[],
        ComponentModel::Spring => {
            let stereotyped = annotate_with.iter().any(|a| {
                SPRING_STEREOTYPES.contains(&a.annotation.qualified_name().as_str())
            });
            if stereotyped {
                &[]
            } else {
                &["org.springframework.stereotype.Component"]
            }
        }
        ComponentModel::Cdi => &["javax.enterprise.context.ApplicationScoped"],
        ComponentModel::Jsr330 => &["javax.inject.Named", "javax.inject.Singleton"],
        ComponentModel::Jakarta => &["jakarta.inject.Named", "jakarta.inject.Singleton"],
    };
    names.iter().map(|name| types.get_type(name)).collect()
}

/// Declaration checks that do not depend on the mapped types. Returns `false` when the method
/// cannot be generated.
fn validate(ctx: &MappingContext<'_>, method: &SourceMethod, reporter: &mut Reporter) -> bool {
    let element = ctx.element(method);
    let errors_before = reporter.error_count();

    if method.source_parameters().iter().any(|p| p.ty.is_type_var()) {
        reporter.error(
            &element,
            Message::InvalidMethodDeclaration(
                "Can't generate mapping method for a generic type variable source.".to_string(),
            ),
        );
    }
    if method.result_type().is_type_var() {
        reporter.error(
            &element,
            Message::InvalidMethodDeclaration(
                "Can't generate mapping method for a generic type variable target.".to_string(),
            ),
        );
    }

    let mut seen = HashSet::new();
    if !method.context_parameters().into_iter().all(|p| seen.insert(&p.ty)) {
        reporter.error(&element, Message::ContextParameterTypesNotUnique);
    }
    let targets = method
        .parameters()
        .iter()
        .filter(|p| p.is_mapping_target())
        .count();
    if targets > 1 {
        reporter.error(&element, Message::MultipleMappingTargets);
    }
    if method.source_parameters().is_empty() {
        reporter.error(&element, Message::NoSourceParameters);
    }
    if method.return_type().is_void() && targets == 0 {
        reporter.error(&element, Message::VoidWithoutMappingTarget);
    }

    reporter.error_count() == errors_before
}

fn build_method(
    ctx: &MappingContext<'_>,
    method: &SourceMethod,
    reporter: &mut Reporter,
) -> Option<MappingMethod> {
    let sources = method.source_parameters();
    let result = method.result_type();
    let single = match sources.as_slice() {
        [only] => Some(&only.ty),
        _ => None,
    };
    let is_iterable = |ty: &Type| ty.is_iterable() || ty.is_array();

    match single {
        Some(source) if source.is_map() || result.is_map() => {
            MapMappingMethod::build(ctx, method, reporter).map(MappingMethod::Map)
        }
        Some(source) if is_iterable(source) || is_iterable(result) => {
            IterableMappingMethod::build(ctx, method, reporter).map(MappingMethod::Iterable)
        }
        _ => BeanMappingMethod::build(ctx, method, reporter).map(MappingMethod::Bean),
    }
}

use indexmap::IndexSet;
use nova_mapgen_config::NullValueMappingStrategy;
use nova_mapgen_types::Type;
use serde::Serialize;

use crate::assignment::{Assignment, MethodReference, SourceRhs};
use crate::bean::candidates_of;
use crate::builtin::lower_first;
use crate::context::MappingContext;
use crate::diagnostics::{Message, Reporter};
use crate::method::{LifecycleTiming, Method, Parameter, SourceMethod};
use crate::resolver::ResolutionError;
use crate::selector::SelectionCriteria;

/// A generated method mapping an iterable (or array) onto a collection (or array).
///
/// A `null` source returns `null` under `RETURN_NULL`. Under `RETURN_DEFAULT` it returns an
/// empty instance, or, for update methods, the cleared existing target.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IterableMappingMethod {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub source_parameter: Parameter,
    pub return_type: Type,
    pub result_type: Type,
    pub is_update: bool,
    pub source_element_type: Type,
    pub result_element_type: Type,
    /// Loop variable holding the current source element.
    pub element_variable: String,
    pub element_assignment: Assignment,
    pub factory: Option<MethodReference>,
    /// Collection type passed to `new`; `None` for arrays, factories and update methods.
    pub instantiation_type: Option<Type>,
    pub before_mappings: Vec<MethodReference>,
    pub after_mappings: Vec<MethodReference>,
    pub null_value_mapping_strategy: NullValueMappingStrategy,
    pub thrown_types: Vec<Type>,
}

impl IterableMappingMethod {
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
        out.extend(self.element_assignment.import_types());
        out
    }

    pub(crate) fn build(
        ctx: &MappingContext<'_>,
        method: &SourceMethod,
        reporter: &mut Reporter,
    ) -> Option<Self> {
        let element = ctx.element(method);
        let types = ctx.types();
        let source_parameter = method.source_parameters().first().copied()?.clone();
        let result_type = method.result_type().clone();
        let source_type = &source_parameter.ty;

        let is_iterable = |ty: &Type| ty.is_iterable() || ty.is_array();
        if is_iterable(source_type) && !is_iterable(&result_type) {
            reporter.error(
                &element,
                Message::IterableToNonIterable {
                    source_type: source_type.to_string(),
                    target_type: result_type.to_string(),
                },
            );
            return None;
        }
        if !is_iterable(source_type) {
            reporter.error(
                &element,
                Message::NonIterableToIterable {
                    source_type: source_type.to_string(),
                    target_type: result_type.to_string(),
                },
            );
            return None;
        }

        let (Some(source_element_type), Some(result_element_type)) =
            (types.element_type(source_type), types.element_type(&result_type))
        else {
            return None;
        };

        let options = ctx.resolve_options(&[&method.options().options]);
        let context: Vec<Parameter> = method.context_parameters().into_iter().cloned().collect();
        let element_variable = element_variable_name(&source_element_type, &source_parameter.name);
        let element_options = &method.options().element;
        let criteria = SelectionCriteria::for_mapping_methods()
            .with_qualifiers(element_options.qualifiers.iter().cloned())
            .with_result_type(element_options.result_type.clone());

        let element_assignment = match ctx.resolver().resolve_assignment(
            SourceRhs::parameter(&element_variable, source_element_type.clone()),
            &result_element_type,
            &criteria,
            &context,
        ) {
            Ok(assignment) => assignment,
            Err(err) => {
                reporter.error(
                    &element,
                    element_error("iterable element", &source_element_type, &result_element_type, err),
                );
                return None;
            }
        };

        let is_update = method.is_update_method();
        let mut factory = None;
        let mut instantiation_type = None;
        if !is_update && !result_type.is_array() {
            match ctx
                .resolver()
                .find_object_factory(&result_type, Some(source_type), &context)
            {
                Ok(Some(found)) => factory = Some(found),
                Ok(None) => {
                    instantiation_type = Some(instantiable(ctx, &result_type, &element, reporter)?);
                }
                Err(err) => {
                    reporter.error(
                        &element,
                        Message::AmbiguousFactoryMethods {
                            target_type: result_type.to_string(),
                            candidates: candidates_of(&err),
                        },
                    );
                    return None;
                }
            }
        }

        let before_mappings = ctx.resolver().find_lifecycle_callbacks(
            LifecycleTiming::BeforeMapping,
            Some(source_type),
            &result_type,
            &context,
        );
        let after_mappings = ctx.resolver().find_lifecycle_callbacks(
            LifecycleTiming::AfterMapping,
            Some(source_type),
            &result_type,
            &context,
        );

        tracing::debug!(
            target: "nova.mapgen",
            method = %element,
            element_assignment = ?element_assignment.assignment_type(),
            "iterable mapping method built"
        );

        Some(Self {
            name: method.name().to_string(),
            parameters: method.parameters().to_vec(),
            return_type: method.return_type().clone(),
            is_update,
            source_element_type,
            result_element_type,
            element_variable,
            element_assignment,
            factory,
            instantiation_type,
            before_mappings,
            after_mappings,
            null_value_mapping_strategy: options.null_value_iterable_mapping_strategy,
            thrown_types: method.thrown_types().to_vec(),
            source_parameter,
            result_type,
        })
    }
}

/// The concrete type to instantiate for `ty`, or a diagnostic.
pub(crate) fn instantiable(
    ctx: &MappingContext<'_>,
    ty: &Type,
    element: &str,
    reporter: &mut Reporter,
) -> Option<Type> {
    let instantiation = ty.effective_instantiation_type().clone();
    if instantiation.is_abstract() || instantiation.is_interface() {
        reporter.error(
            element,
            Message::AbstractResultType {
                target_type: ty.to_string(),
            },
        );
        return None;
    }
    if !ctx.types().is_instantiable(&instantiation) {
        reporter.error(
            element,
            Message::NoDefaultConstructor {
                target_type: instantiation.to_string(),
            },
        );
        return None;
    }
    Some(instantiation)
}

pub(crate) fn element_error(
    position: &'static str,
    source: &Type,
    target: &Type,
    err: ResolutionError,
) -> Message {
    match err {
        ResolutionError::NoMatch { .. } => Message::ElementMappingNotFound {
            position,
            source_type: source.to_string(),
            target_type: target.to_string(),
        },
        ResolutionError::Ambiguous { candidates, .. } => Message::AmbiguousElementMapping {
            position,
            source_type: source.to_string(),
            target_type: target.to_string(),
            candidates: candidates.join(", "),
        },
    }
}

/// Loop variable name for elements of `ty`, distinct from the source parameter name.
pub(crate) fn element_variable_name(ty: &Type, parameter: &str) -> String {
    let base = match ty.primitive() {
        Some(primitive) => primitive.name().chars().take(1).collect(),
        None => lower_first(&ty.simple_name().replace("[]", "Array")),
    };
    let base = if base.is_empty() { "element".to_string() } else { base };
    if base == parameter {
        format!("{base}1")
    } else {
        base
    }
}

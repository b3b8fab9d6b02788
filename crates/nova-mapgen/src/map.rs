use indexmap::IndexSet;
use nova_mapgen_config::NullValueMappingStrategy;
use nova_mapgen_types::Type;
use serde::Serialize;

use crate::assignment::{Assignment, MethodReference, SourceRhs};
use crate::bean::candidates_of;
use crate::context::MappingContext;
use crate::diagnostics::{Message, Reporter};
use crate::iterable::{element_error, instantiable};
use crate::method::{ElementMappingOptions, LifecycleTiming, Method, Parameter, SourceMethod};
use crate::selector::SelectionCriteria;

/// A generated method mapping one map type onto another, entry by entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapMappingMethod {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub source_parameter: Parameter,
    pub return_type: Type,
    pub result_type: Type,
    pub is_update: bool,
    pub source_key_type: Type,
    pub source_value_type: Type,
    pub result_key_type: Type,
    pub result_value_type: Type,
    pub key_assignment: Assignment,
    pub value_assignment: Assignment,
    pub factory: Option<MethodReference>,
    pub instantiation_type: Option<Type>,
    pub before_mappings: Vec<MethodReference>,
    pub after_mappings: Vec<MethodReference>,
    /// Map-specific strategy, falling back to the general one.
    pub null_value_mapping_strategy: NullValueMappingStrategy,
    pub thrown_types: Vec<Type>,
}

impl MapMappingMethod {
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
        out.extend(self.key_assignment.import_types());
        out.extend(self.value_assignment.import_types());
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

        if source_type.is_map() && !result_type.is_map() {
            reporter.error(
                &element,
                Message::MapToNonMap {
                    source_type: source_type.to_string(),
                    target_type: result_type.to_string(),
                },
            );
            return None;
        }
        if !source_type.is_map() {
            reporter.error(
                &element,
                Message::NonMapToMap {
                    source_type: source_type.to_string(),
                    target_type: result_type.to_string(),
                },
            );
            return None;
        }

        let ((source_key_type, source_value_type), (result_key_type, result_value_type)) = (
            types.map_entry_types(source_type)?,
            types.map_entry_types(&result_type)?,
        );

        let options = ctx.resolve_options(&[&method.options().options]);
        let context: Vec<Parameter> = method.context_parameters().into_iter().cloned().collect();
        let resolve = |position: &'static str,
                       rhs: SourceRhs,
                       target: &Type,
                       element_options: &ElementMappingOptions,
                       reporter: &mut Reporter| {
            let criteria = SelectionCriteria::for_mapping_methods()
                .with_qualifiers(element_options.qualifiers.iter().cloned())
                .with_result_type(element_options.result_type.clone());
            let source = rhs.source_type.clone();
            ctx.resolver()
                .resolve_assignment(rhs, target, &criteria, &context)
                .map_err(|err| {
                    reporter.error(&element, element_error(position, &source, target, err));
                })
                .ok()
        };

        let key_assignment = resolve(
            "map key",
            SourceRhs::parameter("entry.getKey()", source_key_type.clone()),
            &result_key_type,
            &method.options().key,
            reporter,
        );
        let value_assignment = resolve(
            "map value",
            SourceRhs::parameter("entry.getValue()", source_value_type.clone()),
            &result_value_type,
            &method.options().value,
            reporter,
        );
        let (Some(key_assignment), Some(value_assignment)) = (key_assignment, value_assignment)
        else {
            return None;
        };

        let is_update = method.is_update_method();
        let mut factory = None;
        let mut instantiation_type = None;
        if !is_update {
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
            key = ?key_assignment.assignment_type(),
            value = ?value_assignment.assignment_type(),
            "map mapping method built"
        );

        Some(Self {
            name: method.name().to_string(),
            parameters: method.parameters().to_vec(),
            return_type: method.return_type().clone(),
            is_update,
            source_key_type,
            source_value_type,
            result_key_type,
            result_value_type,
            key_assignment,
            value_assignment,
            factory,
            instantiation_type,
            before_mappings,
            after_mappings,
            null_value_mapping_strategy: options.null_value_map_mapping_strategy,
            thrown_types: method.thrown_types().to_vec(),
            source_parameter,
            result_type,
        })
    }
}

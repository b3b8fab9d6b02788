use std::collections::HashMap;

use indexmap::IndexMap;
use nova_mapgen_types::{Type, TypeFactory};

use crate::method::{Method, MethodFamily, ParameterRole};

use super::{BindingKind, MethodSelector, ParameterBinding, SelectedMethod, SelectionContext};

/// Binds every parameter of a candidate to an available argument and checks the result type.
///
/// Candidates whose parameters cannot all be bound are dropped. Survivors carry the parameter
/// bindings and the inferred values of their generic type parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypeSelector;

impl<M: Method> MethodSelector<M> for TypeSelector {
    fn name(&self) -> &'static str {
        "type"
    }

    fn get_matching_methods<'m>(
        &self,
        methods: Vec<SelectedMethod<'m, M>>,
        ctx: &SelectionContext<'_>,
    ) -> Vec<SelectedMethod<'m, M>> {
        methods
            .into_iter()
            .filter_map(|candidate| {
                let (bindings, type_bindings) = bind(candidate.method(), ctx)?;
                Some(candidate.with_bindings(bindings, type_bindings))
            })
            .collect()
    }
}

type TypeBindings = IndexMap<String, Type>;

fn bind<M: Method>(
    method: &M,
    ctx: &SelectionContext<'_>,
) -> Option<(Vec<ParameterBinding>, TypeBindings)> {
    let matcher = Matcher {
        types: ctx.types,
        type_params: method.type_parameters(),
    };
    let mut type_bindings = TypeBindings::new();
    let mut bindings = Vec::with_capacity(method.parameters().len());
    let mut source_count = 0usize;

    for param in method.parameters() {
        let kind = match param.role {
            ParameterRole::Source => {
                source_count += 1;
                let source = ctx.source_type?;
                if !matcher.accepts(&param.ty, source, &mut type_bindings) {
                    return None;
                }
                BindingKind::SourceValue
            }
            ParameterRole::MappingTarget => {
                if !matcher.accepts(&param.ty, ctx.target_type, &mut type_bindings) {
                    return None;
                }
                BindingKind::MappingTarget
            }
            ParameterRole::TargetType => {
                // `Class<T>`: T receives the requested target type.
                if let Some(arg) = param.ty.type_arguments().first() {
                    if !matcher.exact(arg, ctx.target_type, &mut type_bindings) {
                        return None;
                    }
                }
                BindingKind::TargetType {
                    target: ctx.target_type.clone(),
                }
            }
            ParameterRole::Context => {
                let argument = ctx.available_context.iter().find_map(|available| {
                    let mut attempt = type_bindings.clone();
                    matcher
                        .accepts(&param.ty, &available.ty, &mut attempt)
                        .then(|| (available.name.clone(), attempt))
                })?;
                type_bindings = argument.1;
                BindingKind::Context {
                    argument: argument.0,
                }
            }
        };
        bindings.push(ParameterBinding {
            parameter: param.name.clone(),
            ty: param.ty.clone(),
            kind,
        });
    }

    let return_type = method.return_type();
    let accepted = match method.family() {
        MethodFamily::Mapping => {
            source_count == 1
                && if return_type.is_void() {
                    method.is_update_method()
                } else {
                    matcher.produces(return_type, ctx.target_type, &mut type_bindings)
                }
        }
        MethodFamily::ObjectFactory => {
            source_count <= 1
                && !return_type.is_void()
                && matcher.produces(return_type, ctx.target_type, &mut type_bindings)
        }
        MethodFamily::LifecycleCallback => source_count <= 1,
        MethodFamily::PresenceCheck => source_count == 1 && return_type.is_boolean(),
    };
    accepted.then_some((bindings, type_bindings))
}

struct Matcher<'a> {
    types: &'a TypeFactory,
    type_params: &'a [String],
}

impl Matcher<'_> {
    fn is_method_var(&self, ty: &Type) -> bool {
        ty.is_type_var() && self.type_params.iter().any(|p| *p == ty.qualified_name())
    }

    fn mentions_method_vars(&self, ty: &Type) -> bool {
        self.is_method_var(ty)
            || ty.component_type().is_some_and(|c| self.mentions_method_vars(c))
            || ty
                .type_arguments()
                .iter()
                .any(|a| self.mentions_method_vars(a))
    }

    fn substitute(&self, ty: &Type, bindings: &TypeBindings) -> Type {
        let map: HashMap<String, Type> = bindings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.types.substitute(ty, &map)
    }

    /// Whether a value of type `actual` can be passed to a parameter of type `formal`.
    fn accepts(&self, formal: &Type, actual: &Type, bindings: &mut TypeBindings) -> bool {
        let formal = self.substitute(formal, bindings);
        if self.is_method_var(&formal) {
            if actual.is_primitive() || actual.is_void() {
                return false;
            }
            bindings.insert(formal.qualified_name(), actual.clone());
            return true;
        }
        if !self.mentions_method_vars(&formal) {
            return self.types.is_assignable(actual, &formal);
        }
        if let (Some(formal_component), Some(actual_component)) =
            (formal.component_type(), actual.component_type())
        {
            return self.exact(formal_component, actual_component, bindings);
        }
        let Some(view) = self.types.as_supertype(actual, &formal.qualified_name()) else {
            return false;
        };
        if view.is_raw() {
            return true;
        }
        formal.type_arguments().len() == view.type_arguments().len()
            && formal
                .type_arguments()
                .iter()
                .zip(view.type_arguments())
                .all(|(f, a)| self.exact(f, a, bindings))
    }

    /// Whether a method result of type `produced` can be assigned to `target`.
    fn produces(&self, produced: &Type, target: &Type, bindings: &mut TypeBindings) -> bool {
        let produced = self.substitute(produced, bindings);
        if self.is_method_var(&produced) {
            if target.is_primitive() {
                return false;
            }
            bindings.insert(produced.qualified_name(), target.clone());
            return true;
        }
        if !self.mentions_method_vars(&produced) {
            return self.types.is_assignable(&produced, target);
        }
        if let (Some(produced_component), Some(target_component)) =
            (produced.component_type(), target.component_type())
        {
            return self.exact(produced_component, target_component, bindings);
        }
        let Some(view) = self.types.as_supertype(&produced, &target.qualified_name()) else {
            return false;
        };
        if target.is_raw() {
            return true;
        }
        view.type_arguments().len() == target.type_arguments().len()
            && view
                .type_arguments()
                .iter()
                .zip(target.type_arguments())
                .all(|(v, t)| self.exact(v, t, bindings))
    }

    /// Invariant match used for generic arguments.
    fn exact(&self, formal: &Type, actual: &Type, bindings: &mut TypeBindings) -> bool {
        if self.is_method_var(formal) {
            let name = formal.qualified_name();
            return match bindings.get(&name) {
                Some(bound) => bound == actual,
                None => {
                    bindings.insert(name, actual.clone());
                    true
                }
            };
        }
        if !self.mentions_method_vars(formal) {
            return formal == actual || formal.is_type_var();
        }
        if let (Some(f), Some(a)) = (formal.component_type(), actual.component_type()) {
            return self.exact(f, a, bindings);
        }
        formal.qualified_name() == actual.qualified_name()
            && formal.type_arguments().len() == actual.type_arguments().len()
            && formal
                .type_arguments()
                .iter()
                .zip(actual.type_arguments())
                .all(|(f, a)| self.exact(f, a, bindings))
    }
}

//! The method selection pipeline.
//!
//! Candidate methods are narrowed by an ordered chain of [`MethodSelector`]s. Each selector
//! receives the survivors of the previous one and returns a stable sub-sequence (the
//! [`TypeSelector`] additionally attaches parameter and generic bindings). Zero survivors means
//! "no method applies"; more than one survivor after the last selector is an ambiguity the caller
//! reports.

use indexmap::IndexMap;
use nova_mapgen_types::{Type, TypeFactory};
use serde::Serialize;

use crate::method::{Method, Parameter};

mod create_or_update;
mod family;
mod inheritance;
mod qualifier;
mod target_type;
mod type_selector;

pub use create_or_update::CreateOrUpdateSelector;
pub use family::MethodFamilySelector;
pub use inheritance::InheritanceSelector;
pub use qualifier::QualifierSelector;
pub use target_type::TargetTypeSelector;
pub use type_selector::TypeSelector;

/// What a method parameter receives at the call site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingKind {
    SourceValue,
    MappingTarget,
    /// The `Class` literal of the requested target type.
    TargetType { target: Type },
    /// A context parameter of the calling method, by name.
    Context { argument: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParameterBinding {
    pub parameter: String,
    pub ty: Type,
    #[serde(flatten)]
    pub kind: BindingKind,
}

/// A candidate method bound to one source/target pair.
#[derive(Debug)]
pub struct SelectedMethod<'m, M> {
    method: &'m M,
    bindings: Vec<ParameterBinding>,
    type_bindings: IndexMap<String, Type>,
}

impl<M> Clone for SelectedMethod<'_, M> {
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            bindings: self.bindings.clone(),
            type_bindings: self.type_bindings.clone(),
        }
    }
}

impl<'m, M: Method> SelectedMethod<'m, M> {
    pub fn new(method: &'m M) -> Self {
        Self {
            method,
            bindings: Vec::new(),
            type_bindings: IndexMap::new(),
        }
    }

    pub fn method(&self) -> &'m M {
        self.method
    }

    pub fn bindings(&self) -> &[ParameterBinding] {
        &self.bindings
    }

    /// Inferred values of the method's generic type parameters.
    pub fn type_bindings(&self) -> &IndexMap<String, Type> {
        &self.type_bindings
    }

    pub(crate) fn with_bindings(
        mut self,
        bindings: Vec<ParameterBinding>,
        type_bindings: IndexMap<String, Type>,
    ) -> Self {
        self.bindings = bindings;
        self.type_bindings = type_bindings;
        self
    }
}

/// What the caller is looking for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub object_factory_required: bool,
    pub lifecycle_callback_required: bool,
    pub presence_check_required: bool,
    pub qualifiers: Vec<String>,
    pub qualifying_result_type: Option<Type>,
    /// An existing target instance is available (update methods).
    pub prefer_update_mapping: bool,
}

impl SelectionCriteria {
    pub fn for_mapping_methods() -> Self {
        Self::default()
    }

    pub fn for_object_factories() -> Self {
        Self {
            object_factory_required: true,
            ..Self::default()
        }
    }

    pub fn for_lifecycle_callbacks() -> Self {
        Self {
            lifecycle_callback_required: true,
            ..Self::default()
        }
    }

    pub fn for_presence_checks() -> Self {
        Self {
            presence_check_required: true,
            ..Self::default()
        }
    }

    pub fn with_qualifiers(mut self, qualifiers: impl IntoIterator<Item = String>) -> Self {
        self.qualifiers.extend(qualifiers);
        self
    }

    pub fn with_result_type(mut self, ty: Option<Type>) -> Self {
        self.qualifying_result_type = ty;
        self
    }

    pub fn preferring_update(mut self, prefer: bool) -> Self {
        self.prefer_update_mapping = prefer;
        self
    }

    pub fn is_object_factory_required(&self) -> bool {
        self.object_factory_required
    }

    pub fn is_lifecycle_callback_required(&self) -> bool {
        self.lifecycle_callback_required
    }

    pub fn is_presence_check_required(&self) -> bool {
        self.presence_check_required
    }

    pub fn is_qualified(&self) -> bool {
        !self.qualifiers.is_empty() || self.qualifying_result_type.is_some()
    }
}

/// Everything a selector may look at.
#[derive(Clone, Copy, Debug)]
pub struct SelectionContext<'a> {
    pub types: &'a TypeFactory,
    pub criteria: &'a SelectionCriteria,
    /// `None` when no source value exists (object factories for parameterless creation).
    pub source_type: Option<&'a Type>,
    pub target_type: &'a Type,
    /// Context parameters of the calling mapping method.
    pub available_context: &'a [Parameter],
}

pub trait MethodSelector<M: Method> {
    fn name(&self) -> &'static str;

    /// Return the stable sub-sequence of `methods` that this selector accepts.
    fn get_matching_methods<'m>(
        &self,
        methods: Vec<SelectedMethod<'m, M>>,
        ctx: &SelectionContext<'_>,
    ) -> Vec<SelectedMethod<'m, M>>;
}

/// The ordered selector chain.
pub struct MethodSelectors<M: Method> {
    selectors: Vec<Box<dyn MethodSelector<M>>>,
}

impl<M: Method> std::fmt::Debug for MethodSelectors<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.selectors.iter().map(|s| s.name()))
            .finish()
    }
}

impl<M: Method> Default for MethodSelectors<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Method> MethodSelectors<M> {
    pub fn new() -> Self {
        Self::with_selectors(vec![
            Box::new(TypeSelector),
            Box::new(MethodFamilySelector),
            Box::new(QualifierSelector),
            Box::new(TargetTypeSelector),
            Box::new(InheritanceSelector),
            Box::new(CreateOrUpdateSelector),
        ])
    }

    pub fn with_selectors(selectors: Vec<Box<dyn MethodSelector<M>>>) -> Self {
        Self { selectors }
    }

    pub fn get_matching_methods<'m>(
        &self,
        methods: &'m [M],
        ctx: &SelectionContext<'_>,
    ) -> Vec<SelectedMethod<'m, M>> {
        let mut candidates: Vec<_> = methods.iter().map(SelectedMethod::new).collect();
        for selector in &self.selectors {
            candidates = selector.get_matching_methods(candidates, ctx);
            tracing::trace!(
                target: "nova.mapgen.selector",
                selector = selector.name(),
                target_type = %ctx.target_type,
                remaining = candidates.len(),
            );
            if candidates.is_empty() {
                break;
            }
        }
        candidates
    }
}

use nova_mapgen_types::{PrimitiveType, Type, TypeFactory};
use thiserror::Error;

use crate::assignment::{Assignment, MethodReference, SourceRhs};
use crate::builtin::BuiltInMethod;
use crate::conversion::find_conversion;
use crate::method::{LifecycleTiming, Method, MethodFamily, Parameter, SourceMethod};
use crate::selector::{MethodSelectors, SelectedMethod, SelectionContext, SelectionCriteria};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no way to map {source_type} to {target_type}")]
    NoMatch { source_type: Type, target_type: Type },
    #[error("ambiguous methods for {source_type} to {target_type}: {}", .candidates.join(", "))]
    Ambiguous {
        source_type: Type,
        target_type: Type,
        candidates: Vec<String>,
    },
}

/// Decides how a value of one type becomes a value of another.
///
/// Resolution order: a mapping method, direct assignment, built-in conversion, a built-in
/// method, two chained mapping methods, a mapping method after a conversion, a conversion after
/// a mapping method.
#[derive(Debug)]
pub struct MappingResolver<'a> {
    types: &'a TypeFactory,
    mapper: &'a Type,
    source_methods: &'a [SourceMethod],
    built_in_methods: &'a [BuiltInMethod],
    source_selectors: MethodSelectors<SourceMethod>,
    built_in_selectors: MethodSelectors<BuiltInMethod>,
}

impl<'a> MappingResolver<'a> {
    pub fn new(
        types: &'a TypeFactory,
        mapper: &'a Type,
        source_methods: &'a [SourceMethod],
        built_in_methods: &'a [BuiltInMethod],
    ) -> Self {
        Self {
            types,
            mapper,
            source_methods,
            built_in_methods,
            source_selectors: MethodSelectors::new(),
            built_in_selectors: MethodSelectors::new(),
        }
    }

    pub fn types(&self) -> &'a TypeFactory {
        self.types
    }

    pub fn resolve_assignment(
        &self,
        rhs: SourceRhs,
        target: &Type,
        criteria: &SelectionCriteria,
        context: &[Parameter],
    ) -> Result<Assignment, ResolutionError> {
        let source = rhs.source_type.clone();
        let qualified = criteria.is_qualified();

        if let Some(selected) = self.select_unique(
            &self.source_selectors,
            self.source_methods,
            Some(&source),
            target,
            criteria,
            context,
        )? {
            return Ok(self.call(&selected, Assignment::Direct(rhs)));
        }

        if !qualified && self.types.is_assignable(&source, target) {
            tracing::trace!(target: "nova.mapgen.resolver", %source, %target, "direct");
            return Ok(Assignment::Direct(rhs));
        }

        if !qualified {
            if let Some(conversion) = find_conversion(self.types, &source, target) {
                tracing::trace!(target: "nova.mapgen.resolver", %source, %target, kind = ?conversion.kind, "conversion");
                return Ok(conversion.apply(Assignment::Direct(rhs)));
            }
        }

        if !qualified {
            if let Some(selected) = self.select_unique(
                &self.built_in_selectors,
                self.built_in_methods,
                Some(&source),
                target,
                criteria,
                context,
            )? {
                return Ok(self.call(&selected, Assignment::Direct(rhs)));
            }
        }

        if let Some(assignment) = self.resolve_two_steps(&rhs, target, criteria, context)? {
            return Ok(assignment);
        }

        Err(ResolutionError::NoMatch {
            source_type: source,
            target_type: target.clone(),
        })
    }

    fn call<M: Method>(&self, selected: &SelectedMethod<'_, M>, argument: Assignment) -> Assignment {
        tracing::trace!(target: "nova.mapgen.resolver", method = selected.method().name(), "method");
        Assignment::MethodReference(MethodReference::new(selected, self.mapper).with_argument(argument))
    }

    fn resolve_two_steps(
        &self,
        rhs: &SourceRhs,
        target: &Type,
        criteria: &SelectionCriteria,
        context: &[Parameter],
    ) -> Result<Option<Assignment>, ResolutionError> {
        let source = &rhs.source_type;
        let plain = SelectionCriteria::for_mapping_methods();
        let candidates: Vec<&SourceMethod> = self
            .source_methods
            .iter()
            .filter(|m| m.family() == MethodFamily::Mapping && !m.is_update_method())
            .filter(|m| m.type_parameters().is_empty() && m.source_parameters().len() == 1)
            .collect();

        // method(method(source))
        let mut found = Vec::new();
        for first in &candidates {
            let intermediate = first.return_type();
            if intermediate == target {
                continue;
            }
            let Some(inner) = self.select_exact(first, source, intermediate, &plain, context) else {
                continue;
            };
            let Ok(Some(outer)) = self.select_unique(
                &self.source_selectors,
                self.source_methods,
                Some(intermediate),
                target,
                criteria,
                context,
            ) else {
                continue;
            };
            let mapped = self.call(&inner, Assignment::Direct(rhs.clone()));
            found.push((
                format!("{} after {}", outer.method().signature(), first.signature()),
                self.call(&outer, mapped),
            ));
        }
        if let Some(assignment) = self.single(found, source, target)? {
            return Ok(Some(assignment));
        }

        // method(conversion(source))
        let mut found = Vec::new();
        for method in &candidates {
            let Some(parameter) = method.source_parameters().first().map(|p| p.ty.clone()) else {
                continue;
            };
            let Some(conversion) = find_conversion(self.types, source, &parameter) else {
                continue;
            };
            if let Some(selected) = self.select_exact(method, &parameter, target, criteria, context)
            {
                let converted = conversion.apply(Assignment::Direct(rhs.clone()));
                found.push((method.signature(), self.call(&selected, converted)));
            }
        }
        if let Some(assignment) = self.single(found, source, target)? {
            return Ok(Some(assignment));
        }

        // conversion(method(source))
        let mut found = Vec::new();
        for method in &candidates {
            let produced = method.return_type();
            let Some(conversion) = find_conversion(self.types, produced, target) else {
                continue;
            };
            if let Some(selected) = self.select_exact(method, source, produced, criteria, context) {
                let mapped = self.call(&selected, Assignment::Direct(rhs.clone()));
                found.push((method.signature(), conversion.apply(mapped)));
            }
        }
        self.single(found, source, target)
    }

    /// Select `method` for `source -> target` if it is the unique pipeline result.
    fn select_exact(
        &self,
        method: &SourceMethod,
        source: &Type,
        target: &Type,
        criteria: &SelectionCriteria,
        context: &[Parameter],
    ) -> Option<SelectedMethod<'a, SourceMethod>> {
        let selected = self
            .select_unique(
                &self.source_selectors,
                self.source_methods,
                Some(source),
                target,
                criteria,
                context,
            )
            .ok()??;
        std::ptr::eq(selected.method(), method).then_some(selected)
    }

    fn single(
        &self,
        mut found: Vec<(String, Assignment)>,
        source: &Type,
        target: &Type,
    ) -> Result<Option<Assignment>, ResolutionError> {
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop().map(|(_, assignment)| assignment)),
            _ => Err(ResolutionError::Ambiguous {
                source_type: source.clone(),
                target_type: target.clone(),
                candidates: found.into_iter().map(|(signature, _)| signature).collect(),
            }),
        }
    }

    fn select<'m, M: Method>(
        &self,
        selectors: &MethodSelectors<M>,
        methods: &'m [M],
        source: Option<&Type>,
        target: &Type,
        criteria: &SelectionCriteria,
        context: &[Parameter],
    ) -> Vec<SelectedMethod<'m, M>> {
        let ctx = SelectionContext {
            types: self.types,
            criteria,
            source_type: source,
            target_type: target,
            available_context: context,
        };
        selectors.get_matching_methods(methods, &ctx)
    }

    fn select_unique<'m, M: Method>(
        &self,
        selectors: &MethodSelectors<M>,
        methods: &'m [M],
        source: Option<&Type>,
        target: &Type,
        criteria: &SelectionCriteria,
        context: &[Parameter],
    ) -> Result<Option<SelectedMethod<'m, M>>, ResolutionError> {
        let mut selected = self.select(selectors, methods, source, target, criteria, context);
        match selected.len() {
            0 => Ok(None),
            1 => Ok(selected.pop()),
            _ => Err(ResolutionError::Ambiguous {
                source_type: source
                    .cloned()
                    .unwrap_or_else(|| self.types.get_type(nova_mapgen_types::jdk::OBJECT)),
                target_type: target.clone(),
                candidates: selected.iter().map(|s| s.method().signature()).collect(),
            }),
        }
    }

    /// The object factory creating `target`. Factories taking the source value win over
    /// parameterless ones.
    pub fn find_object_factory(
        &self,
        target: &Type,
        source: Option<&Type>,
        context: &[Parameter],
    ) -> Result<Option<MethodReference>, ResolutionError> {
        let criteria = SelectionCriteria::for_object_factories();
        let mut selected = self.select(
            &self.source_selectors,
            self.source_methods,
            source,
            target,
            &criteria,
            context,
        );
        if selected.len() > 1 && source.is_some() {
            let with_source: Vec<_> = selected
                .iter()
                .filter(|s| !s.method().source_parameters().is_empty())
                .cloned()
                .collect();
            if !with_source.is_empty() {
                selected = with_source;
            }
        }
        match selected.len() {
            0 => Ok(None),
            1 => Ok(selected
                .first()
                .map(|s| MethodReference::new(s, self.mapper))),
            _ => Err(ResolutionError::Ambiguous {
                source_type: source
                    .cloned()
                    .unwrap_or_else(|| self.types.get_type(nova_mapgen_types::jdk::OBJECT)),
                target_type: target.clone(),
                candidates: selected.iter().map(|s| s.method().signature()).collect(),
            }),
        }
    }

    /// Every lifecycle callback of `timing` applicable to the pair, in declaration order.
    pub fn find_lifecycle_callbacks(
        &self,
        timing: LifecycleTiming,
        source: Option<&Type>,
        target: &Type,
        context: &[Parameter],
    ) -> Vec<MethodReference> {
        let criteria = SelectionCriteria::for_lifecycle_callbacks();
        self.select(
            &self.source_selectors,
            self.source_methods,
            source,
            target,
            &criteria,
            context,
        )
        .iter()
        .filter(|s| s.method().lifecycle_timing() == Some(timing))
        .map(|s| MethodReference::new(s, self.mapper))
        .collect()
    }

    /// A user presence check accepting `source`.
    pub fn find_presence_check(
        &self,
        source: &Type,
        context: &[Parameter],
    ) -> Result<Option<MethodReference>, ResolutionError> {
        let criteria = SelectionCriteria::for_presence_checks();
        let boolean = self.types.primitive(PrimitiveType::Boolean);
        Ok(self
            .select_unique(
                &self.source_selectors,
                self.source_methods,
                Some(source),
                &boolean,
                &criteria,
                context,
            )?
            .map(|s| MethodReference::new(&s, self.mapper)))
    }
}

use crate::method::Method;

use super::{MethodSelector, SelectedMethod, SelectionContext};

/// Keeps the methods whose source parameter is closest to the actual source type in the
/// supertype hierarchy. Methods without a source parameter have distance zero; generic source
/// parameters rank after every concrete one. Lifecycle callbacks are never narrowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct InheritanceSelector;

const UNRELATED: usize = usize::MAX;
const GENERIC: usize = usize::MAX - 1;

impl<M: Method> MethodSelector<M> for InheritanceSelector {
    fn name(&self) -> &'static str {
        "inheritance"
    }

    fn get_matching_methods<'m>(
        &self,
        methods: Vec<SelectedMethod<'m, M>>,
        ctx: &SelectionContext<'_>,
    ) -> Vec<SelectedMethod<'m, M>> {
        let Some(source) = ctx.source_type else {
            return methods;
        };
        // Every applicable lifecycle callback is invoked.
        if methods.len() < 2 || ctx.criteria.is_lifecycle_callback_required() {
            return methods;
        }

        let distance = |candidate: &SelectedMethod<'m, M>| -> usize {
            let method = candidate.method();
            let Some(param) = method.source_parameters().first().copied() else {
                return 0;
            };
            if param.ty.is_type_var() {
                return GENERIC;
            }
            ctx.types
                .supertype_distance(source, &param.ty.qualified_name())
                .unwrap_or(UNRELATED)
        };

        let distances: Vec<usize> = methods.iter().map(distance).collect();
        let Some(best) = distances.iter().copied().min() else {
            return methods;
        };
        methods
            .into_iter()
            .zip(distances)
            .filter_map(|(candidate, d)| (d == best).then_some(candidate))
            .collect()
    }
}

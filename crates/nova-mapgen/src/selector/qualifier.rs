use crate::method::Method;

use super::{MethodSelector, SelectedMethod, SelectionContext};

/// Named qualifiers: a qualified method is only selectable when asked for by name.
#[derive(Clone, Copy, Debug, Default)]
pub struct QualifierSelector;

impl<M: Method> MethodSelector<M> for QualifierSelector {
    fn name(&self) -> &'static str {
        "qualifier"
    }

    fn get_matching_methods<'m>(
        &self,
        methods: Vec<SelectedMethod<'m, M>>,
        ctx: &SelectionContext<'_>,
    ) -> Vec<SelectedMethod<'m, M>> {
        let requested = &ctx.criteria.qualifiers;
        methods
            .into_iter()
            .filter(|candidate| {
                let declared = candidate.method().qualifiers();
                if requested.is_empty() {
                    declared.is_empty()
                } else {
                    requested.iter().all(|q| declared.contains(q))
                }
            })
            .collect()
    }
}

use crate::method::Method;

use super::{MethodSelector, SelectedMethod, SelectionContext};

/// `resultType` qualification: keep methods producing exactly the requested (erased) type.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetTypeSelector;

impl<M: Method> MethodSelector<M> for TargetTypeSelector {
    fn name(&self) -> &'static str {
        "target-type"
    }

    fn get_matching_methods<'m>(
        &self,
        methods: Vec<SelectedMethod<'m, M>>,
        ctx: &SelectionContext<'_>,
    ) -> Vec<SelectedMethod<'m, M>> {
        let Some(requested) = &ctx.criteria.qualifying_result_type else {
            return methods;
        };
        if ctx.criteria.is_lifecycle_callback_required() || ctx.criteria.is_presence_check_required()
        {
            return methods;
        }
        methods
            .into_iter()
            .filter(|candidate| candidate.method().result_type().same_erasure(requested))
            .collect()
    }
}

use crate::method::Method;

use super::{MethodSelector, SelectedMethod, SelectionContext};

/// Keeps the methods whose object-factory, lifecycle-callback and presence-check flags equal the
/// flags the criteria require.
#[derive(Clone, Copy, Debug, Default)]
pub struct MethodFamilySelector;

impl<M: Method> MethodSelector<M> for MethodFamilySelector {
    fn name(&self) -> &'static str {
        "family"
    }

    fn get_matching_methods<'m>(
        &self,
        methods: Vec<SelectedMethod<'m, M>>,
        ctx: &SelectionContext<'_>,
    ) -> Vec<SelectedMethod<'m, M>> {
        let criteria = ctx.criteria;
        methods
            .into_iter()
            .filter(|candidate| {
                let method = candidate.method();
                method.is_object_factory() == criteria.is_object_factory_required()
                    && method.is_lifecycle_callback() == criteria.is_lifecycle_callback_required()
                    && method.is_presence_check() == criteria.is_presence_check_required()
            })
            .collect()
    }
}

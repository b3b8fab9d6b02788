use crate::method::Method;

use super::{MethodSelector, SelectedMethod, SelectionContext};

/// Prefers update methods (taking a `@MappingTarget`) when an existing target instance is
/// available. Without one, update methods cannot be called and only create methods remain.
#[derive(Clone, Copy, Debug, Default)]
pub struct CreateOrUpdateSelector;

impl<M: Method> MethodSelector<M> for CreateOrUpdateSelector {
    fn name(&self) -> &'static str {
        "create-or-update"
    }

    fn get_matching_methods<'m>(
        &self,
        methods: Vec<SelectedMethod<'m, M>>,
        ctx: &SelectionContext<'_>,
    ) -> Vec<SelectedMethod<'m, M>> {
        let criteria = ctx.criteria;
        if criteria.is_object_factory_required()
            || criteria.is_lifecycle_callback_required()
            || criteria.is_presence_check_required()
        {
            return methods;
        }

        let (update, create): (Vec<_>, Vec<_>) = methods
            .into_iter()
            .partition(|m| m.method().is_update_method());

        if criteria.prefer_update_mapping && !update.is_empty() {
            update
        } else {
            create
        }
    }
}

use indexmap::IndexSet;
use nova_mapgen_config::{NullValueCheckStrategy, NullValuePropertyMappingStrategy};
use nova_mapgen_types::{Type, TypeFactory};
use serde::Serialize;

use super::{Assignment, NullCheckWrapper, PresenceCheck};

/// Collection or map property of an update method, merged into the existing target instance.
///
/// When the target already holds a collection (map) it is cleared and refilled with
/// `addAll` (`putAll`), preserving its identity. When it holds `null` a new implementation-type
/// instance is built from the source and installed through the setter. A `null` source runs the
/// else branch (when [`Self::is_include_else_branch`]): the target is set to `null`, or to a new
/// empty instance when [`Self::is_map_null_to_default`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExistingInstanceMergeWrapper {
    #[serde(flatten)]
    base: NullCheckWrapper,
    include_else_branch: bool,
    map_null_to_default: bool,
}

impl ExistingInstanceMergeWrapper {
    pub fn new(
        decorated: Assignment,
        thrown_types_to_exclude: Vec<Type>,
        target_type: Type,
        nvcs: NullValueCheckStrategy,
        nvpms: NullValuePropertyMappingStrategy,
        types: &TypeFactory,
        field_assignment: bool,
    ) -> Self {
        Self {
            base: NullCheckWrapper::new(
                decorated,
                thrown_types_to_exclude,
                target_type,
                types,
                field_assignment,
            ),
            include_else_branch: nvcs != NullValueCheckStrategy::Always
                && nvpms != NullValuePropertyMappingStrategy::Ignore,
            map_null_to_default: nvpms == NullValuePropertyMappingStrategy::SetToDefault,
        }
    }

    pub fn is_include_else_branch(&self) -> bool {
        self.include_else_branch
    }

    pub fn is_map_null_to_default(&self) -> bool {
        self.map_null_to_default
    }

    pub fn decorated(&self) -> &Assignment {
        self.base.decorated()
    }

    pub fn target_type(&self) -> &Type {
        self.base.target_type()
    }

    pub fn null_check_local_var_type(&self) -> &Type {
        self.base.null_check_local_var_type()
    }

    pub fn source_presence_checker(&self) -> Option<&PresenceCheck> {
        self.base.source_presence_checker()
    }

    pub fn is_direct_assignment(&self) -> bool {
        self.base.is_direct_assignment()
    }

    pub fn is_enum_set(&self) -> bool {
        self.base.is_enum_set()
    }

    pub fn is_field_assignment(&self) -> bool {
        self.base.is_field_assignment()
    }

    pub fn import_types(&self) -> IndexSet<Type> {
        let mut imported = self.base.import_types();
        if self.map_null_to_default {
            if let Some(implementation) = self.target_type().implementation_type() {
                imported.extend(implementation.import_types());
            }
        }
        imported
    }

    pub fn thrown_types(&self) -> IndexSet<Type> {
        self.base.thrown_types()
    }
}

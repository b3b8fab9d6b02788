use indexmap::IndexSet;
use nova_mapgen_types::Type;
use serde::Serialize;

use super::{filter_thrown, Assignment};

/// Plain setter assignment of a non-collection property.
///
/// With `include_source_null_check` the value is only written when the source is present; the
/// else branch then writes `null`, the type's default or the configured default value, or nothing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SetterWrapper {
    decorated: Box<Assignment>,
    target_type: Type,
    thrown_types_to_exclude: Vec<Type>,
    include_source_null_check: bool,
    set_explicitly_to_null: bool,
    set_explicitly_to_default: bool,
    default_value: Option<Box<Assignment>>,
}

impl SetterWrapper {
    pub fn new(decorated: Assignment, target_type: Type, thrown_types_to_exclude: Vec<Type>) -> Self {
        Self {
            decorated: Box::new(decorated),
            target_type,
            thrown_types_to_exclude,
            include_source_null_check: false,
            set_explicitly_to_null: false,
            set_explicitly_to_default: false,
            default_value: None,
        }
    }

    pub fn with_source_null_check(mut self, include: bool) -> Self {
        self.include_source_null_check = include;
        self
    }

    pub fn set_explicitly_to_null(mut self, set: bool) -> Self {
        self.set_explicitly_to_null = set;
        self
    }

    pub fn set_explicitly_to_default(mut self, set: bool) -> Self {
        self.set_explicitly_to_default = set;
        self
    }

    pub fn with_default_value(mut self, default_value: Option<Assignment>) -> Self {
        self.default_value = default_value.map(Box::new);
        self
    }

    pub fn decorated(&self) -> &Assignment {
        &self.decorated
    }

    pub fn target_type(&self) -> &Type {
        &self.target_type
    }

    pub fn is_include_source_null_check(&self) -> bool {
        self.include_source_null_check
    }

    pub fn is_set_explicitly_to_null(&self) -> bool {
        self.set_explicitly_to_null
    }

    pub fn is_set_explicitly_to_default(&self) -> bool {
        self.set_explicitly_to_default
    }

    pub fn default_value(&self) -> Option<&Assignment> {
        self.default_value.as_deref()
    }

    pub fn import_types(&self) -> IndexSet<Type> {
        let mut imported = self.decorated.import_types();
        if let Some(default) = &self.default_value {
            imported.extend(default.import_types());
        }
        if self.set_explicitly_to_default {
            imported.extend(self.target_type.effective_instantiation_type().import_types());
        }
        imported
    }

    pub fn thrown_types(&self) -> IndexSet<Type> {
        let mut thrown = filter_thrown(&self.decorated, &self.thrown_types_to_exclude);
        if let Some(default) = &self.default_value {
            thrown.extend(filter_thrown(default, &self.thrown_types_to_exclude));
        }
        thrown
    }
}

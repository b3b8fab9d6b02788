use indexmap::IndexSet;
use nova_mapgen_types::{jdk, Type, TypeFactory};
use serde::Serialize;

use super::{filter_thrown, Assignment, AssignmentType, PresenceCheck};

/// Setter assignment of a collection or map property guarded by a null check on the source.
///
/// Direct assignments copy the source through the target's implementation type
/// (`new ArrayList<>( source )`, or `EnumSet.copyOf( source )` for enum sets). The source is read
/// into a local variable of [`Self::null_check_local_var_type`] before the check unless a
/// presence checker decides presence instead.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NullCheckWrapper {
    decorated: Box<Assignment>,
    target_type: Type,
    null_check_local_var_type: Type,
    #[serde(skip)]
    enum_set_type: Type,
    thrown_types_to_exclude: Vec<Type>,
    field_assignment: bool,
    assignment_type: AssignmentType,
}

impl NullCheckWrapper {
    pub fn new(
        decorated: Assignment,
        thrown_types_to_exclude: Vec<Type>,
        target_type: Type,
        types: &TypeFactory,
        field_assignment: bool,
    ) -> Self {
        let null_check_local_var_type = decorated
            .source_rhs()
            .map(|rhs| rhs.source_type.clone())
            .unwrap_or_else(|| target_type.clone());
        Self {
            assignment_type: decorated.assignment_type(),
            decorated: Box::new(decorated),
            target_type,
            null_check_local_var_type,
            enum_set_type: types.get_type(jdk::ENUM_SET),
            thrown_types_to_exclude,
            field_assignment,
        }
    }

    pub fn decorated(&self) -> &Assignment {
        &self.decorated
    }

    pub fn target_type(&self) -> &Type {
        &self.target_type
    }

    pub fn null_check_local_var_type(&self) -> &Type {
        &self.null_check_local_var_type
    }

    pub fn thrown_types_to_exclude(&self) -> &[Type] {
        &self.thrown_types_to_exclude
    }

    pub fn is_field_assignment(&self) -> bool {
        self.field_assignment
    }

    pub fn source_presence_checker(&self) -> Option<&PresenceCheck> {
        self.decorated.source_presence_checker()
    }

    pub fn is_direct_assignment(&self) -> bool {
        self.assignment_type == AssignmentType::Direct
    }

    pub fn is_enum_set(&self) -> bool {
        self.target_type.is_enum_set()
    }

    pub fn import_types(&self) -> IndexSet<Type> {
        let mut imported = self.decorated.import_types();
        if self.is_direct_assignment() {
            match self.target_type.implementation_type() {
                Some(implementation) => imported.extend(implementation.import_types()),
                None => imported.extend(self.target_type.import_types()),
            }
            if self.is_enum_set() {
                imported.insert(self.enum_set_type.clone());
            }
        }
        if self.is_direct_assignment() || self.source_presence_checker().is_none() {
            imported.extend(self.null_check_local_var_type.import_types());
        }
        imported
    }

    pub fn thrown_types(&self) -> IndexSet<Type> {
        filter_thrown(&self.decorated, &self.thrown_types_to_exclude)
    }
}

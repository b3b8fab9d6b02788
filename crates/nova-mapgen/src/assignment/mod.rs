//! The assignment model.
//!
//! An [`Assignment`] describes how one target value is produced and written. Base nodes
//! ([`Assignment::Direct`], [`Assignment::TypeConversion`], [`Assignment::MethodReference`]) form
//! the value expression; wrappers ([`NullCheckWrapper`], [`ExistingInstanceMergeWrapper`],
//! [`SetterWrapper`]) each own exactly one inner node and add null checks, default fallbacks or
//! in-place merging. Import and thrown-type requirements aggregate through the chain.

use indexmap::{IndexMap, IndexSet};
use nova_mapgen_types::Type;
use serde::Serialize;

use crate::method::Method;
use crate::selector::{BindingKind, ParameterBinding, SelectedMethod};

mod existing_instance;
mod null_check;
mod setter;

pub use existing_instance::ExistingInstanceMergeWrapper;
pub use null_check::NullCheckWrapper;
pub use setter::SetterWrapper;

/// How the value expression was obtained, inherited by wrappers from their innermost node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentType {
    /// Source value assigned as-is.
    Direct,
    TypeConverted,
    /// Through one mapping method.
    Mapped,
    /// Through two chained mapping methods.
    MappedTwice,
    /// A mapping method followed by a type conversion.
    MappedTypeConverted,
    /// A type conversion followed by a mapping method.
    TypeConvertedMapped,
}

impl AssignmentType {
    pub fn is_direct(self) -> bool {
        self == AssignmentType::Direct
    }

    /// Whether a type conversion is involved (conversions do not tolerate `null` input).
    pub fn is_converted(self) -> bool {
        matches!(
            self,
            AssignmentType::TypeConverted
                | AssignmentType::MappedTypeConverted
                | AssignmentType::TypeConvertedMapped
        )
    }
}

/// A check deciding whether the source value is present.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresenceCheck {
    /// A `has<Property>()` accessor on the source bean.
    Accessor { expression: String },
    /// A user-declared presence check method.
    Method(Box<MethodReference>),
}

impl PresenceCheck {
    fn import_types(&self) -> IndexSet<Type> {
        match self {
            PresenceCheck::Accessor { .. } => IndexSet::new(),
            PresenceCheck::Method(method) => method.import_types(),
        }
    }
}

/// The right-hand side a value expression starts from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourceRhs {
    pub source_parameter_name: String,
    /// Expression reading the value (`car.getEngine().getPower()`, a literal, a loop variable).
    pub source_reference: String,
    pub source_type: Type,
    /// Dotted path used in messages (`car.engine.power`).
    pub source_path: String,
    pub presence_checker: Option<PresenceCheck>,
    pub is_constant: bool,
    /// Intermediate getters of a nested path (`car.getEngine()`) that must be non-null before
    /// `source_reference` is read.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path_null_checks: Vec<String>,
}

impl SourceRhs {
    /// A whole parameter (or loop element) used as the source.
    pub fn parameter(name: impl Into<String>, ty: Type) -> Self {
        let name = name.into();
        Self {
            source_parameter_name: name.clone(),
            source_reference: name.clone(),
            source_type: ty,
            source_path: name,
            presence_checker: None,
            is_constant: false,
            path_null_checks: Vec::new(),
        }
    }

    pub fn property(
        parameter: impl Into<String>,
        path: impl Into<String>,
        reference: impl Into<String>,
        ty: Type,
    ) -> Self {
        Self {
            source_parameter_name: parameter.into(),
            source_reference: reference.into(),
            source_type: ty,
            source_path: path.into(),
            presence_checker: None,
            is_constant: false,
            path_null_checks: Vec::new(),
        }
    }

    /// A literal; constants are never null.
    pub fn constant(literal: impl Into<String>, ty: Type) -> Self {
        let literal = literal.into();
        Self {
            source_parameter_name: String::new(),
            source_reference: literal.clone(),
            source_type: ty,
            source_path: literal,
            presence_checker: None,
            is_constant: true,
            path_null_checks: Vec::new(),
        }
    }

    pub fn with_presence_checker(mut self, check: PresenceCheck) -> Self {
        self.presence_checker = Some(check);
        self
    }

    pub fn with_path_null_checks(mut self, checks: Vec<String>) -> Self {
        self.path_null_checks = checks;
        self
    }

    /// Whether reading the value goes through intermediate getters.
    pub fn is_nested(&self) -> bool {
        !self.path_null_checks.is_empty()
    }

    /// A nested path is nullable even for a primitive leaf: any intermediate may be `null`.
    pub fn is_nullable(&self) -> bool {
        !self.is_constant && (self.is_nested() || self.source_type.is_nullable())
    }
}

/// Who provides a referenced method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodProvenance {
    /// Declared on (or generated into) the mapper itself.
    Mapper,
    /// Declared on another mapper listed in `uses`; the implementation holds an instance of it.
    UsedMapper { mapper: Type },
    /// A helper added to the implementation on demand.
    BuiltIn,
}

/// A call to a selected method.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MethodReference {
    pub name: String,
    pub provenance: MethodProvenance,
    pub bindings: Vec<ParameterBinding>,
    pub type_bindings: IndexMap<String, Type>,
    pub return_type: Type,
    pub thrown_types: Vec<Type>,
    /// The value passed as source argument; `None` for factories and callbacks without one.
    pub argument: Option<Box<Assignment>>,
    imports: Vec<Type>,
}

impl MethodReference {
    pub fn new<M: Method>(selected: &SelectedMethod<'_, M>, mapper: &Type) -> Self {
        let method = selected.method();
        let provenance = if method.is_built_in() {
            MethodProvenance::BuiltIn
        } else {
            match method.declaring_type() {
                Some(owner) if owner != mapper => MethodProvenance::UsedMapper {
                    mapper: owner.clone(),
                },
                _ => MethodProvenance::Mapper,
            }
        };

        let mut imports = method.extra_import_types();
        if let MethodProvenance::UsedMapper { mapper } = &provenance {
            imports.push(mapper.clone());
        }
        for binding in selected.bindings() {
            if let BindingKind::TargetType { target } = &binding.kind {
                imports.extend(target.import_types());
            }
        }

        Self {
            name: method.name().to_string(),
            provenance,
            bindings: selected.bindings().to_vec(),
            type_bindings: selected.type_bindings().clone(),
            return_type: method.return_type().clone(),
            thrown_types: method.thrown_types().to_vec(),
            argument: None,
            imports,
        }
    }

    pub fn with_argument(mut self, argument: Assignment) -> Self {
        self.argument = Some(Box::new(argument));
        self
    }

    fn own_import_types(&self) -> IndexSet<Type> {
        self.imports.iter().cloned().collect()
    }

    pub fn import_types(&self) -> IndexSet<Type> {
        let mut out = self.own_import_types();
        if let Some(argument) = &self.argument {
            out.extend(argument.import_types());
        }
        out
    }
}

/// A built-in conversion applied to the value of its argument.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeConversion {
    pub source_type: Type,
    pub target_type: Type,
    /// Expression template; `<SOURCE>` stands for the argument expression.
    pub expression: String,
    pub import_types: Vec<Type>,
    pub thrown_types: Vec<Type>,
    pub argument: Box<Assignment>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignment {
    Direct(SourceRhs),
    TypeConversion(TypeConversion),
    MethodReference(MethodReference),
    NullCheck(NullCheckWrapper),
    ExistingInstanceMerge(ExistingInstanceMergeWrapper),
    Setter(SetterWrapper),
}

impl Assignment {
    pub fn assignment_type(&self) -> AssignmentType {
        match self {
            Assignment::Direct(_) => AssignmentType::Direct,
            Assignment::TypeConversion(conversion) => match conversion.argument.assignment_type() {
                AssignmentType::Direct => AssignmentType::TypeConverted,
                AssignmentType::Mapped | AssignmentType::MappedTwice => {
                    AssignmentType::MappedTypeConverted
                }
                other => other,
            },
            Assignment::MethodReference(method) => {
                match method.argument.as_deref().map(Assignment::assignment_type) {
                    None | Some(AssignmentType::Direct) => AssignmentType::Mapped,
                    Some(AssignmentType::TypeConverted) => AssignmentType::TypeConvertedMapped,
                    Some(AssignmentType::Mapped) => AssignmentType::MappedTwice,
                    Some(other) => other,
                }
            }
            Assignment::NullCheck(_) | Assignment::ExistingInstanceMerge(_) | Assignment::Setter(_) => {
                self.innermost().assignment_type()
            }
        }
    }

    pub fn is_direct(&self) -> bool {
        self.assignment_type().is_direct()
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(
            self,
            Assignment::NullCheck(_) | Assignment::ExistingInstanceMerge(_) | Assignment::Setter(_)
        )
    }

    /// The node a wrapper decorates, `None` for base nodes.
    pub fn decorated(&self) -> Option<&Assignment> {
        match self {
            Assignment::NullCheck(w) => Some(w.decorated()),
            Assignment::ExistingInstanceMerge(w) => Some(w.decorated()),
            Assignment::Setter(w) => Some(w.decorated()),
            _ => None,
        }
    }

    /// The value expression beneath all wrappers.
    pub fn innermost(&self) -> &Assignment {
        let mut current = self;
        while let Some(inner) = current.decorated() {
            current = inner;
        }
        current
    }

    /// The right-hand side at the bottom of the expression.
    pub fn source_rhs(&self) -> Option<&SourceRhs> {
        match self {
            Assignment::Direct(rhs) => Some(rhs),
            Assignment::TypeConversion(conversion) => conversion.argument.source_rhs(),
            Assignment::MethodReference(method) => method.argument.as_deref()?.source_rhs(),
            wrapper => wrapper.decorated()?.source_rhs(),
        }
    }

    pub fn source_presence_checker(&self) -> Option<&PresenceCheck> {
        self.source_rhs()?.presence_checker.as_ref()
    }

    pub fn import_types(&self) -> IndexSet<Type> {
        match self {
            Assignment::Direct(rhs) => rhs
                .presence_checker
                .as_ref()
                .map(PresenceCheck::import_types)
                .unwrap_or_default(),
            Assignment::TypeConversion(conversion) => {
                let mut out: IndexSet<Type> = conversion.import_types.iter().cloned().collect();
                out.extend(conversion.argument.import_types());
                out
            }
            Assignment::MethodReference(method) => method.import_types(),
            Assignment::NullCheck(w) => w.import_types(),
            Assignment::ExistingInstanceMerge(w) => w.import_types(),
            Assignment::Setter(w) => w.import_types(),
        }
    }

    pub fn thrown_types(&self) -> IndexSet<Type> {
        match self {
            Assignment::Direct(_) => IndexSet::new(),
            Assignment::TypeConversion(conversion) => {
                let mut out: IndexSet<Type> = conversion.thrown_types.iter().cloned().collect();
                out.extend(conversion.argument.thrown_types());
                out
            }
            Assignment::MethodReference(method) => {
                let mut out: IndexSet<Type> = method.thrown_types.iter().cloned().collect();
                if let Some(argument) = &method.argument {
                    out.extend(argument.thrown_types());
                }
                out
            }
            Assignment::NullCheck(w) => w.thrown_types(),
            Assignment::ExistingInstanceMerge(w) => w.thrown_types(),
            Assignment::Setter(w) => w.thrown_types(),
        }
    }

    /// Visit every method reference in the tree, outermost first.
    pub fn for_each_method_reference(&self, f: &mut dyn FnMut(&MethodReference)) {
        match self {
            Assignment::Direct(rhs) => {
                if let Some(PresenceCheck::Method(method)) = &rhs.presence_checker {
                    f(method);
                }
            }
            Assignment::TypeConversion(conversion) => conversion.argument.for_each_method_reference(f),
            Assignment::MethodReference(method) => {
                f(method);
                if let Some(argument) = &method.argument {
                    argument.for_each_method_reference(f);
                }
            }
            wrapper => {
                if let Some(inner) = wrapper.decorated() {
                    inner.for_each_method_reference(f);
                }
                if let Assignment::Setter(setter) = wrapper {
                    if let Some(default) = setter.default_value() {
                        default.for_each_method_reference(f);
                    }
                }
            }
        }
    }
}

/// Thrown types of `inner` minus the ones the enclosing method declares.
fn filter_thrown(inner: &Assignment, exclude: &[Type]) -> IndexSet<Type> {
    inner
        .thrown_types()
        .into_iter()
        .filter(|ty| !exclude.contains(ty))
        .collect()
}

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize, Serializer};

use crate::jdk;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.boxed_name() == name)
    }

    /// Widening primitive conversion (JLS 5.1.2).
    pub fn widens_to(self, other: PrimitiveType) -> bool {
        use PrimitiveType::*;
        match self {
            Byte => matches!(other, Short | Int | Long | Float | Double),
            Short | Char => matches!(other, Int | Long | Float | Double),
            Int => matches!(other, Long | Float | Double),
            Long => matches!(other, Float | Double),
            Float => matches!(other, Double),
            Double | Boolean => false,
        }
    }

    /// Literal used when a target of this type has to be reset to its default value.
    pub fn default_literal(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "false",
            PrimitiveType::Char => "'\\u0000'",
            PrimitiveType::Long => "0L",
            PrimitiveType::Float => "0.0f",
            PrimitiveType::Double => "0.0d",
            PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int => "0",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Repr {
    Void,
    Primitive(PrimitiveType),
    Declared { name: String, args: Vec<Type> },
    Array(Type),
    TypeVar(String),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Categories {
    pub(crate) known: bool,
    pub(crate) interface: bool,
    pub(crate) is_abstract: bool,
    pub(crate) enumeration: bool,
    pub(crate) immutable: bool,
    pub(crate) iterable: bool,
    pub(crate) collection: bool,
    pub(crate) map: bool,
    pub(crate) enum_set: bool,
}

#[derive(Debug)]
pub(crate) struct TypeData {
    pub(crate) repr: Repr,
    pub(crate) categories: Categories,
    pub(crate) implementation: Option<Type>,
}

/// Semantic wrapper over a type reference.
///
/// Identity (equality and hashing) is the fully-qualified name plus generic arguments; derived
/// data such as categories and the implementation type is carried along but never compared.
#[derive(Clone)]
pub struct Type(Arc<TypeData>);

impl Type {
    pub(crate) fn from_data(data: TypeData) -> Self {
        Self(Arc::new(data))
    }

    pub(crate) fn plain(repr: Repr) -> Self {
        Self::from_data(TypeData {
            repr,
            categories: Categories::default(),
            implementation: None,
        })
    }

    pub(crate) fn repr(&self) -> &Repr {
        &self.0.repr
    }

    /// Fully-qualified erased name (`java.util.List` for `java.util.List<String>`).
    ///
    /// Primitives return their keyword, arrays the component name followed by `[]`.
    pub fn qualified_name(&self) -> String {
        match &self.0.repr {
            Repr::Void => "void".to_string(),
            Repr::Primitive(p) => p.name().to_string(),
            Repr::Declared { name, .. } => name.clone(),
            Repr::Array(component) => format!("{}[]", component.qualified_name()),
            Repr::TypeVar(name) => name.clone(),
        }
    }

    pub fn simple_name(&self) -> String {
        match &self.0.repr {
            Repr::Declared { name, .. } => name
                .rsplit_once('.')
                .map(|(_, simple)| simple.to_string())
                .unwrap_or_else(|| name.clone()),
            Repr::Array(component) => format!("{}[]", component.simple_name()),
            _ => self.qualified_name(),
        }
    }

    pub fn package_name(&self) -> Option<&str> {
        match &self.0.repr {
            Repr::Declared { name, .. } => name.rsplit_once('.').map(|(pkg, _)| pkg),
            _ => None,
        }
    }

    pub fn type_arguments(&self) -> &[Type] {
        match &self.0.repr {
            Repr::Declared { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.0.repr, Repr::Void)
    }

    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self.0.repr {
            Repr::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive().is_some()
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.repr, Repr::Array(_))
    }

    pub fn component_type(&self) -> Option<&Type> {
        match &self.0.repr {
            Repr::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_type_var(&self) -> bool {
        matches!(self.0.repr, Repr::TypeVar(_))
    }

    pub fn is_declared(&self) -> bool {
        matches!(self.0.repr, Repr::Declared { .. })
    }

    pub fn is_raw(&self) -> bool {
        self.type_arguments().is_empty()
    }

    /// Whether the type was registered with the factory that produced it.
    pub fn is_known(&self) -> bool {
        self.0.categories.known
    }

    pub fn is_interface(&self) -> bool {
        self.0.categories.interface
    }

    pub fn is_abstract(&self) -> bool {
        self.0.categories.is_abstract
    }

    pub fn is_enum(&self) -> bool {
        self.0.categories.enumeration
    }

    pub fn is_immutable(&self) -> bool {
        self.0.categories.immutable
    }

    pub fn is_iterable(&self) -> bool {
        self.0.categories.iterable
    }

    pub fn is_collection(&self) -> bool {
        self.0.categories.collection
    }

    pub fn is_map(&self) -> bool {
        self.0.categories.map
    }

    pub fn is_enum_set(&self) -> bool {
        self.0.categories.enum_set
    }

    pub fn is_collection_or_map(&self) -> bool {
        self.is_collection() || self.is_map()
    }

    pub fn is_string(&self) -> bool {
        matches!(&self.0.repr, Repr::Declared { name, .. } if name == jdk::STRING)
    }

    pub fn is_object(&self) -> bool {
        matches!(&self.0.repr, Repr::Declared { name, .. } if name == jdk::OBJECT)
    }

    /// Primitive type this boxed type unboxes to (`java.lang.Integer` -> `int`).
    pub fn unboxed(&self) -> Option<PrimitiveType> {
        match &self.0.repr {
            Repr::Declared { name, .. } => PrimitiveType::from_boxed_name(name),
            _ => None,
        }
    }

    /// `boolean` or `java.lang.Boolean`.
    pub fn is_boolean(&self) -> bool {
        self.primitive() == Some(PrimitiveType::Boolean)
            || self.unboxed() == Some(PrimitiveType::Boolean)
    }

    /// Whether a value of this type may be `null`.
    pub fn is_nullable(&self) -> bool {
        !self.is_primitive() && !self.is_void()
    }

    /// Concrete type to instantiate for an abstract collection/map/iterable type.
    ///
    /// Returns `None` when the type is already concrete or has no standard default.
    pub fn implementation_type(&self) -> Option<&Type> {
        self.0.implementation.as_ref()
    }

    /// The implementation type if there is one, otherwise the type itself.
    pub fn effective_instantiation_type(&self) -> &Type {
        self.implementation_type().unwrap_or(self)
    }

    /// The type with all generic arguments removed.
    pub fn erasure(&self) -> Type {
        match &self.0.repr {
            Repr::Declared { name, args } if !args.is_empty() => Type::from_data(TypeData {
                repr: Repr::Declared {
                    name: name.clone(),
                    args: Vec::new(),
                },
                categories: self.0.categories.clone(),
                implementation: self.0.implementation.as_ref().map(Type::erasure),
            }),
            Repr::Array(component) => Type::plain(Repr::Array(component.erasure())),
            _ => self.clone(),
        }
    }

    pub fn same_erasure(&self, other: &Type) -> bool {
        self.erasure() == other.erasure()
    }

    /// Whether mentioning this type in generated code needs an import statement.
    pub fn requires_import(&self) -> bool {
        match self.package_name() {
            Some(pkg) => pkg != "java.lang",
            None => false,
        }
    }

    /// Types that have to be referenced for this type to be mentioned in generated code.
    ///
    /// Erased declared types plus the closure of their type arguments; array types contribute
    /// their component's closure. Primitives, `void` and type variables contribute nothing.
    pub fn import_types(&self) -> IndexSet<Type> {
        let mut out = IndexSet::new();
        self.collect_import_types(&mut out);
        out
    }

    fn collect_import_types(&self, out: &mut IndexSet<Type>) {
        match &self.0.repr {
            Repr::Declared { args, .. } => {
                out.insert(self.erasure());
                for arg in args {
                    arg.collect_import_types(out);
                }
            }
            Repr::Array(component) => component.collect_import_types(out),
            Repr::Void | Repr::Primitive(_) | Repr::TypeVar(_) => {}
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.repr == other.0.repr
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.repr.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.repr {
            Repr::Void => f.write_str("void"),
            Repr::Primitive(p) => f.write_str(p.name()),
            Repr::Declared { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Repr::Array(component) => write!(f, "{component}[]"),
            Repr::TypeVar(name) => f.write_str(name),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

use serde::{Deserialize, Serialize};

use crate::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
}

/// Declared shape of a class as reported by the host compiler.
///
/// Supertypes and property types are written in source syntax (`java.util.List<E>`) and may
/// refer to the declaration's own type parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub type_params: Vec<String>,
    pub supertypes: Vec<String>,
    pub properties: Vec<PropertyDecl>,
    pub has_default_constructor: bool,
    pub is_immutable: bool,
    pub enum_constants: Vec<String>,
}

impl ClassDecl {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            is_abstract: false,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            properties: Vec::new(),
            has_default_constructor: true,
            is_immutable: false,
            enum_constants: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Interface,
            is_abstract: true,
            has_default_constructor: false,
            ..Self::class(name)
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ClassKind::Enum,
            has_default_constructor: false,
            is_immutable: true,
            enum_constants: constants.into_iter().map(Into::into).collect(),
            ..Self::class(name)
        }
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self {
            is_abstract: true,
            ..Self::class(name)
        }
    }

    pub fn with_type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    pub fn immutable(mut self) -> Self {
        self.is_immutable = true;
        self
    }

    pub fn without_default_constructor(mut self) -> Self {
        self.has_default_constructor = false;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: String,
    pub getter: bool,
    pub setter: bool,
    pub presence_checker: bool,
}

impl PropertyDecl {
    /// A property with both a getter and a setter.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            getter: true,
            setter: true,
            presence_checker: false,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.setter = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.getter = false;
        self
    }

    pub fn with_presence_checker(mut self) -> Self {
        self.presence_checker = true;
        self
    }
}

/// A property resolved against a concrete (possibly parameterized) owner type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub ty: Type,
    pub readable: bool,
    pub writable: bool,
    pub has_presence_checker: bool,
}

impl Property {
    pub fn getter_name(&self) -> String {
        let prefix = if self.ty.primitive() == Some(crate::PrimitiveType::Boolean) {
            "is"
        } else {
            "get"
        };
        format!("{prefix}{}", capitalize(&self.name))
    }

    pub fn setter_name(&self) -> String {
        format!("set{}", capitalize(&self.name))
    }

    pub fn presence_checker_name(&self) -> Option<String> {
        self.has_presence_checker
            .then(|| format!("has{}", capitalize(&self.name)))
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

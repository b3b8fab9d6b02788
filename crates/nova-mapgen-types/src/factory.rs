use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use parking_lot::RwLock;
use thiserror::Error;

use crate::decl::{ClassDecl, ClassKind, Property};
use crate::jdk;
use crate::ty::{Categories, Repr, TypeData};
use crate::{PrimitiveType, Type};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("unexpected end of type `{input}`")]
    UnexpectedEnd { input: String },
    #[error("unexpected `{ch}` at offset {offset} in type `{input}`")]
    UnexpectedChar {
        input: String,
        ch: char,
        offset: usize,
    },
}

/// Registry of declared classes and interner for [`Type`]s.
///
/// Every distinct (name, arguments) pair is built once: categories and the implementation type
/// are derived at that point and the cached value is returned for every later lookup. The cache
/// is only ever written once per key, so lookups are idempotent.
#[derive(Default)]
pub struct TypeFactory {
    decls: IndexMap<String, ClassDecl>,
    cache: RwLock<HashMap<Repr, Type>>,
}

impl std::fmt::Debug for TypeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeFactory")
            .field("decls", &self.decls.len())
            .finish_non_exhaustive()
    }
}

impl TypeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory pre-populated with the JDK declarations from [`crate::jdk`].
    pub fn with_jdk() -> Self {
        let mut factory = Self::new();
        for decl in jdk::declarations() {
            factory.declare(decl);
        }
        factory
    }

    /// Register (or replace) a class declaration.
    pub fn declare(&mut self, decl: ClassDecl) {
        // Categories of already-interned types may depend on the replaced declaration.
        self.cache.get_mut().clear();
        self.decls.insert(decl.name.clone(), decl);
    }

    pub fn decl(&self, name: &str) -> Option<&ClassDecl> {
        self.decls.get(name)
    }

    pub fn type_decl(&self, ty: &Type) -> Option<&ClassDecl> {
        match ty.repr() {
            Repr::Declared { name, .. } => self.decls.get(name),
            _ => None,
        }
    }

    pub fn get_type(&self, name: &str) -> Type {
        self.declared(name, Vec::new())
    }

    pub fn declared(&self, name: &str, args: Vec<Type>) -> Type {
        let repr = Repr::Declared {
            name: name.to_string(),
            args,
        };
        if let Some(ty) = self.cache.read().get(&repr) {
            return ty.clone();
        }

        let ty = self.build(repr.clone());
        self.cache.write().entry(repr).or_insert(ty).clone()
    }

    pub fn primitive(&self, primitive: PrimitiveType) -> Type {
        Type::plain(Repr::Primitive(primitive))
    }

    pub fn void(&self) -> Type {
        Type::plain(Repr::Void)
    }

    pub fn array(&self, component: Type) -> Type {
        Type::plain(Repr::Array(component))
    }

    pub fn type_var(&self, name: &str) -> Type {
        Type::plain(Repr::TypeVar(name.to_string()))
    }

    pub fn boxed(&self, primitive: PrimitiveType) -> Type {
        self.get_type(primitive.boxed_name())
    }

    fn build(&self, repr: Repr) -> Type {
        let Repr::Declared { name, args } = &repr else {
            return Type::plain(repr);
        };

        let decl = self.decls.get(name);
        let supers = self.erased_supertype_names(name);
        let categories = Categories {
            known: decl.is_some(),
            interface: decl.is_some_and(|d| d.kind == ClassKind::Interface),
            is_abstract: decl.is_some_and(|d| d.is_abstract || d.kind == ClassKind::Interface),
            enumeration: decl.is_some_and(|d| d.kind == ClassKind::Enum),
            immutable: decl.is_some_and(|d| d.is_immutable),
            iterable: supers.contains(jdk::ITERABLE),
            collection: supers.contains(jdk::COLLECTION),
            map: supers.contains(jdk::MAP),
            enum_set: name == jdk::ENUM_SET,
        };

        let implementation = jdk::default_implementation(name).map(|implementation| {
            tracing::trace!(
                target: "nova.mapgen.types",
                declared = %name,
                implementation,
                "resolved implementation type"
            );
            self.declared(implementation, args.clone())
        });

        Type::from_data(TypeData {
            repr,
            categories,
            implementation,
        })
    }

    /// Erased names of `name` and all of its transitive supertypes (including itself).
    fn erased_supertype_names(&self, name: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([name.to_string()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(decl) = self.decls.get(&current) else {
                continue;
            };
            for supertype in &decl.supertypes {
                queue.push_back(erased_name(supertype).to_string());
            }
        }
        seen
    }

    /// Parse a type written in source syntax (`java.util.Map<String, java.util.List<Integer>>`).
    ///
    /// Simple names resolve against `java.lang`, then against the default package; unresolved
    /// simple names become type variables.
    pub fn parse(&self, text: &str) -> Result<Type, TypeParseError> {
        let mut parser = TypeParser {
            factory: self,
            input: text,
            pos: 0,
        };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(ty),
            Some(ch) => Err(parser.unexpected(ch)),
        }
    }

    fn resolve_name(&self, name: &str) -> Type {
        if let Some(primitive) = PrimitiveType::from_name(name) {
            return self.primitive(primitive);
        }
        if name == "void" {
            return self.void();
        }
        if name.contains('.') {
            return self.get_type(name);
        }
        let lang = format!("java.lang.{name}");
        if self.decls.contains_key(&lang) {
            return self.get_type(&lang);
        }
        if self.decls.contains_key(name) {
            return self.get_type(name);
        }
        self.type_var(name)
    }

    /// Replace type variables according to `bindings`.
    pub fn substitute(&self, ty: &Type, bindings: &HashMap<String, Type>) -> Type {
        if bindings.is_empty() {
            return ty.clone();
        }
        match ty.repr() {
            Repr::TypeVar(name) => bindings.get(name).cloned().unwrap_or_else(|| ty.clone()),
            Repr::Declared { name, args } if !args.is_empty() => {
                let args = args.iter().map(|a| self.substitute(a, bindings)).collect();
                self.declared(name, args)
            }
            Repr::Array(component) => self.array(self.substitute(component, bindings)),
            _ => ty.clone(),
        }
    }

    /// `ty` followed by all of its supertypes in breadth-first order, with type arguments
    /// substituted along the way. Raw types stay raw. Each erased class appears once.
    pub fn supertype_closure(&self, ty: &Type) -> Vec<Type> {
        let mut out = Vec::new();
        if !ty.is_declared() {
            return out;
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            let Repr::Declared { name, args } = current.repr() else {
                continue;
            };
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(decl) = self.decls.get(name) {
                let raw = args.is_empty() && !decl.type_params.is_empty();
                let bindings: HashMap<String, Type> = decl
                    .type_params
                    .iter()
                    .cloned()
                    .zip(args.iter().cloned())
                    .collect();
                for supertype in &decl.supertypes {
                    let parsed = match self.parse(supertype) {
                        Ok(parsed) => parsed,
                        Err(err) => {
                            tracing::warn!(
                                target: "nova.mapgen.types",
                                class = %name,
                                error = %err,
                                "skipping unparsable supertype"
                            );
                            continue;
                        }
                    };
                    let next = if raw {
                        parsed.erasure()
                    } else {
                        self.substitute(&parsed, &bindings)
                    };
                    queue.push_back(next);
                }
            }
            out.push(current.clone());
        }
        out
    }

    /// `ty` viewed as the supertype named `target` (`ArrayList<String>` as `java.lang.Iterable`
    /// is `Iterable<String>`).
    pub fn as_supertype(&self, ty: &Type, target: &str) -> Option<Type> {
        if target == jdk::OBJECT && (ty.is_declared() || ty.is_array()) {
            return Some(self.get_type(jdk::OBJECT));
        }
        self.supertype_closure(ty)
            .into_iter()
            .find(|candidate| candidate.qualified_name() == target)
    }

    /// Number of supertype edges between `from` and the class named `to`.
    pub fn supertype_distance(&self, from: &Type, to: &str) -> Option<usize> {
        let start = from.qualified_name();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([(start, 0usize)]);
        while let Some((current, depth)) = queue.pop_front() {
            if current == to {
                return Some(depth);
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(decl) = self.decls.get(&current) {
                for supertype in &decl.supertypes {
                    queue.push_back((erased_name(supertype).to_string(), depth + 1));
                }
            }
        }
        (to == jdk::OBJECT && from.is_declared()).then_some(usize::MAX / 2)
    }

    /// Assignment compatibility without boxing or any other conversion.
    pub fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        if from == to {
            return true;
        }
        match (from.repr(), to.repr()) {
            (Repr::Void, _) | (_, Repr::Void) => false,
            (Repr::Primitive(_), _) | (_, Repr::Primitive(_)) => false,
            (Repr::Array(a), Repr::Array(b)) => {
                if a.is_primitive() || b.is_primitive() {
                    a == b
                } else {
                    self.is_assignable(a, b)
                }
            }
            (Repr::Array(_), Repr::Declared { .. }) => to.is_object(),
            (Repr::TypeVar(_), _) => to.is_object(),
            (Repr::Declared { .. }, Repr::Declared { name, args }) => {
                if name == jdk::OBJECT {
                    return true;
                }
                let Some(view) = self.as_supertype(from, name) else {
                    return false;
                };
                if args.is_empty() || view.is_raw() {
                    return true;
                }
                view.type_arguments().len() == args.len()
                    && view
                        .type_arguments()
                        .iter()
                        .zip(args)
                        .all(|(actual, expected)| actual == expected || expected.is_type_var())
            }
            _ => false,
        }
    }

    /// Element type of an iterable or array type.
    pub fn element_type(&self, ty: &Type) -> Option<Type> {
        if let Some(component) = ty.component_type() {
            return Some(component.clone());
        }
        let view = self.as_supertype(ty, jdk::ITERABLE)?;
        Some(
            view.type_arguments()
                .first()
                .cloned()
                .unwrap_or_else(|| self.get_type(jdk::OBJECT)),
        )
    }

    /// Key and value types of a map type.
    pub fn map_entry_types(&self, ty: &Type) -> Option<(Type, Type)> {
        let view = self.as_supertype(ty, jdk::MAP)?;
        let object = || self.get_type(jdk::OBJECT);
        let args = view.type_arguments();
        Some((
            args.first().cloned().unwrap_or_else(object),
            args.get(1).cloned().unwrap_or_else(object),
        ))
    }

    /// Whether `new T()` is possible for this type.
    pub fn is_instantiable(&self, ty: &Type) -> bool {
        self.type_decl(ty)
            .is_some_and(|decl| decl.has_default_constructor && !ty.is_abstract())
    }

    /// Properties of `ty` (own declarations first, then inherited ones not shadowed), with the
    /// owner's type arguments substituted into the property types.
    pub fn properties(&self, ty: &Type) -> Result<Vec<Property>, TypeParseError> {
        let mut out: Vec<Property> = Vec::new();
        for view in self.supertype_closure(ty) {
            let Repr::Declared { name, args } = view.repr() else {
                continue;
            };
            let Some(decl) = self.decls.get(name) else {
                continue;
            };
            let bindings: HashMap<String, Type> = decl
                .type_params
                .iter()
                .cloned()
                .zip(args.iter().cloned())
                .collect();
            for prop in &decl.properties {
                if out.iter().any(|p| p.name == prop.name) {
                    continue;
                }
                let parsed = self.parse(&prop.ty)?;
                out.push(Property {
                    name: prop.name.clone(),
                    ty: self.substitute(&parsed, &bindings),
                    readable: prop.getter,
                    writable: prop.setter,
                    has_presence_checker: prop.presence_checker,
                });
            }
        }
        Ok(out)
    }

    pub fn property(&self, ty: &Type, name: &str) -> Result<Option<Property>, TypeParseError> {
        Ok(self.properties(ty)?.into_iter().find(|p| p.name == name))
    }
}

fn erased_name(text: &str) -> &str {
    text.split('<').next().unwrap_or(text).trim()
}

struct TypeParser<'f, 'i> {
    factory: &'f TypeFactory,
    input: &'i str,
    pos: usize,
}

impl TypeParser<'_, '_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, ch: char) -> TypeParseError {
        TypeParseError::UnexpectedChar {
            input: self.input.to_string(),
            ch,
            offset: self.pos,
        }
    }

    fn end(&self) -> TypeParseError {
        TypeParseError::UnexpectedEnd {
            input: self.input.to_string(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), TypeParseError> {
        self.skip_ws();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.bump();
                Ok(())
            }
            Some(ch) => Err(self.unexpected(ch)),
            None => Err(self.end()),
        }
    }

    fn ident(&mut self) -> Result<&str, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(ch) if ch.is_alphabetic() || ch == '_' || ch == '$' => {}
            Some(ch) => return Err(self.unexpected(ch)),
            None => return Err(self.end()),
        }
        while self
            .peek()
            .is_some_and(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '$' | '.'))
        {
            self.bump();
        }
        Ok(&self.input[start..self.pos])
    }

    fn parse_type(&mut self) -> Result<Type, TypeParseError> {
        self.skip_ws();
        if self.peek() == Some('?') {
            self.bump();
            return self.parse_wildcard();
        }

        let name = self.ident()?.to_string();
        let mut ty = self.factory.resolve_name(&name);

        self.skip_ws();
        if self.peek() == Some('<') {
            self.bump();
            let mut args = vec![self.parse_type()?];
            loop {
                self.skip_ws();
                match self.bump() {
                    Some(',') => args.push(self.parse_type()?),
                    Some('>') => break,
                    Some(ch) => {
                        self.pos -= ch.len_utf8();
                        return Err(self.unexpected(ch));
                    }
                    None => return Err(self.end()),
                }
            }
            ty = self.factory.declared(&ty.qualified_name(), args);
        }

        loop {
            self.skip_ws();
            if self.peek() != Some('[') {
                break;
            }
            self.bump();
            self.expect(']')?;
            ty = self.factory.array(ty);
        }
        Ok(ty)
    }

    /// Wildcards collapse to their bound (`?` to `Object`).
    fn parse_wildcard(&mut self) -> Result<Type, TypeParseError> {
        self.skip_ws();
        if self.input[self.pos..].starts_with("extends") || self.input[self.pos..].starts_with("super")
        {
            self.ident()?;
            return self.parse_type();
        }
        Ok(self.factory.get_type(jdk::OBJECT))
    }
}

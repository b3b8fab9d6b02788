use indexmap::IndexSet;
use nova_mapgen_config::OptionsScope;
use nova_mapgen_types::Type;
use serde::Serialize;

use crate::bean::{string_literal, BeanMappingMethod};
use crate::iterable::IterableMappingMethod;
use crate::map::MapMappingMethod;
use crate::method::SourceMethod;

/// A mapper interface or abstract class together with everything it may call.
#[derive(Clone, Debug, PartialEq)]
pub struct MapperDecl {
    pub ty: Type,
    /// Options declared on the mapper itself.
    pub options: OptionsScope,
    /// Options inherited from a shared mapper configuration.
    pub config: Option<OptionsScope>,
    /// Methods declared on the mapper, abstract or not.
    pub methods: Vec<SourceMethod>,
    /// Other mappers listed in `uses`, with their methods.
    pub used_mappers: Vec<(Type, Vec<SourceMethod>)>,
    /// Annotations copied onto the implementation type, in declaration order.
    pub annotate_with: Vec<AnnotateWith>,
}

impl MapperDecl {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            options: OptionsScope::default(),
            config: None,
            methods: Vec::new(),
            used_mappers: Vec::new(),
            annotate_with: Vec::new(),
        }
    }

    pub fn annotate_with(mut self, annotation: AnnotateWith) -> Self {
        self.annotate_with.push(annotation);
        self
    }

    pub fn with_options(mut self, options: OptionsScope) -> Self {
        self.options = options;
        self
    }

    pub fn with_config(mut self, config: OptionsScope) -> Self {
        self.config = Some(config);
        self
    }

    pub fn method(mut self, method: SourceMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn uses(mut self, mapper: Type, methods: Vec<SourceMethod>) -> Self {
        self.used_mappers.push((mapper, methods));
        self
    }

    /// Every method a generated method may call: own methods first, then used mappers' in
    /// `uses` order.
    pub fn candidate_methods(&self) -> Vec<SourceMethod> {
        self.methods
            .iter()
            .chain(self.used_mappers.iter().flat_map(|(_, methods)| methods))
            .cloned()
            .collect()
    }

    /// Methods the implementation has to generate.
    pub fn abstract_methods(&self) -> impl Iterator<Item = &SourceMethod> {
        self.methods.iter().filter(|m| m.is_abstract())
    }
}

/// An annotation the implementation type is annotated with (`@AnnotateWith`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnnotateWith {
    pub annotation: Type,
    /// Whether the annotation type is `@Repeatable`.
    pub repeatable: bool,
    pub elements: Vec<AnnotationElement>,
}

/// One element of an [`AnnotateWith`], with its values already rendered as Java literals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnnotationElement {
    pub name: String,
    pub values: Vec<String>,
}

impl AnnotateWith {
    pub fn new(annotation: Type) -> Self {
        Self {
            annotation,
            repeatable: false,
            elements: Vec::new(),
        }
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// An element with literal values (`1`, `true`, `Foo.class`).
    pub fn element<V: Into<String>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.elements.push(AnnotationElement {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// An element with string values, quoted as Java string literals.
    pub fn strings<V: AsRef<str>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let quoted: Vec<String> = values
            .into_iter()
            .map(|v| string_literal(v.as_ref()))
            .collect();
        self.element(name, quoted)
    }

    pub fn element_named(&self, name: &str) -> Option<&AnnotationElement> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// One generated method of a mapper implementation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingMethod {
    Bean(BeanMappingMethod),
    Iterable(IterableMappingMethod),
    Map(MapMappingMethod),
}

impl MappingMethod {
    pub fn name(&self) -> &str {
        match self {
            MappingMethod::Bean(m) => &m.name,
            MappingMethod::Iterable(m) => &m.name,
            MappingMethod::Map(m) => &m.name,
        }
    }

    pub fn import_types(&self) -> IndexSet<Type> {
        match self {
            MappingMethod::Bean(m) => m.import_types(),
            MappingMethod::Iterable(m) => m.import_types(),
            MappingMethod::Map(m) => m.import_types(),
        }
    }

    pub fn as_bean(&self) -> Option<&BeanMappingMethod> {
        match self {
            MappingMethod::Bean(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_iterable(&self) -> Option<&IterableMappingMethod> {
        match self {
            MappingMethod::Iterable(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapMappingMethod> {
        match self {
            MappingMethod::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Calls every method reference the generated body contains.
    pub(crate) fn for_each_method_reference(
        &self,
        f: &mut dyn FnMut(&crate::assignment::MethodReference),
    ) {
        let (factory, before, after) = match self {
            MappingMethod::Bean(m) => (&m.factory, &m.before_mappings, &m.after_mappings),
            MappingMethod::Iterable(m) => (&m.factory, &m.before_mappings, &m.after_mappings),
            MappingMethod::Map(m) => (&m.factory, &m.before_mappings, &m.after_mappings),
        };
        for method in factory.iter().chain(before).chain(after) {
            f(method);
        }
        match self {
            MappingMethod::Bean(m) => {
                for mapping in &m.property_mappings {
                    mapping.assignment.for_each_method_reference(f);
                }
            }
            MappingMethod::Iterable(m) => m.element_assignment.for_each_method_reference(f),
            MappingMethod::Map(m) => {
                m.key_assignment.for_each_method_reference(f);
                m.value_assignment.for_each_method_reference(f);
            }
        }
    }
}

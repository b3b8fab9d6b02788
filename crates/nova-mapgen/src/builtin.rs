use nova_mapgen_types::{jdk, Type, TypeFactory};

use crate::method::{Method, Parameter};

/// A helper method the generated mapper carries as a private member when it is used.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltInMethod {
    name: &'static str,
    parameters: Vec<Parameter>,
    return_type: Type,
    import_types: Vec<Type>,
}

impl BuiltInMethod {
    fn new(name: &'static str, source: Type, return_type: Type, import_types: Vec<Type>) -> Self {
        Self {
            name,
            parameters: vec![Parameter::source(lower_first(&source.simple_name()), source)],
            return_type,
            import_types,
        }
    }
}

impl Method for BuiltInMethod {
    fn name(&self) -> &str {
        self.name
    }

    fn declaring_type(&self) -> Option<&Type> {
        None
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn return_type(&self) -> &Type {
        &self.return_type
    }

    fn is_object_factory(&self) -> bool {
        false
    }

    fn is_lifecycle_callback(&self) -> bool {
        false
    }

    fn is_presence_check(&self) -> bool {
        false
    }

    fn is_built_in(&self) -> bool {
        true
    }

    fn extra_import_types(&self) -> Vec<Type> {
        self.import_types.clone()
    }
}

/// Built-in methods available to every mapper.
pub fn built_in_methods(types: &TypeFactory) -> Vec<BuiltInMethod> {
    let calendar = types.get_type(jdk::CALENDAR);
    let date = types.get_type(jdk::DATE);
    let gregorian = types.get_type(jdk::GREGORIAN_CALENDAR);
    vec![
        BuiltInMethod::new(
            "calendarToDate",
            calendar.clone(),
            date.clone(),
            vec![calendar.clone(), date.clone()],
        ),
        BuiltInMethod::new(
            "dateToCalendar",
            date.clone(),
            calendar.clone(),
            vec![date, calendar, gregorian],
        ),
    ]
}

pub(crate) fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Built-in type conversions.
//!
//! Conversions are inline expressions (no generated helper method). They never accept `null`:
//! the property builder adds a source null check around every converted value.

use nova_mapgen_types::{jdk, PrimitiveType, Type, TypeFactory};
use serde::Serialize;

use crate::assignment::{Assignment, TypeConversion};

/// Placeholder for the converted expression in [`Conversion::expression`].
pub const SOURCE_PLACEHOLDER: &str = "<SOURCE>";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    Boxing,
    Unboxing,
    Widening,
    ToString,
    FromString,
    EnumToString,
    StringToEnum,
    DateToString,
    StringToDate,
}

/// A conversion between two types, not yet applied to a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub kind: ConversionKind,
    pub source_type: Type,
    pub target_type: Type,
    pub expression: String,
    pub import_types: Vec<Type>,
    pub thrown_types: Vec<Type>,
}

impl Conversion {
    fn new(kind: ConversionKind, source: &Type, target: &Type, expression: String) -> Self {
        Self {
            kind,
            source_type: source.clone(),
            target_type: target.clone(),
            expression,
            import_types: Vec::new(),
            thrown_types: Vec::new(),
        }
    }

    pub fn apply(self, argument: Assignment) -> Assignment {
        Assignment::TypeConversion(TypeConversion {
            source_type: self.source_type,
            target_type: self.target_type,
            expression: self.expression,
            import_types: self.import_types,
            thrown_types: self.thrown_types,
            argument: Box::new(argument),
        })
    }
}

/// Find the built-in conversion from `source` to `target`, if any.
pub fn find_conversion(types: &TypeFactory, source: &Type, target: &Type) -> Option<Conversion> {
    if source == target {
        return None;
    }
    let source_primitive = source.primitive().or_else(|| source.unboxed());
    let target_primitive = target.primitive().or_else(|| target.unboxed());

    if let (Some(s), Some(t)) = (source_primitive, target_primitive) {
        return numeric_conversion(source, s, target, t);
    }

    if target.is_string() {
        if source_primitive.is_some() {
            return Some(Conversion::new(
                ConversionKind::ToString,
                source,
                target,
                format!("String.valueOf( {SOURCE_PLACEHOLDER} )"),
            ));
        }
        if source.is_enum() {
            return Some(Conversion::new(
                ConversionKind::EnumToString,
                source,
                target,
                format!("{SOURCE_PLACEHOLDER}.name()"),
            ));
        }
        if source.qualified_name() == jdk::DATE {
            let mut conversion = Conversion::new(
                ConversionKind::DateToString,
                source,
                target,
                format!("new SimpleDateFormat().format( {SOURCE_PLACEHOLDER} )"),
            );
            conversion.import_types.push(types.get_type(jdk::SIMPLE_DATE_FORMAT));
            return Some(conversion);
        }
    }

    if source.is_string() {
        if let Some(t) = target_primitive {
            return Some(Conversion::new(
                ConversionKind::FromString,
                source,
                target,
                parse_expression(t, target.is_primitive()),
            ));
        }
        if target.is_enum() {
            let mut conversion = Conversion::new(
                ConversionKind::StringToEnum,
                source,
                target,
                format!(
                    "Enum.valueOf( {}.class, {SOURCE_PLACEHOLDER} )",
                    target.simple_name()
                ),
            );
            conversion.import_types.extend(target.import_types());
            return Some(conversion);
        }
        if target.qualified_name() == jdk::DATE {
            let mut conversion = Conversion::new(
                ConversionKind::StringToDate,
                source,
                target,
                format!("new SimpleDateFormat().parse( {SOURCE_PLACEHOLDER} )"),
            );
            conversion.import_types.push(types.get_type(jdk::SIMPLE_DATE_FORMAT));
            conversion.thrown_types.push(types.get_type(jdk::PARSE_EXCEPTION));
            return Some(conversion);
        }
    }

    None
}

fn numeric_conversion(
    source: &Type,
    s: PrimitiveType,
    target: &Type,
    t: PrimitiveType,
) -> Option<Conversion> {
    if s == t {
        let kind = if source.is_primitive() {
            ConversionKind::Boxing
        } else {
            ConversionKind::Unboxing
        };
        return Some(Conversion::new(kind, source, target, SOURCE_PLACEHOLDER.to_string()));
    }
    if !s.widens_to(t) {
        return None;
    }
    let expression = match (source.is_primitive(), target.is_primitive()) {
        (true, true) => SOURCE_PLACEHOLDER.to_string(),
        (true, false) => format!(
            "{}.valueOf( {SOURCE_PLACEHOLDER} )",
            simple_boxed_name(t)
        ),
        (false, _) => format!("{SOURCE_PLACEHOLDER}.{}Value()", t.name()),
    };
    Some(Conversion::new(ConversionKind::Widening, source, target, expression))
}

fn parse_expression(target: PrimitiveType, primitive: bool) -> String {
    match target {
        PrimitiveType::Char => format!("{SOURCE_PLACEHOLDER}.charAt( 0 )"),
        _ => {
            let boxed = simple_boxed_name(target);
            if primitive {
                let mut name = target.name().to_string();
                if let Some(first) = name.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("{boxed}.parse{name}( {SOURCE_PLACEHOLDER} )")
            } else {
                format!("{boxed}.valueOf( {SOURCE_PLACEHOLDER} )")
            }
        }
    }
}

fn simple_boxed_name(primitive: PrimitiveType) -> &'static str {
    primitive
        .boxed_name()
        .strip_prefix("java.lang.")
        .unwrap_or(primitive.boxed_name())
}

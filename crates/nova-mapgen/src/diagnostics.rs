use nova_mapgen_types::{Diagnostic, Severity};
use thiserror::Error;

/// Every user-facing problem the generator reports.
///
/// The `Display` text is the message shown by the host compiler; [`Message::code`] is a stable
/// identifier for tooling and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Message {
    #[error("The types of @Context parameters must be unique.")]
    ContextParameterTypesNotUnique,
    #[error("Method has more than one @MappingTarget parameter.")]
    MultipleMappingTargets,
    #[error("Can't generate mapping method with no input arguments.")]
    NoSourceParameters,
    #[error("Can't generate mapping method with return type void.")]
    VoidWithoutMappingTarget,
    #[error("{0}")]
    InvalidMethodDeclaration(String),
    #[error("Can't generate mapping method from iterable type {source_type} to non-iterable type {target_type}.")]
    IterableToNonIterable {
        source_type: String,
        target_type: String,
    },
    #[error("Can't generate mapping method from non-iterable type {source_type} to iterable type {target_type}.")]
    NonIterableToIterable {
        source_type: String,
        target_type: String,
    },
    #[error("Can't generate mapping method from map type {source_type} to non-map type {target_type}.")]
    MapToNonMap {
        source_type: String,
        target_type: String,
    },
    #[error("Can't generate mapping method from non-map type {source_type} to map type {target_type}.")]
    NonMapToMap {
        source_type: String,
        target_type: String,
    },
    #[error("Unknown property \"{property}\" in result type {target_type}.")]
    UnknownTargetProperty {
        property: String,
        target_type: String,
    },
    #[error("No property named \"{path}\" exists in source parameter(s).")]
    UnknownSourceProperty { path: String },
    #[error("Several possible source properties for target property \"{property}\".")]
    AmbiguousSourceProperty { property: String },
    #[error("Target property \"{property}\" must not be mapped more than once.")]
    DuplicateTargetMapping { property: String },
    #[error("Source and constant are both defined for target property \"{property}\".")]
    SourceAndConstant { property: String },
    #[error("Can't map property \"{source_type} {source_path}\" to \"{target_type} {property}\". Consider to declare/implement a mapping method: \"{target_type} map({source_type} value)\".")]
    PropertyMappingNotFound {
        source_type: String,
        source_path: String,
        target_type: String,
        property: String,
    },
    #[error("Ambiguous mapping methods found for mapping property \"{source_path}\" to {target_type}: {candidates}.")]
    AmbiguousMappingMethods {
        source_path: String,
        target_type: String,
        candidates: String,
    },
    #[error("Can't map {position} \"{source_type}\" to \"{target_type}\". Consider to declare/implement a mapping method: \"{target_type} map({source_type} value)\".")]
    ElementMappingNotFound {
        position: &'static str,
        source_type: String,
        target_type: String,
    },
    #[error("Ambiguous mapping methods found for mapping {position} \"{source_type}\" to {target_type}: {candidates}.")]
    AmbiguousElementMapping {
        position: &'static str,
        source_type: String,
        target_type: String,
        candidates: String,
    },
    #[error("Ambiguous factory methods found for creating {target_type}: {candidates}.")]
    AmbiguousFactoryMethods {
        target_type: String,
        candidates: String,
    },
    #[error("Ambiguous presence check methods found for checking {source_type}: {candidates}.")]
    AmbiguousPresenceChecks {
        source_type: String,
        candidates: String,
    },
    #[error("The return type {target_type} is an abstract class or interface. Provide a non abstract / non interface result type or a factory method.")]
    AbstractResultType { target_type: String },
    #[error("{target_type} does not have an accessible parameterless constructor.")]
    NoDefaultConstructor { target_type: String },
    #[error("Unmapped target properties: \"{properties}\".")]
    UnmappedTargetProperties { properties: String },
    #[error("Unmapped source properties: \"{properties}\".")]
    UnmappedSourceProperties { properties: String },
    #[error("Invalid type \"{text}\": {reason}.")]
    InvalidType { text: String, reason: String },
    #[error("Annotation \"{annotation}\" is already present and it is not repeatable.")]
    AnnotationNotRepeatable { annotation: String },
    #[error("Parameter \"{element}\" must not be defined more than once for annotation \"{annotation}\".")]
    DuplicateAnnotationElement { annotation: String, element: String },
}

impl Message {
    pub fn code(&self) -> &'static str {
        match self {
            Message::ContextParameterTypesNotUnique => "MAPGEN_CONTEXT_TYPES_NOT_UNIQUE",
            Message::MultipleMappingTargets => "MAPGEN_MULTIPLE_MAPPING_TARGETS",
            Message::NoSourceParameters => "MAPGEN_NO_SOURCE_PARAMETERS",
            Message::VoidWithoutMappingTarget => "MAPGEN_VOID_WITHOUT_TARGET",
            Message::InvalidMethodDeclaration(_) => "MAPGEN_INVALID_METHOD",
            Message::IterableToNonIterable { .. } => "MAPGEN_ITERABLE_TO_NON_ITERABLE",
            Message::NonIterableToIterable { .. } => "MAPGEN_NON_ITERABLE_TO_ITERABLE",
            Message::MapToNonMap { .. } => "MAPGEN_MAP_TO_NON_MAP",
            Message::NonMapToMap { .. } => "MAPGEN_NON_MAP_TO_MAP",
            Message::UnknownTargetProperty { .. } => "MAPGEN_UNKNOWN_TARGET_PROPERTY",
            Message::UnknownSourceProperty { .. } => "MAPGEN_UNKNOWN_SOURCE_PROPERTY",
            Message::AmbiguousSourceProperty { .. } => "MAPGEN_AMBIGUOUS_SOURCE_PROPERTY",
            Message::DuplicateTargetMapping { .. } => "MAPGEN_DUPLICATE_TARGET",
            Message::SourceAndConstant { .. } => "MAPGEN_SOURCE_AND_CONSTANT",
            Message::PropertyMappingNotFound { .. } => "MAPGEN_PROPERTY_MAPPING_NOT_FOUND",
            Message::AmbiguousMappingMethods { .. } => "MAPGEN_AMBIGUOUS_MAPPING_METHODS",
            Message::ElementMappingNotFound { .. } => "MAPGEN_ELEMENT_MAPPING_NOT_FOUND",
            Message::AmbiguousElementMapping { .. } => "MAPGEN_AMBIGUOUS_ELEMENT_MAPPING",
            Message::AmbiguousFactoryMethods { .. } => "MAPGEN_AMBIGUOUS_FACTORY_METHODS",
            Message::AmbiguousPresenceChecks { .. } => "MAPGEN_AMBIGUOUS_PRESENCE_CHECKS",
            Message::AbstractResultType { .. } => "MAPGEN_ABSTRACT_RESULT_TYPE",
            Message::NoDefaultConstructor { .. } => "MAPGEN_NO_DEFAULT_CONSTRUCTOR",
            Message::UnmappedTargetProperties { .. } => "MAPGEN_UNMAPPED_TARGET_PROPERTIES",
            Message::UnmappedSourceProperties { .. } => "MAPGEN_UNMAPPED_SOURCE_PROPERTIES",
            Message::InvalidType { .. } => "MAPGEN_INVALID_TYPE",
            Message::AnnotationNotRepeatable { .. } => "MAPGEN_ANNOTATION_NOT_REPEATABLE",
            Message::DuplicateAnnotationElement { .. } => "MAPGEN_DUPLICATE_ANNOTATION_ELEMENT",
        }
    }

    pub fn diagnostic(&self, severity: Severity, element: &str) -> Diagnostic {
        let diagnostic = match severity {
            Severity::Error => Diagnostic::error(self.code(), self.to_string(), None),
            Severity::Warning | Severity::Info => {
                let mut diagnostic = Diagnostic::warning(self.code(), self.to_string(), None);
                diagnostic.severity = severity;
                diagnostic
            }
        };
        diagnostic.with_element(element)
    }

    pub fn error(&self, element: &str) -> Diagnostic {
        self.diagnostic(Severity::Error, element)
    }

    pub fn warning(&self, element: &str) -> Diagnostic {
        self.diagnostic(Severity::Warning, element)
    }
}

/// Collects diagnostics for one mapper, tagging each with the element it belongs to.
#[derive(Debug, Default)]
pub(crate) struct Reporter {
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub(crate) fn error(&mut self, element: &str, message: Message) {
        tracing::debug!(target: "nova.mapgen", element, code = message.code(), %message, "error");
        self.diagnostics.push(message.error(element));
    }

    pub(crate) fn warning(&mut self, element: &str, message: Message) {
        tracing::debug!(target: "nova.mapgen", element, code = message.code(), %message, "warning");
        self.diagnostics.push(message.warning(element));
    }

    pub(crate) fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

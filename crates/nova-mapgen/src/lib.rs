//! Mapping-method resolution and assignment generation.
//!
//! Given mapper declarations (abstract mapping methods plus the candidate methods they may call),
//! this crate decides for every target property or element:
//! - which method, conversion or property path produces the target value
//!   ([`selector`], [`MappingResolver`]);
//! - how the value is written into the target instance, possibly wrapped with null checks,
//!   default values or in-place merging of existing collections ([`assignment`]);
//! - how those decisions compose into one generated mapping method ([`BeanMappingMethod`],
//!   [`IterableMappingMethod`], [`MapMappingMethod`]).
//!
//! The output is an abstract model ([`GeneratedMapper`]) consumed by a source-emission backend;
//! rendering source text is not done here.

pub mod assignment;
mod bean;
mod builtin;
mod context;
pub mod conversion;
mod diagnostics;
mod iterable;
mod map;
mod mapper;
mod method;
mod processor;
mod resolver;
pub mod selector;
pub mod simulate;

pub use assignment::{
    Assignment, AssignmentType, ExistingInstanceMergeWrapper, MethodProvenance, MethodReference,
    NullCheckWrapper, PresenceCheck, SetterWrapper, SourceRhs, TypeConversion,
};
pub use bean::{BeanMappingMethod, PropertyMapping};
pub use builtin::{built_in_methods, BuiltInMethod};
pub use context::MappingContext;
pub use diagnostics::Message;
pub use iterable::IterableMappingMethod;
pub use map::MapMappingMethod;
pub use mapper::{AnnotateWith, AnnotationElement, MapperDecl, MappingMethod};
pub use method::{
    ElementMappingOptions, LifecycleTiming, Method, MethodDeclError, MethodFamily,
    MethodOptions, Parameter, ParameterRole, PropertyMappingOptions, SourceMethod,
    SourceMethodBuilder,
};
pub use processor::{GeneratedMapper, MapperProcessor};
pub use resolver::{MappingResolver, ResolutionError};

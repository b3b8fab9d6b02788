//! Executable reference semantics for generated mapping code.
//!
//! The generator only produces models; this module evaluates those models against a tiny value
//! universe where lists and maps have identity. It exists to check what the generated Java does
//! to existing target instances (in-place merge, cleared targets, `null` handling) without a
//! Java toolchain.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use nova_mapgen_config::NullValueMappingStrategy;
use nova_mapgen_types::Type;
use thiserror::Error;

use crate::assignment::{Assignment, ExistingInstanceMergeWrapper, SetterWrapper};
use crate::iterable::IterableMappingMethod;
use crate::map::MapMappingMethod;

/// A runtime value. Lists and maps are reference types: clones share the same instance.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Str(String),
    Int(i64),
    List(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<IndexMap<String, Value>>>),
}

impl Value {
    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Reference equality for lists and maps, value equality otherwise.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::List(_) | Value::Map(_), _) | (_, Value::List(_) | Value::Map(_)) => false,
            (a, b) => a == b,
        }
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.borrow().len()),
            Value::Map(entries) => Some(entries.borrow().len()),
            _ => None,
        }
    }

    /// `clear()` on a list or map.
    pub fn clear(&self) -> Result<(), SimulationError> {
        match self {
            Value::List(items) => items.borrow_mut().clear(),
            Value::Map(entries) => entries.borrow_mut().clear(),
            Value::Null => return Err(SimulationError::NullDereference),
            other => return Err(SimulationError::NotAContainer(other.clone())),
        }
        Ok(())
    }

    /// `addAll` / `putAll` from `source` into this instance.
    pub fn extend_from(&self, source: &Value) -> Result<(), SimulationError> {
        match (self, source) {
            (Value::List(items), Value::List(other)) => {
                let copied: Vec<Value> = other.borrow().clone();
                items.borrow_mut().extend(copied);
            }
            (Value::Map(entries), Value::Map(other)) => {
                let copied: Vec<(String, Value)> = other
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                entries.borrow_mut().extend(copied);
            }
            (Value::Null, _) | (_, Value::Null) => return Err(SimulationError::NullDereference),
            (_, other) => return Err(SimulationError::NotAContainer(other.clone())),
        }
        Ok(())
    }

    /// A new instance with the same elements (`new ArrayList<>( source )`).
    pub fn shallow_copy(&self) -> Value {
        match self {
            Value::List(items) => Value::list(items.borrow().iter().cloned()),
            Value::Map(entries) => Value::Map(Rc::new(RefCell::new(entries.borrow().clone()))),
            other => other.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("null dereference")]
    NullDereference,
    #[error("expected a list or map, found {0:?}")]
    NotAContainer(Value),
    #[error("cannot convert {value:?} to {target}")]
    Conversion { value: Value, target: String },
    #[error("method `{0}` cannot be simulated")]
    UnsupportedMethod(String),
    #[error("no default value for {0}")]
    NoDefault(String),
}

type MethodImpl = Box<dyn Fn(&Value) -> Result<Value, SimulationError>>;

/// Evaluates generated models. Mapping methods referenced by assignments are looked up by name
/// among the registered implementations; an unregistered method cannot be simulated.
#[derive(Default)]
pub struct Simulator {
    methods: IndexMap<String, MethodImpl>,
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the behavior of the method called `name`. It receives the (possibly `null`)
    /// argument exactly as the generated code would pass it.
    pub fn with_method(
        mut self,
        name: impl Into<String>,
        implementation: impl Fn(&Value) -> Result<Value, SimulationError> + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Box::new(implementation));
        self
    }

    /// Evaluate the value an assignment produces for `source`, ignoring how it is written.
    pub fn evaluate(&self, assignment: &Assignment, source: &Value) -> Result<Value, SimulationError> {
        match assignment {
            Assignment::Direct(rhs) if rhs.is_constant => Ok(literal(&rhs.source_reference)),
            Assignment::Direct(_) => Ok(source.clone()),
            Assignment::TypeConversion(conversion) => {
                let value = self.evaluate(&conversion.argument, source)?;
                convert(value, &conversion.target_type)
            }
            Assignment::MethodReference(method) => {
                let implementation = self
                    .methods
                    .get(&method.name)
                    .ok_or_else(|| SimulationError::UnsupportedMethod(method.name.clone()))?;
                let argument = match method.argument.as_deref() {
                    Some(argument) => self.evaluate(argument, source)?,
                    None => source.clone(),
                };
                implementation(&argument)
            }
            wrapper => match wrapper.decorated() {
                Some(inner) => self.evaluate(inner, source),
                None => Ok(source.clone()),
            },
        }
    }

    /// Run a property assignment of a generated bean mapping method. `target` is the property
    /// slot of the target bean; `source` the value read from the source.
    pub fn apply_property_assignment(
        &self,
        assignment: &Assignment,
        target: &mut Value,
        source: &Value,
    ) -> Result<(), SimulationError> {
        match assignment {
            Assignment::ExistingInstanceMerge(wrapper) => self.merge_existing(wrapper, target, source),
            Assignment::NullCheck(wrapper) => {
                if !source.is_null() {
                    *target = self.produce(wrapper.decorated(), source)?;
                }
                Ok(())
            }
            Assignment::Setter(wrapper) => self.apply_setter(wrapper, target, source),
            plain => {
                *target = self.produce(plain, source)?;
                Ok(())
            }
        }
    }

    fn merge_existing(
        &self,
        wrapper: &ExistingInstanceMergeWrapper,
        target: &mut Value,
        source: &Value,
    ) -> Result<(), SimulationError> {
        if target.is_null() {
            if !source.is_null() {
                *target = self.produce(wrapper.decorated(), source)?;
            }
            return Ok(());
        }
        if !source.is_null() {
            let value = self.evaluate(wrapper.decorated(), source)?;
            target.clear()?;
            return target.extend_from(&value);
        }
        if wrapper.is_include_else_branch() {
            *target = if wrapper.is_map_null_to_default() {
                empty_instance(wrapper.target_type())?
            } else {
                Value::Null
            };
        }
        Ok(())
    }

    fn apply_setter(
        &self,
        wrapper: &SetterWrapper,
        target: &mut Value,
        source: &Value,
    ) -> Result<(), SimulationError> {
        if !wrapper.is_include_source_null_check() || !source.is_null() {
            *target = self.produce(wrapper.decorated(), source)?;
            return Ok(());
        }
        if let Some(default) = wrapper.default_value() {
            *target = self.evaluate(default, &Value::Null)?;
        } else if wrapper.is_set_explicitly_to_null() {
            *target = Value::Null;
        } else if wrapper.is_set_explicitly_to_default() {
            *target = default_value(wrapper.target_type())?;
        }
        Ok(())
    }

    /// The value written by a setter: direct containers are copied into a new instance.
    fn produce(&self, assignment: &Assignment, source: &Value) -> Result<Value, SimulationError> {
        let value = self.evaluate(assignment, source)?;
        if assignment.innermost().is_direct() {
            Ok(value.shallow_copy())
        } else {
            Ok(value)
        }
    }

    /// Run a generated iterable mapping method. `existing` is the mapping target of update
    /// methods.
    pub fn apply_iterable_method(
        &self,
        method: &IterableMappingMethod,
        source: &Value,
        existing: Option<&Value>,
    ) -> Result<Value, SimulationError> {
        let target = match (method.is_update, existing) {
            (true, Some(existing)) => Some(existing),
            (true, None) => return Err(SimulationError::NullDereference),
            (false, _) => None,
        };
        if source.is_null() {
            return null_source_result(method.null_value_mapping_strategy, target, Value::list([]));
        }
        let Value::List(items) = source else {
            return Err(SimulationError::NotAContainer(source.clone()));
        };
        let mapped = items
            .borrow()
            .iter()
            .map(|item| self.evaluate(&method.element_assignment, item))
            .collect::<Result<Vec<_>, _>>()?;
        fill(target, Value::list(mapped))
    }

    /// Run a generated map mapping method. `existing` is the mapping target of update methods.
    pub fn apply_map_method(
        &self,
        method: &MapMappingMethod,
        source: &Value,
        existing: Option<&Value>,
    ) -> Result<Value, SimulationError> {
        let target = match (method.is_update, existing) {
            (true, Some(existing)) => Some(existing),
            (true, None) => return Err(SimulationError::NullDereference),
            (false, _) => None,
        };
        if source.is_null() {
            let empty: [(String, Value); 0] = [];
            return null_source_result(method.null_value_mapping_strategy, target, Value::map(empty));
        }
        let Value::Map(entries) = source else {
            return Err(SimulationError::NotAContainer(source.clone()));
        };
        let mut mapped = IndexMap::new();
        for (key, value) in entries.borrow().iter() {
            let key = match self.evaluate(&method.key_assignment, &Value::Str(key.clone()))? {
                Value::Str(key) => key,
                Value::Int(key) => key.to_string(),
                other => return Err(SimulationError::NotAContainer(other)),
            };
            mapped.insert(key, self.evaluate(&method.value_assignment, value)?);
        }
        fill(target, Value::Map(Rc::new(RefCell::new(mapped))))
    }
}

/// [`Simulator::evaluate`] without any method implementations.
pub fn evaluate(assignment: &Assignment, source: &Value) -> Result<Value, SimulationError> {
    Simulator::new().evaluate(assignment, source)
}

/// [`Simulator::apply_property_assignment`] without any method implementations.
pub fn apply_property_assignment(
    assignment: &Assignment,
    target: &mut Value,
    source: &Value,
) -> Result<(), SimulationError> {
    Simulator::new().apply_property_assignment(assignment, target, source)
}

/// [`Simulator::apply_iterable_method`] without any method implementations.
pub fn apply_iterable_method(
    method: &IterableMappingMethod,
    source: &Value,
    existing: Option<&Value>,
) -> Result<Value, SimulationError> {
    Simulator::new().apply_iterable_method(method, source, existing)
}

/// [`Simulator::apply_map_method`] without any method implementations.
pub fn apply_map_method(
    method: &MapMappingMethod,
    source: &Value,
    existing: Option<&Value>,
) -> Result<Value, SimulationError> {
    Simulator::new().apply_map_method(method, source, existing)
}

fn null_source_result(
    strategy: NullValueMappingStrategy,
    target: Option<&Value>,
    empty: Value,
) -> Result<Value, SimulationError> {
    match (strategy, target) {
        (NullValueMappingStrategy::ReturnNull, _) => Ok(Value::Null),
        (NullValueMappingStrategy::ReturnDefault, Some(target)) => {
            target.clear()?;
            Ok(target.clone())
        }
        (NullValueMappingStrategy::ReturnDefault, None) => Ok(empty),
    }
}

fn fill(target: Option<&Value>, mapped: Value) -> Result<Value, SimulationError> {
    match target {
        Some(target) => {
            target.clear()?;
            target.extend_from(&mapped)?;
            Ok(target.clone())
        }
        None => Ok(mapped),
    }
}

fn empty_instance(ty: &Type) -> Result<Value, SimulationError> {
    if ty.is_map() {
        let empty: [(String, Value); 0] = [];
        Ok(Value::map(empty))
    } else if ty.is_iterable() {
        Ok(Value::list([]))
    } else {
        Err(SimulationError::NoDefault(ty.to_string()))
    }
}

fn default_value(ty: &Type) -> Result<Value, SimulationError> {
    if ty.is_string() {
        return Ok(Value::str(""));
    }
    let numeric = ty.primitive().or_else(|| ty.unboxed());
    match numeric {
        Some(p) if p.name() != "boolean" => Ok(Value::Int(0)),
        _ => empty_instance(ty),
    }
}

fn convert(value: Value, target: &Type) -> Result<Value, SimulationError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Int(n) if target.is_string() => Ok(Value::Str(n.to_string())),
        Value::Str(text) if target.is_primitive() || target.unboxed().is_some() => {
            text.trim().parse().map(Value::Int).map_err(|_| SimulationError::Conversion {
                value: Value::Str(text.clone()),
                target: target.to_string(),
            })
        }
        other => Ok(other),
    }
}

fn literal(reference: &str) -> Value {
    let trimmed = reference.trim();
    if let Some(text) = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return Value::Str(text.replace("\\\"", "\"").replace("\\\\", "\\"));
    }
    match trimmed.parse() {
        Ok(n) => Value::Int(n),
        Err(_) => Value::Str(trimmed.to_string()),
    }
}

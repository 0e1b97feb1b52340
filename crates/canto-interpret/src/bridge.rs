//! External-object bridge: resolving names against host-environment objects.
//!
//! A bridge object exposes one uniform operation: resolve a member by name
//! and argument count. Instance fields and zero-argument accessors bind by
//! plain name; methods overloaded by argument count are distinct bindings;
//! nested objects returned from a member are resolvable by the same rules,
//! recursively. Host collections must cross the boundary as the engine's own
//! [`Value::List`] / [`Value::Table`] primitives, never as opaque handles.
//! Static members are modeled by bridge objects that carry no instance state.

use std::collections::HashMap;
use std::sync::Arc;

use canto_core::value::Value;
use canto_core::Result;

use crate::error::bridge_error;

/// The result of a member lookup: a converted value, or a nested object to
/// keep resolving into.
pub enum Extern {
    Value(Value),
    Object(Arc<dyn ExternalObject>),
}

pub trait ExternalObject: Send + Sync {
    fn type_name(&self) -> &str;

    /// Resolve a member by name and argument count. A zero-argument and a
    /// one-argument member of the same name are distinct bindings.
    fn member(&self, name: &str, args: &[Arc<Value>]) -> Result<Extern>;

    /// The value form of the object itself, used when the object is
    /// referenced directly rather than through a member.
    fn to_value(&self) -> Value {
        Value::Text(self.type_name().to_string())
    }
}

/// Convert a host sequence into the engine's ordered list primitive.
pub fn sequence_value<I>(items: I) -> Value
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Value::List(items.into_iter().map(Into::into).collect())
}

/// Convert a host key/value mapping into the engine's table primitive,
/// preserving iteration order.
pub fn mapping_value<I>(entries: I) -> Value
where
    I: IntoIterator<Item = (String, Value)>,
{
    Value::Table(entries.into_iter().collect())
}

type MemberFn = Arc<dyn Fn(&[Arc<Value>]) -> Result<Extern> + Send + Sync>;

/// A ready-made bridge implementation for hosts that want to expose plain
/// records: named fields, nested objects, and methods keyed by name plus
/// argument count.
#[derive(Default)]
pub struct NativeRecord {
    type_name: String,
    fields: Vec<(String, Value)>,
    objects: Vec<(String, Arc<dyn ExternalObject>)>,
    methods: HashMap<(String, usize), MemberFn>,
}

impl NativeRecord {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn object(mut self, name: impl Into<String>, object: Arc<dyn ExternalObject>) -> Self {
        self.objects.push((name.into(), object));
        self
    }

    pub fn method<F>(mut self, name: impl Into<String>, argc: usize, f: F) -> Self
    where
        F: Fn(&[Arc<Value>]) -> Result<Extern> + Send + Sync + 'static,
    {
        self.methods.insert((name.into(), argc), Arc::new(f));
        self
    }
}

impl ExternalObject for NativeRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn member(&self, name: &str, args: &[Arc<Value>]) -> Result<Extern> {
        if args.is_empty() {
            if let Some((_, value)) = self.fields.iter().find(|(n, _)| n == name) {
                return Ok(Extern::Value(value.clone()));
            }
            if let Some((_, object)) = self.objects.iter().find(|(n, _)| n == name) {
                return Ok(Extern::Object(object.clone()));
            }
        }
        if let Some(f) = self.methods.get(&(name.to_string(), args.len())) {
            return f(args);
        }
        Err(bridge_error(format!(
            "no member `{}` with {} argument(s) on `{}`",
            name,
            args.len(),
            self.type_name
        )))
    }
}

//! Name bindings selected by resolution.
//!
//! Late binding is name-based and dynamic: a resolved name may denote a
//! source definition, an already-evaluated argument or kept value, a member
//! chain on a host bridge object, or a `default`-clause fallback. All of
//! these evaluate uniformly through the [`Bind`] trait; nothing downstream
//! inspects the variant.

use std::sync::Arc;

use canto_core::definition::{Definition, Durability};
use canto_core::ident::Ident;
use canto_core::value::Value;
use canto_core::Result;
use tracing::debug;

use crate::bridge::{Extern, ExternalObject};
use crate::context::Context;
use crate::error::bridge_error;
use crate::instantiate::{Flow, Instantiation};

pub trait Bind: Send + Sync {
    /// Short human-readable description, for tracing.
    fn describe(&self) -> String;

    /// Produce the bound value (or a redirect) inside `ctx`.
    fn evaluate(&self, ctx: &mut Context, args: &[Arc<Value>]) -> Result<Flow>;
}

/// An already-computed value: a keep hit or an actual-argument binding.
/// Evaluation returns the identical shared allocation, never a re-computation.
pub struct KeptBinding {
    value: Arc<Value>,
}

impl KeptBinding {
    pub fn new(value: Arc<Value>) -> Self {
        Self { value }
    }
}

impl Bind for KeptBinding {
    fn describe(&self) -> String {
        "kept value".to_string()
    }

    fn evaluate(&self, _ctx: &mut Context, _args: &[Arc<Value>]) -> Result<Flow> {
        Ok(Flow::Value(self.value.clone()))
    }
}

/// Render the bound definition, then commit the finished result to the
/// caller frame's keep under the name resolution was asked for. Keying by
/// the reference name (not the definition's simple name) keeps a qualified
/// and a plain spelling from ever aliasing in the cache.
fn render_and_keep(
    name: &Ident,
    definition: &Arc<Definition>,
    ctx: &mut Context,
    args: &[Arc<Value>],
) -> Result<Flow> {
    let flow = Instantiation::with_values(definition.clone(), args.to_vec()).render(ctx)?;
    if let Flow::Value(value) = &flow {
        if args.is_empty() && definition.durability() == Durability::Static {
            ctx.keep(name.clone(), value.clone());
        }
    }
    Ok(flow)
}

/// A source-defined declaration found in the scope chain or the registry.
pub struct SourceBinding {
    name: Ident,
    definition: Arc<Definition>,
}

impl SourceBinding {
    pub fn new(name: Ident, definition: Arc<Definition>) -> Self {
        Self { name, definition }
    }
}

impl Bind for SourceBinding {
    fn describe(&self) -> String {
        format!("definition `{}`", self.definition.qualified_name())
    }

    fn evaluate(&self, ctx: &mut Context, args: &[Arc<Value>]) -> Result<Flow> {
        render_and_keep(&self.name, &self.definition, ctx, args)
    }
}

/// A `default`-flagged declaration, bound only after ordinary search failed.
pub struct DefaultBinding {
    name: Ident,
    definition: Arc<Definition>,
}

impl DefaultBinding {
    pub fn new(name: Ident, definition: Arc<Definition>) -> Self {
        Self { name, definition }
    }
}

impl Bind for DefaultBinding {
    fn describe(&self) -> String {
        format!("default clause `{}`", self.definition.qualified_name())
    }

    fn evaluate(&self, ctx: &mut Context, args: &[Arc<Value>]) -> Result<Flow> {
        debug!(
            "falling back to default clause `{}`",
            self.definition.qualified_name()
        );
        render_and_keep(&self.name, &self.definition, ctx, args)
    }
}

/// A member chain on a host bridge object. Intermediate segments resolve
/// with zero arguments; the call-site arguments apply to the final segment.
pub struct ExternalBinding {
    object: Arc<dyn ExternalObject>,
    path: Vec<Ident>,
}

impl ExternalBinding {
    pub fn new(object: Arc<dyn ExternalObject>, path: Vec<Ident>) -> Self {
        Self { object, path }
    }
}

impl Bind for ExternalBinding {
    fn describe(&self) -> String {
        format!("external object `{}`", self.object.type_name())
    }

    fn evaluate(&self, _ctx: &mut Context, args: &[Arc<Value>]) -> Result<Flow> {
        if self.path.is_empty() {
            return Ok(Flow::Value(Arc::new(self.object.to_value())));
        }
        let mut current = self.object.clone();
        for (i, segment) in self.path.iter().enumerate() {
            let last = i + 1 == self.path.len();
            let call_args: &[Arc<Value>] = if last { args } else { &[] };
            match current.member(segment.as_str(), call_args)? {
                Extern::Value(value) => {
                    if last {
                        return Ok(Flow::Value(Arc::new(value)));
                    }
                    return Err(bridge_error(format!(
                        "member `{}` of `{}` is a plain value, not an object",
                        segment,
                        current.type_name()
                    )));
                }
                Extern::Object(object) => {
                    if last {
                        return Ok(Flow::Value(Arc::new(object.to_value())));
                    }
                    current = object;
                }
            }
        }
        Err(bridge_error("empty member path"))
    }
}

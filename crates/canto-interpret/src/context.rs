//! The resolution environment: a stack of active frames over one registry.
//!
//! One context exists per top-level instantiation and is never shared across
//! concurrent renders; the registry it reads is immutable after load. Each
//! frame binds the definition being instantiated, its actual arguments, and
//! the keep: a cache guaranteeing resolve-once-per-frame semantics.

use std::collections::HashMap;
use std::sync::Arc;

use canto_core::definition::Definition;
use canto_core::ident::{CantoPath, Ident};
use canto_core::observe::{Debugger, NoopDebugger};
use canto_core::registry::Core;
use canto_core::value::Value;
use canto_core::{bail, Result};
use tracing::trace;

use crate::binding::{Bind, DefaultBinding, ExternalBinding, KeptBinding, SourceBinding};
use crate::bridge::ExternalObject;
use crate::error::resolution_error;

/// Circular instantiation guard; a cyclic page reference must surface as an
/// error, not a stack overflow.
pub const MAX_DEPTH: usize = 256;

pub struct Frame {
    definition: Arc<Definition>,
    args: Vec<(Ident, Arc<Value>)>,
    keep: HashMap<Ident, Arc<Value>>,
}

impl Frame {
    pub fn arg(&self, name: &Ident) -> Option<Arc<Value>> {
        self.args
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn kept(&self, name: &Ident) -> Option<Arc<Value>> {
        self.keep.get(name).cloned()
    }
}

pub struct Context {
    core: Arc<Core>,
    debugger: Arc<dyn Debugger>,
    externals: Vec<(Ident, Arc<dyn ExternalObject>)>,
    frames: Vec<Frame>,
}

impl Context {
    pub fn new(core: Arc<Core>) -> Self {
        Self::with_debugger(core, Arc::new(NoopDebugger))
    }

    pub fn with_debugger(core: Arc<Core>, debugger: Arc<dyn Debugger>) -> Self {
        Self {
            core,
            debugger,
            externals: vec![],
            frames: vec![],
        }
    }

    /// Attach a host bridge object under a name visible to resolution.
    pub fn with_external(
        mut self,
        name: impl Into<Ident>,
        object: Arc<dyn ExternalObject>,
    ) -> Self {
        self.externals.push((name.into(), object));
        self
    }

    pub fn core(&self) -> &Arc<Core> {
        &self.core
    }

    pub fn debugger(&self) -> &dyn Debugger {
        self.debugger.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The qualified name of the active scope, for error reporting.
    pub fn scope_name(&self) -> String {
        self.frames
            .last()
            .map(|f| f.definition.qualified_name().to_string())
            .unwrap_or_else(|| "<root>".to_string())
    }

    pub fn push_frame(
        &mut self,
        definition: Arc<Definition>,
        args: Vec<(Ident, Arc<Value>)>,
    ) -> Result<()> {
        if self.frames.len() >= MAX_DEPTH {
            bail!(
                "instantiation depth exceeded {} at `{}`; circular reference?",
                MAX_DEPTH,
                definition.qualified_name()
            );
        }
        trace!(
            "push frame `{}` depth={}",
            definition.qualified_name(),
            self.frames.len() + 1
        );
        self.frames.push(Frame {
            definition,
            args,
            keep: HashMap::new(),
        });
        Ok(())
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        let frame = self.frames.pop();
        if let Some(f) = &frame {
            trace!(
                "pop frame `{}` depth={}",
                f.definition.qualified_name(),
                self.frames.len()
            );
        }
        frame
    }

    /// Cache a resolved value under `name` in the active frame's keep.
    /// Committed only on normal completion; a redirected or failed frame is
    /// popped without ever reaching this.
    pub fn keep(&mut self, name: Ident, value: Arc<Value>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.keep.insert(name, value);
        }
    }

    pub fn keep_lookup(&self, name: &Ident) -> Option<Arc<Value>> {
        self.frames.last().and_then(|f| f.kept(name))
    }

    /// Bind an additional argument in the active frame; used for evaluated
    /// parameter defaults.
    pub fn bind_arg(&mut self, name: Ident, value: Arc<Value>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.args.push((name, value));
        }
    }

    fn external(&self, name: &Ident) -> Option<Arc<dyn ExternalObject>> {
        self.externals
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| o.clone())
    }

    /// Resolve `name` with `argc` call-site arguments to a binding.
    ///
    /// Search order: the active frame's keep, then its argument bindings,
    /// then the active definition's children and its owner chain outward
    /// (first match wins, incompatible arity is not a match), then host
    /// bridge objects, then the registry by qualified name. `default`-flagged
    /// declarations are tried only after all of that fails, innermost first.
    pub fn resolve(&self, name: &Ident, argc: usize) -> Result<Box<dyn Bind>> {
        self.debugger.requested(name.as_str());
        if let Some(frame) = self.frames.last() {
            if argc == 0 {
                if let Some(value) = frame.kept(name) {
                    trace!("`{}` served from keep", name);
                    self.debugger.retrieved(name.as_str(), &value);
                    return Ok(Box::new(KeptBinding::new(value)));
                }
                if let Some(value) = frame.arg(name) {
                    return Ok(Box::new(KeptBinding::new(value)));
                }
            }
            let mut scope = Some(frame.definition.clone());
            while let Some(def) = scope {
                if let Some(found) = def.lookup_child(name, argc) {
                    return Ok(Box::new(SourceBinding::new(name.clone(), found)));
                }
                scope = def.owner();
            }
        }
        let path = CantoPath::from_qualified(name.as_str());
        if let Some(first) = path.segments.first() {
            if let Some(object) = self.external(first) {
                return Ok(Box::new(ExternalBinding::new(
                    object,
                    path.segments[1..].to_vec(),
                )));
            }
        }
        if let Some(found) = self.core.lookup_qualified_with_arity(&path, argc) {
            return Ok(Box::new(SourceBinding::new(name.clone(), found)));
        }
        if let Some(frame) = self.frames.last() {
            let mut scope = Some(frame.definition.clone());
            while let Some(def) = scope {
                if let Some(found) = def.lookup_default_child(name) {
                    trace!("`{}` bound through default clause in `{}`", name, def.name());
                    return Ok(Box::new(DefaultBinding::new(name.clone(), found)));
                }
                scope = def.owner();
            }
        }
        Err(resolution_error(name.as_str(), self.scope_name()))
    }

    /// Notify the debugger that this context is finished.
    pub fn close(&self) {
        self.debugger.closed();
    }
}

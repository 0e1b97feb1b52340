//! Instantiation: rendering one definition to text within a context.
//!
//! `render` pushes a frame binding the target and its evaluated arguments
//! and evaluates the contents (literal text passes through, references
//! resolve and instantiate recursively, blocks concatenate in child order);
//! on normal completion the selected binding commits the result to the
//! caller frame's keep under the name the reference used. A nested
//! redirect is never absorbed mid-chain: the frame is popped, partial text
//! discarded, and the signal propagated until the initiating caller
//! substitutes the new target.

use std::sync::Arc;

use canto_core::definition::Definition;
use canto_core::ident::{CantoPath, Ident};
use canto_core::node::{Node, NodeKind};
use canto_core::observe::Debugger;
use canto_core::registry::Core;
use canto_core::value::Value;
use canto_core::visit::{traverse, IncompleteCheck};
use canto_core::Result;
use tracing::{debug, info, trace};

use crate::context::Context;
use crate::error::abstract_error;
use crate::redirect::Redirection;

/// The three-way outcome of evaluation: a value on success, or a redirect;
/// failures travel as errors. Every call site handles all three.
#[derive(Debug)]
pub enum Flow {
    Value(Arc<Value>),
    Redirect(Redirection),
}

impl Flow {
    /// The rendered text of a successful evaluation.
    pub fn into_text(self) -> Option<String> {
        match self {
            Flow::Value(value) => Some(value.render()),
            Flow::Redirect(_) => None,
        }
    }
}

/// A request to render one definition, with already-evaluated actual
/// arguments, to a value within a context. Stateless beyond its target and
/// arguments; discarded after producing a result.
pub struct Instantiation {
    target: Arc<Definition>,
    args: Vec<Arc<Value>>,
}

impl Instantiation {
    pub fn new(target: Arc<Definition>) -> Self {
        Self {
            target,
            args: vec![],
        }
    }

    pub fn with_values(target: Arc<Definition>, args: Vec<Arc<Value>>) -> Self {
        Self { target, args }
    }

    pub fn target(&self) -> &Arc<Definition> {
        &self.target
    }

    /// True when the target cannot be concretely rendered with the supplied
    /// arguments: a required parameter is unbound, or the body is a bare
    /// abstract marker.
    pub fn is_abstract(&self, _ctx: &Context) -> bool {
        self.target.is_abstract_for(self.args.len())
    }

    pub fn render(&self, ctx: &mut Context) -> Result<Flow> {
        let name = self.target.name().clone();
        if self.is_abstract(ctx) {
            debug!("`{}` is abstract; no output", self.target.qualified_name());
            return Err(abstract_error(self.target.qualified_name().to_string()));
        }

        let mut bound: Vec<(Ident, Arc<Value>)> = vec![];
        let mut pending_defaults: Vec<(Ident, Arc<Node>)> = vec![];
        if let Some(list) = self.target.matching_param_list(self.args.len()) {
            for (i, param) in list.params.iter().enumerate() {
                if let Some(value) = self.args.get(i) {
                    bound.push((param.name.clone(), value.clone()));
                } else if let Some(default) = &param.default {
                    pending_defaults.push((param.name.clone(), default.clone()));
                }
            }
        }

        ctx.push_frame(self.target.clone(), bound)?;
        let result = self.eval_body(ctx, pending_defaults);
        ctx.pop_frame();

        match result? {
            Flow::Value(value) => {
                ctx.debugger().constructed(name.as_str(), &value);
                Ok(Flow::Value(value))
            }
            Flow::Redirect(redirection) => {
                trace!(
                    "`{}` unwound by {}; partial output discarded",
                    self.target.qualified_name(),
                    redirection
                );
                Ok(Flow::Redirect(redirection))
            }
        }
    }

    /// Render behind the completeness gate: the incomplete-definition pass
    /// runs over the contents first, and an abstract marker anywhere vetoes
    /// rendering with the same "no output" outcome as an abstract target.
    pub fn render_checked(&self, ctx: &mut Context) -> Result<Flow> {
        let mut check = IncompleteCheck::new();
        traverse(self.target.contents(), &mut check);
        if check.found_abstract() {
            debug!(
                "`{}` contains an abstract marker; output vetoed",
                self.target.qualified_name()
            );
            return Err(abstract_error(self.target.qualified_name().to_string()));
        }
        self.render(ctx)
    }

    fn eval_body(
        &self,
        ctx: &mut Context,
        pending_defaults: Vec<(Ident, Arc<Node>)>,
    ) -> Result<Flow> {
        // Defaults are evaluated inside the new frame so they may reference
        // parameters bound before them.
        for (name, node) in pending_defaults {
            match eval_node(&node, ctx)? {
                Flow::Value(value) => ctx.bind_arg(name, value),
                Flow::Redirect(redirection) => return Ok(Flow::Redirect(redirection)),
            }
        }
        eval_node(self.target.contents(), ctx)
    }
}

/// Evaluate one content node in the active frame.
pub(crate) fn eval_node(node: &Arc<Node>, ctx: &mut Context) -> Result<Flow> {
    match node.kind() {
        NodeKind::Text(s) => Ok(Flow::Value(Arc::new(Value::Text(s.clone())))),
        NodeKind::Literal(value) => Ok(Flow::Value(Arc::new(value.clone()))),
        NodeKind::NullValue { is_abstract } => {
            if *is_abstract {
                Err(abstract_error(ctx.scope_name()))
            } else {
                Ok(Flow::Value(Arc::new(Value::Nothing)))
            }
        }
        NodeKind::Redirect(location) => Ok(Flow::Redirect(Redirection::to(location.clone()))),
        NodeKind::Block => {
            let mut out = String::new();
            for child in node.children() {
                match eval_node(child, ctx)? {
                    Flow::Value(value) => out.push_str(&value.render()),
                    Flow::Redirect(redirection) => return Ok(Flow::Redirect(redirection)),
                }
            }
            Ok(Flow::Value(Arc::new(Value::Text(out))))
        }
        NodeKind::Reference(name_ref) => {
            // Arguments evaluate in the caller's frame, in call order.
            let mut args = Vec::with_capacity(node.arg_count());
            for child in node.children() {
                match eval_node(child, ctx)? {
                    Flow::Value(value) => args.push(value),
                    Flow::Redirect(redirection) => return Ok(Flow::Redirect(redirection)),
                }
            }
            let binding = ctx.resolve(&name_ref.name, args.len())?;
            trace!("`{}` resolved to {}", name_ref.name, binding.describe());
            binding.evaluate(ctx, &args)
        }
    }
}

/// Outcome of one top-level page render, as seen by the initiating caller.
#[derive(Debug)]
pub enum PageOutcome {
    Rendered(String),
    /// The page redirected; its own output is suppressed and the caller
    /// should render `to` instead.
    Redirected {
        from: CantoPath,
        to: CantoPath,
    },
    /// Abstract or unresolved: omit this page, don't halt the run.
    Skipped {
        page: CantoPath,
        reason: String,
    },
}

/// The initiating-caller contract: render one page over a fresh context,
/// catching redirects and converting the skip conditions.
pub fn render_page(
    core: &Arc<Core>,
    page: &Arc<Definition>,
    debugger: Arc<dyn Debugger>,
) -> Result<PageOutcome> {
    let mut ctx = Context::with_debugger(core.clone(), debugger);
    let outcome = render_page_in(&mut ctx, page);
    ctx.close();
    outcome
}

/// Render one page in a caller-prepared context (e.g. one carrying bridge
/// objects). The caller that starts the top-level instantiation is the only
/// one required to catch the redirect.
pub fn render_page_in(ctx: &mut Context, page: &Arc<Definition>) -> Result<PageOutcome> {
    let from = page.qualified_name();
    let instantiation = Instantiation::new(page.clone());
    match instantiation.render_checked(ctx) {
        Ok(Flow::Value(value)) => Ok(PageOutcome::Rendered(value.render())),
        Ok(Flow::Redirect(redirection)) => {
            info!(
                "page `{}` redirects to `{}`; original output suppressed",
                from, redirection.location
            );
            Ok(PageOutcome::Redirected {
                from,
                to: redirection.location,
            })
        }
        Err(err) if err.is_skippable() => {
            debug!("page `{}` skipped: {}", from, err);
            Ok(PageOutcome::Skipped {
                page: from,
                reason: err.to_string(),
            })
        }
        Err(err) => Err(err),
    }
}

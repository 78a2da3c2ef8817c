//! The prepass traversal engine.
//!
//! Walks a [`VNode`] tree once, ahead of the synchronous render pass: every
//! component that needs asynchronous data suspends, is awaited, and is
//! retried until the whole tree renders without suspending. Work runs on one
//! logical thread; "concurrency" is interleaved awaits, never parallelism,
//! and there is no cancellation: a branch that suspends forever stalls only
//! itself and the aggregates awaiting it.
//!
//! ## Example
//!
//! ```
//! use ssr_prepass::{ComponentType, ElementNode, Props, RenderResult, VNode, prepass};
//!
//! # async fn run() -> Result<(), ssr_prepass::PrepassError> {
//! let app = ComponentType::function("App", |_props, _context| {
//! 	RenderResult::ready(ElementNode::new("div").child("ready"))
//! });
//! let root = VNode::component(app, Props::new());
//! prepass(&root).await?;
//! # Ok(())
//! # }
//! ```

use futures_util::future::{LocalBoxFuture, try_join_all};
use tracing::{debug, trace};

use crate::binder::Binder;
use crate::component::ClassInstance;
use crate::context::Context;
use crate::error::{BoxError, PrepassError};
use crate::hooks::{self, EffectSuppression};
use crate::node::{ComponentNode, VNode, flatten_into};
use crate::render::{RenderResult, Rendered};

/// Settlement marker returned by [`traverse`].
///
/// The shape is deliberately "don't-care": callers should use it only to
/// distinguish settled from still-pending, not as a semantic payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The node settled with no child slots: a leaf, a childless element, or
	/// a component chain collapsing to one.
	Settled,
	/// One settlement marker per child, in declared order.
	Children(Vec<Outcome>),
}

/// Future returned by a visitor to gate the render step.
pub type VisitorFuture = LocalBoxFuture<'static, Result<(), BoxError>>;

/// Caller-supplied callback observing each component node.
///
/// Invoked exactly once per component node, after binding and before the
/// first render attempt; never re-invoked on suspension retries, and never
/// invoked for leaves, elements, or lists. The instance argument is the
/// bound class instance, or `None` for function-shaped components. Returning
/// a future defers the render step until it settles; an `Err` settlement is
/// a genuine failure aborting the subtree.
pub type Visitor<'a> = dyn Fn(&VNode, Option<&dyn ClassInstance>) -> Option<VisitorFuture> + 'a;

/// Prepasses `node` with no visitor and an empty root context.
pub async fn prepass(node: &VNode) -> Result<Outcome, PrepassError> {
	traverse(node, None, Context::new()).await
}

/// Walks the tree rooted at `node`, settling every suspension it encounters.
///
/// Resolves once every component rendered without suspending; rejects with
/// the first genuine (non-suspension) error from any render step or visitor,
/// preserving that error value verbatim. Side-effect hooks are suppressed for
/// the duration of the call and restored afterward on every exit path.
pub async fn traverse(
	node: &VNode,
	visitor: Option<&Visitor<'_>>,
	context: Context,
) -> Result<Outcome, PrepassError> {
	let _suppress = EffectSuppression::enter();
	let binder = Binder::default();
	walk(node, visitor, context, &binder).await
}

fn walk<'a>(
	node: &'a VNode,
	visitor: Option<&'a Visitor<'a>>,
	context: Context,
	binder: &'a Binder,
) -> LocalBoxFuture<'a, Result<Outcome, PrepassError>> {
	Box::pin(async move {
		hooks::notify_diffed(node);

		match node {
			VNode::Leaf(_) => Ok(Outcome::Settled),
			VNode::Component(component) => {
				visit_component(node, component, visitor, context, binder).await
			}
			VNode::Element(element) => {
				trace!(tag = element.tag(), "descending into element children");
				walk_children(element.props().declared_children(), visitor, context, binder)
					.await
			}
			VNode::List(items) => walk_children(items, visitor, context, binder).await,
		}
	})
}

async fn visit_component<'a>(
	node: &'a VNode,
	component: &'a ComponentNode,
	visitor: Option<&'a Visitor<'a>>,
	context: Context,
	binder: &'a Binder,
) -> Result<Outcome, PrepassError> {
	let record = binder.bind(node, component, &context);

	if let Some(visitor) = visitor {
		// Borrow of the instance must end before the gate is awaited.
		let gate = binder.with_instance(record, |instance| visitor(node, instance));
		if let Some(gate) = gate {
			trace!(component = component.name(), "awaiting visitor");
			gate.await.map_err(PrepassError::Visitor)?;
		}
	}

	let kind = component.kind();
	let rendered =
		render_with_retry(component.name(), || binder.invoke_render(record, kind)).await?;

	// The contribution is read only after the render step settles, then
	// threaded exclusively to this component's descendants.
	let child_context = match binder.child_context(record) {
		Some(contribution) => context.merged(contribution),
		None => context,
	};

	match rendered {
		Rendered::Node(child) => walk(&child, visitor, child_context, binder).await,
		Rendered::List(children) => {
			// Rendered fragments flatten like declared children do.
			walk_children(&children, visitor, child_context, binder).await
		}
	}
}

async fn walk_children<'a>(
	children: &'a [VNode],
	visitor: Option<&'a Visitor<'a>>,
	context: Context,
	binder: &'a Binder,
) -> Result<Outcome, PrepassError> {
	let mut flattened = Vec::new();
	flatten_into(&mut flattened, children);
	if flattened.is_empty() {
		return Ok(Outcome::Settled);
	}

	let pending = flattened
		.into_iter()
		.map(|child| walk(child, visitor, context.clone(), binder));
	Ok(Outcome::Children(try_join_all(pending).await?))
}

async fn render_with_retry(
	name: &str,
	mut render_step: impl FnMut() -> RenderResult,
) -> Result<Rendered, PrepassError> {
	let mut attempt = 1u32;
	loop {
		match render_step() {
			RenderResult::Ready(rendered) => return Ok(rendered),
			RenderResult::Async(output) => {
				return output.await.map_err(PrepassError::Render);
			}
			RenderResult::Suspended(suspension) => {
				debug!(component = name, attempt, "render suspended, awaiting data");
				// A failed suspension still re-arms the attempt.
				let _ = suspension.wait().await;
				attempt += 1;
			}
			RenderResult::Failed(error) => {
				debug!(component = name, error = %error, "render failed");
				return Err(PrepassError::Render(error));
			}
		}
	}
}

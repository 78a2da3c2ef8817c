//! Hook surface shared with the rendering engine.
//!
//! The prepass mirrors the notifications the rendering engine's own traversal
//! would emit, so collaborators observing those hooks are not confused by the
//! extra pass. It also owns the process-wide "suppress effect hooks" flag:
//! set for the duration of a top-level traversal and restored to its prior
//! value on every exit path, because hook implementations the engine does not
//! own read it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::node::VNode;

/// A notification callback receiving the node being processed.
pub type NodeHook = Arc<dyn Fn(&VNode) + Send + Sync>;

/// Externally registered renderer notification hooks.
///
/// Older engines register under `render`, current ones under
/// `before_render`; both are invoked when present.
#[derive(Clone, Default)]
pub struct RendererHooks {
	/// "About to render", legacy registration name.
	pub render: Option<NodeHook>,
	/// "About to render", current registration name.
	pub before_render: Option<NodeHook>,
	/// Invoked once for every node, of any kind, as it is first visited.
	pub diffed: Option<NodeHook>,
}

static HOOKS: RwLock<RendererHooks> = RwLock::new(RendererHooks {
	render: None,
	before_render: None,
	diffed: None,
});

static SKIP_EFFECTS: AtomicBool = AtomicBool::new(false);

/// Replaces the process-wide renderer hook registration.
pub fn set_renderer_hooks(hooks: RendererHooks) {
	*HOOKS.write().unwrap_or_else(PoisonError::into_inner) = hooks;
}

/// Clears all registered renderer hooks.
pub fn clear_renderer_hooks() {
	set_renderer_hooks(RendererHooks::default());
}

/// Whether side-effect hooks are currently suppressed by an in-flight
/// prepass. Hook implementations consult this to skip effect scheduling.
pub fn effects_suppressed() -> bool {
	SKIP_EFFECTS.load(Ordering::Relaxed)
}

pub(crate) fn notify_before_render(node: &VNode) {
	let hooks = HOOKS.read().unwrap_or_else(PoisonError::into_inner);
	if let Some(render) = &hooks.render {
		render(node);
	}
	if let Some(before_render) = &hooks.before_render {
		before_render(node);
	}
}

pub(crate) fn notify_diffed(node: &VNode) {
	let hooks = HOOKS.read().unwrap_or_else(PoisonError::into_inner);
	if let Some(diffed) = &hooks.diffed {
		diffed(node);
	}
}

/// Scoped acquisition of the effect-suppression flag.
///
/// Restores the previous value on drop, so the flag survives nested
/// traversals and is released even when the traversal future is dropped
/// mid-flight.
pub(crate) struct EffectSuppression {
	previous: bool,
}

impl EffectSuppression {
	pub(crate) fn enter() -> Self {
		Self {
			previous: SKIP_EFFECTS.swap(true, Ordering::Relaxed),
		}
	}
}

impl Drop for EffectSuppression {
	fn drop(&mut self) {
		SKIP_EFFECTS.store(self.previous, Ordering::Relaxed);
	}
}

//! Asynchronous prepass traversal for component trees.
//!
//! Server-side rendering wants a synchronous pass over a fully settled tree,
//! but components discover their data needs only while rendering. This crate
//! walks the tree once ahead of that pass: every component renders
//! speculatively, signals pending data by suspending, is awaited and retried
//! until it produces real output, and hands its output back into the walk.
//! When [`traverse`] resolves, a subsequent synchronous render can run
//! without suspending.
//!
//! ## Architecture
//!
//! - [`node`]: the virtual tree ([`VNode`], [`Props`], [`IntoNode`])
//! - [`component`]: function/class component descriptors and the instance
//!   adapter traits
//! - [`context`]: broadcast context and provider/consumer handles
//! - [`render`]: the tagged render-step result and the suspension signal
//! - [`traverse`](mod@traverse): the engine — descent, retry loop, visitor
//!   gating, concurrent child fan-out
//! - [`hooks`]: the notification surface and effect-suppression flag shared
//!   with the rendering engine
//! - [`error`]: failure taxonomy (suspensions are not errors)
//!
//! The rendering engine proper — markup production, DOM diffing, hook
//! implementations, effect scheduling — stays outside this crate; the
//! traversal only emulates enough of the component lifecycle to let every
//! data dependency resolve.
//!
//! ## Example
//!
//! ```
//! use ssr_prepass::{
//! 	ComponentType, ElementNode, IntoNode, Props, RenderResult, VNode, prepass,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ssr_prepass::PrepassError> {
//! let item = ComponentType::function("Item", |props, _context| {
//! 	let label = props
//! 		.get("label")
//! 		.and_then(|value| value.as_str())
//! 		.unwrap_or_default()
//! 		.to_owned();
//! 	RenderResult::ready(ElementNode::new("li").child(label))
//! });
//!
//! let root = ElementNode::new("ul")
//! 	.child(VNode::component(
//! 		item.clone(),
//! 		Props::new().attr("label", "first"),
//! 	))
//! 	.child(VNode::component(item, Props::new().attr("label", "second")))
//! 	.into_node();
//!
//! prepass(&root).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod binder;

pub mod component;
pub mod context;
pub mod error;
pub mod hooks;
pub mod node;
pub mod render;
pub mod traverse;

pub use component::{ClassInstance, ClassSpec, ComponentType, FunctionComponent, State};
pub use context::{Context, ContextHandle};
pub use error::{BoxError, PrepassError};
pub use hooks::{
	NodeHook, RendererHooks, clear_renderer_hooks, effects_suppressed, set_renderer_hooks,
};
pub use node::{ComponentNode, ElementNode, IntoNode, Leaf, Props, VNode};
pub use render::{RenderResult, Rendered, Suspension};
pub use traverse::{Outcome, Visitor, VisitorFuture, prepass, traverse};

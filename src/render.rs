//! Render step results and the suspension signal.
//!
//! A render step never throws to request a wait: it returns a tagged
//! [`RenderResult`], and the retry loop in [`crate::traverse`] switches on the
//! tag. This keeps "needs data" structurally distinct from "failed" instead of
//! duck-typing the thrown value.

use std::fmt;
use std::future::Future;

use futures_util::future::LocalBoxFuture;

use crate::error::BoxError;
use crate::node::{IntoNode, VNode};

/// What a settled render step produced: a single node or an ordered list.
///
/// A list fans out into one concurrent traversal per element; a node is
/// traversed directly.
#[derive(Debug)]
pub enum Rendered {
	/// A single node.
	Node(VNode),
	/// An ordered list of nodes.
	List(Vec<VNode>),
}

/// A pending-data signal: an awaitable whose completion re-arms the render
/// attempt.
///
/// Both `Ok` and `Err` completions trigger a retry; a failed suspension is a
/// request to try again, not a failure of the traversal.
pub struct Suspension {
	wait: LocalBoxFuture<'static, Result<(), BoxError>>,
}

impl Suspension {
	/// Wraps a future as a suspension signal.
	pub fn new(wait: impl Future<Output = Result<(), BoxError>> + 'static) -> Self {
		Self {
			wait: Box::pin(wait),
		}
	}

	pub(crate) async fn wait(self) -> Result<(), BoxError> {
		self.wait.await
	}
}

impl fmt::Debug for Suspension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Suspension")
	}
}

/// The tagged outcome of one render attempt.
pub enum RenderResult {
	/// The step produced output.
	Ready(Rendered),
	/// The step is itself asynchronous; its resolution is awaited once. An
	/// error from the future is a genuine failure, never a suspension.
	Async(LocalBoxFuture<'static, Result<Rendered, BoxError>>),
	/// The step is waiting for data; retry after the suspension settles.
	Suspended(Suspension),
	/// The step failed for a non-data reason; aborts the traversal.
	Failed(BoxError),
}

impl RenderResult {
	/// A ready result holding a single node.
	pub fn ready(node: impl IntoNode) -> Self {
		RenderResult::Ready(Rendered::Node(node.into_node()))
	}

	/// A ready result holding an ordered list of nodes.
	pub fn list(nodes: Vec<VNode>) -> Self {
		RenderResult::Ready(Rendered::List(nodes))
	}

	/// A suspension: retry once `wait` settles, however it settles.
	pub fn suspend(wait: impl Future<Output = Result<(), BoxError>> + 'static) -> Self {
		RenderResult::Suspended(Suspension::new(wait))
	}

	/// An asynchronous render step.
	pub fn deferred(
		output: impl Future<Output = Result<Rendered, BoxError>> + 'static,
	) -> Self {
		RenderResult::Async(Box::pin(output))
	}

	/// A genuine failure.
	pub fn fail(error: impl Into<BoxError>) -> Self {
		RenderResult::Failed(error.into())
	}
}

impl fmt::Debug for RenderResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RenderResult::Ready(rendered) => f.debug_tuple("Ready").field(rendered).finish(),
			RenderResult::Async(_) => f.write_str("Async"),
			RenderResult::Suspended(_) => f.write_str("Suspended"),
			RenderResult::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
		}
	}
}

//! Component type descriptors and the instance adapter surface.
//!
//! The prepass never probes a foreign component model at runtime: the
//! function-vs-class distinction is a [`ComponentType`] tag resolved when the
//! tree is built, and everything the engine needs from a class instance goes
//! through the [`ClassSpec`]/[`ClassInstance`] traits rather than through the
//! rendering engine's private fields.
//!
//! ## Example
//!
//! ```
//! use ssr_prepass::{ComponentType, ElementNode, RenderResult};
//!
//! let greeting = ComponentType::function("Greeting", |props, _context| {
//! 	let name = props
//! 		.get("name")
//! 		.and_then(|value| value.as_str())
//! 		.unwrap_or("world");
//! 	RenderResult::ready(ElementNode::new("p").child(format!("Hello, {name}!")))
//! });
//! assert_eq!(greeting.name(), "Greeting");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::ContextHandle;
use crate::node::Props;
use crate::render::RenderResult;

/// Component-local state: a JSON object, defaulting to empty.
pub type State = Map<String, Value>;

/// Tagged component type: function-shaped or class-shaped, resolved once at
/// tree construction rather than probed per visit.
#[derive(Clone)]
pub enum ComponentType {
	/// A stateless function component.
	Function(Arc<FunctionComponent>),
	/// A class component constructor.
	Class(Arc<dyn ClassSpec>),
}

impl ComponentType {
	/// Creates a function component type.
	pub fn function(
		name: impl Into<Cow<'static, str>>,
		render: impl Fn(&Props, &Value) -> RenderResult + 'static,
	) -> Self {
		ComponentType::Function(Arc::new(FunctionComponent::new(name, render)))
	}

	/// Creates a class component type from a constructor spec.
	pub fn class<S: ClassSpec>(spec: S) -> Self {
		ComponentType::Class(Arc::new(spec))
	}

	/// The component's name, for diagnostics.
	pub fn name(&self) -> &str {
		match self {
			ComponentType::Function(function) => function.name(),
			ComponentType::Class(spec) => spec.name(),
		}
	}

	/// The single context handle this component binds as its own
	/// read-context, if it declares one.
	pub fn context_handle(&self) -> Option<&ContextHandle> {
		match self {
			ComponentType::Function(function) => function.context_handle(),
			ComponentType::Class(spec) => spec.context_handle(),
		}
	}
}

impl fmt::Debug for ComponentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ComponentType::Function(function) => {
				write!(f, "Function({})", function.name())
			}
			ComponentType::Class(spec) => write!(f, "Class({})", spec.name()),
		}
	}
}

/// A stateless function component: a render closure invoked with
/// `(props, read_context)`.
pub struct FunctionComponent {
	name: Cow<'static, str>,
	context_handle: Option<ContextHandle>,
	render: Box<dyn Fn(&Props, &Value) -> RenderResult + 'static>,
}

impl FunctionComponent {
	/// Creates a function component.
	pub fn new(
		name: impl Into<Cow<'static, str>>,
		render: impl Fn(&Props, &Value) -> RenderResult + 'static,
	) -> Self {
		Self {
			name: name.into(),
			context_handle: None,
			render: Box::new(render),
		}
	}

	/// Declares the context handle bound as this component's read-context.
	pub fn with_context_handle(mut self, handle: ContextHandle) -> Self {
		self.context_handle = Some(handle);
		self
	}

	/// Wraps the component in a [`ComponentType`] tag.
	pub fn into_type(self) -> ComponentType {
		ComponentType::Function(Arc::new(self))
	}

	/// The component's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The declared context handle, if any.
	pub fn context_handle(&self) -> Option<&ContextHandle> {
		self.context_handle.as_ref()
	}

	pub(crate) fn invoke(&self, props: &Props, context: &Value) -> RenderResult {
		(self.render)(props, context)
	}
}

impl fmt::Debug for FunctionComponent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FunctionComponent")
			.field("name", &self.name)
			.finish()
	}
}

/// Constructor-side description of a class component type.
///
/// This is the static half of the class shape: the name, the constructor,
/// the optional context handle, and the optional "derive state from props"
/// hook (a property of the type, not of any one instance).
pub trait ClassSpec: 'static {
	/// The component's name, for diagnostics.
	fn name(&self) -> &str;

	/// Constructs a fresh instance with `(props, read_context)`.
	fn construct(&self, props: &Props, context: &Value) -> Box<dyn ClassInstance>;

	/// The single context handle bound as this component's read-context.
	fn context_handle(&self) -> Option<&ContextHandle> {
		None
	}

	/// The "derive state from props" hook.
	///
	/// Returning `Some` declares the hook: the result is merged over the
	/// instance's seeded state and [`ClassInstance::will_mount`] is NOT
	/// invoked. Returning `None` means the type does not declare the hook.
	fn derived_state(&self, _props: &Props, _state: &State) -> Option<State> {
		None
	}
}

/// Instance-side adapter for a class component.
///
/// The binder drives the mount-time lifecycle through this trait; it never
/// reaches into the instance beyond it.
pub trait ClassInstance: 'static {
	/// Constructor-assigned state, seeded into the backing record before any
	/// render attempt. `None` defaults the record to an empty map.
	fn initial_state(&self) -> Option<State> {
		None
	}

	/// Mount hook, invoked only when the type declares no
	/// [`ClassSpec::derived_state`]. May return replacement state for the
	/// backing record.
	fn will_mount(&mut self) -> Option<State> {
		None
	}

	/// The render step, invoked with `(props, state, read_context)`.
	fn render(&mut self, props: &Props, state: &State, context: &Value) -> RenderResult;

	/// Broadcast-context contribution merged into what this component's
	/// descendants see. Read after the render step settles.
	fn child_context(&self) -> Option<Map<String, Value>> {
		None
	}
}

//! Broadcast context and provider/consumer context handles.
//!
//! Two mechanisms coexist and are both honored by the traversal:
//!
//! - **Broadcast context**: any class component may contribute key/value
//!   pairs via [`crate::component::ClassInstance::child_context`]; the
//!   contribution is shallow-merged over the context the component received
//!   and threaded only to its descendants. Deeper contributions win on key
//!   collision.
//! - **Handle binding**: a component type may declare a [`ContextHandle`];
//!   its own render step then receives the nearest ancestor provider's value,
//!   falling back to the handle's static default, falling back to `Null`.
//!   Descendants still see the ambient broadcast context unchanged.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use ssr_prepass::{Context, ContextHandle};
//!
//! let theme = ContextHandle::with_default("theme", json!("light"));
//! assert_eq!(theme.resolve(&Context::new()), json!("light"));
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

use crate::component::{ClassInstance, ClassSpec, ComponentType, State};
use crate::node::{ComponentNode, Props, VNode};
use crate::render::RenderResult;

/// Immutable broadcast context: ambient key/value data flowing from ancestors
/// to all descendants.
///
/// A context already handed to a subtree is never mutated in place; merging a
/// contribution produces a new map shared via cheap clones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
	entries: Arc<Map<String, Value>>,
}

impl Context {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Looks up a value by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.get(key)
	}

	/// Returns true when no entries are present.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Produces a new context with `contribution` shallow-merged on top.
	///
	/// Contributed keys override existing ones; `self` is left untouched.
	pub fn merged(&self, contribution: Map<String, Value>) -> Context {
		let mut entries = (*self.entries).clone();
		entries.extend(contribution);
		Context {
			entries: Arc::new(entries),
		}
	}

	/// The context as a JSON object, the shape handed to render steps that
	/// declare no [`ContextHandle`].
	pub fn to_value(&self) -> Value {
		Value::Object((*self.entries).clone())
	}
}

impl FromIterator<(String, Value)> for Context {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Context {
			entries: Arc::new(iter.into_iter().collect()),
		}
	}
}

static HANDLE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A provider/consumer context handle.
///
/// Each handle owns a process-unique key under which its providers publish
/// into the broadcast chain, so distinct handles never collide even when
/// created with the same name.
#[derive(Clone, Debug)]
pub struct ContextHandle {
	inner: Arc<HandleInner>,
}

#[derive(Debug)]
struct HandleInner {
	name: Cow<'static, str>,
	key: String,
	default: Option<Value>,
}

impl ContextHandle {
	/// Creates a handle with no default value. A consumer with no enclosing
	/// provider resolves to `Null`, not an error.
	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self::build(name.into(), None)
	}

	/// Creates a handle with a static default value.
	pub fn with_default(name: impl Into<Cow<'static, str>>, default: Value) -> Self {
		Self::build(name.into(), Some(default))
	}

	fn build(name: Cow<'static, str>, default: Option<Value>) -> Self {
		let id = HANDLE_COUNTER.fetch_add(1, Ordering::Relaxed);
		Self {
			inner: Arc::new(HandleInner {
				name,
				key: format!("__cx{id}"),
				default,
			}),
		}
	}

	/// The handle's display name.
	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// The storage key providers publish under in the broadcast chain.
	pub fn key(&self) -> &str {
		&self.inner.key
	}

	/// The static default value, if any.
	pub fn default_value(&self) -> Option<&Value> {
		self.inner.default.as_ref()
	}

	/// Resolves the value a consumer of this handle reads under `ambient`:
	/// nearest provider's value, else the static default, else `Null`.
	pub fn resolve(&self, ambient: &Context) -> Value {
		ambient
			.get(self.key())
			.cloned()
			.or_else(|| self.inner.default.clone())
			.unwrap_or(Value::Null)
	}

	/// Builds a provider node for this handle.
	///
	/// The provider renders its children unchanged and publishes `value`
	/// under the handle's key, visible to all descendants. Nesting providers
	/// makes the nearest (deepest) one win.
	pub fn provider(&self, value: Value, children: Vec<VNode>) -> VNode {
		VNode::Component(ComponentNode::new(
			ComponentType::class(ProviderSpec {
				handle: self.clone(),
			}),
			Props::new().attr("value", value).children(children),
		))
	}
}

/// Computes the read-context bound to a component's own render step.
pub(crate) fn read_context(handle: Option<&ContextHandle>, ambient: &Context) -> Value {
	match handle {
		Some(handle) => handle.resolve(ambient),
		None => ambient.to_value(),
	}
}

struct ProviderSpec {
	handle: ContextHandle,
}

impl ClassSpec for ProviderSpec {
	fn name(&self) -> &str {
		"ContextProvider"
	}

	fn construct(&self, props: &Props, _context: &Value) -> Box<dyn ClassInstance> {
		Box::new(ProviderInstance {
			key: self.handle.key().to_owned(),
			value: props.get("value").cloned().unwrap_or(Value::Null),
		})
	}
}

struct ProviderInstance {
	key: String,
	value: Value,
}

impl ClassInstance for ProviderInstance {
	fn render(&mut self, props: &Props, _state: &State, _context: &Value) -> RenderResult {
		RenderResult::list(props.declared_children().to_vec())
	}

	fn child_context(&self) -> Option<Map<String, Value>> {
		let mut contribution = Map::new();
		contribution.insert(self.key.clone(), self.value.clone());
		Some(contribution)
	}
}

//! Component record arena and binder.
//!
//! Backing records live in a flat table keyed by traversal-assigned ids, so
//! node/record back-references are indices instead of ownership cycles. A
//! record is created once per traversal visit; suspension retries re-invoke
//! the render step against the same record. Records are discarded with the
//! arena when the traversal settles, with no explicit teardown.

use std::cell::RefCell;

use serde_json::{Map, Value};
use tracing::trace;

use crate::component::{ClassInstance, ComponentType, State};
use crate::context::{Context, read_context};
use crate::hooks;
use crate::node::{ComponentNode, Props, VNode};
use crate::render::RenderResult;

/// Index of a backing record in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordId(usize);

/// The mutable backing record behind a bound component node.
struct ComponentRecord {
	props: Props,
	state: State,
	/// Resolved read-context for this node, fixed at bind time so a
	/// suspension retry never recomputes it from a stale ancestor chain.
	context: Value,
	/// Forced true at bind time and never toggled during the prepass: the
	/// contract that keeps the external rendering engine from enqueueing
	/// the component for its own re-render while the prepass owns it.
	dirty: bool,
	instance: Option<Box<dyn ClassInstance>>,
}

/// Arena of backing records plus the bind/lifecycle logic.
///
/// All access from the traversal goes through this capability surface;
/// concurrent sibling branches share it behind short-lived borrows that never
/// span a suspension point.
#[derive(Default)]
pub(crate) struct Binder {
	records: RefCell<Vec<ComponentRecord>>,
}

impl Binder {
	/// Binds `component`, producing its backing record and emitting the
	/// "about to render" notifications.
	pub(crate) fn bind(
		&self,
		node: &VNode,
		component: &ComponentNode,
		ambient: &Context,
	) -> RecordId {
		let context = read_context(component.kind().context_handle(), ambient);
		let mut record = ComponentRecord {
			props: component.props().clone(),
			state: State::new(),
			context,
			dirty: true,
			instance: None,
		};

		if let ComponentType::Class(spec) = component.kind() {
			let mut instance = spec.construct(&record.props, &record.context);
			if let Some(seeded) = instance.initial_state() {
				record.state = seeded;
			}
			match spec.derived_state(&record.props, &record.state) {
				Some(derived) => {
					for (key, value) in derived {
						record.state.insert(key, value);
					}
				}
				None => {
					if let Some(mounted) = instance.will_mount() {
						record.state = mounted;
					}
				}
			}
			record.instance = Some(instance);
		}

		trace!(component = component.name(), "bound component record");
		let id = {
			let mut records = self.records.borrow_mut();
			records.push(record);
			RecordId(records.len() - 1)
		};

		hooks::notify_before_render(node);
		id
	}

	/// Runs one render attempt against the record.
	pub(crate) fn invoke_render(&self, id: RecordId, kind: &ComponentType) -> RenderResult {
		match kind {
			ComponentType::Function(function) => {
				let records = self.records.borrow();
				let record = &records[id.0];
				function.invoke(&record.props, &record.context)
			}
			ComponentType::Class(_) => {
				let mut records = self.records.borrow_mut();
				let record = &mut records[id.0];
				let Some(instance) = record.instance.as_mut() else {
					return RenderResult::fail("class component bound without an instance");
				};
				instance.render(&record.props, &record.state, &record.context)
			}
		}
	}

	/// Calls `f` with the bound class instance, or `None` for
	/// function-shaped components.
	pub(crate) fn with_instance<R>(
		&self,
		id: RecordId,
		f: impl FnOnce(Option<&dyn ClassInstance>) -> R,
	) -> R {
		let records = self.records.borrow();
		f(records[id.0].instance.as_deref())
	}

	/// The record's broadcast-context contribution, if its instance
	/// declares one.
	pub(crate) fn child_context(&self, id: RecordId) -> Option<Map<String, Value>> {
		let records = self.records.borrow();
		records[id.0]
			.instance
			.as_ref()
			.and_then(|instance| instance.child_context())
	}

	/// Snapshot of the record's state.
	pub(crate) fn state(&self, id: RecordId) -> State {
		self.records.borrow()[id.0].state.clone()
	}

	/// Replaces the record's state.
	#[allow(dead_code)] // capability kept for lifecycle emulation beyond mount
	pub(crate) fn set_state(&self, id: RecordId, state: State) {
		self.records.borrow_mut()[id.0].state = state;
	}

	/// The record's dirty flag. Held true for the whole prepass.
	pub(crate) fn dirty(&self, id: RecordId) -> bool {
		self.records.borrow()[id.0].dirty
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::ClassSpec;
	use crate::render::Rendered;
	use serde_json::json;
	use std::cell::Cell;
	use std::rc::Rc;

	struct Recorder {
		will_mount_calls: Rc<Cell<usize>>,
		derive: bool,
	}

	struct RecorderInstance {
		will_mount_calls: Rc<Cell<usize>>,
	}

	impl ClassSpec for Recorder {
		fn name(&self) -> &str {
			"Recorder"
		}

		fn construct(&self, _props: &Props, _context: &Value) -> Box<dyn ClassInstance> {
			Box::new(RecorderInstance {
				will_mount_calls: self.will_mount_calls.clone(),
			})
		}

		fn derived_state(&self, props: &Props, _state: &State) -> Option<State> {
			if !self.derive {
				return None;
			}
			let mut derived = State::new();
			derived.insert("from_props".into(), props.get("seed").cloned()?);
			Some(derived)
		}
	}

	impl ClassInstance for RecorderInstance {
		fn initial_state(&self) -> Option<State> {
			let mut seeded = State::new();
			seeded.insert("constructed".into(), json!(true));
			Some(seeded)
		}

		fn will_mount(&mut self) -> Option<State> {
			self.will_mount_calls.set(self.will_mount_calls.get() + 1);
			None
		}

		fn render(&mut self, _props: &Props, _state: &State, _context: &Value) -> RenderResult {
			RenderResult::Ready(Rendered::Node(VNode::null()))
		}
	}

	fn bind_recorder(derive: bool) -> (Binder, RecordId, Rc<Cell<usize>>) {
		let will_mount_calls = Rc::new(Cell::new(0));
		let kind = ComponentType::class(Recorder {
			will_mount_calls: will_mount_calls.clone(),
			derive,
		});
		let node = VNode::component(kind, Props::new().attr("seed", json!(7)));
		let binder = Binder::default();
		let VNode::Component(component) = &node else {
			unreachable!()
		};
		let id = binder.bind(&node, component, &Context::new());
		(binder, id, will_mount_calls)
	}

	#[test]
	fn test_bind_seeds_constructor_state_and_mounts() {
		let (binder, id, will_mount_calls) = bind_recorder(false);
		assert_eq!(will_mount_calls.get(), 1);
		assert_eq!(binder.state(id).get("constructed"), Some(&json!(true)));
	}

	#[test]
	fn test_derived_state_merges_and_suppresses_will_mount() {
		let (binder, id, will_mount_calls) = bind_recorder(true);
		assert_eq!(will_mount_calls.get(), 0);
		let state = binder.state(id);
		assert_eq!(state.get("constructed"), Some(&json!(true)));
		assert_eq!(state.get("from_props"), Some(&json!(7)));
	}

	#[test]
	fn test_record_is_dirty_at_bind_time() {
		let (binder, id, _) = bind_recorder(false);
		assert!(binder.dirty(id));
	}

	#[test]
	fn test_function_component_receives_ambient_context() {
		let seen = Rc::new(RefCell::new(Value::Null));
		let observed = seen.clone();
		let kind = ComponentType::function("Probe", move |_props, context| {
			*observed.borrow_mut() = context.clone();
			RenderResult::ready(())
		});
		let node = VNode::component(kind.clone(), Props::new());
		let ambient: Context = [("foo".to_string(), json!(123))].into_iter().collect();

		let binder = Binder::default();
		let VNode::Component(component) = &node else {
			unreachable!()
		};
		let id = binder.bind(&node, component, &ambient);
		binder.invoke_render(id, &kind);

		assert_eq!(*seen.borrow(), json!({ "foo": 123 }));
	}
}

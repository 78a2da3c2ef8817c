//! Shared fixtures for the integration suites.

#![allow(dead_code)] // each suite uses its own subset of the fixtures

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use ssr_prepass::{
	ClassInstance, ClassSpec, ComponentType, Props, RenderResult, State, VNode,
};
use tokio::sync::oneshot;

/// Function component rendering `output`, counting render attempts.
pub fn counting_component(
	name: &'static str,
	output: VNode,
) -> (ComponentType, Rc<Cell<usize>>) {
	let calls = Rc::new(Cell::new(0));
	let counted = calls.clone();
	let kind = ComponentType::function(name, move |_props, _context| {
		counted.set(counted.get() + 1);
		RenderResult::ready(output.clone())
	});
	(kind, calls)
}

/// Function component that suspends on its first `suspend_count` attempts
/// (each suspension settles immediately), then renders `output`.
pub fn suspending_component(
	name: &'static str,
	suspend_count: usize,
	output: VNode,
) -> (ComponentType, Rc<Cell<usize>>) {
	let calls = Rc::new(Cell::new(0));
	let counted = calls.clone();
	let kind = ComponentType::function(name, move |_props, _context| {
		counted.set(counted.get() + 1);
		if counted.get() <= suspend_count {
			RenderResult::suspend(async { Ok(()) })
		} else {
			RenderResult::ready(output.clone())
		}
	});
	(kind, calls)
}

/// Pass-through component whose single suspension settles only when the
/// returned sender fires; afterwards it renders its declared children.
pub fn gated_component(
	name: &'static str,
) -> (ComponentType, Rc<Cell<usize>>, oneshot::Sender<()>) {
	let calls = Rc::new(Cell::new(0));
	let counted = calls.clone();
	let (open, gate) = oneshot::channel::<()>();
	let gate = Rc::new(RefCell::new(Some(gate)));
	let kind = ComponentType::function(name, move |props, _context| {
		counted.set(counted.get() + 1);
		match gate.borrow_mut().take() {
			Some(gate) => RenderResult::suspend(async move {
				let _ = gate.await;
				Ok(())
			}),
			None => RenderResult::list(props.declared_children().to_vec()),
		}
	});
	(kind, calls, open)
}

/// Minimal class component rendering a fixed node.
pub struct StaticClass {
	pub name: &'static str,
	pub output: VNode,
}

impl ClassSpec for StaticClass {
	fn name(&self) -> &str {
		self.name
	}

	fn construct(&self, _props: &Props, _context: &Value) -> Box<dyn ClassInstance> {
		Box::new(StaticClassInstance {
			output: self.output.clone(),
		})
	}
}

struct StaticClassInstance {
	output: VNode,
}

impl ClassInstance for StaticClassInstance {
	fn render(&mut self, _props: &Props, _state: &State, _context: &Value) -> RenderResult {
		RenderResult::ready(self.output.clone())
	}
}

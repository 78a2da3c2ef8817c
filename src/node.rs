//! Virtual node types for the prepass tree.
//!
//! The tree handed to [`crate::traverse`] is built from [`VNode`] values:
//! inert leaves, plain markup elements, component nodes, and raw lists (the
//! fragment shape a render step may return). [`IntoNode`] mirrors the usual
//! builder ergonomics so trees read the way they nest.
//!
//! ## Example
//!
//! ```
//! use ssr_prepass::{ElementNode, IntoNode, VNode};
//!
//! let tree: VNode = ElementNode::new("ul")
//! 	.child(ElementNode::new("li").child("first"))
//! 	.child(ElementNode::new("li").child("second"))
//! 	.into_node();
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::component::ComponentType;

/// An entry in the declarative tree being traversed.
#[derive(Clone)]
pub enum VNode {
	/// An inert value: produces no further traversal.
	Leaf(Leaf),
	/// A non-component tag carrying props and children.
	Element(ElementNode),
	/// A function or class component plus its props.
	Component(ComponentNode),
	/// An ordered list of nodes, treated like a fragment's child list.
	List(Vec<VNode>),
}

impl VNode {
	/// A null leaf. Dropped when it appears among declared children.
	pub fn null() -> Self {
		VNode::Leaf(Leaf::Null)
	}

	/// A text leaf.
	pub fn text(text: impl Into<String>) -> Self {
		VNode::Leaf(Leaf::Text(text.into()))
	}

	/// A numeric leaf.
	pub fn number(value: f64) -> Self {
		VNode::Leaf(Leaf::Number(value))
	}

	/// A fragment: children with no enclosing tag.
	pub fn fragment(children: Vec<VNode>) -> Self {
		VNode::List(children)
	}

	/// A component node.
	pub fn component(kind: ComponentType, props: Props) -> Self {
		VNode::Component(ComponentNode::new(kind, props))
	}
}

impl fmt::Debug for VNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			VNode::Leaf(leaf) => leaf.fmt(f),
			VNode::Element(element) => element.fmt(f),
			VNode::Component(component) => component.fmt(f),
			VNode::List(items) => f.debug_list().entries(items).finish(),
		}
	}
}

/// An inert tree value. Anything the engine cannot classify further is, by
/// construction, one of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Leaf {
	/// Renders nothing; dropped from declared children.
	Null,
	/// `false` is dropped from declared children; `true` is kept but inert.
	Bool(bool),
	/// A number.
	Number(f64),
	/// A text node.
	Text(String),
}

/// Props carried by element and component nodes: an attribute map plus the
/// declared children.
#[derive(Clone, Default)]
pub struct Props {
	attrs: Map<String, Value>,
	children: Vec<VNode>,
}

impl Props {
	/// Creates empty props.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets an attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attrs.insert(name.into(), value.into());
		self
	}

	/// Appends a declared child.
	pub fn child(mut self, child: impl IntoNode) -> Self {
		self.children.push(child.into_node());
		self
	}

	/// Appends declared children.
	pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
		self.children.extend(children);
		self
	}

	/// Looks up an attribute value.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.attrs.get(name)
	}

	/// The attribute map.
	pub fn attrs(&self) -> &Map<String, Value> {
		&self.attrs
	}

	/// The declared children, unflattened.
	pub fn declared_children(&self) -> &[VNode] {
		&self.children
	}
}

impl fmt::Debug for Props {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Props")
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.finish()
	}
}

/// A non-component tag in the tree, e.g. a markup element.
#[derive(Debug, Clone)]
pub struct ElementNode {
	tag: Cow<'static, str>,
	props: Props,
}

impl ElementNode {
	/// Creates an element with the given tag and empty props.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			props: Props::new(),
		}
	}

	/// Sets an attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.props = self.props.attr(name, value);
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoNode) -> Self {
		self.props = self.props.child(child);
		self
	}

	/// Appends children.
	pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
		self.props = self.props.children(children);
		self
	}

	/// The tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// The element's props.
	pub fn props(&self) -> &Props {
		&self.props
	}
}

/// A component node: a [`ComponentType`] plus the props it will receive.
#[derive(Clone)]
pub struct ComponentNode {
	kind: ComponentType,
	props: Props,
}

impl ComponentNode {
	/// Creates a component node.
	pub fn new(kind: ComponentType, props: Props) -> Self {
		Self { kind, props }
	}

	/// The component type descriptor.
	pub fn kind(&self) -> &ComponentType {
		&self.kind
	}

	/// The props bound to this node.
	pub fn props(&self) -> &Props {
		&self.props
	}

	/// The component's name, for diagnostics.
	pub fn name(&self) -> &str {
		self.kind.name()
	}
}

impl fmt::Debug for ComponentNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentNode")
			.field("kind", &self.kind)
			.field("props", &self.props)
			.finish()
	}
}

/// Conversion into a [`VNode`].
pub trait IntoNode {
	/// Converts the value into a tree node.
	fn into_node(self) -> VNode;
}

impl IntoNode for VNode {
	fn into_node(self) -> VNode {
		self
	}
}

impl IntoNode for Leaf {
	fn into_node(self) -> VNode {
		VNode::Leaf(self)
	}
}

impl IntoNode for ElementNode {
	fn into_node(self) -> VNode {
		VNode::Element(self)
	}
}

impl IntoNode for ComponentNode {
	fn into_node(self) -> VNode {
		VNode::Component(self)
	}
}

impl IntoNode for &'static str {
	fn into_node(self) -> VNode {
		VNode::text(self)
	}
}

impl IntoNode for String {
	fn into_node(self) -> VNode {
		VNode::text(self)
	}
}

impl IntoNode for f64 {
	fn into_node(self) -> VNode {
		VNode::number(self)
	}
}

impl IntoNode for i64 {
	fn into_node(self) -> VNode {
		VNode::number(self as f64)
	}
}

impl IntoNode for bool {
	fn into_node(self) -> VNode {
		VNode::Leaf(Leaf::Bool(self))
	}
}

impl IntoNode for () {
	fn into_node(self) -> VNode {
		VNode::null()
	}
}

impl IntoNode for Vec<VNode> {
	fn into_node(self) -> VNode {
		VNode::List(self)
	}
}

/// Flattens declared children into traversal order.
///
/// Nested lists are flattened recursively; `Null` and `false` entries are
/// dropped and produce no traversal slot.
pub(crate) fn flatten_into<'a>(accumulator: &mut Vec<&'a VNode>, children: &'a [VNode]) {
	for child in children {
		match child {
			VNode::List(nested) => flatten_into(accumulator, nested),
			VNode::Leaf(Leaf::Null) | VNode::Leaf(Leaf::Bool(false)) => {}
			other => accumulator.push(other),
		}
	}
}

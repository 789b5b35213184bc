use std::time::Duration;

use super::{Block, BlockExt, Value};

/// The state of a single resource instance, as handed over by the framework.
/// Lifecycle handlers read the desired state from the attributes, and write
/// the observed state back into them. A resource without an ID is considered
/// gone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceData {
	/// The ID of the resource. [`None`] until the resource is created, and
	/// after it is found to be gone.
	id: Option<String>,
	/// The attributes of the resource
	attributes: Block,
	/// The timeouts configured for the resource, overriding the defaults of
	/// the resource type
	pub timeouts: Timeouts,
}

impl ResourceData {
	/// Creates the state of a resource that does not exist yet
	pub fn new(attributes: Block) -> Self {
		Self {
			id: None,
			attributes,
			timeouts: Timeouts::default(),
		}
	}

	/// Creates the state of an existing resource from its ID, such as when it
	/// is imported
	pub fn with_id(id: impl Into<String>) -> Self {
		Self {
			id: Some(id.into()),
			..Default::default()
		}
	}

	/// The ID of the resource, if it exists
	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	/// Records the ID of a newly created resource
	pub fn set_id(&mut self, id: impl Into<String>) {
		self.id = Some(id.into());
	}

	/// Marks the resource as gone
	pub fn clear_id(&mut self) {
		self.id = None;
	}

	/// Sets an attribute
	pub fn set(&mut self, key: &str, value: impl Into<Value>) {
		self.attributes.insert(key.to_string(), value.into());
	}

	/// All the attributes of the resource
	pub fn attributes(&self) -> &Block {
		&self.attributes
	}
}

impl BlockExt for ResourceData {
	fn value(&self, key: &str) -> Option<&Value> {
		self.attributes.get(key)
	}
}

/// Timeouts of the operations that wait for the API. Unset timeouts fall back
/// to the defaults of the resource type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
	/// How long to wait for a resource to become ready after creating it
	pub create: Option<Duration>,
	/// How long to wait for a resource to be gone after deleting it
	pub delete: Option<Duration>,
}

use std::collections::BTreeMap;

use super::{Block, ResourceData, Value};
use crate::prelude::*;

/// Decides whether a change from `old` to `new` is not a real change, such as
/// a version gaining a `v` prefix.
pub type DiffSuppressFn = fn(old: &str, new: &str, data: &ResourceData) -> bool;

/// Validates the configured value of an attribute. The path of the attribute
/// is passed along so that errors can name it.
pub type ValidateFn = fn(value: &Value, path: &str) -> Result<(), AppError>;

/// The type of an attribute
#[derive(Debug, Clone)]
pub enum AttributeKind {
	/// A boolean
	Bool,
	/// An integer
	Int,
	/// A string
	String,
	/// A list of strings
	StringList,
	/// A map of strings to strings
	StringMap,
	/// A list of nested blocks
	Block {
		/// The maximum number of blocks. Singleton blocks have a maximum of 1.
		max_items: Option<usize>,
		/// The attributes of every block
		schema: Schema,
	},
}

/// Who sets an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
	/// Must be set in the configuration
	Required,
	/// May be set in the configuration
	Optional,
	/// Only ever set by the provider
	Computed,
	/// May be set in the configuration, and is set by the provider otherwise
	OptionalComputed,
}

/// The declaration of a single attribute of a resource
#[derive(Debug, Clone)]
pub struct AttributeSchema {
	/// The type of the attribute
	pub kind: AttributeKind,
	/// Who sets the attribute
	pub presence: Presence,
	/// Whether changing the attribute replaces the resource
	pub force_new: bool,
	/// Whether the value must be hidden from plans and logs
	pub sensitive: bool,
	/// A description of the attribute, shown in the documentation
	pub description: &'static str,
	/// Decides whether a change to the attribute can be ignored
	pub diff_suppress: Option<DiffSuppressFn>,
	/// Validates the configured value of the attribute
	pub validate: Option<ValidateFn>,
}

impl AttributeSchema {
	/// An optional attribute of the given type
	pub fn new(kind: AttributeKind) -> Self {
		Self {
			kind,
			presence: Presence::Optional,
			force_new: false,
			sensitive: false,
			description: "",
			diff_suppress: None,
			validate: None,
		}
	}

	/// A boolean attribute
	pub fn bool() -> Self {
		Self::new(AttributeKind::Bool)
	}

	/// An integer attribute
	pub fn int() -> Self {
		Self::new(AttributeKind::Int)
	}

	/// A string attribute
	pub fn string() -> Self {
		Self::new(AttributeKind::String)
	}

	/// A list of strings
	pub fn string_list() -> Self {
		Self::new(AttributeKind::StringList)
	}

	/// A map of strings to strings
	pub fn string_map() -> Self {
		Self::new(AttributeKind::StringMap)
	}

	/// A list of any number of nested blocks
	pub fn blocks(schema: Schema) -> Self {
		Self::new(AttributeKind::Block {
			max_items: None,
			schema,
		})
	}

	/// A block that can be set at most once
	pub fn singleton(schema: Schema) -> Self {
		Self::new(AttributeKind::Block {
			max_items: Some(1),
			schema,
		})
	}

	/// Marks the attribute as required
	pub fn required(mut self) -> Self {
		self.presence = Presence::Required;
		self
	}

	/// Marks the attribute as set by the provider only
	pub fn computed(mut self) -> Self {
		self.presence = Presence::Computed;
		self
	}

	/// Marks the attribute as set by the provider when not configured
	pub fn optional_computed(mut self) -> Self {
		self.presence = Presence::OptionalComputed;
		self
	}

	/// Marks the attribute as replacing the resource when changed
	pub fn force_new(mut self) -> Self {
		self.force_new = true;
		self
	}

	/// Marks the attribute as sensitive
	pub fn sensitive(mut self) -> Self {
		self.sensitive = true;
		self
	}

	/// Sets the description of the attribute
	pub fn describe(mut self, description: &'static str) -> Self {
		self.description = description;
		self
	}

	/// Sets the diff suppression callback of the attribute
	pub fn diff_suppress(mut self, diff_suppress: DiffSuppressFn) -> Self {
		self.diff_suppress = Some(diff_suppress);
		self
	}

	/// Sets the validation callback of the attribute
	pub fn validate(mut self, validate: ValidateFn) -> Self {
		self.validate = Some(validate);
		self
	}

	/// Checks the type of a configured value, recursing into blocks
	fn check(&self, value: &Value, path: &str) -> Result<(), AppError> {
		let type_error = |expected| AppError::TypeMismatch {
			path: path.to_string(),
			expected,
			found: value.type_name(),
		};
		match (&self.kind, value) {
			(AttributeKind::Bool, Value::Bool(_)) |
			(AttributeKind::Int, Value::Int(_)) |
			(AttributeKind::String, Value::String(_)) => (),
			(AttributeKind::StringList, Value::List(items)) => {
				for (index, item) in items.iter().enumerate() {
					if !matches!(item, Value::String(_)) {
						return Err(AppError::TypeMismatch {
							path: format!("{}.{}", path, index),
							expected: "a string",
							found: item.type_name(),
						});
					}
				}
			}
			(AttributeKind::StringMap, Value::Map(items)) => {
				for (key, item) in items {
					if !matches!(item, Value::String(_)) {
						return Err(AppError::TypeMismatch {
							path: format!("{}.{}", path, key),
							expected: "a string",
							found: item.type_name(),
						});
					}
				}
			}
			(AttributeKind::Block { max_items, schema }, Value::List(blocks)) => {
				if let Some(max_items) = max_items {
					if blocks.len() > *max_items {
						return Err(AppError::validation(format!(
							"`{}` accepts at most {} block(s), found {}",
							path,
							max_items,
							blocks.len()
						)));
					}
				}
				for (index, block) in blocks.iter().enumerate() {
					let Value::Map(block) = block else {
						return Err(AppError::TypeMismatch {
							path: format!("{}.{}", path, index),
							expected: "a block",
							found: block.type_name(),
						});
					};
					schema.validate_at(block, &format!("{}.{}.", path, index))?;
				}
			}
			(AttributeKind::Bool, _) => return Err(type_error("a boolean")),
			(AttributeKind::Int, _) => return Err(type_error("an integer")),
			(AttributeKind::String, _) => return Err(type_error("a string")),
			(AttributeKind::StringList, _) | (AttributeKind::Block { .. }, _) => {
				return Err(type_error("a list"))
			}
			(AttributeKind::StringMap, _) => return Err(type_error("a map")),
		}

		if let Some(validate) = self.validate {
			validate(value, path)?;
		}

		Ok(())
	}
}

/// The attributes of a resource or of a nested block, by name
#[derive(Debug, Clone, Default)]
pub struct Schema {
	/// The declared attributes
	attributes: BTreeMap<&'static str, AttributeSchema>,
}

impl Schema {
	/// An empty schema
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares an attribute
	pub fn attribute(mut self, name: &'static str, attribute: AttributeSchema) -> Self {
		self.attributes.insert(name, attribute);
		self
	}

	/// Validates a configured block: required attributes must be set, every
	/// set attribute must have the declared type, and the validation
	/// callbacks must pass.
	pub fn validate(&self, block: &Block) -> Result<(), AppError> {
		self.validate_at(block, "")
	}

	/// Validates a block whose attributes are found under `prefix`
	fn validate_at(&self, block: &Block, prefix: &str) -> Result<(), AppError> {
		for (name, attribute) in &self.attributes {
			let path = format!("{}{}", prefix, name);
			match block.get(*name) {
				None | Some(Value::Null) if attribute.presence == Presence::Required => {
					return Err(AppError::validation(format!(
						"attribute `{}` is required",
						path
					)));
				}
				None | Some(Value::Null) => (),
				Some(value) => attribute.check(value, &path)?,
			}
		}
		Ok(())
	}

	/// Compares the prior state of a resource with its desired state
	pub fn diff(&self, old: &Block, new: &Block, data: &ResourceData) -> Diff {
		let mut diff = Diff::default();
		self.diff_into(old, new, data, "", false, &mut diff);
		diff
	}

	/// Records the differences between two blocks into `diff`
	fn diff_into(
		&self,
		old: &Block,
		new: &Block,
		data: &ResourceData,
		prefix: &str,
		parent_force_new: bool,
		diff: &mut Diff,
	) {
		for (name, attribute) in &self.attributes {
			if attribute.presence == Presence::Computed {
				continue;
			}
			let path = format!("{}{}", prefix, name);
			let force_new = parent_force_new || attribute.force_new;
			let old = old.get(*name).unwrap_or(&Value::Null);
			let new = new.get(*name).unwrap_or(&Value::Null);

			if new.is_empty() && attribute.presence == Presence::OptionalComputed {
				continue;
			}
			if old.is_empty() && new.is_empty() {
				continue;
			}

			match (&attribute.kind, old, new) {
				(AttributeKind::Block { schema, .. }, Value::List(old), Value::List(new))
					if old.len() == new.len() =>
				{
					for (index, (old, new)) in old.iter().zip(new).enumerate() {
						match (old, new) {
							(Value::Map(old), Value::Map(new)) => schema.diff_into(
								old,
								new,
								data,
								&format!("{}.{}.", path, index),
								force_new,
								diff,
							),
							(old, new) if old != new => {
								diff.record(format!("{}.{}", path, index), force_new)
							}
							_ => (),
						}
					}
				}
				(_, Value::String(old), Value::String(new))
					if attribute
						.diff_suppress
						.is_some_and(|suppress| suppress(old, new, data)) => {}
				(_, old, new) if old != new => diff.record(path, force_new),
				_ => (),
			}
		}
	}
}

/// The differences between the prior and the desired state of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
	/// The paths of the attributes that changed
	pub changed: Vec<String>,
	/// Whether any of the changes can only be applied by replacing the
	/// resource
	pub requires_replace: bool,
}

impl Diff {
	/// Whether nothing changed
	pub fn is_empty(&self) -> bool {
		self.changed.is_empty()
	}

	/// Records a changed attribute
	fn record(&mut self, path: String, force_new: bool) {
		self.changed.push(path);
		self.requires_replace |= force_new;
	}
}

use std::collections::BTreeMap;

use models::utils::Labels;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// The declarations of the attributes of a resource
mod attribute;
/// The state of a single resource instance
mod data;

pub use self::{attribute::*, data::*};

/// A map of attribute names to values. This is both the top level of a
/// resource's attributes, and the contents of every nested block.
pub type Block = BTreeMap<String, Value>;

/// A node of the attribute tree. Nested blocks are lists of maps, and a
/// singleton block is a list with at most one map in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	/// The attribute is not set
	#[default]
	Null,
	/// A boolean
	Bool(bool),
	/// An integer. Every integer in the tree is 64 bits wide, regardless of
	/// its size on the wire.
	Int(i64),
	/// A string
	String(String),
	/// A list, also used for blocks
	List(Vec<Value>),
	/// A map of strings to values, used for string maps and the contents of
	/// blocks
	Map(Block),
}

impl Value {
	/// A description of the type of the value, used in error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "a boolean",
			Self::Int(_) => "an integer",
			Self::String(_) => "a string",
			Self::List(_) => "a list",
			Self::Map(_) => "a map",
		}
	}

	/// Whether the value is null, or an empty string, list or map. The
	/// framework does not distinguish between these, so neither does the
	/// diff.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Null => true,
			Self::String(value) => value.is_empty(),
			Self::List(value) => value.is_empty(),
			Self::Map(value) => value.is_empty(),
			Self::Bool(_) | Self::Int(_) => false,
		}
	}

	/// Returns the string if this is a string
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Wraps a block in a list, as a singleton block is stored in the tree
	pub fn singleton(block: Block) -> Self {
		Self::List(vec![Self::Map(block)])
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<&String> for Value {
	fn from(value: &String) -> Self {
		Self::String(value.clone())
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Self::List(value)
	}
}

impl From<Block> for Value {
	fn from(value: Block) -> Self {
		Self::Map(value)
	}
}

impl From<&Labels> for Value {
	fn from(value: &Labels) -> Self {
		Self::Map(
			value
				.iter()
				.map(|(key, value)| (key.clone(), Self::from(value)))
				.collect(),
		)
	}
}

impl From<&[String]> for Value {
	fn from(value: &[String]) -> Self {
		Self::List(value.iter().map(Self::from).collect())
	}
}

impl<T> From<Option<T>> for Value
where
	T: Into<Value>,
{
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or_default()
	}
}

/// Reads the single block of a singleton block. An empty list (or a missing
/// attribute) is [`None`], never an empty block.
pub fn singleton<'a>(list: &'a [Value], path: &str) -> Result<Option<&'a Block>, AppError> {
	match list {
		[] => Ok(None),
		[Value::Map(block)] => Ok(Some(block)),
		[other] => Err(AppError::TypeMismatch {
			path: format!("{}.0", path),
			expected: "a block",
			found: other.type_name(),
		}),
		blocks => Err(AppError::validation(format!(
			"`{}` accepts at most one block, found {}",
			path,
			blocks.len()
		))),
	}
}

/// Builds the [`AppError::TypeMismatch`] for an attribute
fn mismatch(path: &str, expected: &'static str, found: &Value) -> AppError {
	AppError::TypeMismatch {
		path: path.to_string(),
		expected,
		found: found.type_name(),
	}
}

/// Checked getters over anything that holds attributes. Every getter treats a
/// missing attribute the same as a null one, and fails with an
/// [`AppError::TypeMismatch`] naming the attribute if the value has the wrong
/// type.
pub trait BlockExt {
	/// Returns the raw value of an attribute
	fn value(&self, key: &str) -> Option<&Value>;

	/// Returns a string attribute, or [`None`] if it is not set
	fn get_str(&self, key: &str) -> Result<Option<&str>, AppError> {
		match self.value(key) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::String(value)) => Ok(Some(value)),
			Some(other) => Err(mismatch(key, "a string", other)),
		}
	}

	/// Returns a string attribute, or an empty string if it is not set
	fn get_string(&self, key: &str) -> Result<String, AppError> {
		Ok(self.get_str(key)?.unwrap_or_default().to_string())
	}

	/// Returns a boolean attribute, or `false` if it is not set
	fn get_bool(&self, key: &str) -> Result<bool, AppError> {
		match self.value(key) {
			None | Some(Value::Null) => Ok(false),
			Some(Value::Bool(value)) => Ok(*value),
			Some(other) => Err(mismatch(key, "a boolean", other)),
		}
	}

	/// Returns an integer attribute, or [`None`] if it is not set
	fn get_int(&self, key: &str) -> Result<Option<i64>, AppError> {
		match self.value(key) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::Int(value)) => Ok(Some(*value)),
			Some(other) => Err(mismatch(key, "an integer", other)),
		}
	}

	/// Returns a list attribute, or an empty slice if it is not set
	fn get_list(&self, key: &str) -> Result<&[Value], AppError> {
		match self.value(key) {
			None | Some(Value::Null) => Ok(&[]),
			Some(Value::List(value)) => Ok(value),
			Some(other) => Err(mismatch(key, "a list", other)),
		}
	}

	/// Returns a list of strings
	fn get_string_list(&self, key: &str) -> Result<Vec<String>, AppError> {
		self.get_list(key)?
			.iter()
			.enumerate()
			.map(|(index, value)| match value {
				Value::String(value) => Ok(value.clone()),
				other => Err(mismatch(&format!("{}.{}", key, index), "a string", other)),
			})
			.collect()
	}

	/// Returns a map of strings, such as labels or tags
	fn get_labels(&self, key: &str) -> Result<Labels, AppError> {
		match self.value(key) {
			None | Some(Value::Null) => Ok(Labels::new()),
			Some(Value::Map(map)) => map
				.iter()
				.map(|(name, value)| match value {
					Value::String(value) => Ok((name.clone(), value.clone())),
					other => Err(mismatch(&format!("{}.{}", key, name), "a string", other)),
				})
				.collect(),
			Some(other) => Err(mismatch(key, "a map", other)),
		}
	}

	/// Returns the contents of a singleton block, or [`None`] if the block is
	/// not set
	fn get_block(&self, key: &str) -> Result<Option<&Block>, AppError> {
		singleton(self.get_list(key)?, key)
	}
}

impl BlockExt for Block {
	fn value(&self, key: &str) -> Option<&Value> {
		self.get(key)
	}
}

/// Builds a [`Block`] from a list of `key => value` pairs, converting every
/// value with [`Value::from`].
#[macro_export]
macro_rules! block {
	($($key:expr => $value:expr),* $(,)?) => {
		$crate::schema::Block::from([
			$(($key.to_string(), $crate::schema::Value::from($value))),*
		])
	};
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn getters_treat_missing_and_null_the_same() {
		let block = block! {
			"name" => Value::Null,
		};

		assert_eq!(block.get_str("name").unwrap(), None);
		assert_eq!(block.get_str("missing").unwrap(), None);
		assert!(!block.get_bool("missing").unwrap());
		assert_eq!(block.get_int("missing").unwrap(), None);
		assert!(block.get_list("missing").unwrap().is_empty());
		assert!(block.get_labels("missing").unwrap().is_empty());
		assert_eq!(block.get_block("missing").unwrap(), None);
	}

	#[test]
	fn getters_reject_the_wrong_type() {
		let block = block! {
			"replicas" => "two",
			"labels" => block! { "env" => 1i64 },
		};

		assert_eq!(
			block.get_int("replicas").unwrap_err().to_string(),
			"attribute `replicas` must be an integer, found a string"
		);
		assert_eq!(
			block.get_labels("labels").unwrap_err().to_string(),
			"attribute `labels.env` must be a string, found an integer"
		);
	}

	#[test]
	fn singleton_blocks_hold_at_most_one_block() {
		let spec = block! { "version" => "1.17.4" };

		assert_eq!(singleton(&[], "spec").unwrap(), None);
		assert_eq!(
			singleton(&[Value::Map(spec.clone())], "spec").unwrap(),
			Some(&spec)
		);
		assert_eq!(
			singleton(&[Value::Map(spec.clone()), Value::Map(spec)], "spec")
				.unwrap_err()
				.to_string(),
			"`spec` accepts at most one block, found 2"
		);
		assert_eq!(
			singleton(&[Value::from("oops")], "spec")
				.unwrap_err()
				.to_string(),
			"attribute `spec.0` must be a block, found a string"
		);
	}

	#[test]
	fn values_convert_from_json() {
		let value: Value = serde_json::from_value(json!({
			"name": "demo",
			"replicas": 2,
			"labels": { "env": "test" },
			"spec": [{ "enabled": true }],
			"expiry": null
		}))
		.unwrap();

		assert_eq!(
			value,
			Value::Map(block! {
				"name" => "demo",
				"replicas" => 2i64,
				"labels" => block! { "env" => "test" },
				"spec" => Value::singleton(block! { "enabled" => true }),
				"expiry" => Value::Null,
			})
		);
	}
}

//! Expanders turn the attribute tree of a block into the API model, and
//! flatteners turn the API model back into a tree. They follow the same rules
//! everywhere:
//!
//! - A singleton block that is not set expands to [`None`], never to a zero
//!   value, and [`None`] flattens to an empty list.
//! - Flatteners only emit strings, lists and maps that are not empty, and
//!   numbers that are not zero, so that a value the API leaves out does not
//!   show up as a change. Booleans and the few numbers that are always sent
//!   are always emitted.
//! - Unions (the cloud provider and the operating system) flatten to the one
//!   variant the API returned, and expand from the one variant that is set.
//!   Setting more than one variant is an error.

use models::utils::Labels;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{prelude::*, schema::singleton};

/// Mapping of clusters and their cloud specs
pub mod cluster;
/// Mapping of node deployments and the nodes they create
pub mod node;

/// Returns the single variant of a union block that is set, along with its
/// name. Variants that aren't listed are ignored.
pub fn union_variant<'a>(
	block: &'a Block,
	variants: &[&'static str],
) -> Result<Option<(&'static str, &'a Block)>, AppError> {
	let mut configured = Vec::new();
	for variant in variants {
		if let Some(inner) = block.get_block(variant)? {
			configured.push((*variant, inner));
		}
	}

	match configured.as_slice() {
		[] => Ok(None),
		[variant] => Ok(Some(*variant)),
		variants => Err(AppError::validation(format!(
			"only one of {} can be set, found {}",
			quoted(variants.iter().map(|(name, _)| *name)),
			variants.len()
		))),
	}
}

/// Joins names as `` `a`, `b` ``
fn quoted<'a>(names: impl Iterator<Item = &'a str>) -> String {
	names
		.map(|name| format!("`{}`", name))
		.collect::<Vec<_>>()
		.join(", ")
}

/// Expands a singleton block with the given function. Errors found inside the
/// block are prefixed with its name.
pub fn expand_block<T>(
	list: &[Value],
	name: &str,
	expand: impl FnOnce(&Block) -> Result<T, AppError>,
) -> Result<Option<T>, AppError> {
	let Some(block) = singleton(list, name)? else {
		return Ok(None);
	};
	expand(block).map(Some).map_err(|err| err.within(name))
}

/// Reads an integer that is 32 bits wide on the wire. Values that don't fit
/// are an error rather than being truncated.
pub fn get_i32(block: &Block, key: &str) -> Result<Option<i32>, AppError> {
	block
		.get_int(key)?
		.map(|value| {
			i32::try_from(value).map_err(|_| {
				AppError::validation(format!(
					"attribute `{}` must be between {} and {}, found {}",
					key,
					i32::MIN,
					i32::MAX,
					value
				))
			})
		})
		.transpose()
}

/// Inserts a string into a flattened block, unless it is empty
pub fn insert_str(block: &mut Block, key: &str, value: &str) {
	if !value.is_empty() {
		block.insert(key.to_string(), value.into());
	}
}

/// Inserts a map of strings into a flattened block, unless it is empty
pub fn insert_labels(block: &mut Block, key: &str, labels: &Labels) {
	if !labels.is_empty() {
		block.insert(key.to_string(), labels.into());
	}
}

/// Inserts a list into a flattened block, unless it is empty
pub fn insert_list(block: &mut Block, key: &str, list: Vec<Value>) {
	if !list.is_empty() {
		block.insert(key.to_string(), Value::List(list));
	}
}

/// Formats a timestamp as RFC 3339. A missing timestamp is null.
pub fn flatten_timestamp(timestamp: Option<OffsetDateTime>) -> Value {
	timestamp
		.and_then(|timestamp| timestamp.format(&Rfc3339).ok())
		.into()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::block;

	#[test]
	fn union_takes_the_only_set_variant() {
		let cloud = block! {
			"aws" => Value::List(vec![]),
			"openstack" => Value::singleton(block! { "flavor" => "m1.small" }),
		};

		let (name, variant) = union_variant(&cloud, &["aws", "azure", "openstack"])
			.unwrap()
			.unwrap();

		assert_eq!(name, "openstack");
		assert_eq!(variant.get_string("flavor").unwrap(), "m1.small");
	}

	#[test]
	fn union_rejects_more_than_one_variant() {
		let cloud = block! {
			"aws" => Value::singleton(Block::new()),
			"azure" => Value::singleton(Block::new()),
		};

		assert_eq!(
			union_variant(&cloud, &["aws", "azure", "openstack"])
				.unwrap_err()
				.to_string(),
			"only one of `aws`, `azure` can be set, found 2"
		);
	}

	#[test]
	fn union_of_nothing_is_none() {
		assert_eq!(union_variant(&Block::new(), &["aws"]).unwrap(), None);
	}

	#[test]
	fn narrowing_out_of_range_integers_fails() {
		let block = block! { "replicas" => i64::from(i32::MAX) + 1, "size" => 30i64 };

		assert!(get_i32(&block, "replicas").is_err());
		assert_eq!(get_i32(&block, "size").unwrap(), Some(30));
		assert_eq!(get_i32(&block, "missing").unwrap(), None);
	}

	#[test]
	fn blocks_prefix_their_errors() {
		let list = vec![Value::Map(block! { "replicas" => "two" })];

		let error = expand_block(&list, "spec", |block| block.get_int("replicas")).unwrap_err();

		assert_eq!(
			error.to_string(),
			"attribute `spec.0.replicas` must be an integer, found a string"
		);
	}

	#[test]
	fn timestamps_are_rfc3339() {
		assert_eq!(
			flatten_timestamp(Some(time::macros::datetime!(2020-03-05 10:11:12 UTC))),
			Value::from("2020-03-05T10:11:12Z")
		);
		assert_eq!(flatten_timestamp(None), Value::Null);
	}
}

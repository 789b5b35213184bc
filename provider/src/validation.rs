//! Validation and diff suppression callbacks shared by the resource schemas,
//! and the version checks of node deployments.

use models::{
	api::upgrade::MasterVersion,
	utils::constants::{CLUSTER_TYPE_KUBERNETES, CLUSTER_TYPE_OPENSHIFT},
};
use semver::Version;

use crate::prelude::*;

/// Label keys with this prefix are reserved for the platform
pub const RESERVED_LABEL_PREFIX: &str = "system/";
/// Tag keys with this prefix are used by the cloud controller to find the
/// resources of a cluster
pub const RESERVED_TAG_PREFIX: &str = "kubernetes.io/cluster/";
/// The effects a taint can have
pub const TAINT_EFFECTS: [&str; 3] = ["NoSchedule", "PreferNoSchedule", "NoExecute"];
/// The groups a service account can be in
pub const SERVICE_ACCOUNT_GROUPS: [&str; 2] = ["editors", "viewers"];

/// Rejects any key of a string map that starts with one of the prefixes
fn reject_prefixes(value: &Value, path: &str, prefixes: &[&str]) -> Result<(), AppError> {
	let Value::Map(map) = value else {
		return Ok(());
	};
	for key in map.keys() {
		if let Some(prefix) = prefixes.iter().find(|prefix| key.starts_with(**prefix)) {
			return Err(AppError::validation(format!(
				"`{}` cannot use the key `{}`: the prefix `{}` is reserved",
				path, key, prefix
			)));
		}
	}
	Ok(())
}

/// Validates the labels of a project, cluster or node
pub fn validate_labels(value: &Value, path: &str) -> Result<(), AppError> {
	reject_prefixes(value, path, &[RESERVED_LABEL_PREFIX])
}

/// Validates the tags of a cloud resource created for a node
pub fn validate_tags(value: &Value, path: &str) -> Result<(), AppError> {
	reject_prefixes(value, path, &[RESERVED_TAG_PREFIX, RESERVED_LABEL_PREFIX])
}

/// Rejects a string that isn't one of the allowed values
fn one_of(value: &Value, path: &str, allowed: &[&str]) -> Result<(), AppError> {
	match value.as_str() {
		Some(value) if !allowed.contains(&value) => Err(AppError::validation(format!(
			"`{}` must be one of {}, found `{}`",
			path,
			allowed.join(", "),
			value
		))),
		_ => Ok(()),
	}
}

/// Validates the effect of a taint
pub fn validate_taint_effect(value: &Value, path: &str) -> Result<(), AppError> {
	one_of(value, path, &TAINT_EFFECTS)
}

/// Validates the type of a cluster
pub fn validate_cluster_type(value: &Value, path: &str) -> Result<(), AppError> {
	one_of(
		value,
		path,
		&[CLUSTER_TYPE_KUBERNETES, CLUSTER_TYPE_OPENSHIFT],
	)
}

/// Validates the group of a service account
pub fn validate_service_account_group(value: &Value, path: &str) -> Result<(), AppError> {
	one_of(value, path, &SERVICE_ACCOUNT_GROUPS)
}

/// Validates that a version is a semantic version, with an optional leading
/// `v`
pub fn validate_version(value: &Value, path: &str) -> Result<(), AppError> {
	match value.as_str() {
		Some(version) => parse_version(version)
			.map(|_| ())
			.map_err(|err| AppError::validation(format!("`{}`: {}", path, err))),
		None => Ok(()),
	}
}

/// The API returns the group of a service account with the project ID
/// appended, so `editors` is the same as `editors-<project ID>`.
pub fn suppress_group_diff(old: &str, new: &str, data: &ResourceData) -> bool {
	if old == new {
		return true;
	}
	let Ok(Some(project_id)) = data.get_str("project_id") else {
		return false;
	};
	let with_project = |group: &str| {
		if group.ends_with(&format!("-{}", project_id)) {
			group.to_string()
		} else {
			format!("{}-{}", group, project_id)
		}
	};
	with_project(old) == with_project(new)
}

/// Versions are the same regardless of a leading `v`
pub fn suppress_version_prefix(old: &str, new: &str, _: &ResourceData) -> bool {
	old.trim_start_matches('v') == new.trim_start_matches('v')
}

/// Parses a semantic version, ignoring a leading `v`
pub fn parse_version(version: &str) -> Result<Version, AppError> {
	Version::parse(version.trim_start_matches('v')).map_err(|err| {
		AppError::validation(format!("`{}` is not a valid version: {}", version, err))
	})
}

/// Checks that the version of a node deployment does not exceed the version
/// of its cluster
pub fn validate_node_version(node_version: &str, cluster_version: &str) -> Result<(), AppError> {
	let node = parse_version(node_version)?;
	let cluster = parse_version(cluster_version)?;
	if node > cluster {
		return Err(AppError::validation(format!(
			"node deployment version `{}` cannot be greater than cluster version `{}`",
			node_version, cluster_version
		)));
	}
	Ok(())
}

/// Checks that the version of a node deployment is one of the versions nodes
/// can run for the version of their cluster
pub fn validate_node_version_available(
	node_version: &str,
	cluster_version: &str,
	available: &[MasterVersion],
) -> Result<(), AppError> {
	let node = parse_version(node_version)?;
	let found = available
		.iter()
		.filter_map(|available| parse_version(&available.version).ok())
		.any(|available| available == node);
	if found {
		return Ok(());
	}

	Err(AppError::validation(format!(
		"node deployment version `{}` is not available for cluster version `{}`, available \
		 versions are: {}",
		node_version,
		cluster_version,
		available
			.iter()
			.map(|available| available.version.as_str())
			.collect::<Vec<_>>()
			.join(", ")
	)))
}

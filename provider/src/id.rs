//! Some resources are scoped to others, and the API needs the IDs of all the
//! parents to address them. Those resources store all of them in their ID,
//! joined with `:`. The separator is not escaped, so none of the parts may
//! contain a `:`.

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use crate::prelude::*;

/// The separator between the parts of a composite ID
const SEPARATOR: char = ':';

/// Splits a composite ID into exactly `N` non-empty parts
fn split<const N: usize>(id: &str, format: &str) -> Result<[String; N], AppError> {
	let parts = id.split(SEPARATOR).map(str::to_string).collect::<Vec<_>>();
	let parts: [String; N] = parts.try_into().map_err(|parts: Vec<String>| {
		AppError::invalid_id(
			id,
			format!(
				"expected {} parts in the format `{}`, found {}",
				N,
				format,
				parts.len()
			),
		)
	})?;
	if parts.iter().any(String::is_empty) {
		return Err(AppError::invalid_id(
			id,
			format!("every part of `{}` must be set", format),
		));
	}
	Ok(parts)
}

/// The ID of a service account: `<project ID>:<service account ID>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountId {
	/// The ID of the project the service account belongs to
	pub project_id: String,
	/// The ID of the service account itself
	pub service_account_id: String,
}

impl FromStr for ServiceAccountId {
	type Err = AppError;

	fn from_str(id: &str) -> Result<Self, Self::Err> {
		let [project_id, service_account_id] = split(id, "project_id:service_account_id")?;
		Ok(Self {
			project_id,
			service_account_id,
		})
	}
}

impl Display for ServiceAccountId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.project_id, self.service_account_id)
	}
}

/// The ID of a service account token:
/// `<project ID>:<service account ID>:<token ID>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountTokenId {
	/// The ID of the project the service account belongs to
	pub project_id: String,
	/// The ID of the service account the token belongs to
	pub service_account_id: String,
	/// The ID of the token itself
	pub token_id: String,
}

impl ServiceAccountTokenId {
	/// The ID of the service account the token belongs to
	pub fn service_account(&self) -> ServiceAccountId {
		ServiceAccountId {
			project_id: self.project_id.clone(),
			service_account_id: self.service_account_id.clone(),
		}
	}
}

impl FromStr for ServiceAccountTokenId {
	type Err = AppError;

	fn from_str(id: &str) -> Result<Self, Self::Err> {
		let [project_id, service_account_id, token_id] =
			split(id, "project_id:service_account_id:token_id")?;
		Ok(Self {
			project_id,
			service_account_id,
			token_id,
		})
	}
}

impl Display for ServiceAccountTokenId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}:{}:{}",
			self.project_id, self.service_account_id, self.token_id
		)
	}
}

/// The ID of a node deployment:
/// `<project ID>:<datacenter>:<cluster ID>:<node deployment ID>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDeploymentId {
	/// The ID of the project the cluster belongs to
	pub project_id: String,
	/// The datacenter the cluster runs in
	pub datacenter: String,
	/// The ID of the cluster the node deployment belongs to
	pub cluster_id: String,
	/// The ID of the node deployment itself
	pub node_deployment_id: String,
}

impl FromStr for NodeDeploymentId {
	type Err = AppError;

	fn from_str(id: &str) -> Result<Self, Self::Err> {
		let [project_id, datacenter, cluster_id, node_deployment_id] =
			split(id, "project_id:datacenter:cluster_id:node_deployment_id")?;
		Ok(Self {
			project_id,
			datacenter,
			cluster_id,
			node_deployment_id,
		})
	}
}

impl Display for NodeDeploymentId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}:{}:{}:{}",
			self.project_id, self.datacenter, self.cluster_id, self.node_deployment_id
		)
	}
}

/// The import ID of a cluster: `<project ID>:<datacenter>:<cluster ID>`. The
/// ID stored for a cluster is only the cluster ID, with the project and the
/// datacenter kept in their own attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterImportId {
	/// The ID of the project the cluster belongs to
	pub project_id: String,
	/// The datacenter the cluster runs in
	pub datacenter: String,
	/// The ID of the cluster
	pub cluster_id: String,
}

impl FromStr for ClusterImportId {
	type Err = AppError;

	fn from_str(id: &str) -> Result<Self, Self::Err> {
		let [project_id, datacenter, cluster_id] = split(id, "project_id:datacenter:cluster_id")?;
		Ok(Self {
			project_id,
			datacenter,
			cluster_id,
		})
	}
}

/// The import ID of an SSH key: `<project ID>:<key ID>`. The ID stored for a
/// key is only the key ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshKeyImportId {
	/// The ID of the project the key belongs to
	pub project_id: String,
	/// The ID of the key
	pub key_id: String,
}

impl FromStr for SshKeyImportId {
	type Err = AppError;

	fn from_str(id: &str) -> Result<Self, Self::Err> {
		let [project_id, key_id] = split(id, "project_id:key_id")?;
		Ok(Self { project_id, key_id })
	}
}

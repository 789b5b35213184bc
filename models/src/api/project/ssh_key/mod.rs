use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The endpoint to create an SSH key
mod create_ssh_key;
/// The endpoint to delete an SSH key
mod delete_ssh_key;
/// The endpoint to list all the SSH keys of a project
mod list_ssh_keys;

pub use self::{create_ssh_key::*, delete_ssh_key::*, list_ssh_keys::*};

/// A public SSH key registered to a project. Keys are injected into the
/// nodes of the clusters they are assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SshKey {
	/// The ID of the key, generated by the API. Empty when creating one.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// The name of the key
	pub name: String,
	/// When the key was created
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub creation_timestamp: Option<OffsetDateTime>,
	/// The contents of the key
	pub spec: SshKeySpec,
}

/// The contents of an SSH key
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SshKeySpec {
	/// The fingerprint of the key, computed by the API
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub fingerprint: String,
	/// The public key, in the `authorized_keys` format
	pub public_key: String,
}

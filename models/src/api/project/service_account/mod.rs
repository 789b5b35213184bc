use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// All endpoints that act on a token of a service account
pub mod token;

/// The endpoint to add a service account to a project
mod create_service_account;
/// The endpoint to delete a service account
mod delete_service_account;
/// The endpoint to list all the service accounts of a project
mod list_service_accounts;

pub use self::{create_service_account::*, delete_service_account::*, list_service_accounts::*};

/// A non-human identity scoped to a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
	/// The ID of the service account, generated by the API
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// The name of the service account
	pub name: String,
	/// The group the service account belongs to. Sent as `editors` or
	/// `viewers`, and returned with the project ID appended, as in
	/// `editors-<project id>`.
	pub group: String,
	/// When the service account was created
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub creation_timestamp: Option<OffsetDateTime>,
	/// The status of the service account, such as `Active` or `Inactive`
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub status: String,
}

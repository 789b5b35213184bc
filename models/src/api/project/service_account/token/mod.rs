use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The endpoint to create a token for a service account
mod create_token;
/// The endpoint to delete a token
mod delete_token;
/// The endpoint to list all the tokens of a service account
mod list_tokens;
/// The endpoint to rename a token
mod patch_token;

pub use self::{create_token::*, delete_token::*, list_tokens::*, patch_token::*};

/// A token of a service account, without its secret value. This is what the
/// API returns everywhere except when the token is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicServiceAccountToken {
	/// The ID of the token, generated by the API
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// The name of the token
	pub name: String,
	/// When the token was created
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub creation_timestamp: Option<OffsetDateTime>,
	/// When the token expires
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub expiry: Option<OffsetDateTime>,
}

/// A token of a service account, along with its secret value. The value is
/// only ever returned once, when the token is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountToken {
	/// The public details of the token
	#[serde(flatten)]
	pub details: PublicServiceAccountToken,
	/// The secret value of the token
	#[serde(default)]
	pub token: String,
}

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::Labels;

/// All endpoints that act on a cluster of a project
pub mod cluster;
/// All endpoints that act on a service account of a project
pub mod service_account;
/// All endpoints that act on an SSH key of a project
pub mod ssh_key;

/// The endpoint to create a project
mod create_project;
/// The endpoint to delete a project
mod delete_project;
/// The endpoint to get the details of a project
mod get_project;
/// The endpoint to list all the projects the token has access to
mod list_projects;
/// The endpoint to update the name and labels of a project
mod update_project;

pub use self::{
	create_project::*,
	delete_project::*,
	get_project::*,
	list_projects::*,
	update_project::*,
};

/// A project is the tenant that every other resource is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
	/// The ID of the project, generated by the API
	pub id: String,
	/// The name of the project
	pub name: String,
	/// The labels attached to the project
	#[serde(default, skip_serializing_if = "Labels::is_empty")]
	pub labels: Labels,
	/// The current status of the project
	pub status: ProjectStatus,
	/// When the project was created
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub creation_timestamp: Option<OffsetDateTime>,
}

/// The status of a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
	/// The project is ready to be used
	Active,
	/// The project is still being set up
	Inactive,
	/// The project is being deleted
	Terminating,
}

impl Display for ProjectStatus {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}",
			match self {
				Self::Active => "Active",
				Self::Inactive => "Inactive",
				Self::Terminating => "Terminating",
			}
		)
	}
}

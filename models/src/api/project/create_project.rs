use super::Project;
use crate::utils::Labels;

declare_api_endpoint!(
	/// The endpoint to create a project. The request holds the body.
	CreateProjectRequest,
	POST "/api/v1/projects" as CreateProjectPath,
	request = {
		/// The name of the project
		pub name: String,
		/// The labels to attach to the project
		#[serde(default, skip_serializing_if = "Labels::is_empty")]
		pub labels: Labels,
	},
	response = Project,
);

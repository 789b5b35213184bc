use super::Project;
use crate::utils::Labels;

declare_api_endpoint!(
	/// The endpoint to update a project. Only the name and the labels of a
	/// project can be changed in place.
	UpdateProjectRequest,
	PUT "/api/v1/projects/:project_id" as UpdateProjectPath {
		/// The ID of the project
		pub project_id: String,
	},
	request = {
		/// The ID of the project, repeated in the body
		pub id: String,
		/// The new name of the project
		pub name: String,
		/// The new labels of the project. Labels missing from this map are
		/// removed from the project.
		#[serde(default)]
		pub labels: Labels,
	},
	response = Project,
);

use super::Project;

declare_api_endpoint!(
	/// The endpoint to get the details of a project
	GetProjectRequest,
	GET "/api/v1/projects/:project_id" as GetProjectPath {
		/// The ID of the project
		pub project_id: String,
	},
	response = Project,
);

declare_api_endpoint!(
	/// The endpoint to delete a project. The project is deleted
	/// asynchronously, and keeps responding to requests until it is gone.
	DeleteProjectRequest,
	DELETE "/api/v1/projects/:project_id" as DeleteProjectPath {
		/// The ID of the project
		pub project_id: String,
	},
);

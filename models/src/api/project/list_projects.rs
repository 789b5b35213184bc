use super::Project;

declare_api_endpoint!(
	/// The endpoint to list all the projects the token has access to
	ListProjectsRequest,
	GET "/api/v1/projects" as ListProjectsPath,
	response = Vec<Project>,
);

use super::ServiceAccount;

declare_api_endpoint!(
	/// The endpoint to list all the service accounts of a project. There is
	/// no endpoint to get a single service account.
	ListServiceAccountsRequest,
	GET "/api/v1/projects/:project_id/serviceaccounts" as ListServiceAccountsPath {
		/// The ID of the project
		pub project_id: String,
	},
	response = Vec<ServiceAccount>,
);

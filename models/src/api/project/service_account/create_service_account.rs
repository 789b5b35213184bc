use super::ServiceAccount;

declare_api_endpoint!(
	/// The endpoint to add a service account to a project
	CreateServiceAccountRequest,
	POST "/api/v1/projects/:project_id/serviceaccounts" as CreateServiceAccountPath {
		/// The ID of the project
		pub project_id: String,
	},
	request = {
		/// The name of the service account
		pub name: String,
		/// The group of the service account, either `editors` or `viewers`
		pub group: String,
	},
	response = ServiceAccount,
);

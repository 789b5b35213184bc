declare_api_endpoint!(
	/// The endpoint to delete a service account
	DeleteServiceAccountRequest,
	DELETE "/api/v1/projects/:project_id/serviceaccounts/:service_account_id"
		as DeleteServiceAccountPath {
		/// The ID of the project the service account belongs to
		pub project_id: String,
		/// The ID of the service account
		pub service_account_id: String,
	},
);

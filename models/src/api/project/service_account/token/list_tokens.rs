use super::PublicServiceAccountToken;

declare_api_endpoint!(
	/// The endpoint to list all the tokens of a service account
	ListTokensRequest,
	GET "/api/v1/projects/:project_id/serviceaccounts/:service_account_id/tokens"
		as ListTokensPath {
		/// The ID of the project the service account belongs to
		pub project_id: String,
		/// The ID of the service account
		pub service_account_id: String,
	},
	response = Vec<PublicServiceAccountToken>,
);

use super::ServiceAccountToken;

declare_api_endpoint!(
	/// The endpoint to create a token for a service account
	CreateTokenRequest,
	POST "/api/v1/projects/:project_id/serviceaccounts/:service_account_id/tokens"
		as CreateTokenPath {
		/// The ID of the project the service account belongs to
		pub project_id: String,
		/// The ID of the service account
		pub service_account_id: String,
	},
	request = {
		/// The name of the token
		pub name: String,
	},
	response = ServiceAccountToken,
);

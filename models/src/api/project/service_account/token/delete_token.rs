declare_api_endpoint!(
	/// The endpoint to delete a token
	DeleteTokenRequest,
	DELETE "/api/v1/projects/:project_id/serviceaccounts/:service_account_id/tokens/:token_id"
		as DeleteTokenPath {
		/// The ID of the project the service account belongs to
		pub project_id: String,
		/// The ID of the service account
		pub service_account_id: String,
		/// The ID of the token
		pub token_id: String,
	},
);

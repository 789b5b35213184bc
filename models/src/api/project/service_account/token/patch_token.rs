use super::PublicServiceAccountToken;

declare_api_endpoint!(
	/// The endpoint to rename a token. The name is the only thing that can be
	/// changed on a token.
	PatchTokenRequest,
	PATCH "/api/v1/projects/:project_id/serviceaccounts/:service_account_id/tokens/:token_id"
		as PatchTokenPath {
		/// The ID of the project the service account belongs to
		pub project_id: String,
		/// The ID of the service account
		pub service_account_id: String,
		/// The ID of the token
		pub token_id: String,
	},
	request = {
		/// The new name of the token
		pub name: String,
	},
	response = PublicServiceAccountToken,
);

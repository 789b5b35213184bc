declare_api_endpoint!(
	/// The endpoint to delete an SSH key
	DeleteSshKeyRequest,
	DELETE "/api/v1/projects/:project_id/sshkeys/:key_id" as DeleteSshKeyPath {
		/// The ID of the project the key belongs to
		pub project_id: String,
		/// The ID of the key
		pub key_id: String,
	},
);

use super::{SshKey, SshKeySpec};

declare_api_endpoint!(
	/// The endpoint to create an SSH key
	CreateSshKeyRequest,
	POST "/api/v1/projects/:project_id/sshkeys" as CreateSshKeyPath {
		/// The ID of the project to register the key in
		pub project_id: String,
	},
	request = {
		/// The name of the key
		pub name: String,
		/// The contents of the key. The fingerprint is computed by the API.
		pub spec: SshKeySpec,
	},
	response = SshKey,
);

use super::SshKey;

declare_api_endpoint!(
	/// The endpoint to list all the SSH keys of a project. There is no
	/// endpoint to get a single key, so keys are looked up in this list.
	ListSshKeysRequest,
	GET "/api/v1/projects/:project_id/sshkeys" as ListSshKeysPath {
		/// The ID of the project
		pub project_id: String,
	},
	response = Vec<SshKey>,
);

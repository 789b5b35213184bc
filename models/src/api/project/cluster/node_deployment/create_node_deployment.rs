use super::NodeDeployment;

declare_api_endpoint!(
	/// The endpoint to create a node deployment. The node deployment itself
	/// is sent as the body.
	CreateNodeDeploymentRequest,
	POST "/api/v1/projects/:project_id/dc/:datacenter/clusters/:cluster_id/nodedeployments"
		as CreateNodeDeploymentPath {
		/// The ID of the project the cluster belongs to
		pub project_id: String,
		/// The datacenter the cluster runs in
		pub datacenter: String,
		/// The ID of the cluster to add the node deployment to
		pub cluster_id: String,
	},
	request_body = NodeDeployment,
	response = NodeDeployment,
);

use super::NodeDeployment;

declare_api_endpoint!(
	/// The endpoint to get the details of a node deployment
	GetNodeDeploymentRequest,
	GET "/api/v1/projects/:project_id/dc/:datacenter/clusters/:cluster_id/nodedeployments/:node_deployment_id"
		as GetNodeDeploymentPath {
		/// The ID of the project the cluster belongs to
		pub project_id: String,
		/// The datacenter the cluster runs in
		pub datacenter: String,
		/// The ID of the cluster the node deployment belongs to
		pub cluster_id: String,
		/// The ID of the node deployment
		pub node_deployment_id: String,
	},
	response = NodeDeployment,
);

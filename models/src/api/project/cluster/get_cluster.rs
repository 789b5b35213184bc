use super::Cluster;

declare_api_endpoint!(
	/// The endpoint to get the details of a cluster
	GetClusterRequest,
	GET "/api/v1/projects/:project_id/dc/:datacenter/clusters/:cluster_id" as GetClusterPath {
		/// The ID of the project the cluster belongs to
		pub project_id: String,
		/// The datacenter the cluster runs in
		pub datacenter: String,
		/// The ID of the cluster
		pub cluster_id: String,
	},
	response = Cluster,
);

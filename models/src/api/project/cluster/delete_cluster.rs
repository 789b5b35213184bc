declare_api_endpoint!(
	/// The endpoint to delete a cluster. The cluster is deleted
	/// asynchronously, and keeps responding to requests until it is gone.
	DeleteClusterRequest,
	DELETE "/api/v1/projects/:project_id/dc/:datacenter/clusters/:cluster_id" as DeleteClusterPath {
		/// The ID of the project the cluster belongs to
		pub project_id: String,
		/// The datacenter the cluster runs in
		pub datacenter: String,
		/// The ID of the cluster
		pub cluster_id: String,
	},
);

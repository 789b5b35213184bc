use super::Cluster;

declare_api_endpoint!(
	/// The endpoint to create a cluster
	CreateClusterRequest,
	POST "/api/v1/projects/:project_id/dc/:datacenter/clusters" as CreateClusterPath {
		/// The ID of the project to create the cluster in
		pub project_id: String,
		/// The datacenter to create the cluster in
		pub datacenter: String,
	},
	request = {
		/// The cluster to create. The ID and the timestamps are ignored.
		pub cluster: Cluster,
	},
	response = Cluster,
);

use serde::{Deserialize, Serialize};

declare_api_endpoint!(
	/// The endpoint to get the health of the components of a cluster
	GetClusterHealthRequest,
	GET "/api/v1/projects/:project_id/dc/:datacenter/clusters/:cluster_id/health"
		as GetClusterHealthPath {
		/// The ID of the project the cluster belongs to
		pub project_id: String,
		/// The datacenter the cluster runs in
		pub datacenter: String,
		/// The ID of the cluster
		pub cluster_id: String,
	},
	response = ClusterHealth,
);

/// The health of every component of a cluster's control plane
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterHealth {
	/// The health of the API server
	#[serde(default)]
	pub apiserver: HealthStatus,
	/// The health of the scheduler
	#[serde(default)]
	pub scheduler: HealthStatus,
	/// The health of the controller manager
	#[serde(default)]
	pub controller: HealthStatus,
	/// The health of the machine controller
	#[serde(default)]
	pub machine_controller: HealthStatus,
	/// The health of etcd
	#[serde(default)]
	pub etcd: HealthStatus,
	/// The health of the cloud provider infrastructure of the cluster
	#[serde(default)]
	pub cloud_provider_infrastructure: HealthStatus,
	/// The health of the user cluster controller manager
	#[serde(default)]
	pub user_cluster_controller_manager: HealthStatus,
}

impl ClusterHealth {
	/// All the components of the health, along with their names
	pub fn components(&self) -> [(&'static str, HealthStatus); 7] {
		[
			("apiserver", self.apiserver),
			("scheduler", self.scheduler),
			("controller", self.controller),
			("machineController", self.machine_controller),
			("etcd", self.etcd),
			("cloudProviderInfrastructure", self.cloud_provider_infrastructure),
			(
				"userClusterControllerManager",
				self.user_cluster_controller_manager,
			),
		]
	}

	/// Whether every component of the cluster is up
	pub fn is_healthy(&self) -> bool {
		self.components()
			.iter()
			.all(|(_, status)| *status == HealthStatus::Up)
	}

	/// The names of the components that are not up yet
	pub fn pending_components(&self) -> Vec<&'static str> {
		self.components()
			.into_iter()
			.filter(|(_, status)| *status != HealthStatus::Up)
			.map(|(name, _)| name)
			.collect()
	}
}

/// The health of a single component. The API sends these as numbers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum HealthStatus {
	/// The component is down
	#[default]
	Down,
	/// The component is up and running
	Up,
	/// The component is still being provisioned
	Provisioning,
}

impl TryFrom<u8> for HealthStatus {
	type Error = String;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Self::Down),
			1 => Ok(Self::Up),
			2 => Ok(Self::Provisioning),
			value => Err(format!("unknown health status `{}`", value)),
		}
	}
}

impl From<HealthStatus> for u8 {
	fn from(value: HealthStatus) -> Self {
		match value {
			HealthStatus::Down => 0,
			HealthStatus::Up => 1,
			HealthStatus::Provisioning => 2,
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_test::{assert_de_tokens_error, assert_tokens, Token};

	use super::*;

	#[test]
	fn assert_health_status_types() {
		assert_tokens(&HealthStatus::Up, &[Token::U8(1)]);
		assert_tokens(&HealthStatus::Provisioning, &[Token::U8(2)]);
		assert_de_tokens_error::<HealthStatus>(&[Token::U8(7)], "unknown health status `7`");
	}

	#[test]
	fn healthy_only_when_every_component_is_up() {
		let health: ClusterHealth = serde_json::from_str(
			r#"{
				"apiserver": 1,
				"scheduler": 1,
				"controller": 1,
				"machineController": 1,
				"etcd": 1,
				"cloudProviderInfrastructure": 1,
				"userClusterControllerManager": 1
			}"#,
		)
		.unwrap();
		assert!(health.is_healthy());
		assert!(health.pending_components().is_empty());

		let health = ClusterHealth {
			etcd: HealthStatus::Provisioning,
			..health
		};
		assert!(!health.is_healthy());
		assert_eq!(health.pending_components(), vec!["etcd"]);
	}

	#[test]
	fn missing_components_are_down() {
		let health: ClusterHealth = serde_json::from_str(r#"{"apiserver": 1}"#).unwrap();

		assert!(!health.is_healthy());
		assert_eq!(health.machine_controller, HealthStatus::Down);
	}
}

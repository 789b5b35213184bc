use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::{is_false, is_zero, Labels};

/// The endpoint to create a node deployment
mod create_node_deployment;
/// The endpoint to delete a node deployment
mod delete_node_deployment;
/// The endpoint to get the details of a node deployment
mod get_node_deployment;

pub use self::{create_node_deployment::*, delete_node_deployment::*, get_node_deployment::*};

/// A node deployment is a scalable pool of worker nodes bound to one cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDeployment {
	/// The ID of the node deployment, generated by the API. Empty when
	/// creating one.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// The name of the node deployment. Generated by the API if empty.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub name: String,
	/// The specification of the node deployment
	pub spec: NodeDeploymentSpec,
	/// The current status of the node deployment
	#[serde(default, skip_serializing)]
	pub status: NodeDeploymentStatus,
	/// When the node deployment was created
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub creation_timestamp: Option<OffsetDateTime>,
	/// When the node deployment was marked for deletion
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub deletion_timestamp: Option<OffsetDateTime>,
}

/// The specification of a node deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDeploymentSpec {
	/// The number of nodes the deployment should have. Always sent, even if
	/// zero.
	pub replicas: i32,
	/// The template every node of the deployment is created from
	pub template: NodeSpec,
	/// Whether the kubelets of the nodes use dynamic configuration
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dynamic_config: Option<bool>,
}

/// The replica counts of a node deployment, as observed by the API
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDeploymentStatus {
	/// The number of nodes that exist
	#[serde(default)]
	pub replicas: i32,
	/// The number of nodes that are ready
	#[serde(default)]
	pub ready_replicas: i32,
	/// The number of nodes that are available
	#[serde(default)]
	pub available_replicas: i32,
	/// The number of nodes running the latest template
	#[serde(default)]
	pub updated_replicas: i32,
	/// The number of nodes that are not available
	#[serde(default)]
	pub unavailable_replicas: i32,
}

/// The template a node is created from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
	/// The cloud specific settings of the node
	pub cloud: NodeCloudSpec,
	/// The operating system of the node
	pub operating_system: OperatingSystemSpec,
	/// The versions of the components running on the node
	#[serde(default)]
	pub versions: NodeVersionInfo,
	/// The Kubernetes labels of the node
	#[serde(default, skip_serializing_if = "Labels::is_empty")]
	pub labels: Labels,
	/// The taints of the node
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub taints: Vec<TaintSpec>,
}

/// The versions of the components running on a node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeVersionInfo {
	/// The version of the kubelet
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub kubelet: String,
}

/// A taint applied to a node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaintSpec {
	/// The key of the taint
	pub key: String,
	/// The value of the taint
	#[serde(default)]
	pub value: String,
	/// The effect of the taint. One of `NoSchedule`, `PreferNoSchedule` or
	/// `NoExecute`.
	pub effect: String,
}

/// The cloud specific settings of a node. Like [`CloudSpec`], this is a union
/// where exactly one of the `aws`, `azure` or `openstack` keys is sent.
///
/// [`CloudSpec`]: super::CloudSpec
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeCloudSpec {
	/// The provider specific settings. [`None`] if the API sent a provider
	/// this crate doesn't know about yet.
	#[serde(flatten)]
	pub provider: Option<NodeCloudProvider>,
}

/// The provider specific part of a [`NodeCloudSpec`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeCloudProvider {
	/// A node running on AWS
	Aws(AwsNodeSpec),
	/// A node running on Azure
	Azure(AzureNodeSpec),
	/// A node running on OpenStack
	Openstack(OpenstackNodeSpec),
}

impl NodeCloudProvider {
	/// The name of the provider, as used in the wire format and in the
	/// attribute tree
	pub fn name(&self) -> &'static str {
		match self {
			Self::Aws(_) => "aws",
			Self::Azure(_) => "azure",
			Self::Openstack(_) => "openstack",
		}
	}
}

/// The AWS specific settings of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsNodeSpec {
	/// The instance type of the node
	#[serde(rename = "instanceType")]
	pub instance_type: String,
	/// The size of the root volume in GB
	#[serde(rename = "diskSize")]
	pub volume_size: i64,
	/// The type of the root volume
	#[serde(rename = "volumeType")]
	pub volume_type: String,
	/// The availability zone the node runs in
	#[serde(rename = "availabilityZone", default, skip_serializing_if = "String::is_empty")]
	pub availability_zone: String,
	/// The subnet the node is attached to
	#[serde(rename = "subnetID", default, skip_serializing_if = "String::is_empty")]
	pub subnet_id: String,
	/// Whether the node gets a public IP
	#[serde(rename = "assignPublicIP", default, skip_serializing_if = "is_false")]
	pub assign_public_ip: bool,
	/// The AMI the node boots from. The default AMI of the datacenter is used
	/// if empty.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub ami: String,
	/// The tags attached to the instance
	#[serde(default, skip_serializing_if = "Labels::is_empty")]
	pub tags: Labels,
}

/// The Azure specific settings of a node. The API does not send back the
/// image ID, and normalises the size.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AzureNodeSpec {
	/// The VM size of the node
	pub size: String,
	/// Whether the node gets a public IP
	#[serde(rename = "assignPublicIP", default, skip_serializing_if = "is_false")]
	pub assign_public_ip: bool,
	/// The size of the data disk in GB
	#[serde(rename = "dataDiskSize", default, skip_serializing_if = "is_zero")]
	pub disk_size_gb: i32,
	/// The size of the OS disk in GB
	#[serde(rename = "osDiskSize", default, skip_serializing_if = "is_zero")]
	pub os_disk_size_gb: i32,
	/// The image the node boots from
	#[serde(rename = "imageID", default, skip_serializing_if = "String::is_empty")]
	pub image_id: String,
	/// The tags attached to the VM
	#[serde(default, skip_serializing_if = "Labels::is_empty")]
	pub tags: Labels,
	/// The availability zones the node can be placed in
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub zones: Vec<String>,
}

/// The OpenStack specific settings of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenstackNodeSpec {
	/// The flavor of the node
	pub flavor: String,
	/// The image the node boots from
	pub image: String,
	/// The size of the root disk in GB. The size of the flavor is used if
	/// not set.
	#[serde(rename = "diskSize", default, skip_serializing_if = "Option::is_none")]
	pub disk_size: Option<i64>,
	/// Whether the node gets a floating IP
	#[serde(rename = "useFloatingIP", default, skip_serializing_if = "is_false")]
	pub use_floating_ip: bool,
	/// The tags attached to the instance
	#[serde(default, skip_serializing_if = "Labels::is_empty")]
	pub tags: Labels,
}

/// The operating system of a node. This is a union where exactly one of the
/// `ubuntu`, `centos` or `containerLinux` keys is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatingSystemSpec {
	/// The operating system specific settings. [`None`] if the API sent an
	/// operating system this crate doesn't know about yet.
	#[serde(flatten)]
	pub system: Option<OperatingSystem>,
}

/// The operating system specific part of an [`OperatingSystemSpec`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OperatingSystem {
	/// Ubuntu
	Ubuntu(UbuntuSpec),
	/// CentOS
	Centos(CentosSpec),
	/// Container Linux
	ContainerLinux(ContainerLinuxSpec),
}

impl OperatingSystem {
	/// The name of the operating system, as used in the attribute tree
	pub fn name(&self) -> &'static str {
		match self {
			Self::Ubuntu(_) => "ubuntu",
			Self::Centos(_) => "centos",
			Self::ContainerLinux(_) => "container_linux",
		}
	}
}

/// The Ubuntu specific settings of a node
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UbuntuSpec {
	/// Whether the packages are upgraded when the node boots
	#[serde(default)]
	pub dist_upgrade_on_boot: bool,
}

/// The CentOS specific settings of a node
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CentosSpec {
	/// Whether the packages are upgraded when the node boots
	#[serde(default)]
	pub dist_upgrade_on_boot: bool,
}

/// The Container Linux specific settings of a node
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerLinuxSpec {
	/// Whether automatic updates are disabled
	#[serde(default)]
	pub disable_auto_update: bool,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn parses_node_deployment_status() {
		let deployment: NodeDeployment = serde_json::from_value(json!({
			"id": "nd-1",
			"name": "workers",
			"spec": {
				"replicas": 2,
				"template": {
					"cloud": { "openstack": { "flavor": "m1.small", "image": "Ubuntu Bionic" } },
					"operatingSystem": { "ubuntu": { "distUpgradeOnBoot": false } },
					"versions": { "kubelet": "1.17.4" }
				}
			},
			"status": { "replicas": 2, "readyReplicas": 1 }
		}))
		.unwrap();

		assert_eq!(deployment.spec.replicas, 2);
		assert_eq!(deployment.status.ready_replicas, 1);
		assert_eq!(deployment.status.available_replicas, 0);
		assert_eq!(
			deployment.spec.template.operating_system.system,
			Some(OperatingSystem::Ubuntu(UbuntuSpec::default()))
		);
		assert_eq!(
			deployment.spec.template.cloud.provider,
			Some(NodeCloudProvider::Openstack(OpenstackNodeSpec {
				flavor: "m1.small".to_string(),
				image: "Ubuntu Bionic".to_string(),
				..Default::default()
			}))
		);
	}

	#[test]
	fn status_is_never_sent() {
		let deployment = NodeDeployment {
			id: String::new(),
			name: "workers".to_string(),
			spec: NodeDeploymentSpec {
				replicas: 0,
				template: NodeSpec {
					operating_system: OperatingSystemSpec {
						system: Some(OperatingSystem::ContainerLinux(ContainerLinuxSpec {
							disable_auto_update: true,
						})),
					},
					..Default::default()
				},
				dynamic_config: None,
			},
			status: NodeDeploymentStatus {
				replicas: 3,
				..Default::default()
			},
			creation_timestamp: None,
			deletion_timestamp: None,
		};

		assert_eq!(
			serde_json::to_value(&deployment).unwrap(),
			json!({
				"name": "workers",
				"spec": {
					"replicas": 0,
					"template": {
						"cloud": {},
						"operatingSystem": { "containerLinux": { "disableAutoUpdate": true } },
						"versions": {}
					}
				}
			})
		);
	}

	#[test]
	fn optional_disk_size_is_omitted() {
		let spec = OpenstackNodeSpec {
			flavor: "m1.small".to_string(),
			image: "Ubuntu Bionic".to_string(),
			..Default::default()
		};
		assert_eq!(
			serde_json::to_value(&spec).unwrap(),
			json!({ "flavor": "m1.small", "image": "Ubuntu Bionic" })
		);

		let spec = OpenstackNodeSpec {
			disk_size: Some(50),
			..spec
		};
		assert_eq!(serde_json::to_value(&spec).unwrap()["diskSize"], json!(50));
	}
}

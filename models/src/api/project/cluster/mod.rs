use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::{is_false, Labels};

/// All endpoints that act on a node deployment of a cluster
pub mod node_deployment;

/// The endpoint to create a cluster
mod create_cluster;
/// The endpoint to delete a cluster
mod delete_cluster;
/// The endpoint to get the details of a cluster
mod get_cluster;
/// The endpoint to get the health of the components of a cluster
mod get_cluster_health;

pub use self::{create_cluster::*, delete_cluster::*, get_cluster::*, get_cluster_health::*};

/// A cluster is a managed Kubernetes control plane running in a datacenter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
	/// The ID of the cluster, generated by the API. Empty when creating one.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// The name of the cluster
	pub name: String,
	/// The type of the cluster, either `kubernetes` or `openshift`
	#[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
	pub cluster_type: String,
	/// The labels attached to the cluster
	#[serde(default, skip_serializing_if = "Labels::is_empty")]
	pub labels: Labels,
	/// The name of a preset of credentials to use instead of the ones in the
	/// cloud spec
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub credential: String,
	/// The specification of the cluster
	pub spec: ClusterSpec,
	/// When the cluster was created
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub creation_timestamp: Option<OffsetDateTime>,
	/// When the cluster was marked for deletion
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub deletion_timestamp: Option<OffsetDateTime>,
}

/// The specification of a cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
	/// The cloud the cluster runs in
	pub cloud: CloudSpec,
	/// The Kubernetes version of the control plane
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub version: String,
	/// The networks the machines of the cluster are attached to
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub machine_networks: Vec<MachineNetworkingConfig>,
	/// The audit logging settings of the control plane
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub audit_logging: Option<AuditLoggingSettings>,
	/// Whether the PodSecurityPolicy admission plugin is enabled
	#[serde(default, skip_serializing_if = "is_false")]
	pub use_pod_security_policy_admission_plugin: bool,
	/// Whether the PodNodeSelector admission plugin is enabled
	#[serde(default, skip_serializing_if = "is_false")]
	pub use_pod_node_selector_admission_plugin: bool,
}

/// A network the machines of a cluster are attached to. Mostly used by
/// clusters running on bare metal or vSphere.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MachineNetworkingConfig {
	/// The CIDR of the network
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub cidr: String,
	/// The gateway of the network
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub gateway: String,
	/// The DNS servers of the network
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub dns_servers: Vec<String>,
}

/// The audit logging settings of a control plane
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLoggingSettings {
	/// Whether audit logging is enabled
	#[serde(default)]
	pub enabled: bool,
}

/// The cloud a cluster runs in. The provider specific part of the spec is a
/// union: the API sends exactly one of the `aws`, `azure`, `openstack` or
/// `bringyourown` keys next to the `dc` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CloudSpec {
	/// The name of the datacenter the cluster runs in
	#[serde(rename = "dc", default)]
	pub datacenter: String,
	/// The provider specific part of the spec. [`None`] if the API sent a
	/// provider this crate doesn't know about yet.
	#[serde(flatten)]
	pub provider: Option<CloudProvider>,
}

/// The provider specific part of a [`CloudSpec`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
	/// A cluster running on AWS
	Aws(AwsCloudSpec),
	/// A cluster running on Azure
	Azure(AzureCloudSpec),
	/// A cluster running on OpenStack
	Openstack(OpenstackCloudSpec),
	/// A cluster running on machines brought by the user
	Bringyourown(BringYourOwnCloudSpec),
}

impl CloudProvider {
	/// The name of the provider, as used in the wire format and in the
	/// attribute tree
	pub fn name(&self) -> &'static str {
		match self {
			Self::Aws(_) => "aws",
			Self::Azure(_) => "azure",
			Self::Openstack(_) => "openstack",
			Self::Bringyourown(_) => "bringyourown",
		}
	}
}

/// The AWS specific part of a cluster. The credentials are never sent back
/// by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsCloudSpec {
	/// The access key ID used to manage the cloud resources
	#[serde(rename = "accessKeyId", default, skip_serializing_if = "String::is_empty")]
	pub access_key_id: String,
	/// The secret access key used to manage the cloud resources
	#[serde(
		rename = "secretAccessKey",
		default,
		skip_serializing_if = "String::is_empty"
	)]
	pub secret_access_key: String,
	/// The VPC the cluster runs in
	#[serde(rename = "vpcId", default, skip_serializing_if = "String::is_empty")]
	pub vpc_id: String,
	/// The security group of the worker nodes
	#[serde(
		rename = "securityGroupID",
		default,
		skip_serializing_if = "String::is_empty"
	)]
	pub security_group_id: String,
	/// The route table of the cluster
	#[serde(rename = "routeTableId", default, skip_serializing_if = "String::is_empty")]
	pub route_table_id: String,
	/// The instance profile of the worker nodes
	#[serde(
		rename = "instanceProfileName",
		default,
		skip_serializing_if = "String::is_empty"
	)]
	pub instance_profile_name: String,
	/// The ARN of the role used by the control plane
	#[serde(rename = "roleARN", default, skip_serializing_if = "String::is_empty")]
	pub role_arn: String,
}

/// The Azure specific part of a cluster. The credentials are never sent back
/// by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AzureCloudSpec {
	/// The client ID of the service principal
	#[serde(rename = "clientID", default, skip_serializing_if = "String::is_empty")]
	pub client_id: String,
	/// The client secret of the service principal
	#[serde(rename = "clientSecret", default, skip_serializing_if = "String::is_empty")]
	pub client_secret: String,
	/// The subscription the cluster runs in
	#[serde(
		rename = "subscriptionID",
		default,
		skip_serializing_if = "String::is_empty"
	)]
	pub subscription_id: String,
	/// The tenant of the service principal
	#[serde(rename = "tenantID", default, skip_serializing_if = "String::is_empty")]
	pub tenant_id: String,
	/// The resource group the cluster runs in
	#[serde(rename = "resourceGroup", default, skip_serializing_if = "String::is_empty")]
	pub resource_group: String,
	/// The route table of the cluster
	#[serde(rename = "routeTable", default, skip_serializing_if = "String::is_empty")]
	pub route_table: String,
	/// The security group of the worker nodes
	#[serde(rename = "securityGroup", default, skip_serializing_if = "String::is_empty")]
	pub security_group: String,
	/// The subnet of the worker nodes
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub subnet: String,
	/// The virtual network of the cluster
	#[serde(rename = "vnet", default, skip_serializing_if = "String::is_empty")]
	pub vnet: String,
	/// The availability set of the worker nodes
	#[serde(
		rename = "availabilitySet",
		default,
		skip_serializing_if = "String::is_empty"
	)]
	pub availability_set: String,
}

/// The OpenStack specific part of a cluster. The tenant and the credentials
/// are never sent back by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenstackCloudSpec {
	/// The tenant (project) the cluster runs in
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub tenant: String,
	/// The domain of the user
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub domain: String,
	/// The username used to manage the cloud resources
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub username: String,
	/// The password used to manage the cloud resources
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub password: String,
	/// The network the worker nodes are attached to
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub network: String,
	/// The security groups of the worker nodes
	#[serde(
		rename = "securityGroups",
		default,
		skip_serializing_if = "String::is_empty"
	)]
	pub security_groups: String,
	/// The pool floating IPs are allocated from
	#[serde(
		rename = "floatingIpPool",
		default,
		skip_serializing_if = "String::is_empty"
	)]
	pub floating_ip_pool: String,
	/// The router of the cluster network
	#[serde(rename = "routerID", default, skip_serializing_if = "String::is_empty")]
	pub router_id: String,
	/// The subnet of the cluster network
	#[serde(rename = "subnetID", default, skip_serializing_if = "String::is_empty")]
	pub subnet_id: String,
}

/// A cluster running on machines brought by the user. There is nothing to
/// configure for these.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BringYourOwnCloudSpec {}

use models::api::project::cluster::*;

use super::{expand_block, insert_list, insert_str, union_variant};
use crate::prelude::*;

/// The variants of the cloud block of a cluster
pub const CLOUD_PROVIDERS: [&str; 4] = ["aws", "azure", "openstack", "bringyourown"];

/// Expands the `spec` block of a cluster. The datacenter is not part of the
/// block, and is set on the cloud spec from the cluster's `dc_name`.
pub fn expand_cluster_spec(list: &[Value], datacenter: &str) -> Result<Option<ClusterSpec>, AppError> {
	expand_block(list, "spec", |block| {
		Ok(ClusterSpec {
			version: block.get_string("version")?,
			cloud: expand_cloud_spec(block.get_list("cloud")?, datacenter)?.unwrap_or_else(|| {
				CloudSpec {
					datacenter: datacenter.to_string(),
					provider: None,
				}
			}),
			machine_networks: expand_machine_networks(block.get_list("machine_networks")?)?,
			audit_logging: block
				.get_bool("audit_logging")?
				.then_some(AuditLoggingSettings { enabled: true }),
			use_pod_security_policy_admission_plugin: block.get_bool("pod_security_policy")?,
			use_pod_node_selector_admission_plugin: block.get_bool("pod_node_selector")?,
		})
	})
}

/// Flattens the spec of a cluster into a `spec` block. The credentials of the
/// cloud spec are taken from `preserved`, since the API never returns them.
pub fn flatten_cluster_spec(spec: Option<&ClusterSpec>, preserved: Option<&CloudSpec>) -> Vec<Value> {
	let Some(spec) = spec else {
		return Vec::new();
	};

	let mut block = Block::new();
	insert_str(&mut block, "version", &spec.version);
	block.insert(
		"cloud".to_string(),
		flatten_cloud_spec(Some(&spec.cloud), preserved).into(),
	);
	insert_list(
		&mut block,
		"machine_networks",
		flatten_machine_networks(&spec.machine_networks),
	);
	block.insert(
		"audit_logging".to_string(),
		spec.audit_logging
			.is_some_and(|audit_logging| audit_logging.enabled)
			.into(),
	);
	block.insert(
		"pod_security_policy".to_string(),
		spec.use_pod_security_policy_admission_plugin.into(),
	);
	block.insert(
		"pod_node_selector".to_string(),
		spec.use_pod_node_selector_admission_plugin.into(),
	);

	vec![Value::Map(block)]
}

/// Expands the `cloud` block of a cluster spec
pub fn expand_cloud_spec(list: &[Value], datacenter: &str) -> Result<Option<CloudSpec>, AppError> {
	expand_block(list, "cloud", |block| {
		let provider = match union_variant(block, &CLOUD_PROVIDERS)? {
			Some(("aws", aws)) => Some(CloudProvider::Aws(
				expand_aws_cloud_spec(aws).map_err(|err| err.within("aws"))?,
			)),
			Some(("azure", azure)) => Some(CloudProvider::Azure(
				expand_azure_cloud_spec(azure).map_err(|err| err.within("azure"))?,
			)),
			Some(("openstack", openstack)) => Some(CloudProvider::Openstack(
				expand_openstack_cloud_spec(openstack).map_err(|err| err.within("openstack"))?,
			)),
			// There is nothing to configure for `bringyourown`
			Some(_) => Some(CloudProvider::Bringyourown(BringYourOwnCloudSpec {})),
			None => None,
		};
		Ok(CloudSpec {
			datacenter: datacenter.to_string(),
			provider,
		})
	})
}

/// Flattens a cloud spec into a `cloud` block holding only the variant the API
/// returned. A provider this crate does not know about flattens to an empty
/// block.
pub fn flatten_cloud_spec(cloud: Option<&CloudSpec>, preserved: Option<&CloudSpec>) -> Vec<Value> {
	let Some(cloud) = cloud else {
		return Vec::new();
	};
	let preserved = preserved.and_then(|preserved| preserved.provider.as_ref());

	let mut block = Block::new();
	match &cloud.provider {
		Some(CloudProvider::Aws(aws)) => {
			let preserved = match preserved {
				Some(CloudProvider::Aws(preserved)) => Some(preserved),
				_ => None,
			};
			block.insert("aws".to_string(), flatten_aws_cloud_spec(aws, preserved));
		}
		Some(CloudProvider::Azure(azure)) => {
			let preserved = match preserved {
				Some(CloudProvider::Azure(preserved)) => Some(preserved),
				_ => None,
			};
			block.insert("azure".to_string(), flatten_azure_cloud_spec(azure, preserved));
		}
		Some(CloudProvider::Openstack(openstack)) => {
			let preserved = match preserved {
				Some(CloudProvider::Openstack(preserved)) => Some(preserved),
				_ => None,
			};
			block.insert(
				"openstack".to_string(),
				flatten_openstack_cloud_spec(openstack, preserved),
			);
		}
		Some(CloudProvider::Bringyourown(_)) => {
			block.insert("bringyourown".to_string(), Value::singleton(Block::new()));
		}
		None => (),
	}

	vec![Value::Map(block)]
}

/// Expands the `aws` variant of a cloud block
fn expand_aws_cloud_spec(block: &Block) -> Result<AwsCloudSpec, AppError> {
	Ok(AwsCloudSpec {
		access_key_id: block.get_string("access_key_id")?,
		secret_access_key: block.get_string("secret_access_key")?,
		vpc_id: block.get_string("vpc_id")?,
		security_group_id: block.get_string("security_group_id")?,
		route_table_id: block.get_string("route_table_id")?,
		instance_profile_name: block.get_string("instance_profile_name")?,
		role_arn: block.get_string("role_arn")?,
	})
}

/// Flattens the AWS part of a cloud spec, taking the credentials from the
/// previous state
fn flatten_aws_cloud_spec(aws: &AwsCloudSpec, preserved: Option<&AwsCloudSpec>) -> Value {
	let (access_key_id, secret_access_key) = match preserved {
		Some(preserved) => (&preserved.access_key_id, &preserved.secret_access_key),
		None => (&aws.access_key_id, &aws.secret_access_key),
	};

	let mut block = Block::new();
	insert_str(&mut block, "access_key_id", access_key_id);
	insert_str(&mut block, "secret_access_key", secret_access_key);
	insert_str(&mut block, "vpc_id", &aws.vpc_id);
	insert_str(&mut block, "security_group_id", &aws.security_group_id);
	insert_str(&mut block, "route_table_id", &aws.route_table_id);
	insert_str(&mut block, "instance_profile_name", &aws.instance_profile_name);
	insert_str(&mut block, "role_arn", &aws.role_arn);
	Value::singleton(block)
}

/// Expands the `azure` variant of a cloud block
fn expand_azure_cloud_spec(block: &Block) -> Result<AzureCloudSpec, AppError> {
	Ok(AzureCloudSpec {
		client_id: block.get_string("client_id")?,
		client_secret: block.get_string("client_secret")?,
		subscription_id: block.get_string("subscription_id")?,
		tenant_id: block.get_string("tenant_id")?,
		resource_group: block.get_string("resource_group")?,
		route_table: block.get_string("route_table")?,
		security_group: block.get_string("security_group")?,
		subnet: block.get_string("subnet")?,
		vnet: block.get_string("vnet")?,
		availability_set: block.get_string("availability_set")?,
	})
}

/// Flattens the Azure part of a cloud spec, taking the service principal from
/// the previous state
fn flatten_azure_cloud_spec(azure: &AzureCloudSpec, preserved: Option<&AzureCloudSpec>) -> Value {
	let credentials = preserved.unwrap_or(azure);

	let mut block = Block::new();
	insert_str(&mut block, "client_id", &credentials.client_id);
	insert_str(&mut block, "client_secret", &credentials.client_secret);
	insert_str(&mut block, "subscription_id", &credentials.subscription_id);
	insert_str(&mut block, "tenant_id", &credentials.tenant_id);
	insert_str(&mut block, "resource_group", &azure.resource_group);
	insert_str(&mut block, "route_table", &azure.route_table);
	insert_str(&mut block, "security_group", &azure.security_group);
	insert_str(&mut block, "subnet", &azure.subnet);
	insert_str(&mut block, "vnet", &azure.vnet);
	insert_str(&mut block, "availability_set", &azure.availability_set);
	Value::singleton(block)
}

/// Expands the `openstack` variant of a cloud block
fn expand_openstack_cloud_spec(block: &Block) -> Result<OpenstackCloudSpec, AppError> {
	Ok(OpenstackCloudSpec {
		tenant: block.get_string("tenant")?,
		domain: block.get_string("domain")?,
		username: block.get_string("username")?,
		password: block.get_string("password")?,
		network: block.get_string("network")?,
		security_groups: block.get_string("security_groups")?,
		floating_ip_pool: block.get_string("floating_ip_pool")?,
		router_id: block.get_string("router_id")?,
		subnet_id: block.get_string("subnet_id")?,
	})
}

/// Flattens the OpenStack part of a cloud spec, taking the tenant and the
/// credentials from the previous state
fn flatten_openstack_cloud_spec(
	openstack: &OpenstackCloudSpec,
	preserved: Option<&OpenstackCloudSpec>,
) -> Value {
	let credentials = preserved.unwrap_or(openstack);

	let mut block = Block::new();
	insert_str(&mut block, "tenant", &credentials.tenant);
	insert_str(&mut block, "domain", &credentials.domain);
	insert_str(&mut block, "username", &credentials.username);
	insert_str(&mut block, "password", &credentials.password);
	insert_str(&mut block, "network", &openstack.network);
	insert_str(&mut block, "security_groups", &openstack.security_groups);
	insert_str(&mut block, "floating_ip_pool", &openstack.floating_ip_pool);
	insert_str(&mut block, "router_id", &openstack.router_id);
	insert_str(&mut block, "subnet_id", &openstack.subnet_id);
	Value::singleton(block)
}

/// Expands the `machine_networks` blocks of a cluster spec
pub fn expand_machine_networks(list: &[Value]) -> Result<Vec<MachineNetworkingConfig>, AppError> {
	list.iter()
		.enumerate()
		.map(|(index, network)| {
			let path = format!("machine_networks.{}", index);
			let Value::Map(network) = network else {
				return Err(AppError::TypeMismatch {
					path,
					expected: "a block",
					found: network.type_name(),
				});
			};
			expand_machine_network(network).map_err(|err| err.at(&path))
		})
		.collect()
}

/// Expands a single machine network
fn expand_machine_network(block: &Block) -> Result<MachineNetworkingConfig, AppError> {
	Ok(MachineNetworkingConfig {
		cidr: block.get_string("cidr")?,
		gateway: block.get_string("gateway")?,
		dns_servers: block.get_string_list("dns_servers")?,
	})
}

/// Flattens the machine networks of a cluster spec
pub fn flatten_machine_networks(networks: &[MachineNetworkingConfig]) -> Vec<Value> {
	networks
		.iter()
		.map(|network| {
			let mut block = Block::new();
			insert_str(&mut block, "cidr", &network.cidr);
			insert_str(&mut block, "gateway", &network.gateway);
			insert_list(
				&mut block,
				"dns_servers",
				network.dns_servers.iter().map(Value::from).collect(),
			);
			Value::Map(block)
		})
		.collect()
}

use models::api::project::cluster::node_deployment::*;

use super::{expand_block, get_i32, insert_labels, insert_list, insert_str, union_variant};
use crate::prelude::*;

/// The variants of the cloud block of a node
pub const NODE_CLOUD_PROVIDERS: [&str; 3] = ["aws", "azure", "openstack"];
/// The variants of the operating system block of a node
pub const OPERATING_SYSTEMS: [&str; 3] = ["ubuntu", "centos", "container_linux"];

/// Expands the `spec` block of a node deployment
pub fn expand_node_deployment_spec(list: &[Value]) -> Result<Option<NodeDeploymentSpec>, AppError> {
	expand_block(list, "spec", |block| {
		Ok(NodeDeploymentSpec {
			replicas: get_i32(block, "replicas")?.unwrap_or_default(),
			template: expand_node_spec(block.get_list("template")?)?.unwrap_or_default(),
			dynamic_config: match block.value("dynamic_config") {
				None | Some(Value::Null) => None,
				Some(_) => Some(block.get_bool("dynamic_config")?),
			},
		})
	})
}

/// Flattens the spec of a node deployment into a `spec` block. The values the
/// API does not return for Azure nodes are taken from `preserved`.
pub fn flatten_node_deployment_spec(
	spec: Option<&NodeDeploymentSpec>,
	preserved: Option<&NodeDeploymentSpec>,
) -> Vec<Value> {
	let Some(spec) = spec else {
		return Vec::new();
	};

	let mut block = Block::new();
	block.insert("replicas".to_string(), spec.replicas.into());
	block.insert(
		"template".to_string(),
		flatten_node_spec(
			Some(&spec.template),
			preserved.map(|preserved| &preserved.template),
		)
		.into(),
	);
	if let Some(dynamic_config) = spec.dynamic_config {
		block.insert("dynamic_config".to_string(), dynamic_config.into());
	}

	vec![Value::Map(block)]
}

/// Expands the `template` block of a node deployment spec
pub fn expand_node_spec(list: &[Value]) -> Result<Option<NodeSpec>, AppError> {
	expand_block(list, "template", |block| {
		Ok(NodeSpec {
			cloud: expand_node_cloud_spec(block.get_list("cloud")?)?.unwrap_or_default(),
			operating_system: expand_operating_system_spec(block.get_list("operating_system")?)?
				.unwrap_or_default(),
			versions: expand_block(block.get_list("versions")?, "versions", |versions| {
				Ok(NodeVersionInfo {
					kubelet: versions.get_string("kubelet")?,
				})
			})?
			.unwrap_or_default(),
			labels: block.get_labels("labels")?,
			taints: expand_taints(block.get_list("taints")?)?,
		})
	})
}

/// Flattens the template of a node deployment into a `template` block
pub fn flatten_node_spec(spec: Option<&NodeSpec>, preserved: Option<&NodeSpec>) -> Vec<Value> {
	let Some(spec) = spec else {
		return Vec::new();
	};

	let mut block = Block::new();
	block.insert(
		"cloud".to_string(),
		flatten_node_cloud_spec(
			Some(&spec.cloud),
			preserved.map(|preserved| &preserved.cloud),
		)
		.into(),
	);
	block.insert(
		"operating_system".to_string(),
		flatten_operating_system_spec(Some(&spec.operating_system)).into(),
	);
	if !spec.versions.kubelet.is_empty() {
		block.insert(
			"versions".to_string(),
			Value::singleton(Block::from([(
				"kubelet".to_string(),
				Value::from(&spec.versions.kubelet),
			)])),
		);
	}
	insert_labels(&mut block, "labels", &spec.labels);
	insert_list(&mut block, "taints", flatten_taints(&spec.taints));

	vec![Value::Map(block)]
}

/// Expands the `cloud` block of a node template
pub fn expand_node_cloud_spec(list: &[Value]) -> Result<Option<NodeCloudSpec>, AppError> {
	expand_block(list, "cloud", |block| {
		let provider = match union_variant(block, &NODE_CLOUD_PROVIDERS)? {
			Some(("aws", aws)) => Some(NodeCloudProvider::Aws(
				expand_aws_node_spec(aws).map_err(|err| err.within("aws"))?,
			)),
			Some(("azure", azure)) => Some(NodeCloudProvider::Azure(
				expand_azure_node_spec(azure).map_err(|err| err.within("azure"))?,
			)),
			Some((_, openstack)) => Some(NodeCloudProvider::Openstack(
				expand_openstack_node_spec(openstack).map_err(|err| err.within("openstack"))?,
			)),
			None => None,
		};
		Ok(NodeCloudSpec { provider })
	})
}

/// Flattens the cloud spec of a node into a `cloud` block holding only the
/// variant the API returned
pub fn flatten_node_cloud_spec(
	cloud: Option<&NodeCloudSpec>,
	preserved: Option<&NodeCloudSpec>,
) -> Vec<Value> {
	let Some(cloud) = cloud else {
		return Vec::new();
	};

	let mut block = Block::new();
	match &cloud.provider {
		Some(NodeCloudProvider::Aws(aws)) => {
			block.insert("aws".to_string(), flatten_aws_node_spec(aws));
		}
		Some(NodeCloudProvider::Azure(azure)) => {
			let preserved = match preserved.and_then(|preserved| preserved.provider.as_ref()) {
				Some(NodeCloudProvider::Azure(preserved)) => Some(preserved),
				_ => None,
			};
			block.insert("azure".to_string(), flatten_azure_node_spec(azure, preserved));
		}
		Some(NodeCloudProvider::Openstack(openstack)) => {
			block.insert("openstack".to_string(), flatten_openstack_node_spec(openstack));
		}
		None => (),
	}

	vec![Value::Map(block)]
}

/// Expands the `aws` variant of a node cloud block
fn expand_aws_node_spec(block: &Block) -> Result<AwsNodeSpec, AppError> {
	Ok(AwsNodeSpec {
		instance_type: block.get_string("instance_type")?,
		volume_size: block.get_int("disk_size")?.unwrap_or_default(),
		volume_type: block.get_string("volume_type")?,
		availability_zone: block.get_string("availability_zone")?,
		subnet_id: block.get_string("subnet_id")?,
		assign_public_ip: block.get_bool("assign_public_ip")?,
		ami: block.get_string("ami")?,
		tags: block.get_labels("tags")?,
	})
}

/// Flattens the AWS part of a node cloud spec
fn flatten_aws_node_spec(aws: &AwsNodeSpec) -> Value {
	let mut block = Block::new();
	insert_str(&mut block, "instance_type", &aws.instance_type);
	block.insert("disk_size".to_string(), aws.volume_size.into());
	insert_str(&mut block, "volume_type", &aws.volume_type);
	insert_str(&mut block, "availability_zone", &aws.availability_zone);
	insert_str(&mut block, "subnet_id", &aws.subnet_id);
	block.insert("assign_public_ip".to_string(), aws.assign_public_ip.into());
	insert_str(&mut block, "ami", &aws.ami);
	insert_labels(&mut block, "tags", &aws.tags);
	Value::singleton(block)
}

/// Expands the `azure` variant of a node cloud block
fn expand_azure_node_spec(block: &Block) -> Result<AzureNodeSpec, AppError> {
	Ok(AzureNodeSpec {
		size: block.get_string("size")?,
		assign_public_ip: block.get_bool("assign_public_ip")?,
		disk_size_gb: get_i32(block, "disk_size_gb")?.unwrap_or_default(),
		os_disk_size_gb: get_i32(block, "os_disk_size_gb")?.unwrap_or_default(),
		image_id: block.get_string("image_id")?,
		tags: block.get_labels("tags")?,
		zones: block.get_string_list("zones")?,
	})
}

/// Flattens the Azure part of a node cloud spec. The API does not return the
/// image ID and normalises the size, so both are taken from the previous
/// state.
fn flatten_azure_node_spec(azure: &AzureNodeSpec, preserved: Option<&AzureNodeSpec>) -> Value {
	let (size, image_id) = match preserved {
		Some(preserved) => (&preserved.size, &preserved.image_id),
		None => (&azure.size, &azure.image_id),
	};

	let mut block = Block::new();
	insert_str(&mut block, "size", size);
	block.insert("assign_public_ip".to_string(), azure.assign_public_ip.into());
	if azure.disk_size_gb != 0 {
		block.insert("disk_size_gb".to_string(), azure.disk_size_gb.into());
	}
	if azure.os_disk_size_gb != 0 {
		block.insert("os_disk_size_gb".to_string(), azure.os_disk_size_gb.into());
	}
	insert_str(&mut block, "image_id", image_id);
	insert_labels(&mut block, "tags", &azure.tags);
	insert_list(
		&mut block,
		"zones",
		azure.zones.iter().map(Value::from).collect(),
	);
	Value::singleton(block)
}

/// Expands the `openstack` variant of a node cloud block
fn expand_openstack_node_spec(block: &Block) -> Result<OpenstackNodeSpec, AppError> {
	Ok(OpenstackNodeSpec {
		flavor: block.get_string("flavor")?,
		image: block.get_string("image")?,
		disk_size: block.get_int("disk_size")?,
		use_floating_ip: block.get_bool("use_floating_ip")?,
		tags: block.get_labels("tags")?,
	})
}

/// Flattens the OpenStack part of a node cloud spec
fn flatten_openstack_node_spec(openstack: &OpenstackNodeSpec) -> Value {
	let mut block = Block::new();
	insert_str(&mut block, "flavor", &openstack.flavor);
	insert_str(&mut block, "image", &openstack.image);
	if let Some(disk_size) = openstack.disk_size {
		block.insert("disk_size".to_string(), disk_size.into());
	}
	block.insert(
		"use_floating_ip".to_string(),
		openstack.use_floating_ip.into(),
	);
	insert_labels(&mut block, "tags", &openstack.tags);
	Value::singleton(block)
}

/// Expands the `operating_system` block of a node template
pub fn expand_operating_system_spec(list: &[Value]) -> Result<Option<OperatingSystemSpec>, AppError> {
	expand_block(list, "operating_system", |block| {
		let system = match union_variant(block, &OPERATING_SYSTEMS)? {
			Some(("ubuntu", ubuntu)) => Some(OperatingSystem::Ubuntu(UbuntuSpec {
				dist_upgrade_on_boot: ubuntu
					.get_bool("dist_upgrade_on_boot")
					.map_err(|err| err.within("ubuntu"))?,
			})),
			Some(("centos", centos)) => Some(OperatingSystem::Centos(CentosSpec {
				dist_upgrade_on_boot: centos
					.get_bool("dist_upgrade_on_boot")
					.map_err(|err| err.within("centos"))?,
			})),
			Some((_, container_linux)) => Some(OperatingSystem::ContainerLinux(ContainerLinuxSpec {
				disable_auto_update: container_linux
					.get_bool("disable_auto_update")
					.map_err(|err| err.within("container_linux"))?,
			})),
			None => None,
		};
		Ok(OperatingSystemSpec { system })
	})
}

/// Flattens the operating system of a node into an `operating_system` block
/// holding only the variant the API returned
pub fn flatten_operating_system_spec(spec: Option<&OperatingSystemSpec>) -> Vec<Value> {
	let Some(spec) = spec else {
		return Vec::new();
	};

	let mut block = Block::new();
	if let Some(system) = &spec.system {
		let (key, value) = match system {
			OperatingSystem::Ubuntu(ubuntu) => ("dist_upgrade_on_boot", ubuntu.dist_upgrade_on_boot),
			OperatingSystem::Centos(centos) => ("dist_upgrade_on_boot", centos.dist_upgrade_on_boot),
			OperatingSystem::ContainerLinux(container_linux) => {
				("disable_auto_update", container_linux.disable_auto_update)
			}
		};
		block.insert(
			system.name().to_string(),
			Value::singleton(Block::from([(key.to_string(), Value::from(value))])),
		);
	}

	vec![Value::Map(block)]
}

/// Expands the `taints` blocks of a node template
pub fn expand_taints(list: &[Value]) -> Result<Vec<TaintSpec>, AppError> {
	list.iter()
		.enumerate()
		.map(|(index, taint)| {
			let path = format!("taints.{}", index);
			let Value::Map(taint) = taint else {
				return Err(AppError::TypeMismatch {
					path,
					expected: "a block",
					found: taint.type_name(),
				});
			};
			expand_taint(taint).map_err(|err| err.at(&path))
		})
		.collect()
}

/// Expands a single taint
fn expand_taint(block: &Block) -> Result<TaintSpec, AppError> {
	Ok(TaintSpec {
		key: block.get_string("key")?,
		value: block.get_string("value")?,
		effect: block.get_string("effect")?,
	})
}

/// Flattens the taints of a node template
pub fn flatten_taints(taints: &[TaintSpec]) -> Vec<Value> {
	taints
		.iter()
		.map(|taint| {
			let mut block = Block::new();
			insert_str(&mut block, "key", &taint.key);
			insert_str(&mut block, "value", &taint.value);
			insert_str(&mut block, "effect", &taint.effect);
			Value::Map(block)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use models::utils::Labels;

	use super::*;
	use crate::block;

	fn azure_spec() -> NodeDeploymentSpec {
		NodeDeploymentSpec {
			replicas: 2,
			template: NodeSpec {
				cloud: NodeCloudSpec {
					provider: Some(NodeCloudProvider::Azure(AzureNodeSpec {
						size: "Standard_B2s".to_string(),
						assign_public_ip: true,
						disk_size_gb: 50,
						os_disk_size_gb: 0,
						image_id: "/subscriptions/abc/images/ubuntu".to_string(),
						tags: Labels::from([("team".to_string(), "infra".to_string())]),
						zones: vec!["1".to_string(), "2".to_string()],
					})),
				},
				operating_system: OperatingSystemSpec {
					system: Some(OperatingSystem::Ubuntu(UbuntuSpec {
						dist_upgrade_on_boot: true,
					})),
				},
				versions: NodeVersionInfo {
					kubelet: "1.17.4".to_string(),
				},
				labels: Labels::from([("pool".to_string(), "workers".to_string())]),
				taints: vec![TaintSpec {
					key: "dedicated".to_string(),
					value: "gpu".to_string(),
					effect: "NoSchedule".to_string(),
				}],
			},
			dynamic_config: Some(false),
		}
	}

	#[test]
	fn node_deployment_spec_round_trips() {
		let spec = azure_spec();

		let flattened = flatten_node_deployment_spec(Some(&spec), None);
		let expanded = expand_node_deployment_spec(&flattened).unwrap();

		assert_eq!(expanded, Some(spec));
	}

	#[test]
	fn node_deployment_spec_tree_round_trips() {
		let tree = vec![Value::Map(block! {
			"replicas" => 3,
			"template" => vec![Value::Map(block! {
				"cloud" => vec![Value::Map(block! {
					"aws" => Value::singleton(block! {
						"instance_type" => "t3.small",
						"disk_size" => 25,
						"volume_type" => "gp2",
						"assign_public_ip" => false,
						"tags" => block! { "team" => "infra" },
					}),
				})],
				"operating_system" => vec![Value::Map(block! {
					"container_linux" => Value::singleton(block! {
						"disable_auto_update" => true,
					}),
				})],
				"versions" => Value::singleton(block! { "kubelet" => "1.17.4" }),
				"labels" => block! { "pool" => "workers" },
				"taints" => vec![Value::Map(block! {
					"key" => "dedicated",
					"value" => "gpu",
					"effect" => "NoExecute",
				})],
			})],
			"dynamic_config" => true,
		})];

		let expanded = expand_node_deployment_spec(&tree).unwrap();

		assert_eq!(flatten_node_deployment_spec(expanded.as_ref(), None), tree);
	}

	#[test]
	fn openstack_disk_size_is_optional() {
		let with_disk = NodeCloudSpec {
			provider: Some(NodeCloudProvider::Openstack(OpenstackNodeSpec {
				flavor: "m1.small".to_string(),
				image: "Ubuntu Bionic".to_string(),
				disk_size: Some(25),
				..Default::default()
			})),
		};
		let without_disk = NodeCloudSpec {
			provider: Some(NodeCloudProvider::Openstack(OpenstackNodeSpec {
				disk_size: None,
				..Default::default()
			})),
		};

		for cloud in [with_disk, without_disk] {
			let flattened = flatten_node_cloud_spec(Some(&cloud), None);
			assert_eq!(expand_node_cloud_spec(&flattened).unwrap(), Some(cloud));
		}
	}

	#[test]
	fn aws_disk_size_is_always_emitted() {
		let cloud = NodeCloudSpec {
			provider: Some(NodeCloudProvider::Aws(AwsNodeSpec {
				instance_type: "t3.small".to_string(),
				volume_type: "standard".to_string(),
				..Default::default()
			})),
		};

		assert_eq!(
			flatten_node_cloud_spec(Some(&cloud), None),
			vec![Value::Map(block! {
				"aws" => Value::singleton(block! {
					"instance_type" => "t3.small",
					"disk_size" => 0i64,
					"volume_type" => "standard",
					"assign_public_ip" => false,
				}),
			})]
		);
	}

	#[test]
	fn azure_image_and_size_are_preserved() {
		let returned = NodeCloudSpec {
			provider: Some(NodeCloudProvider::Azure(AzureNodeSpec {
				size: "standard_b2s".to_string(),
				..Default::default()
			})),
		};
		let preserved = azure_spec().template.cloud;

		let flattened = flatten_node_cloud_spec(Some(&returned), Some(&preserved));
		let Some(NodeCloudProvider::Azure(azure)) = expand_node_cloud_spec(&flattened)
			.unwrap()
			.unwrap()
			.provider
		else {
			panic!("expected an azure node spec");
		};

		assert_eq!(azure.size, "Standard_B2s");
		assert_eq!(azure.image_id, "/subscriptions/abc/images/ubuntu");
		assert_eq!(azure.disk_size_gb, 0);
	}

	#[test]
	fn operating_system_flattens_to_the_returned_variant() {
		let spec = OperatingSystemSpec {
			system: Some(OperatingSystem::ContainerLinux(ContainerLinuxSpec {
				disable_auto_update: true,
			})),
		};

		assert_eq!(
			flatten_operating_system_spec(Some(&spec)),
			vec![Value::Map(block! {
				"container_linux" => Value::singleton(block! { "disable_auto_update" => true }),
			})]
		);
		assert_eq!(
			flatten_operating_system_spec(Some(&OperatingSystemSpec { system: None })),
			vec![Value::Map(Block::new())]
		);
	}

	#[test]
	fn two_operating_systems_are_rejected() {
		let list = vec![Value::Map(block! {
			"ubuntu" => Value::singleton(Block::new()),
			"centos" => Value::singleton(Block::new()),
		})];

		assert_eq!(
			expand_operating_system_spec(&list).unwrap_err().to_string(),
			"only one of `ubuntu`, `centos` can be set, found 2"
		);
	}

	#[test]
	fn replicas_must_fit_in_32_bits() {
		let list = vec![Value::Map(block! { "replicas" => 1i64 << 40 })];

		assert!(expand_node_deployment_spec(&list).is_err());
	}

	#[test]
	fn missing_blocks_are_none() {
		assert_eq!(expand_node_deployment_spec(&[]).unwrap(), None);
		assert_eq!(expand_node_spec(&[]).unwrap(), None);
		assert_eq!(expand_operating_system_spec(&[]).unwrap(), None);
		assert!(flatten_node_deployment_spec(None, None).is_empty());
		assert!(flatten_node_spec(None, None).is_empty());
		assert!(flatten_taints(&[]).is_empty());
	}

	#[test]
	fn taint_errors_name_the_index() {
		let taints = vec![Value::Map(block! { "key" => "a", "effect" => true })];

		assert_eq!(
			expand_taints(&taints).unwrap_err().to_string(),
			"attribute `taints.0.effect` must be a string, found a boolean"
		);
	}
}

use models::api::{
	project::cluster::{node_deployment::*, GetClusterPath, GetClusterRequest},
	upgrade::{ListNodeUpgradesPath, ListNodeUpgradesQuery, ListNodeUpgradesRequest},
};

use super::{create_poll, delete_poll, read_imported, require_id, Resource};
use crate::{
	id::NodeDeploymentId,
	mapping::{
		flatten_timestamp,
		node::{expand_node_deployment_spec, flatten_node_deployment_spec},
	},
	poll::{poll_until, PollOutcome},
	prelude::*,
	schema::{AttributeSchema, Schema},
	validation::{
		suppress_version_prefix,
		validate_labels,
		validate_node_version,
		validate_node_version_available,
		validate_taint_effect,
		validate_tags,
		validate_version,
	},
};

/// A pool of worker nodes of a cluster. The ID is a [`NodeDeploymentId`].
pub struct NodeDeploymentResource;

/// The schema of the `spec` block of a node deployment
fn node_deployment_spec_schema() -> Schema {
	Schema::new()
		.attribute(
			"replicas",
			AttributeSchema::int()
				.required()
				.describe("Number of replicas"),
		)
		.attribute(
			"dynamic_config",
			AttributeSchema::bool().describe("Whether the kubelets use dynamic configuration"),
		)
		.attribute(
			"template",
			AttributeSchema::singleton(node_spec_schema())
				.required()
				.describe("Template of the nodes"),
		)
}

/// The schema of the `template` block of a node deployment spec
fn node_spec_schema() -> Schema {
	Schema::new()
		.attribute(
			"cloud",
			AttributeSchema::singleton(node_cloud_schema())
				.required()
				.describe("Cloud specification of the nodes"),
		)
		.attribute(
			"operating_system",
			AttributeSchema::singleton(operating_system_schema())
				.required()
				.describe("Operating system of the nodes"),
		)
		.attribute(
			"versions",
			AttributeSchema::singleton(
				Schema::new().attribute(
					"kubelet",
					AttributeSchema::string()
						.optional_computed()
						.validate(validate_version)
						.diff_suppress(suppress_version_prefix),
				),
			)
			.optional_computed()
			.describe("Versions of the node components"),
		)
		.attribute(
			"labels",
			AttributeSchema::string_map()
				.validate(validate_labels)
				.describe("Labels added to the nodes"),
		)
		.attribute(
			"taints",
			AttributeSchema::blocks(
				Schema::new()
					.attribute("key", AttributeSchema::string().required())
					.attribute("value", AttributeSchema::string())
					.attribute(
						"effect",
						AttributeSchema::string()
							.required()
							.validate(validate_taint_effect),
					),
			)
			.describe("Taints added to the nodes"),
		)
}

/// The schema of the `cloud` block of a node template. Exactly one of the
/// variants may be set.
fn node_cloud_schema() -> Schema {
	Schema::new()
		.attribute(
			"aws",
			AttributeSchema::singleton(
				Schema::new()
					.attribute("instance_type", AttributeSchema::string().required())
					.attribute("disk_size", AttributeSchema::int().required())
					.attribute("volume_type", AttributeSchema::string().required())
					.attribute("availability_zone", AttributeSchema::string())
					.attribute("subnet_id", AttributeSchema::string())
					.attribute("assign_public_ip", AttributeSchema::bool())
					.attribute("ami", AttributeSchema::string())
					.attribute(
						"tags",
						AttributeSchema::string_map().validate(validate_tags),
					),
			),
		)
		.attribute(
			"azure",
			AttributeSchema::singleton(
				Schema::new()
					.attribute("size", AttributeSchema::string().required())
					.attribute("assign_public_ip", AttributeSchema::bool())
					.attribute("disk_size_gb", AttributeSchema::int())
					.attribute("os_disk_size_gb", AttributeSchema::int())
					.attribute("image_id", AttributeSchema::string())
					.attribute(
						"tags",
						AttributeSchema::string_map().validate(validate_tags),
					)
					.attribute("zones", AttributeSchema::string_list()),
			),
		)
		.attribute(
			"openstack",
			AttributeSchema::singleton(
				Schema::new()
					.attribute("flavor", AttributeSchema::string().required())
					.attribute("image", AttributeSchema::string().required())
					.attribute("disk_size", AttributeSchema::int())
					.attribute("use_floating_ip", AttributeSchema::bool())
					.attribute(
						"tags",
						AttributeSchema::string_map().validate(validate_tags),
					),
			),
		)
}

/// The schema of the `operating_system` block of a node template. Exactly one
/// of the variants may be set.
fn operating_system_schema() -> Schema {
	Schema::new()
		.attribute(
			"ubuntu",
			AttributeSchema::singleton(
				Schema::new().attribute("dist_upgrade_on_boot", AttributeSchema::bool()),
			),
		)
		.attribute(
			"centos",
			AttributeSchema::singleton(
				Schema::new().attribute("dist_upgrade_on_boot", AttributeSchema::bool()),
			),
		)
		.attribute(
			"container_linux",
			AttributeSchema::singleton(
				Schema::new().attribute("disable_auto_update", AttributeSchema::bool()),
			),
		)
}

/// Checks the requested kubelet version against the version of the cluster,
/// and against the versions the API allows nodes of that cluster to run.
/// Nothing is checked if no version is requested, since the API then uses the
/// version of the cluster.
async fn validate_versions<T>(
	state: &AppState<T>,
	project_id: &str,
	datacenter: &str,
	cluster_id: &str,
	spec: &NodeDeploymentSpec,
) -> Result<(), AppError>
where
	T: ApiTransport,
{
	let node_version = spec.template.versions.kubelet.as_str();
	if node_version.is_empty() {
		return Ok(());
	}

	let cluster = state
		.request(
			ApiRequest::<GetClusterRequest>::builder()
				.path(GetClusterPath {
					project_id: project_id.to_string(),
					datacenter: datacenter.to_string(),
					cluster_id: cluster_id.to_string(),
				})
				.query(())
				.body(())
				.build(),
		)
		.await
		.map_err(AppError::api("get cluster", cluster_id))?;
	let cluster_version = cluster.spec.version;
	validate_node_version(node_version, &cluster_version)?;

	let available = state
		.request(
			ApiRequest::<ListNodeUpgradesRequest>::builder()
				.path(ListNodeUpgradesPath)
				.query(ListNodeUpgradesQuery {
					control_plane_version: cluster_version.clone(),
				})
				.body(())
				.build(),
		)
		.await
		.map_err(AppError::api("list node upgrades", &cluster_version))?;
	validate_node_version_available(node_version, &cluster_version, &available)
}

/// Expands the `spec` block, failing if it is missing
fn desired_spec(data: &ResourceData) -> Result<NodeDeploymentSpec, AppError> {
	expand_node_deployment_spec(data.get_list("spec")?)?
		.ok_or_else(|| AppError::validation("attribute `spec` is required"))
}

/// Decodes the ID of a node deployment
fn node_deployment_id(data: &ResourceData) -> Result<NodeDeploymentId, AppError> {
	require_id(data)?.parse()
}

impl Resource for NodeDeploymentResource {
	const TYPE_NAME: &'static str = "kubermatic_node_deployment";

	fn schema() -> Schema {
		Schema::new()
			.attribute(
				"project_id",
				AttributeSchema::string()
					.required()
					.force_new()
					.describe("Reference project identifier"),
			)
			.attribute(
				"dc_name",
				AttributeSchema::string()
					.required()
					.force_new()
					.describe("Data center name"),
			)
			.attribute(
				"cluster_id",
				AttributeSchema::string()
					.required()
					.force_new()
					.describe("Reference cluster identifier"),
			)
			.attribute(
				"name",
				AttributeSchema::string()
					.optional_computed()
					.force_new()
					.describe("Node deployment name"),
			)
			.attribute(
				"spec",
				AttributeSchema::singleton(node_deployment_spec_schema())
					.required()
					.force_new()
					.describe("Node deployment specification"),
			)
			.attribute(
				"creation_timestamp",
				AttributeSchema::string()
					.computed()
					.describe("Creation timestamp"),
			)
			.attribute(
				"deletion_timestamp",
				AttributeSchema::string()
					.computed()
					.describe("Deletion timestamp"),
			)
	}

	#[instrument(skip_all)]
	async fn create<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let project_id = data.get_string("project_id")?;
		let datacenter = data.get_string("dc_name")?;
		let cluster_id = data.get_string("cluster_id")?;
		let spec = desired_spec(data)?;
		validate_versions(state, &project_id, &datacenter, &cluster_id, &spec).await?;

		info!("Creating node deployment in cluster `{}`", cluster_id);
		let node_deployment = state
			.request(
				ApiRequest::<CreateNodeDeploymentRequest>::builder()
					.path(CreateNodeDeploymentPath {
						project_id: project_id.clone(),
						datacenter: datacenter.clone(),
						cluster_id: cluster_id.clone(),
					})
					.query(())
					.body(NodeDeployment {
						id: String::new(),
						name: data.get_string("name")?,
						spec,
						status: NodeDeploymentStatus::default(),
						creation_timestamp: None,
						deletion_timestamp: None,
					})
					.build(),
			)
			.await
			.map_err(AppError::api("create node deployment", &cluster_id))?;
		let id = NodeDeploymentId {
			project_id,
			datacenter,
			cluster_id,
			node_deployment_id: node_deployment.id,
		};
		data.set_id(id.to_string());

		let (id, resource) = (&id, id.to_string());
		poll_until(create_poll::<Self>(data), &resource, || async move {
			let node_deployment = state
				.request(
					ApiRequest::<GetNodeDeploymentRequest>::builder()
						.path(GetNodeDeploymentPath {
							project_id: id.project_id.clone(),
							datacenter: id.datacenter.clone(),
							cluster_id: id.cluster_id.clone(),
							node_deployment_id: id.node_deployment_id.clone(),
						})
						.query(())
						.body(())
						.build(),
				)
				.await
				.exists()
				.map_err(AppError::api("get node deployment", &id.node_deployment_id))?;
			Ok(match node_deployment {
				Some(node_deployment)
					if node_deployment.status.ready_replicas >= node_deployment.spec.replicas =>
				{
					PollOutcome::Ready(())
				}
				Some(node_deployment) => PollOutcome::Pending(format!(
					"{} of {} replicas are ready",
					node_deployment.status.ready_replicas, node_deployment.spec.replicas
				)),
				None => PollOutcome::Pending("node deployment is not visible yet".to_string()),
			})
		})
		.await?;

		Self::read(state, data).await
	}

	#[instrument(skip_all)]
	async fn read<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let id = node_deployment_id(data)?;
		let node_deployment = state
			.request(
				ApiRequest::<GetNodeDeploymentRequest>::builder()
					.path(GetNodeDeploymentPath {
						project_id: id.project_id.clone(),
						datacenter: id.datacenter.clone(),
						cluster_id: id.cluster_id.clone(),
						node_deployment_id: id.node_deployment_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.found()
			.map_err(AppError::api("read node deployment", id.to_string()))?;
		let Some(node_deployment) = node_deployment else {
			warn!("Node deployment `{}` is gone, removing it from the state", id);
			data.clear_id();
			return Ok(());
		};

		// The API does not return everything that was sent for Azure nodes
		let preserved = expand_node_deployment_spec(data.get_list("spec")?)?;

		data.set("project_id", id.project_id);
		data.set("dc_name", id.datacenter);
		data.set("cluster_id", id.cluster_id);
		data.set("name", node_deployment.name);
		data.set(
			"spec",
			flatten_node_deployment_spec(Some(&node_deployment.spec), preserved.as_ref()),
		);
		data.set(
			"creation_timestamp",
			flatten_timestamp(node_deployment.creation_timestamp),
		);
		data.set(
			"deletion_timestamp",
			flatten_timestamp(node_deployment.deletion_timestamp),
		);
		Ok(())
	}

	#[instrument(skip_all)]
	async fn update<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let id = node_deployment_id(data)?;
		let spec = desired_spec(data)?;
		validate_versions(state, &id.project_id, &id.datacenter, &id.cluster_id, &spec).await?;

		Self::read(state, data).await
	}

	#[instrument(skip_all)]
	async fn delete<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let id = node_deployment_id(data)?;

		info!("Deleting node deployment `{}`", id);
		state
			.request(
				ApiRequest::<DeleteNodeDeploymentRequest>::builder()
					.path(DeleteNodeDeploymentPath {
						project_id: id.project_id.clone(),
						datacenter: id.datacenter.clone(),
						cluster_id: id.cluster_id.clone(),
						node_deployment_id: id.node_deployment_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.exists()
			.map_err(AppError::api("delete node deployment", id.to_string()))?;

		let (id, resource) = (&id, id.to_string());
		poll_until(delete_poll::<Self>(data), &resource, || async move {
			let node_deployment = state
				.request(
					ApiRequest::<GetNodeDeploymentRequest>::builder()
						.path(GetNodeDeploymentPath {
							project_id: id.project_id.clone(),
							datacenter: id.datacenter.clone(),
							cluster_id: id.cluster_id.clone(),
							node_deployment_id: id.node_deployment_id.clone(),
						})
						.query(())
						.body(())
						.build(),
				)
				.await
				.found()
				.map_err(AppError::api("get node deployment", &id.node_deployment_id))?;
			Ok(match node_deployment {
				Some(_) => PollOutcome::Pending("node deployment still exists".to_string()),
				None => PollOutcome::Ready(()),
			})
		})
		.await?;

		data.clear_id();
		Ok(())
	}

	#[instrument(skip(state))]
	async fn import<T>(state: &AppState<T>, id: &str) -> Result<ResourceData, AppError>
	where
		T: ApiTransport,
	{
		let id = id.parse::<NodeDeploymentId>()?.to_string();
		read_imported::<Self, T>(state, &id, ResourceData::with_id(&id)).await
	}
}

#[cfg(test)]
mod tests {
	use http::{Method, StatusCode};
	use serde_json::json;

	use super::*;
	use crate::{block, test_support::FakeTransport};

	const CLUSTER_PATH: &str = "/api/v1/projects/p1/dc/dc1/clusters/c1";
	const NODE_DEPLOYMENTS_PATH: &str = "/api/v1/projects/p1/dc/dc1/clusters/c1/nodedeployments";
	const NODE_DEPLOYMENT_PATH: &str =
		"/api/v1/projects/p1/dc/dc1/clusters/c1/nodedeployments/nd1";

	fn cluster(version: &str) -> serde_json::Value {
		json!({
			"id": "c1",
			"name": "demo",
			"spec": {
				"cloud": { "dc": "dc1", "aws": {} },
				"version": version
			}
		})
	}

	fn node_deployment(ready: i32) -> serde_json::Value {
		json!({
			"id": "nd1",
			"name": "pool",
			"spec": {
				"replicas": 2,
				"template": {
					"cloud": {
						"aws": {
							"instanceType": "t3.small",
							"diskSize": 25,
							"volumeType": "standard"
						}
					},
					"operatingSystem": { "ubuntu": { "distUpgradeOnBoot": false } },
					"versions": { "kubelet": "1.17.4" }
				}
			},
			"status": { "replicas": 2, "readyReplicas": ready }
		})
	}

	fn desired(kubelet: &str) -> ResourceData {
		ResourceData::new(block! {
			"project_id" => "p1",
			"dc_name" => "dc1",
			"cluster_id" => "c1",
			"spec" => vec![Value::Map(block! {
				"replicas" => 2,
				"template" => vec![Value::Map(block! {
					"cloud" => vec![Value::Map(block! {
						"aws" => vec![Value::Map(block! {
							"instance_type" => "t3.small",
							"disk_size" => 25,
							"volume_type" => "standard",
						})],
					})],
					"operating_system" => vec![Value::Map(block! {
						"ubuntu" => vec![Value::Map(block! {})],
					})],
					"versions" => vec![Value::Map(block! { "kubelet" => kubelet })],
				})],
			})],
		})
	}

	#[test]
	fn desired_state_matches_the_schema() {
		NodeDeploymentResource::schema()
			.validate(desired("1.17.4").attributes())
			.unwrap();
	}

	#[tokio::test(start_paused = true)]
	async fn create_waits_for_every_replica_to_be_ready() {
		let state = FakeTransport::new()
			.respond(Method::GET, CLUSTER_PATH, StatusCode::OK, cluster("1.17.4"))
			.respond(
				Method::GET,
				"/api/v1/upgrades/node",
				StatusCode::OK,
				json!([{ "version": "1.17.4" }, { "version": "1.16.7" }]),
			)
			.respond(
				Method::POST,
				NODE_DEPLOYMENTS_PATH,
				StatusCode::CREATED,
				node_deployment(0),
			)
			.respond(
				Method::GET,
				NODE_DEPLOYMENT_PATH,
				StatusCode::OK,
				node_deployment(0),
			)
			.respond_times(
				2,
				Method::GET,
				NODE_DEPLOYMENT_PATH,
				StatusCode::OK,
				node_deployment(2),
			)
			.into_state();
		let mut data = desired("1.17.4");

		NodeDeploymentResource::create(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), Some("p1:dc1:c1:nd1"));
		assert_eq!(data.get_str("name").unwrap(), Some("pool"));
		let requests = state.client.requests();
		assert_eq!(requests[1].query, "control_plane_version=1.17.4");
		assert_eq!(
			requests[2].body.as_ref().unwrap()["spec"]["template"]["cloud"],
			json!({
				"aws": {
					"instanceType": "t3.small",
					"diskSize": 25,
					"volumeType": "standard"
				}
			})
		);
		assert_eq!(requests.len(), 6);
	}

	#[tokio::test]
	async fn create_rejects_versions_newer_than_the_cluster() {
		let state = FakeTransport::new()
			.respond(Method::GET, CLUSTER_PATH, StatusCode::OK, cluster("1.17.4"))
			.into_state();
		let mut data = desired("1.17.5");

		let error = NodeDeploymentResource::create(&state, &mut data)
			.await
			.unwrap_err();

		assert!(error
			.to_string()
			.contains("cannot be greater than cluster version"));
		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn create_rejects_versions_the_cluster_cannot_run() {
		let state = FakeTransport::new()
			.respond(Method::GET, CLUSTER_PATH, StatusCode::OK, cluster("1.17.4"))
			.respond(
				Method::GET,
				"/api/v1/upgrades/node",
				StatusCode::OK,
				json!([{ "version": "1.17.4" }]),
			)
			.into_state();
		let mut data = desired("1.15.0");

		let error = NodeDeploymentResource::create(&state, &mut data)
			.await
			.unwrap_err();

		assert!(error.to_string().contains("is not available"));
	}

	#[tokio::test]
	async fn update_validates_and_reads() {
		let state = FakeTransport::new()
			.respond(Method::GET, CLUSTER_PATH, StatusCode::OK, cluster("1.17.4"))
			.respond(
				Method::GET,
				"/api/v1/upgrades/node",
				StatusCode::OK,
				json!([{ "version": "1.17.4" }]),
			)
			.respond(
				Method::GET,
				NODE_DEPLOYMENT_PATH,
				StatusCode::OK,
				node_deployment(2),
			)
			.into_state();
		let mut data = desired("1.17.4");
		data.set_id("p1:dc1:c1:nd1");

		NodeDeploymentResource::update(&state, &mut data)
			.await
			.unwrap();

		assert_eq!(data.id(), Some("p1:dc1:c1:nd1"));
	}

	#[tokio::test]
	async fn read_keeps_the_azure_values_the_api_drops() {
		let state = FakeTransport::new()
			.respond(
				Method::GET,
				NODE_DEPLOYMENT_PATH,
				StatusCode::OK,
				json!({
					"id": "nd1",
					"name": "pool",
					"spec": {
						"replicas": 1,
						"template": {
							"cloud": { "azure": { "size": "standard_a2" } },
							"operatingSystem": { "containerLinux": { "disableAutoUpdate": true } }
						}
					}
				}),
			)
			.into_state();
		let mut data = ResourceData::with_id("p1:dc1:c1:nd1");
		data.set(
			"spec",
			vec![Value::Map(block! {
				"replicas" => 1,
				"template" => vec![Value::Map(block! {
					"cloud" => vec![Value::Map(block! {
						"azure" => vec![Value::Map(block! {
							"size" => "Standard_A2",
							"image_id" => "image-1",
						})],
					})],
				})],
			})],
		);

		NodeDeploymentResource::read(&state, &mut data).await.unwrap();

		let spec = expand_node_deployment_spec(data.get_list("spec").unwrap())
			.unwrap()
			.unwrap();
		let Some(NodeCloudProvider::Azure(azure)) = spec.template.cloud.provider else {
			panic!("expected an Azure node");
		};
		assert_eq!(azure.size, "Standard_A2");
		assert_eq!(azure.image_id, "image-1");
		assert_eq!(data.get_str("cluster_id").unwrap(), Some("c1"));
	}

	#[tokio::test(start_paused = true)]
	async fn delete_waits_until_the_node_deployment_is_gone() {
		let state = FakeTransport::new()
			.respond(
				Method::DELETE,
				NODE_DEPLOYMENT_PATH,
				StatusCode::OK,
				json!(null),
			)
			.respond(
				Method::GET,
				NODE_DEPLOYMENT_PATH,
				StatusCode::OK,
				node_deployment(2),
			)
			.not_found(Method::GET, NODE_DEPLOYMENT_PATH)
			.into_state();
		let mut data = ResourceData::with_id("p1:dc1:c1:nd1");

		NodeDeploymentResource::delete(&state, &mut data)
			.await
			.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn read_clears_the_id_of_a_forbidden_node_deployment() {
		let state = FakeTransport::new()
			.forbidden(Method::GET, NODE_DEPLOYMENT_PATH)
			.into_state();
		let mut data = ResourceData::with_id("p1:dc1:c1:nd1");

		NodeDeploymentResource::read(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn delete_fails_when_the_call_is_forbidden() {
		let state = FakeTransport::new()
			.forbidden(Method::DELETE, NODE_DEPLOYMENT_PATH)
			.into_state();
		let mut data = ResourceData::with_id("p1:dc1:c1:nd1");

		let error = NodeDeploymentResource::delete(&state, &mut data)
			.await
			.unwrap_err();

		assert!(matches!(
			error,
			AppError::Api {
				operation: "delete node deployment",
				..
			}
		));
		assert_eq!(data.id(), Some("p1:dc1:c1:nd1"));
	}

	#[tokio::test]
	async fn malformed_ids_are_rejected() {
		let state = FakeTransport::new().into_state();
		let mut data = ResourceData::with_id("p1:dc1:nd1");

		assert!(matches!(
			NodeDeploymentResource::read(&state, &mut data).await,
			Err(AppError::InvalidId { .. })
		));
		assert!(matches!(
			NodeDeploymentResource::import(&state, "p1::c1:nd1").await,
			Err(AppError::InvalidId { .. })
		));
	}
}

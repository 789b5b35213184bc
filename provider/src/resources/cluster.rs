use models::api::project::cluster::*;

use super::{create_poll, delete_poll, read_imported, require_id, Resource};
use crate::{
	id::ClusterImportId,
	mapping::{
		cluster::{expand_cluster_spec, flatten_cluster_spec},
		flatten_timestamp,
	},
	poll::{poll_until, PollOutcome},
	prelude::*,
	schema::{AttributeSchema, Schema},
	validation::{suppress_version_prefix, validate_cluster_type, validate_labels, validate_version},
};

/// A managed Kubernetes control plane. Nothing about a cluster can be changed
/// in place, so every input forces a new cluster.
pub struct ClusterResource;

/// The schema of the `spec` block of a cluster
fn cluster_spec_schema() -> Schema {
	Schema::new()
		.attribute(
			"version",
			AttributeSchema::string()
				.required()
				.validate(validate_version)
				.diff_suppress(suppress_version_prefix)
				.describe("Kubernetes version of the control plane"),
		)
		.attribute(
			"cloud",
			AttributeSchema::singleton(cloud_schema())
				.required()
				.describe("Cloud the cluster runs in"),
		)
		.attribute(
			"machine_networks",
			AttributeSchema::blocks(
				Schema::new()
					.attribute("cidr", AttributeSchema::string().required())
					.attribute("gateway", AttributeSchema::string().required())
					.attribute("dns_servers", AttributeSchema::string_list().required()),
			)
			.describe("Networks the machines are attached to, mostly used by vSphere"),
		)
		.attribute(
			"audit_logging",
			AttributeSchema::bool().describe("Whether audit logging is enabled"),
		)
		.attribute(
			"pod_security_policy",
			AttributeSchema::bool()
				.describe("Whether the PodSecurityPolicy admission plugin is enabled"),
		)
		.attribute(
			"pod_node_selector",
			AttributeSchema::bool()
				.describe("Whether the PodNodeSelector admission plugin is enabled"),
		)
}

/// The schema of the `cloud` block of a cluster spec. Exactly one of the
/// variants may be set.
fn cloud_schema() -> Schema {
	Schema::new()
		.attribute(
			"aws",
			AttributeSchema::singleton(
				Schema::new()
					.attribute(
						"access_key_id",
						AttributeSchema::string().required().sensitive(),
					)
					.attribute(
						"secret_access_key",
						AttributeSchema::string().required().sensitive(),
					)
					.attribute("vpc_id", AttributeSchema::string())
					.attribute("security_group_id", AttributeSchema::string())
					.attribute("route_table_id", AttributeSchema::string())
					.attribute("instance_profile_name", AttributeSchema::string())
					.attribute("role_arn", AttributeSchema::string()),
			),
		)
		.attribute(
			"azure",
			AttributeSchema::singleton(
				Schema::new()
					.attribute("client_id", AttributeSchema::string().required().sensitive())
					.attribute(
						"client_secret",
						AttributeSchema::string().required().sensitive(),
					)
					.attribute(
						"subscription_id",
						AttributeSchema::string().required().sensitive(),
					)
					.attribute("tenant_id", AttributeSchema::string().required().sensitive())
					.attribute("resource_group", AttributeSchema::string())
					.attribute("route_table", AttributeSchema::string())
					.attribute("security_group", AttributeSchema::string())
					.attribute("subnet", AttributeSchema::string())
					.attribute("vnet", AttributeSchema::string())
					.attribute("availability_set", AttributeSchema::string()),
			),
		)
		.attribute(
			"openstack",
			AttributeSchema::singleton(
				Schema::new()
					.attribute("tenant", AttributeSchema::string().required().sensitive())
					.attribute("domain", AttributeSchema::string().sensitive())
					.attribute("username", AttributeSchema::string().required().sensitive())
					.attribute("password", AttributeSchema::string().required().sensitive())
					.attribute("network", AttributeSchema::string())
					.attribute("security_groups", AttributeSchema::string())
					.attribute("floating_ip_pool", AttributeSchema::string())
					.attribute("router_id", AttributeSchema::string())
					.attribute("subnet_id", AttributeSchema::string()),
			),
		)
		.attribute("bringyourown", AttributeSchema::singleton(Schema::new()))
}

/// The parts of the state that address a cluster in the API
fn cluster_path(data: &ResourceData) -> Result<(String, String, String), AppError> {
	Ok((
		data.get_string("project_id")?,
		data.get_string("dc_name")?,
		require_id(data)?.to_string(),
	))
}

impl Resource for ClusterResource {
	const TYPE_NAME: &'static str = "kubermatic_cluster";

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
				"name",
				AttributeSchema::string()
					.required()
					.force_new()
					.describe("Cluster name"),
			)
			.attribute(
				"labels",
				AttributeSchema::string_map()
					.force_new()
					.validate(validate_labels)
					.describe("Labels attached to the cluster"),
			)
			.attribute(
				"type",
				AttributeSchema::string()
					.optional_computed()
					.force_new()
					.validate(validate_cluster_type)
					.describe("Cluster type, either `kubernetes` or `openshift`"),
			)
			.attribute(
				"credential",
				AttributeSchema::string()
					.force_new()
					.describe("Name of a preset of cloud credentials"),
			)
			.attribute(
				"spec",
				AttributeSchema::singleton(cluster_spec_schema())
					.required()
					.force_new()
					.describe("Cluster specification"),
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
		let name = data.get_string("name")?;
		let spec = expand_cluster_spec(data.get_list("spec")?, &datacenter)?
			.ok_or_else(|| AppError::validation("attribute `spec` is required"))?;
		let cluster = Cluster {
			id: String::new(),
			name: name.clone(),
			cluster_type: data.get_string("type")?,
			labels: data.get_labels("labels")?,
			credential: data.get_string("credential")?,
			spec,
			creation_timestamp: None,
			deletion_timestamp: None,
		};

		info!("Creating cluster `{}` in `{}`", name, datacenter);
		let cluster = state
			.request(
				ApiRequest::<CreateClusterRequest>::builder()
					.path(CreateClusterPath {
						project_id: project_id.clone(),
						datacenter: datacenter.clone(),
					})
					.query(())
					.body(CreateClusterRequest { cluster })
					.build(),
			)
			.await
			.map_err(AppError::api("create cluster", &name))?;
		data.set_id(&cluster.id);

		let (project_id, datacenter, cluster_id) = (
			project_id.as_str(),
			datacenter.as_str(),
			cluster.id.as_str(),
		);
		poll_until(create_poll::<Self>(data), cluster_id, || async move {
			let health = state
				.request(
					ApiRequest::<GetClusterHealthRequest>::builder()
						.path(GetClusterHealthPath {
							project_id: project_id.to_string(),
							datacenter: datacenter.to_string(),
							cluster_id: cluster_id.to_string(),
						})
						.query(())
						.body(())
						.build(),
				)
				.await
				.exists()
				.map_err(AppError::api("get cluster health", cluster_id))?;
			Ok(match health {
				Some(health) if health.is_healthy() => PollOutcome::Ready(()),
				Some(health) => PollOutcome::Pending(format!(
					"waiting for {} to be up",
					health.pending_components().join(", ")
				)),
				None => PollOutcome::Pending("cluster is not visible yet".to_string()),
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
		let (project_id, datacenter, cluster_id) = cluster_path(data)?;
		let cluster = state
			.request(
				ApiRequest::<GetClusterRequest>::builder()
					.path(GetClusterPath {
						project_id,
						datacenter: datacenter.clone(),
						cluster_id: cluster_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.found()
			.map_err(AppError::api("read cluster", &cluster_id))?;
		let Some(cluster) = cluster else {
			warn!("Cluster `{}` is gone, removing it from the state", cluster_id);
			data.clear_id();
			return Ok(());
		};

		// The API never returns the cloud credentials
		let preserved = expand_cluster_spec(data.get_list("spec")?, &datacenter)?;

		data.set("name", cluster.name);
		data.set("labels", &cluster.labels);
		data.set("type", cluster.cluster_type);
		if !cluster.credential.is_empty() {
			data.set("credential", cluster.credential);
		}
		data.set(
			"spec",
			flatten_cluster_spec(
				Some(&cluster.spec),
				preserved.as_ref().map(|spec| &spec.cloud),
			),
		);
		data.set(
			"creation_timestamp",
			flatten_timestamp(cluster.creation_timestamp),
		);
		data.set(
			"deletion_timestamp",
			flatten_timestamp(cluster.deletion_timestamp),
		);
		Ok(())
	}

	#[instrument(skip_all)]
	async fn delete<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let (project_id, datacenter, cluster_id) = cluster_path(data)?;

		info!("Deleting cluster `{}`", cluster_id);
		state
			.request(
				ApiRequest::<DeleteClusterRequest>::builder()
					.path(DeleteClusterPath {
						project_id: project_id.clone(),
						datacenter: datacenter.clone(),
						cluster_id: cluster_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.exists()
			.map_err(AppError::api("delete cluster", &cluster_id))?;

		let (project_id, datacenter, id) = (
			project_id.as_str(),
			datacenter.as_str(),
			cluster_id.as_str(),
		);
		poll_until(delete_poll::<Self>(data), id, || async move {
			let cluster = state
				.request(
					ApiRequest::<GetClusterRequest>::builder()
						.path(GetClusterPath {
							project_id: project_id.to_string(),
							datacenter: datacenter.to_string(),
							cluster_id: id.to_string(),
						})
						.query(())
						.body(())
						.build(),
				)
				.await
				.found()
				.map_err(AppError::api("get cluster", id))?;
			Ok(match cluster {
				Some(_) => PollOutcome::Pending("cluster still exists".to_string()),
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
		let ClusterImportId {
			project_id,
			datacenter,
			cluster_id,
		} = id.parse()?;

		let mut data = ResourceData::with_id(cluster_id);
		data.set("project_id", project_id);
		data.set("dc_name", datacenter);
		read_imported::<Self, T>(state, id, data).await
	}
}

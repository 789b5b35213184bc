use std::{future::Future, time::Duration};

use crate::{poll::PollConfig, prelude::*, schema::Schema};

/// The cluster resource
mod cluster;
/// The node deployment resource
mod node_deployment;
/// The project resource
mod project;
/// The service account resource
mod service_account;
/// The service account token resource
mod service_account_token;
/// The SSH key resource
mod ssh_key;

pub use self::{
	cluster::ClusterResource,
	node_deployment::NodeDeploymentResource,
	project::ProjectResource,
	service_account::ServiceAccountResource,
	service_account_token::ServiceAccountTokenResource,
	ssh_key::SshKeyResource,
};

/// The lifecycle of a resource type. Every handler receives the shared
/// [`AppState`] and the [`ResourceData`] of the instance it acts on, which it
/// updates in place.
///
/// A read that finds the resource gone clears its ID and succeeds, leaving it
/// to the framework to plan its creation again.
pub trait Resource {
	/// The name of the resource type, such as `kubermatic_cluster`
	const TYPE_NAME: &'static str;
	/// How long to wait for a new resource to become ready, unless configured
	/// otherwise
	const CREATE_TIMEOUT: Duration = Duration::from_secs(20 * 60);
	/// How long to wait for a deleted resource to be gone, unless configured
	/// otherwise
	const DELETE_TIMEOUT: Duration = Duration::from_secs(20 * 60);

	/// The declaration of the attributes of the resource
	fn schema() -> Schema;

	/// Creates the resource from the desired state, waits for it to be ready
	/// and reads it back
	fn create<T>(
		state: &AppState<T>,
		data: &mut ResourceData,
	) -> impl Future<Output = Result<(), AppError>>
	where
		T: ApiTransport;

	/// Refreshes the state of the resource from the API
	fn read<T>(
		state: &AppState<T>,
		data: &mut ResourceData,
	) -> impl Future<Output = Result<(), AppError>>
	where
		T: ApiTransport;

	/// Applies the desired state to an existing resource. Resources whose
	/// attributes all force a replacement only read themselves back.
	fn update<T>(
		state: &AppState<T>,
		data: &mut ResourceData,
	) -> impl Future<Output = Result<(), AppError>>
	where
		T: ApiTransport,
	{
		Self::read(state, data)
	}

	/// Deletes the resource and waits for it to be gone
	fn delete<T>(
		state: &AppState<T>,
		data: &mut ResourceData,
	) -> impl Future<Output = Result<(), AppError>>
	where
		T: ApiTransport;

	/// Builds the state of an existing resource from the ID given to the import
	/// command, and reads it
	fn import<T>(
		state: &AppState<T>,
		id: &str,
	) -> impl Future<Output = Result<ResourceData, AppError>>
	where
		T: ApiTransport;
}

/// How to wait for a resource of type `R` to become ready
fn create_poll<R>(data: &ResourceData) -> PollConfig
where
	R: Resource,
{
	PollConfig::with_timeout(data.timeouts.create.unwrap_or(R::CREATE_TIMEOUT))
}

/// How to wait for a resource of type `R` to be gone
fn delete_poll<R>(data: &ResourceData) -> PollConfig
where
	R: Resource,
{
	PollConfig::with_timeout(data.timeouts.delete.unwrap_or(R::DELETE_TIMEOUT))
}

/// Returns the ID of a resource, failing if it has none
fn require_id(data: &ResourceData) -> Result<&str, AppError> {
	data.id()
		.ok_or_else(|| AppError::validation("the resource has no ID, it was never created"))
}

/// Reads an imported resource, failing if it turns out not to exist
async fn read_imported<R, T>(
	state: &AppState<T>,
	id: &str,
	mut data: ResourceData,
) -> Result<ResourceData, AppError>
where
	R: Resource,
	T: ApiTransport,
{
	R::read(state, &mut data).await?;
	if data.id().is_none() {
		return Err(AppError::validation(format!(
			"cannot import non-existent {} `{}`",
			R::TYPE_NAME,
			id
		)));
	}
	Ok(data)
}

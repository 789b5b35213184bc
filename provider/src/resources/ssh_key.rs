use models::api::project::ssh_key::*;

use super::{delete_poll, read_imported, require_id, Resource};
use crate::{
	id::SshKeyImportId,
	mapping::flatten_timestamp,
	poll::{poll_until, PollOutcome},
	prelude::*,
	schema::{AttributeSchema, Schema},
};

/// A public SSH key registered to a project. Keys cannot be changed once
/// created, and the API can only list them.
pub struct SshKeyResource;

/// Finds a key in the list of keys of its project. A project that is gone
/// has no keys.
async fn find_ssh_key<T>(
	state: &AppState<T>,
	project_id: &str,
	key_id: &str,
) -> Result<Option<SshKey>, AppError>
where
	T: ApiTransport,
{
	let keys = state
		.request(
			ApiRequest::<ListSshKeysRequest>::builder()
				.path(ListSshKeysPath {
					project_id: project_id.to_string(),
				})
				.query(())
				.body(())
				.build(),
		)
		.await
		.found()
		.map_err(AppError::api("list SSH keys", key_id))?
		.unwrap_or_default();
	Ok(keys.into_iter().find(|key| key.id == key_id))
}

impl Resource for SshKeyResource {
	const TYPE_NAME: &'static str = "kubermatic_sshkey";

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
				"name",
				AttributeSchema::string()
					.required()
					.force_new()
					.describe("Name for the resource"),
			)
			.attribute(
				"public_key",
				AttributeSchema::string()
					.required()
					.force_new()
					.describe("The public SSH key"),
			)
			.attribute(
				"fingerprint",
				AttributeSchema::string()
					.computed()
					.describe("Fingerprint of the key"),
			)
			.attribute("creation_timestamp", AttributeSchema::string().computed())
	}

	#[instrument(skip_all)]
	async fn create<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let project_id = data.get_string("project_id")?;
		let name = data.get_string("name")?;

		info!("Creating SSH key `{}`", name);
		let key = state
			.request(
				ApiRequest::<CreateSshKeyRequest>::builder()
					.path(CreateSshKeyPath { project_id })
					.query(())
					.body(CreateSshKeyRequest {
						name: name.clone(),
						spec: SshKeySpec {
							fingerprint: String::new(),
							public_key: data.get_string("public_key")?,
						},
					})
					.build(),
			)
			.await
			.map_err(AppError::api("create SSH key", &name))?;
		data.set_id(key.id);

		Self::read(state, data).await
	}

	#[instrument(skip_all)]
	async fn read<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let key_id = require_id(data)?.to_string();
		let project_id = data.get_string("project_id")?;
		let Some(key) = find_ssh_key(state, &project_id, &key_id).await? else {
			warn!("SSH key `{}` is gone, removing it from the state", key_id);
			data.clear_id();
			return Ok(());
		};

		data.set("name", key.name);
		data.set("public_key", key.spec.public_key);
		data.set("fingerprint", key.spec.fingerprint);
		data.set("creation_timestamp", flatten_timestamp(key.creation_timestamp));
		Ok(())
	}

	#[instrument(skip_all)]
	async fn delete<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let key_id = require_id(data)?.to_string();
		let project_id = data.get_string("project_id")?;

		info!("Deleting SSH key `{}`", key_id);
		state
			.request(
				ApiRequest::<DeleteSshKeyRequest>::builder()
					.path(DeleteSshKeyPath {
						project_id: project_id.clone(),
						key_id: key_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.exists()
			.map_err(AppError::api("delete SSH key", &key_id))?;

		let (project_id, key_id) = (project_id.as_str(), key_id.as_str());
		poll_until(delete_poll::<Self>(data), key_id, || async move {
			Ok(match find_ssh_key(state, project_id, key_id).await? {
				Some(_) => PollOutcome::Pending("SSH key is still listed".to_string()),
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
		let SshKeyImportId { project_id, key_id } = id.parse()?;

		let mut data = ResourceData::with_id(key_id);
		data.set("project_id", project_id);
		read_imported::<Self, T>(state, id, data).await
	}
}

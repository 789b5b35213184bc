use models::api::project::service_account::*;

use super::{delete_poll, read_imported, require_id, Resource};
use crate::{
	id::ServiceAccountId,
	mapping::flatten_timestamp,
	poll::{poll_until, PollOutcome},
	prelude::*,
	schema::{AttributeSchema, Schema},
	validation::{suppress_group_diff, validate_service_account_group},
};

/// A non-human identity of a project. The ID is a [`ServiceAccountId`].
pub struct ServiceAccountResource;

/// Finds a service account in the list of service accounts of its project. A
/// project that is gone has no service accounts.
async fn find_service_account<T>(
	state: &AppState<T>,
	id: &ServiceAccountId,
) -> Result<Option<ServiceAccount>, AppError>
where
	T: ApiTransport,
{
	let service_accounts = state
		.request(
			ApiRequest::<ListServiceAccountsRequest>::builder()
				.path(ListServiceAccountsPath {
					project_id: id.project_id.clone(),
				})
				.query(())
				.body(())
				.build(),
		)
		.await
		.found()
		.map_err(AppError::api("list service accounts", id.to_string()))?
		.unwrap_or_default();
	Ok(service_accounts
		.into_iter()
		.find(|service_account| service_account.id == id.service_account_id))
}

impl Resource for ServiceAccountResource {
	const TYPE_NAME: &'static str = "kubermatic_service_account";

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
					.describe("Service account's name"),
			)
			.attribute(
				"group",
				AttributeSchema::string()
					.required()
					.force_new()
					.validate(validate_service_account_group)
					.diff_suppress(suppress_group_diff)
					.describe("Service account's role in the project, `editors` or `viewers`"),
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

		info!("Creating service account `{}`", name);
		let service_account = state
			.request(
				ApiRequest::<CreateServiceAccountRequest>::builder()
					.path(CreateServiceAccountPath {
						project_id: project_id.clone(),
					})
					.query(())
					.body(CreateServiceAccountRequest {
						name: name.clone(),
						group: data.get_string("group")?,
					})
					.build(),
			)
			.await
			.map_err(AppError::api("create service account", &name))?;
		data.set_id(
			ServiceAccountId {
				project_id,
				service_account_id: service_account.id,
			}
			.to_string(),
		);

		Self::read(state, data).await
	}

	#[instrument(skip_all)]
	async fn read<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let id = require_id(data)?.parse::<ServiceAccountId>()?;
		let Some(service_account) = find_service_account(state, &id).await? else {
			warn!("Service account `{}` is gone, removing it from the state", id);
			data.clear_id();
			return Ok(());
		};

		data.set("project_id", id.project_id);
		data.set("name", service_account.name);
		data.set("group", service_account.group);
		data.set(
			"creation_timestamp",
			flatten_timestamp(service_account.creation_timestamp),
		);
		Ok(())
	}

	#[instrument(skip_all)]
	async fn delete<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let id = require_id(data)?.parse::<ServiceAccountId>()?;

		info!("Deleting service account `{}`", id);
		state
			.request(
				ApiRequest::<DeleteServiceAccountRequest>::builder()
					.path(DeleteServiceAccountPath {
						project_id: id.project_id.clone(),
						service_account_id: id.service_account_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.exists()
			.map_err(AppError::api("delete service account", id.to_string()))?;

		let (id, resource) = (&id, id.to_string());
		poll_until(delete_poll::<Self>(data), &resource, || async move {
			Ok(match find_service_account(state, id).await? {
				Some(_) => PollOutcome::Pending("service account is still listed".to_string()),
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
		let id = id.parse::<ServiceAccountId>()?.to_string();
		read_imported::<Self, T>(state, &id, ResourceData::with_id(&id)).await
	}
}

#[cfg(test)]
mod tests {
	use http::{Method, StatusCode};
	use serde_json::json;

	use super::*;
	use crate::{block, test_support::FakeTransport};

	fn service_account() -> serde_json::Value {
		json!({
			"id": "sa-1",
			"name": "ci",
			"group": "editors-p1",
			"status": "Active"
		})
	}

	#[tokio::test]
	async fn create_records_the_composite_id() {
		let state = FakeTransport::new()
			.respond(
				Method::POST,
				"/api/v1/projects/p1/serviceaccounts",
				StatusCode::CREATED,
				service_account(),
			)
			.respond(
				Method::GET,
				"/api/v1/projects/p1/serviceaccounts",
				StatusCode::OK,
				json!([service_account()]),
			)
			.into_state();
		let mut data = ResourceData::new(block! {
			"project_id" => "p1",
			"name" => "ci",
			"group" => "editors",
		});

		ServiceAccountResource::create(&state, &mut data)
			.await
			.unwrap();

		assert_eq!(data.id(), Some("p1:sa-1"));
		assert_eq!(data.get_str("group").unwrap(), Some("editors-p1"));
		assert_eq!(
			state.client.requests()[0].body,
			Some(json!({ "name": "ci", "group": "editors" }))
		);
	}

	#[test]
	fn groups_with_the_project_suffix_are_not_a_change() {
		let schema = ServiceAccountResource::schema();
		let data = ResourceData::new(block! { "project_id" => "p1" });
		let old = block! { "project_id" => "p1", "name" => "ci", "group" => "editors-p1" };

		assert!(schema
			.diff(
				&old,
				&block! { "project_id" => "p1", "name" => "ci", "group" => "editors" },
				&data
			)
			.is_empty());
		assert!(schema
			.diff(
				&old,
				&block! { "project_id" => "p1", "name" => "ci", "group" => "viewers" },
				&data
			)
			.requires_replace);
	}

	#[test]
	fn unknown_groups_are_rejected() {
		let error = ServiceAccountResource::schema()
			.validate(&block! { "project_id" => "p1", "name" => "ci", "group" => "admins" })
			.unwrap_err();

		assert!(error.to_string().contains("admins"));
	}

	#[tokio::test]
	async fn read_clears_the_id_when_the_project_is_gone() {
		let state = FakeTransport::new()
			.not_found(Method::GET, "/api/v1/projects/p1/serviceaccounts")
			.into_state();
		let mut data = ResourceData::with_id("p1:sa-1");

		ServiceAccountResource::read(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn read_clears_the_id_when_the_project_is_forbidden() {
		let state = FakeTransport::new()
			.forbidden(Method::GET, "/api/v1/projects/p1/serviceaccounts")
			.into_state();
		let mut data = ResourceData::with_id("p1:sa-1");

		ServiceAccountResource::read(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn delete_fails_when_the_call_is_forbidden() {
		let state = FakeTransport::new()
			.forbidden(Method::DELETE, "/api/v1/projects/p1/serviceaccounts/sa-1")
			.into_state();
		let mut data = ResourceData::with_id("p1:sa-1");

		let error = ServiceAccountResource::delete(&state, &mut data)
			.await
			.unwrap_err();

		assert!(matches!(
			error,
			AppError::Api {
				operation: "delete service account",
				..
			}
		));
		assert_eq!(data.id(), Some("p1:sa-1"));
	}

	#[tokio::test(start_paused = true)]
	async fn delete_waits_until_the_service_account_is_no_longer_listed() {
		let state = FakeTransport::new()
			.respond(
				Method::DELETE,
				"/api/v1/projects/p1/serviceaccounts/sa-1",
				StatusCode::OK,
				json!(null),
			)
			.respond(
				Method::GET,
				"/api/v1/projects/p1/serviceaccounts",
				StatusCode::OK,
				json!([service_account()]),
			)
			.respond(
				Method::GET,
				"/api/v1/projects/p1/serviceaccounts",
				StatusCode::OK,
				json!([]),
			)
			.into_state();
		let mut data = ResourceData::with_id("p1:sa-1");

		ServiceAccountResource::delete(&state, &mut data)
			.await
			.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn import_reads_the_project_from_the_id() {
		let state = FakeTransport::new()
			.respond(
				Method::GET,
				"/api/v1/projects/p1/serviceaccounts",
				StatusCode::OK,
				json!([service_account()]),
			)
			.into_state();

		let data = ServiceAccountResource::import(&state, "p1:sa-1")
			.await
			.unwrap();

		assert_eq!(data.get_str("project_id").unwrap(), Some("p1"));
		assert_eq!(data.get_str("name").unwrap(), Some("ci"));
	}
}

use models::api::project::service_account::token::*;

use super::{delete_poll, read_imported, require_id, Resource};
use crate::{
	id::{ServiceAccountId, ServiceAccountTokenId},
	mapping::flatten_timestamp,
	poll::{poll_until, PollOutcome},
	prelude::*,
	schema::{AttributeSchema, Schema},
};

/// A token of a service account. The ID is a [`ServiceAccountTokenId`]. The
/// secret itself is only returned when the token is created, and is kept in
/// the state from then on.
pub struct ServiceAccountTokenResource;

/// Finds a token in the list of tokens of its service account. A service
/// account that is gone has no tokens.
async fn find_token<T>(
	state: &AppState<T>,
	id: &ServiceAccountTokenId,
) -> Result<Option<PublicServiceAccountToken>, AppError>
where
	T: ApiTransport,
{
	let tokens = state
		.request(
			ApiRequest::<ListTokensRequest>::builder()
				.path(ListTokensPath {
					project_id: id.project_id.clone(),
					service_account_id: id.service_account_id.clone(),
				})
				.query(())
				.body(())
				.build(),
		)
		.await
		.found()
		.map_err(AppError::api("list tokens", id.to_string()))?
		.unwrap_or_default();
	Ok(tokens.into_iter().find(|token| token.id == id.token_id))
}

impl Resource for ServiceAccountTokenResource {
	const TYPE_NAME: &'static str = "kubermatic_service_account_token";

	fn schema() -> Schema {
		Schema::new()
			.attribute(
				"service_account_id",
				AttributeSchema::string()
					.required()
					.force_new()
					.describe("Service account full identifier of format `project_id:service_account_id`"),
			)
			.attribute(
				"name",
				AttributeSchema::string()
					.required()
					.describe("Name of the token"),
			)
			.attribute(
				"token",
				AttributeSchema::string()
					.computed()
					.sensitive()
					.describe("The token itself"),
			)
			.attribute(
				"creation_timestamp",
				AttributeSchema::string()
					.computed()
					.describe("Creation timestamp"),
			)
			.attribute(
				"expiry",
				AttributeSchema::string()
					.computed()
					.describe("Expiration timestamp"),
			)
	}

	#[instrument(skip_all)]
	async fn create<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let ServiceAccountId {
			project_id,
			service_account_id,
		} = data.get_string("service_account_id")?.parse()?;
		let name = data.get_string("name")?;

		info!("Creating token `{}` of service account `{}`", name, service_account_id);
		let token = state
			.request(
				ApiRequest::<CreateTokenRequest>::builder()
					.path(CreateTokenPath {
						project_id: project_id.clone(),
						service_account_id: service_account_id.clone(),
					})
					.query(())
					.body(CreateTokenRequest { name: name.clone() })
					.build(),
			)
			.await
			.map_err(AppError::api("create token", &name))?;
		data.set_id(
			ServiceAccountTokenId {
				project_id,
				service_account_id,
				token_id: token.details.id,
			}
			.to_string(),
		);
		data.set("token", token.token);

		Self::read(state, data).await
	}

	#[instrument(skip_all)]
	async fn read<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let id = require_id(data)?.parse::<ServiceAccountTokenId>()?;
		let Some(token) = find_token(state, &id).await? else {
			warn!("Token `{}` is gone, removing it from the state", id);
			data.clear_id();
			return Ok(());
		};

		data.set("service_account_id", id.service_account().to_string());
		data.set("name", token.name);
		data.set("creation_timestamp", flatten_timestamp(token.creation_timestamp));
		data.set("expiry", flatten_timestamp(token.expiry));
		Ok(())
	}

	#[instrument(skip_all)]
	async fn update<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let id = require_id(data)?.parse::<ServiceAccountTokenId>()?;

		info!("Renaming token `{}`", id);
		state
			.request(
				ApiRequest::<PatchTokenRequest>::builder()
					.path(PatchTokenPath {
						project_id: id.project_id.clone(),
						service_account_id: id.service_account_id.clone(),
						token_id: id.token_id.clone(),
					})
					.query(())
					.body(PatchTokenRequest {
						name: data.get_string("name")?,
					})
					.build(),
			)
			.await
			.map_err(AppError::api("update token", id.to_string()))?;

		Self::read(state, data).await
	}

	#[instrument(skip_all)]
	async fn delete<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let id = require_id(data)?.parse::<ServiceAccountTokenId>()?;

		info!("Deleting token `{}`", id);
		state
			.request(
				ApiRequest::<DeleteTokenRequest>::builder()
					.path(DeleteTokenPath {
						project_id: id.project_id.clone(),
						service_account_id: id.service_account_id.clone(),
						token_id: id.token_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.exists()
			.map_err(AppError::api("delete token", id.to_string()))?;

		let (id, resource) = (&id, id.to_string());
		poll_until(delete_poll::<Self>(data), &resource, || async move {
			Ok(match find_token(state, id).await? {
				Some(_) => PollOutcome::Pending("token is still listed".to_string()),
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
		let id = id.parse::<ServiceAccountTokenId>()?.to_string();
		read_imported::<Self, T>(state, &id, ResourceData::with_id(&id)).await
	}
}

#[cfg(test)]
mod tests {
	use http::{Method, StatusCode};
	use serde_json::json;

	use super::*;
	use crate::{block, test_support::FakeTransport};

	const TOKENS_PATH: &str = "/api/v1/projects/p1/serviceaccounts/sa-1/tokens";

	fn token(name: &str) -> serde_json::Value {
		json!({
			"id": "tok-1",
			"name": name,
			"creationTimestamp": "2020-03-05T10:11:12Z",
			"expiry": "2023-03-05T10:11:12Z"
		})
	}

	#[tokio::test]
	async fn create_keeps_the_secret_only_returned_once() {
		let mut created = token("deploy");
		created["token"] = json!("eyJhbGciOi");
		let state = FakeTransport::new()
			.respond(Method::POST, TOKENS_PATH, StatusCode::CREATED, created)
			.respond(
				Method::GET,
				TOKENS_PATH,
				StatusCode::OK,
				json!([token("deploy")]),
			)
			.into_state();
		let mut data = ResourceData::new(block! {
			"service_account_id" => "p1:sa-1",
			"name" => "deploy",
		});

		ServiceAccountTokenResource::create(&state, &mut data)
			.await
			.unwrap();

		assert_eq!(data.id(), Some("p1:sa-1:tok-1"));
		assert_eq!(data.get_str("token").unwrap(), Some("eyJhbGciOi"));
		assert_eq!(
			data.get_str("expiry").unwrap(),
			Some("2023-03-05T10:11:12Z")
		);
	}

	#[tokio::test]
	async fn create_rejects_malformed_service_account_ids() {
		let state = FakeTransport::new().into_state();
		let mut data = ResourceData::new(block! {
			"service_account_id" => "sa-1",
			"name" => "deploy",
		});

		assert!(matches!(
			ServiceAccountTokenResource::create(&state, &mut data).await,
			Err(AppError::InvalidId { .. })
		));
	}

	#[tokio::test]
	async fn update_renames_the_token() {
		let state = FakeTransport::new()
			.respond(
				Method::PATCH,
				&format!("{}/tok-1", TOKENS_PATH),
				StatusCode::OK,
				token("renamed"),
			)
			.respond(
				Method::GET,
				TOKENS_PATH,
				StatusCode::OK,
				json!([token("renamed")]),
			)
			.into_state();
		let mut data = ResourceData::with_id("p1:sa-1:tok-1");
		data.set("name", "renamed");
		data.set("token", "eyJhbGciOi");

		ServiceAccountTokenResource::update(&state, &mut data)
			.await
			.unwrap();

		assert_eq!(
			state.client.requests()[0].body,
			Some(json!({ "name": "renamed" }))
		);
		assert_eq!(data.get_str("token").unwrap(), Some("eyJhbGciOi"));
		assert_eq!(data.get_str("service_account_id").unwrap(), Some("p1:sa-1"));
	}

	#[tokio::test]
	async fn read_clears_the_id_when_the_service_account_is_forbidden() {
		let state = FakeTransport::new()
			.forbidden(Method::GET, TOKENS_PATH)
			.into_state();
		let mut data = ResourceData::with_id("p1:sa-1:tok-1");
		data.set("token", "eyJhbGciOi");

		ServiceAccountTokenResource::read(&state, &mut data)
			.await
			.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn delete_fails_when_the_call_is_forbidden() {
		let state = FakeTransport::new()
			.forbidden(Method::DELETE, &format!("{}/tok-1", TOKENS_PATH))
			.into_state();
		let mut data = ResourceData::with_id("p1:sa-1:tok-1");

		let error = ServiceAccountTokenResource::delete(&state, &mut data)
			.await
			.unwrap_err();

		assert!(matches!(
			error,
			AppError::Api {
				operation: "delete token",
				..
			}
		));
		assert_eq!(data.id(), Some("p1:sa-1:tok-1"));
	}

	#[tokio::test(start_paused = true)]
	async fn delete_waits_until_the_token_is_no_longer_listed() {
		let state = FakeTransport::new()
			.respond(
				Method::DELETE,
				&format!("{}/tok-1", TOKENS_PATH),
				StatusCode::OK,
				json!(null),
			)
			.respond(
				Method::GET,
				TOKENS_PATH,
				StatusCode::OK,
				json!([token("deploy")]),
			)
			.respond(Method::GET, TOKENS_PATH, StatusCode::OK, json!([]))
			.into_state();
		let mut data = ResourceData::with_id("p1:sa-1:tok-1");

		ServiceAccountTokenResource::delete(&state, &mut data)
			.await
			.unwrap();

		assert_eq!(data.id(), None);
	}
}

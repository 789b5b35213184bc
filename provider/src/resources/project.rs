use models::api::project::*;

use super::{create_poll, delete_poll, read_imported, require_id, Resource};
use crate::{
	mapping::flatten_timestamp,
	poll::{poll_until, PollOutcome},
	prelude::*,
	schema::{AttributeSchema, Schema},
	validation::validate_labels,
};

/// A project, the tenant every other resource is scoped to. Its ID is the one
/// generated by the API.
pub struct ProjectResource;

impl Resource for ProjectResource {
	const TYPE_NAME: &'static str = "kubermatic_project";

	fn schema() -> Schema {
		Schema::new()
			.attribute(
				"name",
				AttributeSchema::string()
					.required()
					.describe("Project name"),
			)
			.attribute(
				"labels",
				AttributeSchema::string_map()
					.validate(validate_labels)
					.describe("Labels attached to the project"),
			)
			.attribute(
				"status",
				AttributeSchema::string()
					.computed()
					.describe("Status of the project"),
			)
			.attribute(
				"creation_timestamp",
				AttributeSchema::string()
					.computed()
					.describe("Creation timestamp"),
			)
	}

	#[instrument(skip_all)]
	async fn create<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let name = data.get_string("name")?;
		let labels = data.get_labels("labels")?;

		info!("Creating project `{}`", name);
		let project = state
			.request(
				ApiRequest::<CreateProjectRequest>::builder()
					.path(CreateProjectPath)
					.query(())
					.body(CreateProjectRequest {
						name: name.clone(),
						labels,
					})
					.build(),
			)
			.await
			.map_err(AppError::api("create project", &name))?;
		data.set_id(&project.id);

		let project_id = project.id.as_str();
		poll_until(create_poll::<Self>(data), project_id, || async move {
			let project = state
				.request(
					ApiRequest::<GetProjectRequest>::builder()
						.path(GetProjectPath {
							project_id: project_id.to_string(),
						})
						.query(())
						.body(())
						.build(),
				)
				.await
				.exists()
				.map_err(AppError::api("get project", project_id))?;
			Ok(match project {
				Some(project) if project.status == ProjectStatus::Active => PollOutcome::Ready(()),
				Some(project) => PollOutcome::Pending(format!("project is {}", project.status)),
				None => PollOutcome::Pending("project is not visible yet".to_string()),
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
		let project_id = require_id(data)?.to_string();
		let project = state
			.request(
				ApiRequest::<GetProjectRequest>::builder()
					.path(GetProjectPath {
						project_id: project_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.found()
			.map_err(AppError::api("read project", &project_id))?;
		let Some(project) = project else {
			warn!("Project `{}` is gone, removing it from the state", project_id);
			data.clear_id();
			return Ok(());
		};

		data.set("name", project.name);
		data.set("labels", &project.labels);
		data.set("status", project.status.to_string());
		data.set(
			"creation_timestamp",
			flatten_timestamp(project.creation_timestamp),
		);
		Ok(())
	}

	#[instrument(skip_all)]
	async fn update<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let project_id = require_id(data)?.to_string();
		let name = data.get_string("name")?;
		let labels = data.get_labels("labels")?;

		info!("Updating project `{}`", project_id);
		state
			.request(
				ApiRequest::<UpdateProjectRequest>::builder()
					.path(UpdateProjectPath {
						project_id: project_id.clone(),
					})
					.query(())
					.body(UpdateProjectRequest {
						id: project_id.clone(),
						name,
						labels,
					})
					.build(),
			)
			.await
			.map_err(AppError::api("update project", &project_id))?;

		Self::read(state, data).await
	}

	#[instrument(skip_all)]
	async fn delete<T>(state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		let project_id = require_id(data)?.to_string();

		info!("Deleting project `{}`", project_id);
		state
			.request(
				ApiRequest::<DeleteProjectRequest>::builder()
					.path(DeleteProjectPath {
						project_id: project_id.clone(),
					})
					.query(())
					.body(())
					.build(),
			)
			.await
			.exists()
			.map_err(AppError::api("delete project", &project_id))?;

		let id = project_id.as_str();
		poll_until(delete_poll::<Self>(data), id, || async move {
			let project = state
				.request(
					ApiRequest::<GetProjectRequest>::builder()
						.path(GetProjectPath {
							project_id: id.to_string(),
						})
						.query(())
						.body(())
						.build(),
				)
				.await
				.found()
				.map_err(AppError::api("get project", id))?;
			Ok(match project {
				Some(project) => PollOutcome::Pending(format!("project is {}", project.status)),
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
		let projects = state
			.request(
				ApiRequest::<ListProjectsRequest>::builder()
					.path(ListProjectsPath)
					.query(())
					.body(())
					.build(),
			)
			.await
			.map_err(AppError::api("list projects", id))?;
		if !projects.iter().any(|project| project.id == id) {
			return Err(AppError::validation(format!(
				"project `{}` does not exist or is not accessible with this token",
				id
			)));
		}

		read_imported::<Self, T>(state, id, ResourceData::with_id(id)).await
	}
}

#[cfg(test)]
mod tests {
	use http::{Method, StatusCode};
	use serde_json::json;

	use super::*;
	use crate::{block, test_support::FakeTransport};

	fn project(status: &str) -> serde_json::Value {
		json!({
			"id": "abc123",
			"name": "demo",
			"labels": { "env": "test" },
			"status": status,
			"creationTimestamp": "2020-03-05T10:11:12Z"
		})
	}

	#[tokio::test(start_paused = true)]
	async fn create_waits_for_the_project_to_be_active() {
		let state = FakeTransport::new()
			.respond(
				Method::POST,
				"/api/v1/projects",
				StatusCode::CREATED,
				project("Inactive"),
			)
			.respond(
				Method::GET,
				"/api/v1/projects/abc123",
				StatusCode::OK,
				project("Inactive"),
			)
			.respond_times(
				2,
				Method::GET,
				"/api/v1/projects/abc123",
				StatusCode::OK,
				project("Active"),
			)
			.into_state();
		let mut data = ResourceData::new(block! {
			"name" => "demo",
			"labels" => block! { "env" => "test" },
		});

		ProjectResource::create(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), Some("abc123"));
		assert_eq!(data.get_str("status").unwrap(), Some("Active"));
		assert_eq!(data.get_labels("labels").unwrap()["env"], "test");
		assert_eq!(
			data.get_str("creation_timestamp").unwrap(),
			Some("2020-03-05T10:11:12Z")
		);
		assert_eq!(
			state.client.requests()[0].body,
			Some(json!({ "name": "demo", "labels": { "env": "test" } }))
		);
	}

	#[tokio::test]
	async fn read_clears_the_id_of_a_gone_project() {
		let state = FakeTransport::new()
			.not_found(Method::GET, "/api/v1/projects/abc123")
			.into_state();
		let mut data = ResourceData::with_id("abc123");

		ProjectResource::read(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn read_clears_the_id_of_a_forbidden_project() {
		let state = FakeTransport::new()
			.forbidden(Method::GET, "/api/v1/projects/abc123")
			.into_state();
		let mut data = ResourceData::with_id("abc123");

		ProjectResource::read(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test(start_paused = true)]
	async fn create_stops_when_the_project_is_forbidden() {
		let state = FakeTransport::new()
			.respond(
				Method::POST,
				"/api/v1/projects",
				StatusCode::CREATED,
				project("Inactive"),
			)
			.forbidden(Method::GET, "/api/v1/projects/abc123")
			.into_state();
		let mut data = ResourceData::new(block! { "name" => "demo" });

		let error = ProjectResource::create(&state, &mut data)
			.await
			.unwrap_err();

		assert!(matches!(
			error,
			AppError::Api {
				operation: "get project",
				..
			}
		));
		assert_eq!(data.id(), Some("abc123"));
		assert_eq!(state.client.requests().len(), 2);
	}

	#[tokio::test]
	async fn read_reports_unexpected_failures() {
		let state = FakeTransport::new()
			.respond(
				Method::GET,
				"/api/v1/projects/abc123",
				StatusCode::INTERNAL_SERVER_ERROR,
				json!({ "error": { "code": 500, "message": "database unavailable" } }),
			)
			.into_state();
		let mut data = ResourceData::with_id("abc123");

		let error = ProjectResource::read(&state, &mut data).await.unwrap_err();

		assert!(error.to_string().contains("failed to read project `abc123`"));
		assert_eq!(data.id(), Some("abc123"));
	}

	#[tokio::test]
	async fn update_puts_name_and_labels() {
		let state = FakeTransport::new()
			.respond(
				Method::PUT,
				"/api/v1/projects/abc123",
				StatusCode::OK,
				project("Active"),
			)
			.respond(
				Method::GET,
				"/api/v1/projects/abc123",
				StatusCode::OK,
				project("Active"),
			)
			.into_state();
		let mut data = ResourceData::with_id("abc123");
		data.set("name", "demo");
		data.set("labels", block! { "env" => "test" });

		ProjectResource::update(&state, &mut data).await.unwrap();

		assert_eq!(
			state.client.requests()[0].body,
			Some(json!({ "id": "abc123", "name": "demo", "labels": { "env": "test" } }))
		);
	}

	#[tokio::test(start_paused = true)]
	async fn delete_waits_for_the_project_to_be_gone() {
		let state = FakeTransport::new()
			.respond(
				Method::DELETE,
				"/api/v1/projects/abc123",
				StatusCode::OK,
				json!(null),
			)
			.respond_times(
				3,
				Method::GET,
				"/api/v1/projects/abc123",
				StatusCode::OK,
				project("Terminating"),
			)
			.not_found(Method::GET, "/api/v1/projects/abc123")
			.into_state();
		let mut data = ResourceData::with_id("abc123");

		ProjectResource::delete(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), None);
		assert_eq!(state.client.requests().len(), 5);
	}

	#[tokio::test]
	async fn delete_fails_when_the_call_is_forbidden() {
		let state = FakeTransport::new()
			.forbidden(Method::DELETE, "/api/v1/projects/abc123")
			.into_state();
		let mut data = ResourceData::with_id("abc123");

		let error = ProjectResource::delete(&state, &mut data)
			.await
			.unwrap_err();

		assert!(matches!(
			error,
			AppError::Api {
				operation: "delete project",
				..
			}
		));
		assert_eq!(data.id(), Some("abc123"));
		assert_eq!(state.client.requests().len(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn delete_succeeds_when_the_project_is_already_gone() {
		let state = FakeTransport::new()
			.not_found(Method::DELETE, "/api/v1/projects/abc123")
			.not_found(Method::GET, "/api/v1/projects/abc123")
			.into_state();
		let mut data = ResourceData::with_id("abc123");

		ProjectResource::delete(&state, &mut data).await.unwrap();

		assert_eq!(data.id(), None);
	}

	#[tokio::test]
	async fn import_rejects_unknown_projects() {
		let state = FakeTransport::new()
			.respond(
				Method::GET,
				"/api/v1/projects",
				StatusCode::OK,
				json!([project("Active")]),
			)
			.into_state();

		let error = ProjectResource::import(&state, "missing").await.unwrap_err();

		assert!(error.to_string().contains("`missing` does not exist"));
	}
}

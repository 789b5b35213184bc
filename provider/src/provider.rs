use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use crate::{
	client::HttpTransport,
	config::{ProviderOverrides, ProviderSettings},
	logging,
	prelude::*,
	resources::*,
	schema::{Diff, Schema},
};

/// Every resource type this provider manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
	/// `kubermatic_project`
	Project,
	/// `kubermatic_cluster`
	Cluster,
	/// `kubermatic_node_deployment`
	NodeDeployment,
	/// `kubermatic_sshkey`
	SshKey,
	/// `kubermatic_service_account`
	ServiceAccount,
	/// `kubermatic_service_account_token`
	ServiceAccountToken,
}

/// Runs `$body` with `$resource` standing for the [`Resource`] implementation
/// of `$kind`
macro_rules! dispatch {
	($kind:expr, $resource:ident => $body:expr) => {
		match $kind {
			ResourceKind::Project => {
				type $resource = ProjectResource;
				$body
			}
			ResourceKind::Cluster => {
				type $resource = ClusterResource;
				$body
			}
			ResourceKind::NodeDeployment => {
				type $resource = NodeDeploymentResource;
				$body
			}
			ResourceKind::SshKey => {
				type $resource = SshKeyResource;
				$body
			}
			ResourceKind::ServiceAccount => {
				type $resource = ServiceAccountResource;
				$body
			}
			ResourceKind::ServiceAccountToken => {
				type $resource = ServiceAccountTokenResource;
				$body
			}
		}
	};
}

impl ResourceKind {
	/// All the resource types, in the order they are documented
	pub const ALL: [Self; 6] = [
		Self::Project,
		Self::Cluster,
		Self::NodeDeployment,
		Self::SshKey,
		Self::ServiceAccount,
		Self::ServiceAccountToken,
	];

	/// The name of the resource type
	pub fn type_name(self) -> &'static str {
		dispatch!(self, R => R::TYPE_NAME)
	}

	/// The schema of the resource type
	pub fn schema(self) -> Schema {
		dispatch!(self, R => R::schema())
	}

	/// Validates the desired state of a resource, and compares it with its
	/// prior state
	pub fn plan(self, prior: &ResourceData, desired: &Block) -> Result<Diff, AppError> {
		let schema = self.schema();
		schema.validate(desired)?;
		Ok(schema.diff(prior.attributes(), desired, prior))
	}

	/// See [`Resource::create`]
	pub async fn create<T>(self, state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		dispatch!(self, R => R::create(state, data).await)
	}

	/// See [`Resource::read`]
	pub async fn read<T>(self, state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		dispatch!(self, R => R::read(state, data).await)
	}

	/// See [`Resource::update`]
	pub async fn update<T>(self, state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		dispatch!(self, R => R::update(state, data).await)
	}

	/// See [`Resource::delete`]
	pub async fn delete<T>(self, state: &AppState<T>, data: &mut ResourceData) -> Result<(), AppError>
	where
		T: ApiTransport,
	{
		dispatch!(self, R => R::delete(state, data).await)
	}

	/// See [`Resource::import`]
	pub async fn import<T>(self, state: &AppState<T>, id: &str) -> Result<ResourceData, AppError>
	where
		T: ApiTransport,
	{
		dispatch!(self, R => R::import(state, id).await)
	}
}

impl FromStr for ResourceKind {
	type Err = AppError;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.type_name() == name)
			.ok_or_else(|| AppError::UnknownResource(name.to_string()))
	}
}

impl Display for ResourceKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.type_name())
	}
}

/// A configured provider, holding the state every lifecycle handler shares
#[derive(Debug, Clone)]
pub struct Provider<T = HttpTransport>
where
	T: ApiTransport,
{
	state: AppState<T>,
}

impl Provider {
	/// Loads the configuration, sets up logging and builds the HTTP client
	pub fn configure(overrides: ProviderOverrides) -> Result<Self, AppError> {
		let config = ProviderSettings::parse(overrides)?;
		if let Err(err) = logging::init(config.log_level) {
			// The host may configure the provider more than once
			debug!("Keeping the existing logger: {}", err);
		}

		let token = config.resolve_token()?;
		let client = HttpTransport::new(config.host.clone(), token, config.insecure)?;
		info!("Configured provider for `{}`", config.host);

		Ok(Self {
			state: AppState { client, config },
		})
	}
}

impl<T> Provider<T>
where
	T: ApiTransport,
{
	/// Creates a provider from an existing state
	pub fn with_state(state: AppState<T>) -> Self {
		Self { state }
	}

	/// The state shared by every lifecycle handler
	pub fn state(&self) -> &AppState<T> {
		&self.state
	}

	/// Validates the desired state of a resource of the given type, and
	/// compares it with its prior state
	pub fn plan(
		&self,
		type_name: &str,
		prior: &ResourceData,
		desired: &Block,
	) -> Result<Diff, AppError> {
		type_name.parse::<ResourceKind>()?.plan(prior, desired)
	}

	/// Creates a resource of the given type
	pub async fn create(&self, type_name: &str, data: &mut ResourceData) -> Result<(), AppError> {
		type_name
			.parse::<ResourceKind>()?
			.create(&self.state, data)
			.await
	}

	/// Refreshes a resource of the given type
	pub async fn read(&self, type_name: &str, data: &mut ResourceData) -> Result<(), AppError> {
		type_name
			.parse::<ResourceKind>()?
			.read(&self.state, data)
			.await
	}

	/// Updates a resource of the given type
	pub async fn update(&self, type_name: &str, data: &mut ResourceData) -> Result<(), AppError> {
		type_name
			.parse::<ResourceKind>()?
			.update(&self.state, data)
			.await
	}

	/// Deletes a resource of the given type
	pub async fn delete(&self, type_name: &str, data: &mut ResourceData) -> Result<(), AppError> {
		type_name
			.parse::<ResourceKind>()?
			.delete(&self.state, data)
			.await
	}

	/// Imports a resource of the given type from its import ID
	pub async fn import(&self, type_name: &str, id: &str) -> Result<ResourceData, AppError> {
		type_name
			.parse::<ResourceKind>()?
			.import(&self.state, id)
			.await
	}
}

use crate::{client::ApiTransport, config::ProviderSettings, prelude::*};

/// The state shared by every lifecycle handler. It is created once when the
/// provider is configured, and never changes afterwards.
#[derive(Debug, Clone)]
pub struct AppState<T>
where
	T: ApiTransport,
{
	/// The transport used to talk to the API
	pub client: T,
	/// The configuration of the provider
	pub config: ProviderSettings,
}

impl<T> AppState<T>
where
	T: ApiTransport,
{
	/// Makes a request to an endpoint. See [`make_request`].
	pub async fn request<E>(&self, request: ApiRequest<E>) -> Result<E::ResponseBody, ApiErrorResponse>
	where
		E: ApiEndpoint,
	{
		make_request(&self.client, request).await
	}
}

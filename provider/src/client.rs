use std::future::Future;

use http::{Method, StatusCode};
use reqwest::{header, Client};
use serde_json::Value as JsonValue;
use url::Url;

use crate::prelude::*;

/// The user agent sent with every request
const USER_AGENT: &str = concat!("kubermatic-provider/", env!("CARGO_PKG_VERSION"));

/// A request, with the path, query and body already encoded
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
	/// The HTTP method of the request
	pub method: Method,
	/// The path of the request, relative to the host
	pub path: String,
	/// The URL encoded query, empty if there is none
	pub query: String,
	/// The JSON body, if there is one
	pub body: Option<JsonValue>,
}

/// A response that was received from the API
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
	/// The status code of the response
	pub status: StatusCode,
	/// The JSON body of the response. An empty body is `null`.
	pub body: JsonValue,
}

/// Sends requests to the API. The provider talks to the API over HTTP with
/// [`HttpTransport`], and the tests replace it with a scripted transport.
pub trait ApiTransport: Send + Sync {
	/// Sends a request and waits for the response. Only failures to get a
	/// response at all are errors: error statuses are returned as a response.
	fn send(
		&self,
		request: RawRequest,
	) -> impl Future<Output = Result<RawResponse, ApiErrorResponse>> + Send;
}

/// Sends requests to the API over HTTPS, authenticated with a bearer token
#[derive(Debug, Clone)]
pub struct HttpTransport {
	/// The HTTP client, shared by all requests
	client: Client,
	/// The URL of the API
	host: Url,
	/// The bearer token used to authenticate every request
	token: String,
}

impl HttpTransport {
	/// Creates a transport for the API at `host`. If `insecure` is set, the
	/// TLS certificate of the API is not verified.
	pub fn new(host: Url, token: String, insecure: bool) -> Result<Self, AppError> {
		let client = Client::builder()
			.user_agent(USER_AGENT)
			.danger_accept_invalid_certs(insecure)
			.build()?;
		Ok(Self {
			client,
			host,
			token,
		})
	}
}

impl ApiTransport for HttpTransport {
	async fn send(&self, request: RawRequest) -> Result<RawResponse, ApiErrorResponse> {
		let mut url = endpoint_url(&self.host, &request.path)
			.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))?;
		if !request.query.is_empty() {
			url.set_query(Some(&request.query));
		}

		let builder = self
			.client
			.request(request.method, url)
			.bearer_auth(&self.token)
			.header(header::ACCEPT, "application/json");
		let builder = match &request.body {
			Some(body) => builder.json(body),
			None => builder,
		};

		let response = builder
			.send()
			.await
			.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))?;
		let status = response.status();
		let bytes = response
			.bytes()
			.await
			.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))?;

		let body = if bytes.is_empty() {
			JsonValue::Null
		} else {
			match serde_json::from_slice(&bytes) {
				Ok(body) => body,
				// Error responses from proxies in front of the API aren't JSON. The
				// status is enough to classify them.
				Err(_) if !status.is_success() => JsonValue::Null,
				Err(err) => return Err(ApiErrorResponse::internal_error(err.to_string())),
			}
		};

		Ok(RawResponse { status, body })
	}
}

/// Resolves the path of an endpoint against the host. The path is appended to
/// any path the host already has, so that an API served under a prefix keeps
/// it.
fn endpoint_url(host: &Url, path: &str) -> Result<Url, url::ParseError> {
	let mut base = host.clone();
	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}
	base.join(path.trim_start_matches('/'))
}

/// Makes a request to an endpoint over the given transport, and parses its
/// response. Error statuses are returned as an [`ApiErrorResponse`] carrying
/// the message sent by the API.
pub async fn make_request<T, E>(
	transport: &T,
	ApiRequest { path, query, body }: ApiRequest<E>,
) -> Result<E::ResponseBody, ApiErrorResponse>
where
	T: ApiTransport,
	E: ApiEndpoint,
{
	let query = serde_urlencoded::to_string(&query)
		.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))?;
	let body = serde_json::to_value(&body)
		.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))?;
	let path = path.to_string();

	trace!("{} {}", E::METHOD, path);
	let response = transport
		.send(RawRequest {
			method: E::METHOD,
			path,
			query,
			body: (!body.is_null()).then_some(body),
		})
		.await?;

	if !response.status.is_success() {
		let error = ApiErrorResponse::from_status(
			response.status,
			serde_json::from_value(response.body).ok(),
		);
		debug!("{} request failed: {}", E::METHOD, error);
		return Err(error);
	}

	serde_json::from_value(response.body).map_err(|err| {
		error!("Unable to parse response: {}", err);
		ApiErrorResponse::internal_error(err.to_string())
	})
}

/// Extension methods on the result of a request
pub trait ApiResultExt<T> {
	/// Turns an error saying the resource is gone into [`None`]. See
	/// [`ApiErrorResponse::is_gone`].
	fn found(self) -> Result<Option<T>, ApiErrorResponse>;

	/// Turns only a not found error into [`None`]. A forbidden response stays
	/// an error, since the resource may still be there.
	fn exists(self) -> Result<Option<T>, ApiErrorResponse>;
}

impl<T> ApiResultExt<T> for Result<T, ApiErrorResponse> {
	fn found(self) -> Result<Option<T>, ApiErrorResponse> {
		match self {
			Ok(value) => Ok(Some(value)),
			Err(error) if error.is_gone() => Ok(None),
			Err(error) => Err(error),
		}
	}

	fn exists(self) -> Result<Option<T>, ApiErrorResponse> {
		match self {
			Ok(value) => Ok(Some(value)),
			Err(error) if error.error == ErrorType::ResourceDoesNotExist => Ok(None),
			Err(error) => Err(error),
		}
	}
}

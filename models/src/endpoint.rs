use std::fmt::{Debug, Display};

use serde::{de::DeserializeOwned, Serialize};

/// A trait that defines an API endpoint. The provider uses this to build the
/// URL of a request, serialize its query and body, and parse the response.
///
/// Ideally, this trait would contain all the information needed to call an
/// endpoint, so that a single generic function can make any request.
pub trait ApiEndpoint
where
	Self: Sized + Send + 'static,
	Self::RequestPath: Display + Debug + Clone + Send + Sync + 'static,
	Self::RequestQuery: Serialize + Debug + Clone + Send + Sync + 'static,
	Self::RequestBody: Serialize + Debug + Clone + Send + Sync + 'static,
	Self::ResponseBody: DeserializeOwned + Debug + Send + Sync + 'static,
{
	/// The HTTP method that should be used for this endpoint
	const METHOD: http::Method;

	/// The path that should be used for this endpoint. This should be a valid
	/// URL path and can contain URL parameters as a struct. For example,
	/// `/api/v1/projects/:project_id` would be a valid path. This is
	/// internally implemented using [`axum_extra::routing::TypedPath`], which
	/// percent-encodes the parameters when the path is displayed.
	type RequestPath;
	/// The query that should be used for this endpoint. This should be
	/// serializable by [`serde_urlencoded`](https://docs.rs/serde_urlencoded).
	/// Endpoints without a query use `()`.
	type RequestQuery;
	/// The JSON body sent with the request. Endpoints without a body use `()`,
	/// which serializes to `null` and is not sent at all.
	type RequestBody;
	/// The JSON body that the endpoint responds with when the request is
	/// successful. Endpoints that respond with an empty body use `()`.
	type ResponseBody;
}

use typed_builder::TypedBuilder;

use crate::prelude::*;

/// This struct represents a request to the API. It contains the path, query
/// and body of the request. This struct provides a builder API to make it
/// easier to construct requests. Authentication is attached by the transport
/// that sends the request, so it is not part of this struct.
#[derive(TypedBuilder)]
pub struct ApiRequest<E>
where
	E: ApiEndpoint,
{
	/// The path of the request. This is the part of the URL after the host.
	pub path: E::RequestPath,
	/// The query of the request. This is the part of the URL after the `?`.
	pub query: E::RequestQuery,
	/// The JSON body of the request.
	pub body: E::RequestBody,
}

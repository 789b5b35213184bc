#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Request and response types of the Kubermatic REST API, along with a typed
//! declaration of every endpoint the provider talks to. Each endpoint lives in
//! its own file and implements [`ApiEndpoint`], which ties together the HTTP
//! method, the path, the query, the request body and the response body.

/// The macro used to declare the endpoints of the API.
#[macro_use]
mod macros;

/// All the endpoints of the API, grouped by the resource they act on.
pub mod api;
/// Utility types and constants shared by the API models.
pub mod utils;

/// A prelude that re-exports commonly used items.
pub mod prelude {
	pub use crate::{
		ApiEndpoint,
		ApiErrorResponse,
		ApiErrorResponseBody,
		ApiRequest,
		ErrorType,
	};
}

/// The trait that ties together all the types of an endpoint.
mod endpoint;
/// The errors that the API can respond with.
mod error;
/// The request type that is sent to an endpoint.
mod request;
/// The error response types returned by the API.
mod response;

pub use self::{endpoint::*, error::*, request::*, response::*};

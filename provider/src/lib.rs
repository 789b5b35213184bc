#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! The Kubermatic infrastructure provider. This library maps the declarative
//! attribute trees of the hosting framework onto the Kubermatic REST API and
//! back, and drives the polling that waits for asynchronous operations (such
//! as a cluster coming up or a node deployment scaling) to finish.
//!
//! Every resource implements [`Resource`](resources::Resource), and the
//! [`ResourceKind`](provider::ResourceKind) dispatcher routes a resource type
//! name to its implementation.

/// The state shared by every lifecycle handler.
pub mod app;
/// The transport used to talk to the API, and the function that makes typed
/// requests over it.
pub mod client;
/// The configuration of the provider, loaded from files, the environment and
/// the provider block.
pub mod config;
/// The errors returned by the provider.
pub mod error;
/// Encoding and decoding of the composite IDs of the resources.
pub mod id;
/// Setting up the global tracing subscriber.
pub mod logging;
/// The expand and flatten functions that convert between attribute trees and
/// the API models.
pub mod mapping;
/// The shared poll loop used to wait for asynchronous operations.
pub mod poll;
/// The provider itself, and the dispatcher over all resource types.
pub mod provider;
/// The lifecycle handlers of every resource type.
pub mod resources;
/// The attribute tree and the schema declarations of the resources.
pub mod schema;
/// Validation and diff suppression callbacks used by the schemas.
pub mod validation;

/// A scripted in-memory transport used by the tests.
#[cfg(test)]
pub(crate) mod test_support;

/// The prelude module contains all the things you need to import to get
/// started with the provider.
pub mod prelude {
	pub use models::prelude::*;
	pub use tracing::{debug, error, info, instrument, trace, warn};

	pub use crate::{
		app::AppState,
		client::{make_request, ApiResultExt, ApiTransport},
		error::AppError,
		schema::{Block, BlockExt, ResourceData, Value},
	};
}

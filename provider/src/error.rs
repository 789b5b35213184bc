use std::{path::PathBuf, time::Duration};

use models::ApiErrorResponse;
use thiserror::Error;

/// Every error a lifecycle handler, the configuration or the logging setup
/// can return. None of these are retried: transient states are handled by the
/// poll loop before they ever become an error.
#[derive(Debug, Error)]
pub enum AppError {
	/// An API call failed with something other than the resource being gone
	#[error("failed to {operation} `{resource}`: {source}")]
	Api {
		/// The operation that was attempted, such as `create cluster`
		operation: &'static str,
		/// The identifier of the resource the operation was attempted on
		resource: String,
		/// The error returned by the API
		#[source]
		source: ApiErrorResponse,
	},
	/// The desired state is not valid
	#[error("{0}")]
	Validation(String),
	/// A composite ID could not be decoded
	#[error("invalid ID `{id}`: {reason}")]
	InvalidId {
		/// The ID that was being decoded
		id: String,
		/// Why the ID is invalid
		reason: String,
	},
	/// An attribute in the tree has a different type than expected
	#[error("attribute `{path}` must be {expected}, found {found}")]
	TypeMismatch {
		/// The path of the attribute, such as `spec.0.replicas`
		path: String,
		/// The type that was expected
		expected: &'static str,
		/// The type that was found
		found: &'static str,
	},
	/// A resource did not reach the expected state within the timeout
	#[error("`{resource}` was not ready within {timeout:?}: {reason}")]
	NotReady {
		/// The identifier of the resource that was being waited on
		resource: String,
		/// How long the poll loop waited
		timeout: Duration,
		/// The last reason the resource was not ready
		reason: String,
	},
	/// The resource type name is not one this provider manages
	#[error("unknown resource type `{0}`")]
	UnknownResource(String),
	/// The configuration could not be loaded
	#[error("invalid provider configuration: {0}")]
	Config(#[from] config::ConfigError),
	/// A file referenced by the configuration could not be read
	#[error("unable to read `{}`: {source}", .path.display())]
	Io {
		/// The path of the file
		path: PathBuf,
		/// The underlying error
		#[source]
		source: std::io::Error,
	},
	/// The HTTP client could not be built
	#[error("unable to build the HTTP client: {0}")]
	Client(#[from] reqwest::Error),
	/// The global tracing subscriber was already set
	#[error("unable to set up logging: {0}")]
	Logging(#[from] tracing::dispatcher::SetGlobalDefaultError),
}

impl AppError {
	/// Returns a function that wraps an [`ApiErrorResponse`] with the operation
	/// and the resource it failed on. Meant to be used with
	/// [`Result::map_err`].
	pub fn api(
		operation: &'static str,
		resource: impl Into<String>,
	) -> impl FnOnce(ApiErrorResponse) -> Self {
		let resource = resource.into();
		move |source| Self::Api {
			operation,
			resource,
			source,
		}
	}

	/// Creates a [`AppError::Validation`] error from a message
	pub fn validation(message: impl Into<String>) -> Self {
		Self::Validation(message.into())
	}

	/// Creates a [`AppError::InvalidId`] error
	pub fn invalid_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidId {
			id: id.into(),
			reason: reason.into(),
		}
	}

	/// Prefixes the path of a [`AppError::TypeMismatch`] with the name of the
	/// singleton block it was found in. Other errors are returned unchanged.
	pub fn within(self, block: &str) -> Self {
		self.at(&format!("{}.0", block))
	}

	/// Prefixes the path of a [`AppError::TypeMismatch`] with the path of the
	/// value it was found in. Other errors are returned unchanged.
	pub fn at(self, prefix: &str) -> Self {
		match self {
			Self::TypeMismatch {
				path,
				expected,
				found,
			} => Self::TypeMismatch {
				path: format!("{}.{}", prefix, path),
				expected,
				found,
			},
			other => other,
		}
	}
}

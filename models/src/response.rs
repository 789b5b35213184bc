use std::{
	error::Error as StdError,
	fmt::{Display, Formatter},
};

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ErrorType;

/// This struct represents an error response from the API. It contains the
/// status code, the classified error and the message the API sent along with
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorResponse {
	/// The status code of the error response. Ideally in the 4xx or 5xx range.
	pub status_code: StatusCode,
	/// The classified error type of the response.
	pub error: ErrorType,
	/// A message describing the error. This is the message sent by the API if
	/// there was one, else the default message of the error type.
	pub message: String,
}

impl ApiErrorResponse {
	/// Creates a new [`ApiErrorResponse`] from the status code of a failed
	/// response and its parsed body, if the body could be parsed.
	pub fn from_status(status_code: StatusCode, body: Option<ApiErrorResponseBody>) -> Self {
		let message = body
			.map(|body| body.error.message)
			.filter(|message| !message.is_empty());
		let error = ErrorType::from_status_code(
			status_code,
			message
				.as_deref()
				.unwrap_or_else(|| status_code.canonical_reason().unwrap_or("unknown error")),
		);
		Self {
			status_code,
			message: message.unwrap_or_else(|| error.message().into()),
			error,
		}
	}

	/// Creates a new [`ApiErrorResponse`] with the given message as an internal
	/// server error.
	pub fn internal_error(message: impl Into<String>) -> Self {
		let message = message.into();
		Self {
			status_code: StatusCode::INTERNAL_SERVER_ERROR,
			error: ErrorType::server_error(&message),
			message,
		}
	}

	/// Whether this error means that the resource is gone. See
	/// [`ErrorType::is_gone`].
	pub fn is_gone(&self) -> bool {
		self.error.is_gone()
	}
}

impl Display for ApiErrorResponse {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({})", self.message, self.status_code)
	}
}

impl StdError for ApiErrorResponse {}

/// This struct represents the JSON body of an error response from the API.
/// This is mostly used internally and would ideally not need to be constructed
/// manually.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponseBody {
	/// The details of the error.
	pub error: ApiErrorDetails,
}

/// The details of an error sent by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetails {
	/// The status code, repeated in the body.
	pub code: u16,
	/// A human readable message describing the error.
	#[serde(default)]
	pub message: String,
	/// Additional details, if any.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub details: Vec<String>,
}

use std::{
	fmt::{Display, Formatter},
	mem,
};

use http::StatusCode;

/// A list of all the possible errors that the API can respond with, classified
/// by the status code of the response
#[derive(Debug)]
pub enum ErrorType {
	/// The parameters sent with the request is invalid. This would ideally not
	/// happen unless the desired state is malformed
	WrongParameters,
	/// The bearer token provided is missing, expired or invalid
	AuthorizationTokenInvalid,
	/// The authentication token provided is not authorized to access the
	/// requested resource. The API also responds with this when the resource
	/// was deleted and the token lost access to it
	Unauthorized,
	/// The resource that the user is trying to access does not exist.
	ResourceDoesNotExist,
	/// The resource that the user is trying to create already exists.
	ResourceAlreadyExists,
	/// An internal server error occurred, or the response could not be
	/// understood.
	InternalServerError(anyhow::Error),
}

impl ErrorType {
	/// Classifies an error response based on its status code.
	pub fn from_status_code(status_code: StatusCode, message: impl Display) -> Self {
		match status_code {
			StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::WrongParameters,
			StatusCode::UNAUTHORIZED => Self::AuthorizationTokenInvalid,
			StatusCode::FORBIDDEN => Self::Unauthorized,
			StatusCode::NOT_FOUND => Self::ResourceDoesNotExist,
			StatusCode::CONFLICT => Self::ResourceAlreadyExists,
			_ => Self::server_error(message),
		}
	}

	/// Returns the status code that is usually associated with this error.
	pub fn default_status_code(&self) -> StatusCode {
		match self {
			Self::WrongParameters => StatusCode::BAD_REQUEST,
			Self::AuthorizationTokenInvalid => StatusCode::UNAUTHORIZED,
			Self::Unauthorized => StatusCode::FORBIDDEN,
			Self::ResourceDoesNotExist => StatusCode::NOT_FOUND,
			Self::ResourceAlreadyExists => StatusCode::CONFLICT,
			Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Returns a user-friendly message describing this error, used when the
	/// API does not send a message of its own
	pub fn message(&self) -> impl Into<String> {
		match self {
			Self::WrongParameters => "The parameters sent with that request is invalid",
			Self::AuthorizationTokenInvalid => "Your token is invalid or has expired",
			Self::Unauthorized => "You are not authorized to access that resource",
			Self::ResourceDoesNotExist => "The resource you are trying to access does not exist",
			Self::ResourceAlreadyExists => "The resource you are trying to create already exists",
			Self::InternalServerError(_) => "An internal server error has occured",
		}
	}

	/// Whether this error means that the resource is gone, as far as the
	/// caller can tell. A resource that was deleted can respond with either a
	/// not found or a forbidden error, depending on how the access to it was
	/// granted, so both are treated the same way.
	pub fn is_gone(&self) -> bool {
		matches!(self, Self::ResourceDoesNotExist | Self::Unauthorized)
	}

	/// Creates an [`ErrorType::InternalServerError`] with the given message
	pub fn server_error(message: impl Display) -> Self {
		Self::InternalServerError(anyhow::anyhow!(message.to_string()))
	}
}

impl PartialEq for ErrorType {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::InternalServerError(_), Self::InternalServerError(_)) => true,
			_ => mem::discriminant(self) == mem::discriminant(other),
		}
	}
}

impl Eq for ErrorType {}

impl Clone for ErrorType {
	fn clone(&self) -> Self {
		match self {
			Self::WrongParameters => Self::WrongParameters,
			Self::AuthorizationTokenInvalid => Self::AuthorizationTokenInvalid,
			Self::Unauthorized => Self::Unauthorized,
			Self::ResourceDoesNotExist => Self::ResourceDoesNotExist,
			Self::ResourceAlreadyExists => Self::ResourceAlreadyExists,
			Self::InternalServerError(error) => {
				Self::InternalServerError(anyhow::anyhow!(error.to_string()))
			}
		}
	}
}

impl Display for ErrorType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InternalServerError(error) => write!(f, "{}", error),
			error => write!(f, "{}", error.message().into()),
		}
	}
}

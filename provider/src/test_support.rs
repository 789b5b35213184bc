use std::{collections::VecDeque, sync::Mutex};

use http::{Method, StatusCode};
use serde_json::Value as JsonValue;

use crate::{
	app::AppState,
	client::{ApiTransport, RawRequest, RawResponse},
	config::ProviderSettings,
	prelude::*,
};

/// A response the fake transport was told to give
#[derive(Debug)]
struct Expectation {
	/// The method the request must have
	method: Method,
	/// The path the request must have
	path: String,
	/// The response to give
	response: RawResponse,
}

/// A transport that answers requests from a script, in order. Every request
/// must match the method and path of the next scripted response, and every
/// response must have been used by the time the transport is dropped.
#[derive(Debug, Default)]
pub struct FakeTransport {
	/// The responses that have not been given yet
	expectations: Mutex<VecDeque<Expectation>>,
	/// Every request that was received
	requests: Mutex<Vec<RawRequest>>,
}

impl FakeTransport {
	/// A transport that expects no requests
	pub fn new() -> Self {
		Self::default()
	}

	/// Scripts the response to the next request
	pub fn respond(self, method: Method, path: &str, status: StatusCode, body: JsonValue) -> Self {
		self.respond_times(1, method, path, status, body)
	}

	/// Scripts the same response to the next `times` requests
	pub fn respond_times(
		self,
		times: usize,
		method: Method,
		path: &str,
		status: StatusCode,
		body: JsonValue,
	) -> Self {
		{
			let mut expectations = self.expectations.lock().unwrap();
			for _ in 0..times {
				expectations.push_back(Expectation {
					method: method.clone(),
					path: path.to_string(),
					response: RawResponse {
						status,
						body: body.clone(),
					},
				});
			}
		}
		self
	}

	/// Scripts a not found response to the next request
	pub fn not_found(self, method: Method, path: &str) -> Self {
		self.respond(
			method,
			path,
			StatusCode::NOT_FOUND,
			serde_json::json!({ "error": { "code": 404, "message": "not found" } }),
		)
	}

	/// Scripts a forbidden response to the next request
	pub fn forbidden(self, method: Method, path: &str) -> Self {
		self.respond(
			method,
			path,
			StatusCode::FORBIDDEN,
			serde_json::json!({ "error": { "code": 403, "message": "forbidden" } }),
		)
	}

	/// All the requests received so far
	pub fn requests(&self) -> Vec<RawRequest> {
		self.requests.lock().unwrap().clone()
	}

	/// Wraps the transport in an [`AppState`] with test settings
	pub fn into_state(self) -> AppState<Self> {
		AppState {
			client: self,
			config: ProviderSettings::for_tests(),
		}
	}
}

impl ApiTransport for FakeTransport {
	async fn send(&self, request: RawRequest) -> Result<RawResponse, ApiErrorResponse> {
		let expectation = self
			.expectations
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or_else(|| panic!("unexpected request: {} {}", request.method, request.path));
		assert_eq!(
			(&request.method, request.path.as_str()),
			(&expectation.method, expectation.path.as_str()),
			"request does not match the script"
		);
		self.requests.lock().unwrap().push(request);
		Ok(expectation.response)
	}
}

impl Drop for FakeTransport {
	fn drop(&mut self) {
		if std::thread::panicking() {
			return;
		}
		let remaining = self.expectations.get_mut().unwrap();
		assert!(
			remaining.is_empty(),
			"{} scripted response(s) were never requested, next: {} {}",
			remaining.len(),
			remaining[0].method,
			remaining[0].path
		);
	}
}

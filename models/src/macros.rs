/// Declares an endpoint of the API. This generates the [`TypedPath`] struct of
/// the endpoint, the request type and the [`ApiEndpoint`] implementation tying
/// them together.
///
/// The request type is a struct holding the JSON body when `request = { .. }`
/// is given. Otherwise it is a marker, and the body is `request_body`, or
/// nothing at all. The query and the response default to `()`.
///
/// ```ignore
/// declare_api_endpoint!(
/// 	/// The endpoint to get the details of a project
/// 	GetProjectRequest,
/// 	GET "/api/v1/projects/:project_id" as GetProjectPath {
/// 		/// The ID of the project
/// 		pub project_id: String,
/// 	},
/// 	response = Project,
/// );
/// ```
///
/// [`TypedPath`]: axum_extra::routing::TypedPath
/// [`ApiEndpoint`]: crate::ApiEndpoint
macro_rules! declare_api_endpoint {
	(@path $request:ident $name:ident $path:tt) => {
		#[doc = concat!("The path of [`", stringify!($request), "`]")]
		#[derive(
			Debug,
			Clone,
			Copy,
			Default,
			::axum_extra::routing::TypedPath,
			::serde::Deserialize,
			PartialEq,
			Eq,
		)]
		#[typed_path($path)]
		pub struct $name;
	};
	(@path $request:ident $name:ident $path:tt { $($fields:tt)* }) => {
		#[doc = concat!("The path of [`", stringify!($request), "`]")]
		#[derive(
			Debug,
			Clone,
			::axum_extra::routing::TypedPath,
			::serde::Serialize,
			::serde::Deserialize,
			PartialEq,
			Eq,
		)]
		#[typed_path($path)]
		pub struct $name {
			$($fields)*
		}
	};
	(@or) => { () };
	(@or $ty:ty) => { $ty };
	(
		$(#[$meta:meta])*
		$request:ident,
		$method:ident $path:tt as $path_name:ident $({ $($path_fields:tt)* })?
		$(, query = $query:ty)?
		, request = { $($body_fields:tt)* }
		$(, response = $response:ty)?
		$(,)?
	) => {
		declare_api_endpoint!(@path $request $path_name $path $({ $($path_fields)* })?);

		$(#[$meta])*
		#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize, PartialEq, Eq)]
		#[serde(rename_all = "camelCase")]
		pub struct $request {
			$($body_fields)*
		}

		impl $crate::ApiEndpoint for $request {
			const METHOD: ::http::Method = ::http::Method::$method;

			type RequestPath = $path_name;
			type RequestQuery = declare_api_endpoint!(@or $($query)?);
			type RequestBody = Self;
			type ResponseBody = declare_api_endpoint!(@or $($response)?);
		}
	};
	(
		$(#[$meta:meta])*
		$request:ident,
		$method:ident $path:tt as $path_name:ident $({ $($path_fields:tt)* })?
		$(, query = $query:ty)?
		$(, request_body = $body:ty)?
		$(, response = $response:ty)?
		$(,)?
	) => {
		declare_api_endpoint!(@path $request $path_name $path $({ $($path_fields)* })?);

		$(#[$meta])*
		#[derive(Debug, Clone, Copy)]
		pub struct $request;

		impl $crate::ApiEndpoint for $request {
			const METHOD: ::http::Method = ::http::Method::$method;

			type RequestPath = $path_name;
			type RequestQuery = declare_api_endpoint!(@or $($query)?);
			type RequestBody = declare_api_endpoint!(@or $($body)?);
			type ResponseBody = declare_api_endpoint!(@or $($response)?);
		}
	};
}

#[cfg(test)]
mod tests {
	use http::Method;

	use crate::{
		api::{
			project::{
				CreateProjectPath,
				CreateProjectRequest,
				GetProjectPath,
				GetProjectRequest,
			},
			upgrade::{ListNodeUpgradesQuery, ListNodeUpgradesRequest},
		},
		ApiEndpoint,
	};

	#[test]
	fn declared_endpoints_carry_their_method_and_path() {
		assert_eq!(CreateProjectRequest::METHOD, Method::POST);
		assert_eq!(GetProjectRequest::METHOD, Method::GET);
		assert_eq!(CreateProjectPath.to_string(), "/api/v1/projects");
		assert_eq!(
			GetProjectPath {
				project_id: "abc".to_string(),
			}
			.to_string(),
			"/api/v1/projects/abc"
		);
	}

	#[test]
	fn optional_parts_default_to_unit() {
		fn query_of<E: ApiEndpoint>() -> &'static str {
			std::any::type_name::<E::RequestQuery>()
		}
		fn body_of<E: ApiEndpoint>() -> &'static str {
			std::any::type_name::<E::RequestBody>()
		}

		assert_eq!(query_of::<GetProjectRequest>(), "()");
		assert_eq!(body_of::<GetProjectRequest>(), "()");
		assert_eq!(
			query_of::<ListNodeUpgradesRequest>(),
			std::any::type_name::<ListNodeUpgradesQuery>()
		);
	}
}

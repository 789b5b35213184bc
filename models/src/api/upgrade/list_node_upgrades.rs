use serde::{Deserialize, Serialize};

use super::MasterVersion;

declare_api_endpoint!(
	/// The endpoint to list the versions nodes can run for a given control
	/// plane version
	ListNodeUpgradesRequest,
	GET "/api/v1/upgrades/node" as ListNodeUpgradesPath,
	query = ListNodeUpgradesQuery,
	response = Vec<MasterVersion>,
);

/// The query of the endpoint to list the versions nodes can run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ListNodeUpgradesQuery {
	/// The version of the control plane the nodes are attached to
	pub control_plane_version: String,
}

#[cfg(test)]
mod tests {
	use serde_test::{assert_tokens, Token};

	use super::*;

	#[test]
	fn assert_list_node_upgrades_query_types() {
		assert_tokens(
			&ListNodeUpgradesQuery {
				control_plane_version: "1.17.4".to_string(),
			},
			&[
				Token::Struct {
					name: "ListNodeUpgradesQuery",
					len: 1,
				},
				Token::Str("control_plane_version"),
				Token::Str("1.17.4"),
				Token::StructEnd,
			],
		);
	}

	#[test]
	fn path_has_no_parameters() {
		assert_eq!(ListNodeUpgradesPath.to_string(), "/api/v1/upgrades/node");
	}
}

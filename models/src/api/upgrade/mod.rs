use serde::{Deserialize, Serialize};

/// The endpoint to list the versions nodes can run for a control plane
/// version
mod list_node_upgrades;

pub use self::list_node_upgrades::*;

/// A version a cluster or its nodes can be upgraded to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MasterVersion {
	/// The version, such as `1.17.4`
	pub version: String,
	/// Whether this is the default version
	#[serde(default)]
	pub default: bool,
}

use std::collections::BTreeMap;

/// Labels attached to a resource. A [`BTreeMap`] is used so that the order of
/// the labels is stable when they are compared or flattened.
pub type Labels = BTreeMap<String, String>;

/// Used with `#[serde(skip_serializing_if = "...")]` to omit booleans that are
/// `false`, the same way the API omits them.
pub fn is_false(value: &bool) -> bool {
	!*value
}

/// Used with `#[serde(skip_serializing_if = "...")]` to omit numbers that are
/// zero, the same way the API omits them.
pub fn is_zero<T>(value: &T) -> bool
where
	T: Default + PartialEq,
{
	*value == T::default()
}

/// All the constants used in the models.
/// Constants are used to avoid hardcoding values, since that might introduce
/// typos.
pub mod constants {
	/// The cluster type of a regular Kubernetes cluster
	pub const CLUSTER_TYPE_KUBERNETES: &str = "kubernetes";
	/// The cluster type of an OpenShift cluster
	pub const CLUSTER_TYPE_OPENSHIFT: &str = "openshift";
}

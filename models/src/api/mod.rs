/// All endpoints that act on a project and the resources scoped to it
pub mod project;
/// All endpoints that list the versions a cluster can be upgraded to
pub mod upgrade;

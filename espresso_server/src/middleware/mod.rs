mod acl;

pub use acl::{PermissionMiddlewareFactory, PermissionMiddlewareService};

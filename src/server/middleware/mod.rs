//! HTTP middleware implementations

mod authz;


pub use authz::{AuthzMiddleware, AuthzMiddlewareService};

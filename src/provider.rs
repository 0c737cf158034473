//! Provider-facing descriptors.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the authorization,
//! token, and calendar endpoints, the client authentication preference, and the consent
//! parameters appended to authorization URLs. Endpoints must use HTTPS unless the descriptor is
//! built in insecure-transport (local development) mode.

pub mod descriptor;

pub use descriptor::*;

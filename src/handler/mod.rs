//! Request handler module
//!
//! Responsible for request routing dispatch and the endpoint logic: the
//! identity endpoints and the movie list endpoints.

mod identity;
mod movies;
pub mod payload;
pub mod router;

use crate::routing::PathParams;
use payload::{Payload, QueryParams};

// Re-export main entry point
pub use router::handle_request;

/// Everything an endpoint needs from the request
pub struct RequestContext {
    pub is_head: bool,
    pub query: QueryParams,
    pub params: PathParams,
    pub payload: Payload,
}

impl RequestContext {
    /// Bound path parameter; empty when the route has no such parameter
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).unwrap_or_default()
    }
}

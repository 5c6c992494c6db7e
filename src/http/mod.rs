//! HTTP protocol layer module
//!
//! Provides HTTP response building, decoupled from the endpoint logic.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_400_response, build_404_response, build_413_response, build_json_response,
    build_options_response, build_text_response,
};

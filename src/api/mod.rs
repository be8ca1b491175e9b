//! HTTP layer: routes, pipeline, payloads and the error taxonomy.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use error::ApiError;
pub use routes::create_router;

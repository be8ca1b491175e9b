//! Request and response payloads.
//!
//! DTOs are the only serde surface of the HTTP layer; domain types never
//! serialize themselves onto the wire. Monetary amounts cross the wire as
//! strings to keep decimal precision exact.

mod requests;
mod responses;

pub use requests::{
    CreateServiceRequest, CreateTransactionRequest, LoginRequest, PaginationParams,
    SignUpRequest, UpdateUserRequest,
};
pub use responses::{
    CreatedResponse, ServiceResponse, TokenResponse, TransactionResponse, UserResponse,
};

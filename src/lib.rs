//! Ledger API
//!
//! A small banking backend: users, services (accounts) and transactions
//! behind an HTTP API, with every route wrapped in a composable request
//! authorization pipeline.
//!
//! # Architecture
//!
//! - **Domain Layer**: entities, clearance tiers, lifecycle state machines
//! - **Auth Layer**: bearer tokens and password hashing
//! - **Store Layer**: the persistence contract, Postgres and in-memory
//!   backends, keyset-paginated streaming reads
//! - **Infrastructure Layer**: configuration and the dependency container
//! - **API Layer**: routes, the stage pipeline, DTOs, the error taxonomy
//!
//! # Request pipeline
//!
//! Every route declares an ordered slice of stages (logging, body-size
//! limit, authentication, clearance and ownership gates). A stage either
//! passes the request on or short-circuits with an error response; handlers
//! only ever see fully vetted requests.

pub mod api;
pub mod auth;
pub mod domain;
pub mod infrastructure;
pub mod store;

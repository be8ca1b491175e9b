//! Shared harness for the integration tests.

pub mod fixtures;
pub mod requests;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use requests::*;

mod auth_tests;
mod pagination_tests;
mod pipeline_tests;
mod transaction_tests;

//! guichetd library surface, exposed for integration tests.

pub mod routes;
pub mod server;

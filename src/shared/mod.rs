pub mod api_response;
pub mod config;
#[cfg(feature = "mongodb")]
pub mod database;
pub mod error;
pub mod handlers;
pub mod hash_worker;
pub mod logging;
pub mod middleware;
pub mod role;
pub mod store;
pub mod token;
pub mod validation;

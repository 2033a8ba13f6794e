//! Concrete implementations of the domain ports.

pub mod api_client;
pub mod client_factory;
pub mod config;
pub mod http;
pub mod request_factory;

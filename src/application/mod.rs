//! Application layer orchestrating checkout calls.
//!
//! `port` drives a redirect payment through the request and client factories,
//! and `translator` flattens the gateway's reply into the billing engine's
//! `PurchaseResult`.

pub mod port;
pub mod translator;

//! Domain types and the capability traits the adapter is wired through.

pub mod call_result;
pub mod checkout;
pub mod payment;
pub mod ports;
pub mod purchase;

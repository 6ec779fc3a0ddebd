//! Request-level extractors.

pub mod client_ip;

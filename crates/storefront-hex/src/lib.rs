//! storefront-hex: checkout core, outbound adapters and the HTTP surface.

pub mod config;
pub mod errors;

pub mod application;
pub mod outbound;

pub use storefront_types::{domain, ports};

pub mod inbound;

//! storefront-types: domain model and ports shared by every storefront crate.

pub mod domain;
pub mod ports;

//! Adapters for the payment and notification ports.

pub mod log_notifier;
pub mod message;
pub mod payment;
pub mod smtp_notifier;

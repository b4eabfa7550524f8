pub mod catalog_repository;
pub mod notifier;
pub mod order_repository;
pub mod payment_simulator;

pub mod catalog_service;
pub mod checkout_service;

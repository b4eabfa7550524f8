pub mod checkout;
pub mod order;
pub mod payment;
pub mod product;
pub mod validation;

//! Domain models for the retail bank

pub mod customer;
pub mod account;

pub mod amount;
pub mod debt;
pub mod document;
pub mod error;
pub mod expense;
pub mod ledger;
pub mod mode;
pub mod participant;
pub mod transfer;

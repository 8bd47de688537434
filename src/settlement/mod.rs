pub mod balances;
pub mod itemized;
pub mod options;
pub mod simplify;

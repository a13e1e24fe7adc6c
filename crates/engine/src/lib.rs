pub mod affordability;
pub mod annuity;
pub mod investment;
pub mod mortgage;
pub mod validate;

pub use validate::CalcError;

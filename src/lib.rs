pub mod contract;
mod error;
pub mod msg;
pub mod state;
pub mod token;

pub use crate::error::ContractError;

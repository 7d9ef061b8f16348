use cosmwasm_std::{OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Listing {id} not found")]
    ListingNotFound { id: u64 },

    #[error("Listing {id} is no longer active")]
    ListingNotActive { id: u64 },

    #[error("Requested {requested} units but only {available} remain")]
    InsufficientQuantity {
        requested: Uint128,
        available: Uint128,
    },

    #[error("Sent {sent} but the purchase requires {required}")]
    InsufficientPayment { required: Uint128, sent: Uint128 },

    #[error("Sellers cannot buy from their own listing")]
    SelfPurchase {},

    #[error("Quantity must be at least 1")]
    ZeroQuantity {},

    #[error("Non-fungible listings carry exactly one unit")]
    NonFungibleQuantity {},

    #[error("Payment denom cannot be empty")]
    EmptyDenom {},

    #[error("Cannot migrate from different contract type: {previous_contract}")]
    CannotMigrateContract { previous_contract: String },

    #[error("Cannot migrate from a newer or equal contract version")]
    CannotMigrateVersion {},

    #[error("Semver parsing error: {0}")]
    SemVer(String),
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        Self::SemVer(err.to_string())
    }
}

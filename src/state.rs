use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

use crate::error::ContractError;

#[cw_serde]
pub struct Config {
    /// Native denom buyers pay with, in its smallest unit.
    pub denom: String,
}

/// The two kinds of token a listing can hold. Non-fungible listings carry
/// the id of the single token in escrow; fungible listings are identified
/// by quantity alone.
#[cw_serde]
pub enum TokenKind {
    Fungible,
    NonFungible { token_id: String },
}

#[cw_serde]
pub struct Listing {
    pub id: u64,
    pub seller: Addr,
    pub token_address: Addr,
    pub kind: TokenKind,
    /// Remaining sellable units. For non-fungible listings this is 0 or 1.
    pub quantity: Uint128,
    /// Per-unit price, immutable after creation.
    pub price: Uint128,
    pub active: bool,
    /// Set when the seller cancelled, as opposed to selling out.
    pub cancelled: bool,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const LISTINGS: Map<u64, Listing> = Map::new("listings");
pub const NEXT_LISTING_ID: Item<u64> = Item::new("next_listing_id");

/// Allocates a listing id. Ids are monotonic and never reused, terminal
/// listings keep theirs forever.
pub fn next_listing_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = NEXT_LISTING_ID.load(storage)?;
    let next = id
        .checked_add(1)
        .ok_or_else(|| StdError::generic_err("listing id space exhausted"))?;
    NEXT_LISTING_ID.save(storage, &next)?;
    Ok(id)
}

pub fn load_listing(storage: &dyn Storage, id: u64) -> Result<Listing, ContractError> {
    LISTINGS
        .may_load(storage, id)?
        .ok_or(ContractError::ListingNotFound { id })
}

/// Removes `by` units from an active listing, deactivating it once the
/// last unit is gone. The record is kept for history.
pub fn decrement_quantity(
    storage: &mut dyn Storage,
    id: u64,
    by: Uint128,
) -> Result<Listing, ContractError> {
    let mut listing = load_listing(storage, id)?;

    if !listing.active {
        return Err(ContractError::ListingNotActive { id });
    }
    if by > listing.quantity {
        return Err(ContractError::InsufficientQuantity {
            requested: by,
            available: listing.quantity,
        });
    }

    listing.quantity = listing.quantity.checked_sub(by)?;
    if listing.quantity.is_zero() {
        listing.active = false;
    }
    LISTINGS.save(storage, id, &listing)?;

    Ok(listing)
}

/// Terminalizes a listing. `cancelled` distinguishes seller cancellation
/// from sell-out in the audit trail.
pub fn deactivate(
    storage: &mut dyn Storage,
    id: u64,
    cancelled: bool,
) -> Result<Listing, ContractError> {
    let mut listing = load_listing(storage, id)?;

    if !listing.active {
        return Err(ContractError::ListingNotActive { id });
    }

    listing.active = false;
    listing.cancelled = cancelled;
    LISTINGS.save(storage, id, &listing)?;

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    fn seed_listing(storage: &mut dyn Storage, quantity: u128) -> u64 {
        if NEXT_LISTING_ID.may_load(storage).unwrap().is_none() {
            NEXT_LISTING_ID.save(storage, &0u64).unwrap();
        }
        let id = next_listing_id(storage).unwrap();
        let listing = Listing {
            id,
            seller: Addr::unchecked("seller"),
            token_address: Addr::unchecked("token"),
            kind: TokenKind::Fungible,
            quantity: Uint128::new(quantity),
            price: Uint128::new(5),
            active: true,
            cancelled: false,
        };
        LISTINGS.save(storage, id, &listing).unwrap();
        id
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;

        let first = seed_listing(storage, 3);
        deactivate(storage, first, true).unwrap();
        let second = seed_listing(storage, 3);

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        // the cancelled record survives under its old id
        assert!(!load_listing(storage, first).unwrap().active);
    }

    #[test]
    fn partial_decrement_keeps_listing_active() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        let id = seed_listing(storage, 10);

        let listing = decrement_quantity(storage, id, Uint128::new(4)).unwrap();

        assert_eq!(listing.quantity, Uint128::new(6));
        assert!(listing.active);
    }

    #[test]
    fn exhausting_decrement_deactivates() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        let id = seed_listing(storage, 2);

        let listing = decrement_quantity(storage, id, Uint128::new(2)).unwrap();

        assert_eq!(listing.quantity, Uint128::zero());
        assert!(!listing.active);
        assert!(!listing.cancelled);

        let err = decrement_quantity(storage, id, Uint128::new(1)).unwrap_err();
        assert_eq!(err, ContractError::ListingNotActive { id });
    }

    #[test]
    fn decrement_cannot_exceed_remaining_quantity() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        let id = seed_listing(storage, 3);

        let err = decrement_quantity(storage, id, Uint128::new(4)).unwrap_err();
        assert_eq!(
            err,
            ContractError::InsufficientQuantity {
                requested: Uint128::new(4),
                available: Uint128::new(3),
            }
        );
        // no partial decrement is ever visible
        assert_eq!(
            load_listing(storage, id).unwrap().quantity,
            Uint128::new(3)
        );
    }

    #[test]
    fn deactivate_is_terminal() {
        let mut deps = mock_dependencies();
        let storage = deps.as_mut().storage;
        let id = seed_listing(storage, 3);

        let listing = deactivate(storage, id, true).unwrap();
        assert!(!listing.active);
        assert!(listing.cancelled);
        assert_eq!(listing.quantity, Uint128::new(3));

        let err = deactivate(storage, id, true).unwrap_err();
        assert_eq!(err, ContractError::ListingNotActive { id });
    }

    #[test]
    fn missing_listing_is_not_found() {
        let deps = mock_dependencies();
        let err = load_listing(deps.as_ref().storage, 7).unwrap_err();
        assert_eq!(err, ContractError::ListingNotFound { id: 7 });
    }
}

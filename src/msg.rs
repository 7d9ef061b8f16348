use crate::state::{Listing, TokenKind};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    /// Native denom payments are made in, smallest unit.
    pub denom: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Put tokens up for sale at a fixed per-unit price. The tokens move
    /// into escrow in the same transaction; the seller must have granted
    /// the marketplace an allowance (cw20) or approval (cw721) first.
    ListToken {
        token_address: String,
        kind: TokenKind,
        quantity: Uint128,
        price: Uint128,
    },
    /// Buy `quantity` units from a listing, paying with attached native
    /// funds. Overpayment is refunded.
    BuyToken { listing_id: u64, quantity: Uint128 },
    /// Seller-only: close the listing and take the remaining escrowed
    /// tokens back.
    CancelListing { listing_id: u64 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ListingResponse)]
    GetListing { listing_id: u64 },
    /// All listings, active and terminal, in creation order.
    #[returns(Vec<ListingResponse>)]
    GetListings {
        from_index: Option<u64>,
        limit: Option<u64>,
    },
    #[returns(Vec<ListingResponse>)]
    GetListingsBySeller {
        seller: String,
        from_index: Option<u64>,
        limit: Option<u64>,
    },
    /// Total number of listings ever created.
    #[returns(u64)]
    GetListingCount {},
}

#[cw_serde]
pub enum TokenType {
    Fungible,
    NonFungible,
}

#[cw_serde]
pub struct ListingResponse {
    pub listing_id: u64,
    pub seller: Addr,
    pub token_address: Addr,
    pub token_type: TokenType,
    /// Set for non-fungible listings only.
    pub token_id: Option<String>,
    pub quantity: Uint128,
    pub price: Uint128,
    pub active: bool,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        let (token_type, token_id) = match listing.kind {
            TokenKind::Fungible => (TokenType::Fungible, None),
            TokenKind::NonFungible { token_id } => (TokenType::NonFungible, Some(token_id)),
        };
        ListingResponse {
            listing_id: listing.id,
            seller: listing.seller,
            token_address: listing.token_address,
            token_type,
            token_id,
            quantity: listing.quantity,
            price: listing.price,
            active: listing.active,
        }
    }
}

#[cw_serde]
pub struct MigrateMsg {}

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coins, to_json_binary, BankMsg, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Order,
    Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw_utils::{may_pay, nonpayable};
use semver::Version;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, ListingResponse, MigrateMsg, QueryMsg};
use crate::state::{self, Config, Listing, TokenKind, CONFIG, LISTINGS, NEXT_LISTING_ID};
use crate::token;

pub const CONTRACT_NAME: &str = "token-marketplace";
pub const CONTRACT_VERSION: &str = "0.1.0";

const DEFAULT_QUERY_LIMIT: u64 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.denom.is_empty() {
        return Err(ContractError::EmptyDenom {});
    }

    let config = Config { denom: msg.denom };
    CONFIG.save(deps.storage, &config)?;
    NEXT_LISTING_ID.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("denom", config.denom))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::ListToken {
            token_address,
            kind,
            quantity,
            price,
        } => execute_list_token(deps, env, info, token_address, kind, quantity, price),
        ExecuteMsg::BuyToken {
            listing_id,
            quantity,
        } => execute_buy_token(deps, info, listing_id, quantity),
        ExecuteMsg::CancelListing { listing_id } => {
            execute_cancel_listing(deps, info, listing_id)
        }
    }
}

pub fn execute_list_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token_address: String,
    kind: TokenKind,
    quantity: Uint128,
    price: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    if quantity.is_zero() {
        return Err(ContractError::ZeroQuantity {});
    }
    if matches!(kind, TokenKind::NonFungible { .. }) && quantity != Uint128::one() {
        return Err(ContractError::NonFungibleQuantity {});
    }
    let token_address = deps.api.addr_validate(&token_address)?;

    // Escrow in the same transaction: if the token contract rejects the
    // transfer, the listing below is rolled back with it.
    let escrow = token::escrow_msg(
        &kind,
        &token_address,
        &info.sender,
        &env.contract.address,
        quantity,
    )?;

    let id = state::next_listing_id(deps.storage)?;
    let listing = Listing {
        id,
        seller: info.sender.clone(),
        token_address,
        kind,
        quantity,
        price,
        active: true,
        cancelled: false,
    };
    LISTINGS.save(deps.storage, id, &listing)?;

    Ok(Response::new()
        .add_message(escrow)
        .add_attribute("action", "list_token")
        .add_attribute("listing_id", id.to_string())
        .add_attribute("seller", info.sender)
        .add_attribute("quantity", quantity.to_string())
        .add_attribute("price", price.to_string()))
}

pub fn execute_buy_token(
    deps: DepsMut,
    info: MessageInfo,
    listing_id: u64,
    quantity: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let paid = may_pay(&info, &config.denom)?;

    let listing = state::load_listing(deps.storage, listing_id)?;

    if !listing.active {
        return Err(ContractError::ListingNotActive { id: listing_id });
    }
    if info.sender == listing.seller {
        return Err(ContractError::SelfPurchase {});
    }
    if quantity.is_zero() {
        return Err(ContractError::ZeroQuantity {});
    }
    if quantity > listing.quantity {
        return Err(ContractError::InsufficientQuantity {
            requested: quantity,
            available: listing.quantity,
        });
    }

    let required = listing.price.checked_mul(quantity)?;
    if paid < required {
        return Err(ContractError::InsufficientPayment {
            required,
            sent: paid,
        });
    }
    let excess = paid.checked_sub(required)?;

    let listing = state::decrement_quantity(deps.storage, listing_id, quantity)?;

    let mut res = Response::new()
        .add_message(token::release_msg(
            &listing.kind,
            &listing.token_address,
            &info.sender,
            quantity,
        )?)
        .add_attribute("action", "buy_token")
        .add_attribute("listing_id", listing_id.to_string())
        .add_attribute("seller", listing.seller.clone())
        .add_attribute("buyer", info.sender.clone())
        .add_attribute("quantity", quantity.to_string())
        .add_attribute("payment", required.to_string());

    if !required.is_zero() {
        res = res.add_message(CosmosMsg::Bank(BankMsg::Send {
            to_address: listing.seller.to_string(),
            amount: coins(required.u128(), &config.denom),
        }));
    }
    if !excess.is_zero() {
        res = res
            .add_message(CosmosMsg::Bank(BankMsg::Send {
                to_address: info.sender.to_string(),
                amount: coins(excess.u128(), &config.denom),
            }))
            .add_attribute("refund", excess.to_string());
    }

    Ok(res)
}

pub fn execute_cancel_listing(
    deps: DepsMut,
    info: MessageInfo,
    listing_id: u64,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let listing = state::load_listing(deps.storage, listing_id)?;
    if listing.seller != info.sender {
        return Err(ContractError::Unauthorized {});
    }

    let listing = state::deactivate(deps.storage, listing_id, true)?;

    Ok(Response::new()
        .add_message(token::release_msg(
            &listing.kind,
            &listing.token_address,
            &listing.seller,
            listing.quantity,
        )?)
        .add_attribute("action", "cancel_listing")
        .add_attribute("listing_id", listing_id.to_string())
        .add_attribute("seller", listing.seller)
        .add_attribute("returned", listing.quantity.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::CannotMigrateContract {
            previous_contract: stored.contract,
        });
    }

    let stored_version: Version = stored.version.parse()?;
    let new_version: Version = CONTRACT_VERSION.parse()?;
    if stored_version >= new_version {
        return Err(ContractError::CannotMigrateVersion {});
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetListing { listing_id } => to_json_binary(&get_listing(deps, listing_id)?),
        QueryMsg::GetListings { from_index, limit } => {
            to_json_binary(&get_listings(deps, from_index, limit)?)
        }
        QueryMsg::GetListingsBySeller {
            seller,
            from_index,
            limit,
        } => to_json_binary(&get_listings_by_seller(deps, seller, from_index, limit)?),
        QueryMsg::GetListingCount {} => to_json_binary(&get_listing_count(deps)?),
    }
}

pub fn get_listing(deps: Deps, listing_id: u64) -> StdResult<ListingResponse> {
    Ok(LISTINGS.load(deps.storage, listing_id)?.into())
}

/// Every listing ever created, terminal ones included, ascending by id
/// (which is creation order).
pub fn get_listings(
    deps: Deps,
    from_index: Option<u64>,
    limit: Option<u64>,
) -> StdResult<Vec<ListingResponse>> {
    let from_index = from_index.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT);

    LISTINGS
        .range(deps.storage, None, None, Order::Ascending)
        .skip(from_index as usize)
        .take(limit as usize)
        .map(|item| item.map(|(_, listing)| listing.into()))
        .collect()
}

pub fn get_listings_by_seller(
    deps: Deps,
    seller: String,
    from_index: Option<u64>,
    limit: Option<u64>,
) -> StdResult<Vec<ListingResponse>> {
    let seller = deps.api.addr_validate(&seller)?;
    let from_index = from_index.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT);

    LISTINGS
        .range(deps.storage, None, None, Order::Ascending)
        .filter(|item| {
            item.as_ref()
                .map(|(_, listing)| listing.seller == seller)
                .unwrap_or(true)
        })
        .skip(from_index as usize)
        .take(limit as usize)
        .map(|item| item.map(|(_, listing)| listing.into()))
        .collect()
}

pub fn get_listing_count(deps: Deps) -> StdResult<u64> {
    NEXT_LISTING_ID.load(deps.storage)
}

//! Custody adapter over the two token kinds. Every movement in or out of
//! escrow is a message against the token's own contract, so a rejected
//! transfer aborts the whole marketplace transaction with it.

use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;
use cw721::Cw721ExecuteMsg;

use crate::error::ContractError;
use crate::state::TokenKind;

/// Pulls `quantity` units from `from` into the escrow address. Fungible
/// tokens come in via `TransferFrom` (needs a prior allowance); a
/// non-fungible token is moved under its operator approval.
pub fn escrow_msg(
    kind: &TokenKind,
    token_address: &Addr,
    from: &Addr,
    escrow: &Addr,
    quantity: Uint128,
) -> Result<CosmosMsg, ContractError> {
    let msg = match kind {
        TokenKind::Fungible => to_json_binary(&Cw20ExecuteMsg::TransferFrom {
            owner: from.to_string(),
            recipient: escrow.to_string(),
            amount: quantity,
        })?,
        TokenKind::NonFungible { token_id } => {
            if quantity != Uint128::one() {
                return Err(ContractError::NonFungibleQuantity {});
            }
            to_json_binary(&Cw721ExecuteMsg::TransferNft {
                recipient: escrow.to_string(),
                token_id: token_id.clone(),
            })?
        }
    };

    Ok(WasmMsg::Execute {
        contract_addr: token_address.to_string(),
        msg,
        funds: vec![],
    }
    .into())
}

/// Releases `quantity` escrowed units to `to` (the buyer on a sale, the
/// seller on cancellation).
pub fn release_msg(
    kind: &TokenKind,
    token_address: &Addr,
    to: &Addr,
    quantity: Uint128,
) -> Result<CosmosMsg, ContractError> {
    let msg = match kind {
        TokenKind::Fungible => to_json_binary(&Cw20ExecuteMsg::Transfer {
            recipient: to.to_string(),
            amount: quantity,
        })?,
        TokenKind::NonFungible { token_id } => {
            if quantity != Uint128::one() {
                return Err(ContractError::NonFungibleQuantity {});
            }
            to_json_binary(&Cw721ExecuteMsg::TransferNft {
                recipient: to.to_string(),
                token_id: token_id.clone(),
            })?
        }
    };

    Ok(WasmMsg::Execute {
        contract_addr: token_address.to_string(),
        msg,
        funds: vec![],
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fungible_escrow_pulls_from_seller() {
        let msg = escrow_msg(
            &TokenKind::Fungible,
            &Addr::unchecked("token"),
            &Addr::unchecked("seller"),
            &Addr::unchecked("market"),
            Uint128::new(25),
        )
        .unwrap();

        let expected: CosmosMsg = WasmMsg::Execute {
            contract_addr: "token".to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
                owner: "seller".to_string(),
                recipient: "market".to_string(),
                amount: Uint128::new(25),
            })
            .unwrap(),
            funds: vec![],
        }
        .into();
        assert_eq!(msg, expected);
    }

    #[test]
    fn non_fungible_release_moves_the_one_token() {
        let kind = TokenKind::NonFungible {
            token_id: "42".to_string(),
        };
        let msg = release_msg(
            &kind,
            &Addr::unchecked("nft"),
            &Addr::unchecked("buyer"),
            Uint128::one(),
        )
        .unwrap();

        let expected: CosmosMsg = WasmMsg::Execute {
            contract_addr: "nft".to_string(),
            msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
                recipient: "buyer".to_string(),
                token_id: "42".to_string(),
            })
            .unwrap(),
            funds: vec![],
        }
        .into();
        assert_eq!(msg, expected);
    }

    #[test]
    fn non_fungible_custody_is_single_unit_only() {
        let kind = TokenKind::NonFungible {
            token_id: "42".to_string(),
        };
        let err = escrow_msg(
            &kind,
            &Addr::unchecked("nft"),
            &Addr::unchecked("seller"),
            &Addr::unchecked("market"),
            Uint128::new(2),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::NonFungibleQuantity {});
    }
}

use super::{
    deserialize_pubkey, distinct, fetch_account_data, load_entries, send_or_plan, SendArgs,
    SpaceActionArgs,
};
use crate::error::{CliError, CliResult};
use serde::Deserialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use space_sdk::{
    build_accept_offer_ix, find_neighborhood_metadata_address, neighborhood_creator,
    neighborhood_of, AcceptOfferArgs,
};
use std::collections::HashMap;

/// One entry of a purchases file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Purchase {
    pub x: i64,
    pub y: i64,
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub mint: Pubkey,
    /// Lamports, as listed
    pub price: u64,
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub seller: Pubkey,
}

impl Purchase {
    fn neighborhood_metadata(&self, base: &Pubkey) -> Pubkey {
        let (neighborhood_x, neighborhood_y) = neighborhood_of(self.x, self.y);
        find_neighborhood_metadata_address(base, neighborhood_x, neighborhood_y).0
    }
}

pub async fn execute(send: SendArgs, action: SpaceActionArgs) -> CliResult<()> {
    let purchases: Vec<Purchase> = load_entries(&action.file)?;
    let (rpc_client, client) = send.connect()?;

    let metadata_accounts = distinct(
        purchases
            .iter()
            .map(|purchase| purchase.neighborhood_metadata(&action.base)),
    );
    let metadata = fetch_account_data(&rpc_client, &metadata_accounts).await?;
    let creators = metadata
        .iter()
        .map(|(address, data)| -> CliResult<(Pubkey, Pubkey)> {
            Ok((*address, neighborhood_creator(data)?))
        })
        .collect::<CliResult<HashMap<_, _>>>()?;

    let instructions =
        accept_offer_instructions(&client.payer_pubkey(), &action.base, &purchases, &creators)?;
    send_or_plan(&client, instructions, "Accept offer", send.dry_run).await
}

/// `creators` maps neighborhood metadata accounts to the neighborhood creator
pub fn accept_offer_instructions(
    wallet: &Pubkey,
    base: &Pubkey,
    purchases: &[Purchase],
    creators: &HashMap<Pubkey, Pubkey>,
) -> CliResult<Vec<Instruction>> {
    purchases
        .iter()
        .map(|purchase| -> CliResult<Instruction> {
            let metadata = purchase.neighborhood_metadata(base);
            let creator = creators.get(&metadata).ok_or(CliError::AccountNotFound {
                kind: "neighborhood metadata",
                address: metadata,
            })?;
            let args = AcceptOfferArgs {
                x: purchase.x,
                y: purchase.y,
                mint: purchase.mint,
                price: purchase.price,
                seller: purchase.seller,
            };
            Ok(build_accept_offer_ix(wallet, base, creator, &args)?)
        })
        .collect()
}

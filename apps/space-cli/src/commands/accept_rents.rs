use super::{deserialize_pubkey, load_entries, send_or_plan, SendArgs, SpaceActionArgs};
use crate::error::CliResult;
use serde::Deserialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use space_sdk::{build_accept_rent_ix, AcceptRentArgs};

/// One entry of a rentals file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rental {
    pub x: i64,
    pub y: i64,
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub mint: Pubkey,
    /// Lamports per second, as listed
    pub price: u64,
    /// Seconds
    pub rent_time: u64,
    /// Current owner of the space
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub seller: Pubkey,
}

pub async fn execute(send: SendArgs, action: SpaceActionArgs) -> CliResult<()> {
    let rentals: Vec<Rental> = load_entries(&action.file)?;
    let (_, client) = send.connect()?;

    let instructions = accept_rent_instructions(&client.payer_pubkey(), &action.base, &rentals)?;
    send_or_plan(&client, instructions, "Accept rent", send.dry_run).await
}

pub fn accept_rent_instructions(
    wallet: &Pubkey,
    base: &Pubkey,
    rentals: &[Rental],
) -> CliResult<Vec<Instruction>> {
    rentals
        .iter()
        .map(|rental| -> CliResult<Instruction> {
            let args = AcceptRentArgs {
                x: rental.x,
                y: rental.y,
                mint: rental.mint,
                price: rental.price,
                rent_time: rental.rent_time,
                seller: rental.seller,
            };
            Ok(build_accept_rent_ix(wallet, base, &args)?)
        })
        .collect()
}

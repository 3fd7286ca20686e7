use super::{deserialize_pubkey, load_entries, send_or_plan, SendArgs, SpaceActionArgs};
use crate::error::CliResult;
use serde::Deserialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use space_sdk::{build_set_rent_ix, SetRentArgs};

fn listed() -> bool {
    true
}

/// One entry of a rent offers file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RentOffer {
    pub x: i64,
    pub y: i64,
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub mint: Pubkey,
    /// Lamports per second
    pub price: u64,
    /// Seconds
    pub min_duration: u64,
    /// Seconds
    pub max_duration: u64,
    /// Unix timestamp the rental must end by
    pub max_timestamp: u64,
    /// false withdraws the offer
    #[serde(default = "listed")]
    pub create: bool,
}

pub async fn execute(send: SendArgs, action: SpaceActionArgs) -> CliResult<()> {
    let offers: Vec<RentOffer> = load_entries(&action.file)?;
    let (_, client) = send.connect()?;

    let instructions = set_rent_instructions(&client.payer_pubkey(), &action.base, &offers)?;
    send_or_plan(&client, instructions, "Set rent", send.dry_run).await
}

pub fn set_rent_instructions(
    wallet: &Pubkey,
    base: &Pubkey,
    offers: &[RentOffer],
) -> CliResult<Vec<Instruction>> {
    offers
        .iter()
        .map(|offer| -> CliResult<Instruction> {
            let args = SetRentArgs {
                x: offer.x,
                y: offer.y,
                mint: offer.mint,
                price: offer.price,
                min_duration: offer.min_duration,
                max_duration: offer.max_duration,
                max_timestamp: offer.max_timestamp,
                create: offer.create,
            };
            Ok(build_set_rent_ix(wallet, base, &args)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_offer_requires_durations() {
        let mint = Pubkey::new_unique();
        let yaml = format!("- {{ x: 1, y: 2, mint: {mint}, price: 10 }}\n");
        let result: Result<Vec<RentOffer>, _> = serde_yaml::from_str(&yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_rent_offers_build_rent_instructions() {
        let mint = Pubkey::new_unique();
        let yaml = format!(
            "- {{ x: 1, y: 2, mint: {mint}, price: 10, min_duration: 60, max_duration: 600, max_timestamp: 1700000000 }}\n"
        );
        let offers: Vec<RentOffer> = serde_yaml::from_str(&yaml).unwrap();
        assert!(offers[0].create);

        let instructions =
            set_rent_instructions(&Pubkey::new_unique(), &Pubkey::new_unique(), &offers).unwrap();
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].program_id, space_sdk::RENT_PROGRAM_ID);
        assert_eq!(*instructions[0].data.last().unwrap(), 1);
    }
}

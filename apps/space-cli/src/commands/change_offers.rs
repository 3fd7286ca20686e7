use super::{deserialize_pubkey, load_entries, send_or_plan, SendArgs, SpaceActionArgs};
use crate::error::CliResult;
use serde::Deserialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use space_sdk::{build_change_offer_ix, ChangeOfferArgs};

fn listed() -> bool {
    true
}

/// One entry of a sell offers file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfferChange {
    pub x: i64,
    pub y: i64,
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub mint: Pubkey,
    /// Lamports
    #[serde(default)]
    pub price: u64,
    /// false delists the space
    #[serde(default = "listed")]
    pub create: bool,
}

pub async fn execute(send: SendArgs, action: SpaceActionArgs) -> CliResult<()> {
    let changes: Vec<OfferChange> = load_entries(&action.file)?;
    let (_, client) = send.connect()?;

    let instructions = change_offer_instructions(&client.payer_pubkey(), &action.base, &changes)?;
    send_or_plan(&client, instructions, "Change offer", send.dry_run).await
}

pub fn change_offer_instructions(
    wallet: &Pubkey,
    base: &Pubkey,
    changes: &[OfferChange],
) -> CliResult<Vec<Instruction>> {
    changes
        .iter()
        .map(|change| -> CliResult<Instruction> {
            let args = ChangeOfferArgs {
                x: change.x,
                y: change.y,
                mint: change.mint,
                price: change.price,
                create: change.create,
            };
            Ok(build_change_offer_ix(wallet, base, &args)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offers_default_to_listing() {
        let mint = Pubkey::new_unique();
        let yaml = format!(
            "- {{ x: 1, y: 2, mint: {mint}, price: 5000 }}\n- {{ x: 3, y: 4, mint: {mint}, create: false }}\n"
        );
        let changes: Vec<OfferChange> = serde_yaml::from_str(&yaml).unwrap();

        assert!(changes[0].create);
        assert_eq!(changes[0].price, 5000);
        assert!(!changes[1].create);
        assert_eq!(changes[1].price, 0);
    }

    #[test]
    fn test_one_instruction_per_offer_in_file_order() {
        let wallet = Pubkey::new_unique();
        let base = Pubkey::new_unique();
        let changes: Vec<_> = (0..5)
            .map(|i| OfferChange {
                x: i,
                y: -i,
                mint: Pubkey::new_unique(),
                price: 1_000 * i as u64,
                create: true,
            })
            .collect();

        let instructions = change_offer_instructions(&wallet, &base, &changes).unwrap();

        assert_eq!(instructions.len(), 5);
        for (ix, change) in instructions.iter().zip(&changes) {
            assert_eq!(ix.program_id, space_sdk::SPACE_PROGRAM_ID);
            assert_eq!(&ix.data[1..9], &change.x.to_le_bytes());
            assert_eq!(&ix.data[17..25], &change.price.to_le_bytes());
        }
    }
}

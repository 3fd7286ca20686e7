use super::{
    deserialize_pubkey, distinct, fetch_account_data, load_entries, send_or_plan, SendArgs,
    SpaceActionArgs,
};
use crate::error::{CliError, CliResult};
use serde::Deserialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use space_sdk::{
    build_change_color_ix, find_neighborhood_frame_pointer_address, frame_color_cluster,
    neighborhood_of, ChangeColorArgs,
};
use std::collections::HashMap;

/// One entry of a colour changes file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorChange {
    pub x: i64,
    pub y: i64,
    pub frame: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Mint of the space NFT held by the wallet
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub mint: Pubkey,
}

impl ColorChange {
    fn frame_pointer(&self, base: &Pubkey) -> Pubkey {
        let (neighborhood_x, neighborhood_y) = neighborhood_of(self.x, self.y);
        find_neighborhood_frame_pointer_address(
            base,
            neighborhood_x,
            neighborhood_y,
            u64::from(self.frame),
        )
        .0
    }

    fn args(&self) -> ChangeColorArgs {
        ChangeColorArgs {
            x: self.x,
            y: self.y,
            frame: self.frame,
            r: self.r,
            g: self.g,
            b: self.b,
            space_mint: self.mint,
        }
    }
}

pub async fn execute(send: SendArgs, action: SpaceActionArgs) -> CliResult<()> {
    let changes: Vec<ColorChange> = load_entries(&action.file)?;
    let (rpc_client, client) = send.connect()?;

    // one lookup per (neighborhood, frame)
    let pointers = distinct(changes.iter().map(|change| change.frame_pointer(&action.base)));
    let pointer_data = fetch_account_data(&rpc_client, &pointers).await?;
    let clusters = pointer_data
        .iter()
        .map(|(pointer, data)| -> CliResult<(Pubkey, Pubkey)> {
            Ok((*pointer, frame_color_cluster(data)?))
        })
        .collect::<CliResult<HashMap<_, _>>>()?;

    let instructions =
        change_color_instructions(&client.payer_pubkey(), &action.base, &changes, &clusters)?;
    send_or_plan(&client, instructions, "Change color", send.dry_run).await
}

/// `clusters` maps frame pointer accounts to the colour cluster they refer to
pub fn change_color_instructions(
    wallet: &Pubkey,
    base: &Pubkey,
    changes: &[ColorChange],
    clusters: &HashMap<Pubkey, Pubkey>,
) -> CliResult<Vec<Instruction>> {
    changes
        .iter()
        .map(|change| -> CliResult<Instruction> {
            let pointer = change.frame_pointer(base);
            let cluster = clusters.get(&pointer).ok_or(CliError::AccountNotFound {
                kind: "frame pointer",
                address: pointer,
            })?;
            Ok(build_change_color_ix(wallet, base, cluster, &change.args())?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use space_batch_tx::{InstructionPacker, PackedBatch, TxBatchConfig};

    fn change(x: i64, y: i64, frame: u8) -> ColorChange {
        ColorChange {
            x,
            y,
            frame,
            r: 1,
            g: 2,
            b: 3,
            mint: Pubkey::new_unique(),
        }
    }

    fn clusters_for(base: &Pubkey, changes: &[ColorChange]) -> HashMap<Pubkey, Pubkey> {
        changes
            .iter()
            .map(|change| (change.frame_pointer(base), Pubkey::new_unique()))
            .collect()
    }

    #[test]
    fn test_parses_changes_file() {
        let mint = Pubkey::new_unique();
        let yaml = format!("- {{ x: -4, y: 12, frame: 0, r: 255, g: 0, b: 16, mint: {mint} }}\n");
        let changes: Vec<ColorChange> = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].x, -4);
        assert_eq!(changes[0].b, 16);
        assert_eq!(changes[0].mint, mint);
    }

    #[test]
    fn test_same_frame_shares_one_pointer() {
        let base = Pubkey::new_unique();
        let changes = vec![change(0, 0, 0), change(199, 5, 0), change(200, 5, 0), change(0, 0, 1)];

        let pointers = distinct(changes.iter().map(|change| change.frame_pointer(&base)));
        assert_eq!(pointers.len(), 3);
    }

    #[test]
    fn test_missing_frame_pointer_is_reported() {
        let base = Pubkey::new_unique();
        let changes = vec![change(3, 3, 0)];

        let err = change_color_instructions(&Pubkey::new_unique(), &base, &changes, &HashMap::new())
            .unwrap_err();
        match err {
            CliError::AccountNotFound { kind, address } => {
                assert_eq!(kind, "frame pointer");
                assert_eq!(address, changes[0].frame_pointer(&base));
            }
            other => panic!("expected AccountNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_changes_in_one_neighborhood_share_keys_when_packed() {
        // shared per transaction: program, base, cluster, frame base, frame
        // pointer, neighborhood metadata and wallet. Each further change adds its
        // space metadata and token account: 2 * 32 + 1 + 1 + 8 + 1 + 9 = 84 bytes,
        // so ten changes fit (100 + 308 + 9 * 84 + 2 = 1166) and eleven do not.
        let wallet = Pubkey::new_unique();
        let base = Pubkey::new_unique();
        let changes: Vec<_> = (0..40).map(|x| change(x, 0, 0)).collect();
        let clusters = clusters_for(&base, &changes);

        let instructions = change_color_instructions(&wallet, &base, &changes, &clusters).unwrap();
        let packer = InstructionPacker::from_config(&TxBatchConfig::default()).unwrap();
        let batches = packer.pack(instructions).unwrap();

        let lens: Vec<_> = batches.iter().map(PackedBatch::len).collect();
        assert_eq!(lens, vec![10, 10, 10, 10]);
        assert_eq!(batches[0].account_count(), 7 + 2 * 10);
        assert_eq!(batches[0].encoded_size(), 1166);
    }
}

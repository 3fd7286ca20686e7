use crate::compact::compact_u16_len;
use crate::config::{INSTRUCTION_ENVELOPE_SIZE, PUBKEY_SIZE};
use crate::{TxBatchConfig, TxBatchError};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use std::collections::HashSet;
use tracing::debug;

/// A group of instructions that fits in one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct PackedBatch {
    instructions: Vec<Instruction>,
    account_count: usize,
    encoded_size: usize,
}

impl PackedBatch {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Distinct keys (program ids included) referenced by the batch
    pub fn account_count(&self) -> usize {
        self.account_count
    }

    /// Encoded transaction size of the batch in bytes
    ///
    /// Equals the serialized size when the fee payer is one of the batch's
    /// keys. A fee payer outside the batch adds 32 bytes on the wire.
    pub fn encoded_size(&self) -> usize {
        self.encoded_size
    }
}

/// Incremental cost of adding one instruction to a batch
struct InstructionCost {
    new_keys: Vec<Pubkey>,
    delta: usize,
}

/// Accumulator for the batch under construction
struct BatchBuilder {
    size: usize,
    keys: HashSet<Pubkey>,
    instructions: Vec<Instruction>,
}

impl BatchBuilder {
    fn new(base_size: usize) -> Self {
        Self {
            size: base_size,
            keys: HashSet::new(),
            instructions: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    fn cost_of(&self, instruction: &Instruction) -> InstructionCost {
        let mut new_keys: Vec<Pubkey> = Vec::new();
        let referenced = std::iter::once(&instruction.program_id)
            .chain(instruction.accounts.iter().map(|meta| &meta.pubkey));
        for key in referenced {
            if !self.keys.contains(key) && !new_keys.contains(key) {
                new_keys.push(*key);
            }
        }

        let account_indexes = instruction.accounts.len();
        let data_len = instruction.data.len();
        let delta = new_keys.len() * PUBKEY_SIZE
            + INSTRUCTION_ENVELOPE_SIZE
            + compact_u16_len(account_indexes)
            + account_indexes
            + compact_u16_len(data_len)
            + data_len;

        InstructionCost { new_keys, delta }
    }

    /// Size of the batch if `cost` were committed, count prefixes re-encoded
    fn projected_size(&self, cost: &InstructionCost) -> usize {
        self.size
            + cost.delta
            + compact_u16_len(self.keys.len() + cost.new_keys.len())
            + compact_u16_len(self.instructions.len() + 1)
    }

    fn commit(&mut self, instruction: Instruction, cost: InstructionCost) {
        self.keys.extend(cost.new_keys);
        self.size += cost.delta;
        self.instructions.push(instruction);
    }

    fn finish(self) -> PackedBatch {
        let encoded_size = if self.instructions.is_empty() {
            self.size
        } else {
            self.size
                + compact_u16_len(self.keys.len())
                + compact_u16_len(self.instructions.len())
        };
        PackedBatch {
            account_count: self.keys.len(),
            instructions: self.instructions,
            encoded_size,
        }
    }
}

/// Greedy, order-preserving packer of instructions into size-limited transactions
#[derive(Debug, Clone)]
pub struct InstructionPacker {
    max_transaction_size: usize,
    base_transaction_size: usize,
    keep_empty_trailing_batch: bool,
}

impl InstructionPacker {
    pub fn new(
        max_transaction_size: usize,
        base_transaction_size: usize,
    ) -> Result<Self, TxBatchError> {
        if base_transaction_size > max_transaction_size {
            return Err(TxBatchError::InvalidConfig(format!(
                "base transaction size {} exceeds max transaction size {}",
                base_transaction_size, max_transaction_size
            )));
        }
        Ok(Self {
            max_transaction_size,
            base_transaction_size,
            keep_empty_trailing_batch: false,
        })
    }

    pub fn from_config(config: &TxBatchConfig) -> Result<Self, TxBatchError> {
        Ok(Self::new(
            config.max_transaction_size_bytes,
            config.base_transaction_size_bytes,
        )?
        .keep_empty_trailing_batch(config.keep_empty_trailing_batch))
    }

    /// When set, `pack` always returns the final open batch, so empty input yields one empty batch
    pub fn keep_empty_trailing_batch(mut self, keep: bool) -> Self {
        self.keep_empty_trailing_batch = keep;
        self
    }

    /// Transaction size of `instruction` alone in a fresh batch
    pub fn standalone_size(&self, instruction: &Instruction) -> usize {
        let builder = BatchBuilder::new(self.base_transaction_size);
        let cost = builder.cost_of(instruction);
        builder.projected_size(&cost)
    }

    /// Pack instructions into batches without reordering them
    ///
    /// Fails up front with [`TxBatchError::InstructionTooLarge`] if any single
    /// instruction cannot fit in a transaction of its own.
    pub fn pack(&self, instructions: Vec<Instruction>) -> Result<Vec<PackedBatch>, TxBatchError> {
        for (index, instruction) in instructions.iter().enumerate() {
            let size = self.standalone_size(instruction);
            if size > self.max_transaction_size {
                return Err(TxBatchError::InstructionTooLarge {
                    index,
                    size,
                    max: self.max_transaction_size,
                });
            }
        }

        let instruction_count = instructions.len();
        let mut batches = Vec::new();
        let mut builder = BatchBuilder::new(self.base_transaction_size);

        for instruction in instructions {
            let mut cost = builder.cost_of(&instruction);
            if builder.projected_size(&cost) > self.max_transaction_size {
                // Non-empty here: every instruction fits a fresh batch on its own.
                let full = std::mem::replace(
                    &mut builder,
                    BatchBuilder::new(self.base_transaction_size),
                );
                batches.push(full.finish());
                cost = builder.cost_of(&instruction);
            }
            builder.commit(instruction, cost);
        }

        if !builder.is_empty() || self.keep_empty_trailing_batch {
            batches.push(builder.finish());
        }

        debug!(
            "Packed {} instructions into {} transactions",
            instruction_count,
            batches.len()
        );
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BASE_TRANSACTION_SIZE, MAX_TRANSACTION_SIZE};
    use solana_sdk::{instruction::AccountMeta, message::Message};

    fn default_packer() -> InstructionPacker {
        InstructionPacker::new(MAX_TRANSACTION_SIZE, BASE_TRANSACTION_SIZE).unwrap()
    }

    fn instruction(program_id: Pubkey, accounts: &[Pubkey], data_len: usize) -> Instruction {
        Instruction {
            program_id,
            accounts: accounts
                .iter()
                .map(|key| AccountMeta::new(*key, false))
                .collect(),
            data: vec![7u8; data_len],
        }
    }

    fn flatten(batches: &[PackedBatch]) -> Vec<Instruction> {
        batches
            .iter()
            .flat_map(|batch| batch.instructions().iter().cloned())
            .collect()
    }

    #[test]
    fn test_new_rejects_base_above_max() {
        let result = InstructionPacker::new(100, 101);
        assert!(matches!(result, Err(TxBatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_input_without_trailing_batch() {
        let batches = default_packer().pack(vec![]).unwrap();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_empty_input_with_trailing_batch() {
        let packer = default_packer().keep_empty_trailing_batch(true);
        let batches = packer.pack(vec![]).unwrap();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_empty());
        assert_eq!(batches[0].encoded_size(), BASE_TRANSACTION_SIZE);
    }

    #[test]
    fn test_trailing_batch_never_empty_for_nonempty_input() {
        let packer = default_packer().keep_empty_trailing_batch(true);
        let program = Pubkey::new_unique();
        let instructions: Vec<_> = (0..40)
            .map(|_| instruction(program, &[Pubkey::new_unique()], 40))
            .collect();

        let batches = packer.pack(instructions).unwrap();
        assert!(batches.len() > 1);
        assert!(batches.iter().all(|batch| !batch.is_empty()));
    }

    #[test]
    fn test_repeated_keys_charged_once() {
        let program = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        let batches = default_packer()
            .pack(vec![
                instruction(program, &[a, b], 10),
                instruction(program, &[a, b], 10),
            ])
            .unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].account_count(), 3);
        // first: 3 keys * 32 + 1 + 1 + 2 + 1 + 10 = 111, second: 15
        // 100 + 111 + 15 + compact(3) + compact(2)
        assert_eq!(batches[0].encoded_size(), 228);
    }

    #[test]
    fn test_duplicate_key_within_one_instruction() {
        let program = Pubkey::new_unique();
        let a = Pubkey::new_unique();

        let batches = default_packer()
            .pack(vec![instruction(program, &[a, a], 0)])
            .unwrap();

        assert_eq!(batches[0].account_count(), 2);
        // 2 keys * 32 + 1 + 1 + 2 account indexes + 1 + 0, then compact(2) + compact(1)
        assert_eq!(batches[0].encoded_size(), 100 + 69 + 2);
    }

    #[test]
    fn test_greedy_split_preserves_order() {
        // each instruction costs 32 + 1 + 1 + 0 + 1 + 10 = 45 bytes
        // two fit under 200 (100 + 90 + 2), three do not (100 + 135 + 2)
        let packer = InstructionPacker::new(200, 100).unwrap();
        let instructions: Vec<_> = (0..5)
            .map(|_| instruction(Pubkey::new_unique(), &[], 10))
            .collect();

        let batches = packer.pack(instructions.clone()).unwrap();

        let lens: Vec<_> = batches.iter().map(PackedBatch::len).collect();
        assert_eq!(lens, vec![2, 2, 1]);
        assert_eq!(flatten(&batches), instructions);
        assert!(batches.iter().all(|batch| batch.encoded_size() <= 200));
    }

    #[test]
    fn test_mixed_workload_concatenation_and_size_bound() {
        let shared_program = Pubkey::new_unique();
        let shared_accounts: Vec<_> = (0..6).map(|_| Pubkey::new_unique()).collect();

        let instructions: Vec<_> = (0..200usize)
            .map(|i| {
                let program = if i % 3 == 0 {
                    Pubkey::new_unique()
                } else {
                    shared_program
                };
                let mut accounts = vec![shared_accounts[i % shared_accounts.len()]];
                accounts.extend((0..(i % 4)).map(|_| Pubkey::new_unique()));
                instruction(program, &accounts, (i * 37) % 300)
            })
            .collect();

        let batches = default_packer().pack(instructions.clone()).unwrap();

        assert_eq!(flatten(&batches), instructions);
        for batch in &batches {
            assert!(!batch.is_empty());
            assert!(batch.encoded_size() <= MAX_TRANSACTION_SIZE);
        }
    }

    #[test]
    fn test_key_count_prefix_growth_closes_batch() {
        // first instruction: 2 keys * 32 + 1 + 1 + 1 + 1 = 68, then 36 per new key.
        // 126 instructions leave 127 keys and a size of 100 + 68 + 125 * 36 = 4668.
        // The 127th adds key 128: 4668 + 36 + compact(128) + compact(127) = 4707,
        // one byte more than counting the prefixes before the insert.
        let program = Pubkey::new_unique();
        let instructions: Vec<_> = (0..127)
            .map(|_| instruction(program, &[Pubkey::new_unique()], 0))
            .collect();

        let packer = InstructionPacker::new(4706, BASE_TRANSACTION_SIZE).unwrap();
        let batches = packer.pack(instructions.clone()).unwrap();

        let lens: Vec<_> = batches.iter().map(PackedBatch::len).collect();
        assert_eq!(lens, vec![126, 1]);
        assert_eq!(batches[0].account_count(), 127);
        assert_eq!(batches[0].encoded_size(), 4668 + 1 + 1);
        assert_eq!(batches[1].encoded_size(), 100 + 68 + 1 + 1);
        assert_eq!(flatten(&batches), instructions);

        // one more byte of room and the 128th key fits with its wider prefix
        let roomy = InstructionPacker::new(4707, BASE_TRANSACTION_SIZE).unwrap();
        let batches = roomy.pack(instructions).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].account_count(), 128);
        assert_eq!(batches[0].encoded_size(), 4707);
    }

    #[test]
    fn test_instruction_count_prefix_growth_closes_batch() {
        // shared program, no accounts, no data: 35 bytes for the first, 3 after.
        // 127 instructions: 100 + 35 + 126 * 3 = 513; the 128th projects to
        // 513 + 3 + compact(1) + compact(128) = 519.
        let program = Pubkey::new_unique();
        let instructions: Vec<_> = (0..128).map(|_| instruction(program, &[], 0)).collect();

        let packer = InstructionPacker::new(518, BASE_TRANSACTION_SIZE).unwrap();
        let batches = packer.pack(instructions.clone()).unwrap();

        let lens: Vec<_> = batches.iter().map(PackedBatch::len).collect();
        assert_eq!(lens, vec![127, 1]);
        assert_eq!(batches[0].encoded_size(), 513 + 1 + 1);
        assert!(batches.iter().all(|batch| batch.encoded_size() <= 518));

        let roomy = InstructionPacker::new(519, BASE_TRANSACTION_SIZE).unwrap();
        let batches = roomy.pack(instructions).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].encoded_size(), 519);
    }

    #[test]
    fn test_fee_payer_outside_batch_adds_one_key() {
        let program = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let batches = default_packer()
            .pack(vec![instruction(program, &[Pubkey::new_unique()], 12)])
            .unwrap();

        let message = Message::new(batches[0].instructions(), Some(&payer));
        let serialized = 1 + 64 + message.serialize().len();
        assert_eq!(serialized, batches[0].encoded_size() + PUBKEY_SIZE);
    }

    #[test]
    fn test_instruction_filling_whole_transaction_is_accepted() {
        // alone: 100 + 32 + 1 + 1 + 0 + 2 + data + compact(1) + compact(1)
        let packer = default_packer();
        let data_len = MAX_TRANSACTION_SIZE - 100 - 32 - 1 - 1 - 2 - 2;
        let ix = instruction(Pubkey::new_unique(), &[], data_len);
        assert_eq!(packer.standalone_size(&ix), MAX_TRANSACTION_SIZE);

        let batches = packer.pack(vec![ix.clone(), ix]).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].encoded_size(), MAX_TRANSACTION_SIZE);
    }

    #[test]
    fn test_oversized_instruction_is_rejected() {
        let program = Pubkey::new_unique();
        let instructions = vec![
            instruction(program, &[], 10),
            instruction(program, &[], 10),
            instruction(program, &[], 1200),
            instruction(program, &[], 10),
        ];

        let err = default_packer().pack(instructions).unwrap_err();
        match err {
            TxBatchError::InstructionTooLarge { index, size, max } => {
                assert_eq!(index, 2);
                assert!(size > max);
                assert_eq!(max, MAX_TRANSACTION_SIZE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_encoded_size_matches_serialized_transaction() {
        // The payer appears in every instruction, so the message holds exactly
        // the keys the packer counts and needs a single signature.
        let payer = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let instructions: Vec<_> = (0..150usize)
            .map(|i| Instruction {
                program_id: if i % 10 == 0 { Pubkey::new_unique() } else { program },
                accounts: vec![
                    AccountMeta::new(payer, true),
                    AccountMeta::new(Pubkey::new_unique(), false),
                ],
                data: vec![i as u8; i % 140],
            })
            .collect();

        // large limit so key and instruction counts cross the one-byte prefix width
        let packer = InstructionPacker::new(64 * 1024, BASE_TRANSACTION_SIZE).unwrap();
        let batches = packer.pack(instructions).unwrap();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].account_count() >= 0x80);

        let message = Message::new(batches[0].instructions(), Some(&payer));
        let serialized = 1 + 64 + message.serialize().len();
        assert_eq!(batches[0].encoded_size(), serialized);
    }
}

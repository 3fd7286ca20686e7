/*!
# Space Batch Transaction Client

Greedy transaction packing and batch submission for Solana, used by the Spaces
tooling to push large numbers of instructions (colour changes, offers, NFT
transfers) through as few transactions as the packet size allows.

Instructions are packed left to right without reordering. Each account key is
charged once per transaction, and count prefixes are re-encoded as they grow.
Every packed transaction is then submitted independently; a failed transaction
never stops the others, and the caller gets back how many instructions landed.

## Quick Start

```rust
use space_batch_tx::BatchTxClient;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{instruction::Instruction, signature::Keypair};
use std::sync::Arc;

# async fn example() -> Result<(), Box<dyn std::error::Error>> {
let rpc_client = Arc::new(RpcClient::new("https://api.devnet.solana.com".to_string()));
let payer = Keypair::new();
let client = BatchTxClient::new(rpc_client, payer);

let instructions: Vec<Instruction> = vec![/* your instructions */];

let report = client
    .send_instructions_greedy_batch(instructions, "Change color", true)
    .await?;
println!("{} of {} instructions landed", report.succeeded(), report.total());
# Ok(())
# }
```

## Custom Configuration

```rust
# use space_batch_tx::{BatchTxClient, SendMode, TxBatchConfig};
# use solana_client::nonblocking::rpc_client::RpcClient;
# use solana_sdk::signature::Keypair;
# use std::sync::Arc;

# fn example() -> Result<(), Box<dyn std::error::Error>> {
let rpc_client = Arc::new(RpcClient::new("https://api.devnet.solana.com".to_string()));
let config = TxBatchConfig {
    send_mode: SendMode::Parallel,
    max_parallel_sends: 8,
    batch_retry_rounds: 3,
    ..Default::default()
};

let payer = Keypair::new();
let client = BatchTxClient::with_config(rpc_client, payer, config)?;
# Ok(())
# }
```

## Planning Without Sending

```rust
use space_batch_tx::InstructionPacker;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

let packer = InstructionPacker::new(1232, 100).unwrap();
let program = Pubkey::new_unique();
let instructions: Vec<Instruction> = (0..50)
    .map(|_| Instruction::new_with_bytes(program, &[0u8; 64], vec![]))
    .collect();

let batches = packer.pack(instructions).unwrap();
assert!(batches.iter().all(|batch| batch.encoded_size() <= 1232));
```
*/

mod client;
mod compact;
mod config;
mod error;
mod executor;
mod notify;
mod packer;
mod submitter;

pub use client::BatchTxClient;
pub use compact::compact_u16_len;
pub use config::{
    SendMode, TxBatchConfig, BASE_TRANSACTION_SIZE, INSTRUCTION_ENVELOPE_SIZE,
    MAX_TRANSACTION_SIZE, PUBKEY_SIZE,
};
pub use error::TxBatchError;
pub use executor::{RpcExecutor, TransactionExecutor};
pub use notify::{Notifier, SilentNotifier, TracingNotifier};
pub use packer::{InstructionPacker, PackedBatch};
pub use submitter::{BatchSubmitter, SubmissionOutcome, SubmissionReport};

// Re-export key Solana types for convenience
pub use solana_client::nonblocking::rpc_client::RpcClient;
pub use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
};

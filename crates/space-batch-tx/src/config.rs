use crate::TxBatchError;
use backoff::ExponentialBackoff;
use solana_sdk::commitment_config::CommitmentConfig;
use std::time::Duration;

/// Maximum serialized transaction size accepted by the cluster (packet data size)
pub const MAX_TRANSACTION_SIZE: usize = 1232;

/// Bytes every transaction spends before its first instruction:
/// message header (3), recent blockhash (32), one signature plus its length prefix (65)
pub const BASE_TRANSACTION_SIZE: usize = 3 + 32 + 65;

/// Encoded size of one account key
pub const PUBKEY_SIZE: usize = 32;

/// Fixed per-instruction cost (the program id index)
pub const INSTRUCTION_ENVELOPE_SIZE: usize = 1;

/// How packed batches are handed to the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendMode {
    /// One batch at a time, in order. A failed batch does not stop the rest.
    #[default]
    Sequential,
    /// Up to `max_parallel_sends` batches in flight at once; outcomes keep batch order.
    Parallel,
    /// One batch at a time, skipping everything after the first failure.
    StopOnFailure,
}

/// Configuration for batch transaction operations
#[derive(Debug, Clone)]
pub struct TxBatchConfig {
    /// Maximum number of retry attempts for failed transactions
    pub max_retries: usize,

    /// Backoff strategy for retry delays
    pub retry_backoff: ExponentialBackoff,

    /// Commitment level for transaction confirmation
    pub confirmation_commitment: CommitmentConfig,

    /// Whether to skip preflight checks (simulation before sending)
    pub skip_preflight: bool,

    /// Maximum transaction size in bytes
    pub max_transaction_size_bytes: usize,

    /// Fixed envelope bytes counted before any instruction is added
    pub base_transaction_size_bytes: usize,

    /// Emit the final open batch even when it holds no instructions
    pub keep_empty_trailing_batch: bool,

    /// Sequential, parallel or stop-on-failure submission
    pub send_mode: SendMode,

    /// Maximum number of transactions to send in parallel
    pub max_parallel_sends: usize,

    /// How many times a whole batch may be submitted when it fails with a retryable error
    pub batch_retry_rounds: usize,
}

impl Default for TxBatchConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_backoff: ExponentialBackoff {
                initial_interval: Duration::from_millis(500),
                max_interval: Duration::from_secs(30),
                max_elapsed_time: Some(Duration::from_secs(300)), // 5 minutes total
                multiplier: 2.0,
                ..Default::default()
            },
            confirmation_commitment: CommitmentConfig::confirmed(),
            skip_preflight: true,
            max_transaction_size_bytes: MAX_TRANSACTION_SIZE,
            base_transaction_size_bytes: BASE_TRANSACTION_SIZE,
            keep_empty_trailing_batch: false,
            send_mode: SendMode::Sequential,
            max_parallel_sends: 4,
            batch_retry_rounds: 2,
        }
    }
}

impl TxBatchConfig {
    /// Reject settings the packer or submitter cannot work with
    pub fn validate(&self) -> Result<(), TxBatchError> {
        if self.base_transaction_size_bytes > self.max_transaction_size_bytes {
            return Err(TxBatchError::InvalidConfig(format!(
                "base transaction size {} exceeds max transaction size {}",
                self.base_transaction_size_bytes, self.max_transaction_size_bytes
            )));
        }
        if self.max_parallel_sends == 0 {
            return Err(TxBatchError::InvalidConfig(
                "max_parallel_sends must be at least 1".to_string(),
            ));
        }
        if self.batch_retry_rounds == 0 {
            return Err(TxBatchError::InvalidConfig(
                "batch_retry_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

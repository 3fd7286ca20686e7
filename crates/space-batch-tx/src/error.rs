use thiserror::Error;

/// Errors that can occur during batch transaction operations
#[derive(Error, Debug)]
pub enum TxBatchError {
    #[error("RPC client error: {0}")]
    RpcClient(#[from] solana_client::client_error::ClientError),

    #[error("Transaction failed after {retries} retries: {last_error}")]
    RetriesExhausted { retries: usize, last_error: String },

    #[error("Blockhash expired during transaction processing")]
    BlockhashExpired,

    #[error("Instruction {index} needs {size} bytes on its own (max: {max})")]
    InstructionTooLarge {
        index: usize,
        size: usize,
        max: usize,
    },

    #[error("No instructions provided")]
    NoInstructions,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to sign transaction: {0}")]
    Signing(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl TxBatchError {
    /// Whether resubmitting the whole batch may succeed.
    ///
    /// Only failures caused by the network qualify: RPC faults, expired
    /// blockhashes and exhausted confirmation retries. Program errors and
    /// packing errors do not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TxBatchError::RpcClient(_)
                | TxBatchError::RetriesExhausted { .. }
                | TxBatchError::BlockhashExpired
        )
    }
}

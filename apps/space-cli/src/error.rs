use solana_sdk::pubkey::Pubkey;
use space_batch_tx::TxBatchError;
use space_sdk::SpaceSdkError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("Batch transaction error: {0}")]
    Batch(#[from] TxBatchError),

    #[error("Spaces instruction error: {0}")]
    Sdk(#[from] SpaceSdkError),

    #[error("Failed to read keypair {0}")]
    Keypair(String),

    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    #[error("{kind} account {address} not found")]
    AccountNotFound { kind: &'static str, address: Pubkey },

    #[error("Failed to build instruction: {0}")]
    Instruction(String),

    #[error("Only {succeeded} of {total} instructions landed")]
    PartialFailure { succeeded: usize, total: usize },
}

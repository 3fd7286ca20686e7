use crate::{TxBatchConfig, TxBatchError};
use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use solana_client::{
    client_error::ClientError, nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    message::Message,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tracing::{debug, warn};

/// Backend that lands one transaction's worth of instructions on chain
///
/// Implementations own their retry and confirmation policy. The submitter
/// treats each call as a single unit of work that either lands or fails.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Sign `instructions` with `payer` (fee payer) and `signers`, send and confirm them
    async fn execute(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> Result<Signature, TxBatchError>;
}

/// Executor backed by a nonblocking Solana RPC client
pub struct RpcExecutor {
    rpc_client: Arc<RpcClient>,
    max_retries: usize,
    retry_backoff: ExponentialBackoff,
    confirmation_commitment: CommitmentConfig,
    skip_preflight: bool,
}

impl RpcExecutor {
    pub fn new(rpc_client: Arc<RpcClient>, config: &TxBatchConfig) -> Self {
        Self {
            rpc_client,
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff.clone(),
            confirmation_commitment: config.confirmation_commitment,
            skip_preflight: config.skip_preflight,
        }
    }

    pub fn rpc_client(&self) -> &Arc<RpcClient> {
        &self.rpc_client
    }
}

/// Errors worth another attempt with a fresh blockhash
fn is_transient_rpc_error(error: &str) -> bool {
    let error = error.to_lowercase();
    error.contains("blockhash")
        || error.contains("timeout")
        || error.contains("timedout")
        || error.contains("timed out")
}

/// Failed send mapped for the retry loop
///
/// Transient failures are retried until `max_retries` attempts were made. A
/// blockhash failure on the last attempt surfaces as
/// [`TxBatchError::BlockhashExpired`].
fn send_failure(error: String, attempt: usize, max_retries: usize) -> backoff::Error<TxBatchError> {
    if !is_transient_rpc_error(&error) {
        return backoff::Error::Permanent(TxBatchError::TransactionFailed(error));
    }

    if attempt < max_retries {
        return backoff::Error::Transient {
            err: TxBatchError::RetriesExhausted {
                retries: attempt,
                last_error: error,
            },
            retry_after: None,
        };
    }

    if error.to_lowercase().contains("blockhash") {
        backoff::Error::Permanent(TxBatchError::BlockhashExpired)
    } else {
        backoff::Error::Permanent(TxBatchError::RetriesExhausted {
            retries: attempt,
            last_error: error,
        })
    }
}

/// Failed blockhash fetch, retried like a transient send failure
fn blockhash_fetch_failure(
    error: ClientError,
    attempt: usize,
    max_retries: usize,
) -> backoff::Error<TxBatchError> {
    if attempt < max_retries {
        backoff::Error::Transient {
            err: TxBatchError::RpcClient(error),
            retry_after: None,
        }
    } else {
        backoff::Error::Permanent(TxBatchError::RpcClient(error))
    }
}

#[async_trait]
impl TransactionExecutor for RpcExecutor {
    async fn execute(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> Result<Signature, TxBatchError> {
        let attempts = AtomicUsize::new(0);
        let max_retries = self.max_retries.max(1);

        retry(self.retry_backoff.clone(), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;

            async move {
                // Get fresh blockhash for each attempt
                let recent_blockhash = self
                    .rpc_client
                    .get_latest_blockhash()
                    .await
                    .map_err(|e| {
                        warn!("Blockhash fetch attempt {} failed: {}", attempt, e);
                        blockhash_fetch_failure(e, attempt, max_retries)
                    })?;

                let message = Message::new_with_blockhash(
                    instructions,
                    Some(&payer.pubkey()),
                    &recent_blockhash,
                );
                let mut keypairs: Vec<&Keypair> = Vec::with_capacity(signers.len() + 1);
                keypairs.push(payer);
                keypairs.extend_from_slice(signers);

                let mut transaction = Transaction::new_unsigned(message);
                transaction
                    .try_sign(&keypairs, recent_blockhash)
                    .map_err(|e| backoff::Error::Permanent(TxBatchError::Signing(e.to_string())))?;

                let send_config = RpcSendTransactionConfig {
                    skip_preflight: self.skip_preflight,
                    ..Default::default()
                };

                match self
                    .rpc_client
                    .send_and_confirm_transaction_with_spinner_and_config(
                        &transaction,
                        self.confirmation_commitment,
                        send_config,
                    )
                    .await
                {
                    Ok(signature) => {
                        debug!("Transaction {} confirmed on attempt {}", signature, attempt);
                        Ok(signature)
                    }
                    Err(e) => {
                        let last_error = e.to_string();
                        warn!("Transaction attempt {} failed: {}", attempt, last_error);
                        Err(send_failure(last_error, attempt, max_retries))
                    }
                }
            }
        })
        .await
    }
}

use crate::{
    BatchSubmitter, InstructionPacker, Notifier, PackedBatch, RpcExecutor, SubmissionOutcome,
    SubmissionReport, TracingNotifier, TransactionExecutor, TxBatchConfig, TxBatchError,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::sync::Arc;
use tracing::{debug, info};

/// High-level client for efficient batch transaction sending
pub struct BatchTxClient<E: TransactionExecutor = RpcExecutor> {
    executor: E,
    payer: Keypair,
    config: TxBatchConfig,
    notifier: Arc<dyn Notifier>,
}

impl BatchTxClient<RpcExecutor> {
    /// Create a new client with default configuration
    pub fn new(rpc_client: Arc<RpcClient>, payer: Keypair) -> Self {
        let config = TxBatchConfig::default();
        Self {
            executor: RpcExecutor::new(rpc_client, &config),
            payer,
            config,
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Create a new client with custom configuration
    pub fn with_config(
        rpc_client: Arc<RpcClient>,
        payer: Keypair,
        config: TxBatchConfig,
    ) -> Result<Self, TxBatchError> {
        let executor = RpcExecutor::new(rpc_client, &config);
        Self::with_executor(executor, payer, config, Arc::new(TracingNotifier))
    }
}

impl<E: TransactionExecutor> BatchTxClient<E> {
    /// Create a client over any execution backend and notification sink
    pub fn with_executor(
        executor: E,
        payer: Keypair,
        config: TxBatchConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, TxBatchError> {
        config.validate()?;
        Ok(Self {
            executor,
            payer,
            config,
            notifier,
        })
    }

    /// Get the payer's public key
    pub fn payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn config(&self) -> &TxBatchConfig {
        &self.config
    }

    /// Pack instructions into transactions without sending anything
    pub fn pack(&self, instructions: Vec<Instruction>) -> Result<Vec<PackedBatch>, TxBatchError> {
        InstructionPacker::from_config(&self.config)?.pack(instructions)
    }

    /// Send instructions as one transaction, without batching
    ///
    /// The executor's own retry policy applies. A failed send is reported
    /// through the notifier and the returned outcome, not as an error.
    pub async fn send_transaction(
        &self,
        instructions: Vec<Instruction>,
        name: &str,
        signers: &[&Keypair],
    ) -> Result<SubmissionOutcome, TxBatchError> {
        if instructions.is_empty() {
            return Err(TxBatchError::NoInstructions);
        }

        let operation_count = instructions.len();
        let outcome = match self
            .executor
            .execute(&instructions, &self.payer, signers)
            .await
        {
            Ok(signature) => {
                self.notifier.notify(&format!("{} succeeded", name));
                SubmissionOutcome {
                    success: true,
                    attempts: 1,
                    operation_count,
                    signature: Some(signature),
                    error: None,
                }
            }
            Err(e) => {
                self.notifier.notify(&format!("{} failed", name));
                SubmissionOutcome {
                    success: false,
                    attempts: 1,
                    operation_count,
                    signature: None,
                    error: Some(e.to_string()),
                }
            }
        };

        Ok(outcome)
    }

    /// Greedily pack instructions into transactions and send them all
    ///
    /// Packing errors are returned; submission failures are reported per batch
    /// and summarised through the notifier unless `show_notify` is false.
    pub async fn send_instructions_greedy_batch(
        &self,
        instructions: Vec<Instruction>,
        name: &str,
        show_notify: bool,
    ) -> Result<SubmissionReport, TxBatchError> {
        let batches = self.pack(instructions)?;
        debug!("Num transactions {}", batches.len());

        let report = BatchSubmitter::new(&self.executor, &self.config)
            .submit(&batches, &self.payer, &[])
            .await;

        info!(
            "{}: {} of {} instructions landed in {} transactions",
            name,
            report.succeeded(),
            report.total(),
            batches.len()
        );
        if show_notify {
            self.notifier.notify(&report.summary(name));
        }

        Ok(report)
    }
}

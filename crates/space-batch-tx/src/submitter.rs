use crate::{PackedBatch, SendMode, TransactionExecutor, TxBatchConfig};
use futures::future::join_all;
use solana_sdk::signature::{Keypair, Signature};
use tracing::{info, warn};

/// Result of submitting one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub success: bool,
    /// Times the whole batch was handed to the executor (0 if never sent)
    pub attempts: usize,
    /// Instructions carried by the batch
    pub operation_count: usize,
    pub signature: Option<Signature>,
    pub error: Option<String>,
}

impl SubmissionOutcome {
    fn succeeded(signature: Signature, attempts: usize, operation_count: usize) -> Self {
        Self {
            success: true,
            attempts,
            operation_count,
            signature: Some(signature),
            error: None,
        }
    }

    fn failed(error: String, attempts: usize, operation_count: usize) -> Self {
        Self {
            success: false,
            attempts,
            operation_count,
            signature: None,
            error: Some(error),
        }
    }

    fn empty() -> Self {
        Self {
            success: true,
            attempts: 0,
            operation_count: 0,
            signature: None,
            error: None,
        }
    }
}

/// Per-batch outcomes in batch order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub outcomes: Vec<SubmissionOutcome>,
}

impl SubmissionReport {
    /// Instructions in batches that landed
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.success)
            .map(|outcome| outcome.operation_count)
            .sum()
    }

    /// Instructions across all batches
    pub fn total(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| outcome.operation_count)
            .sum()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.success)
    }

    pub fn signatures(&self) -> Vec<Signature> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.signature)
            .collect()
    }

    /// Human-readable summary handed to the notifier
    pub fn summary(&self, name: &str) -> String {
        format!(
            "{} succeeded for {} out of {} instructions",
            name,
            self.succeeded(),
            self.total()
        )
    }
}

impl FromIterator<SubmissionOutcome> for SubmissionReport {
    fn from_iter<I: IntoIterator<Item = SubmissionOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// Submits packed batches as independent transactions
pub struct BatchSubmitter<'a, E: TransactionExecutor + ?Sized> {
    executor: &'a E,
    config: &'a TxBatchConfig,
}

impl<'a, E: TransactionExecutor + ?Sized> BatchSubmitter<'a, E> {
    pub fn new(executor: &'a E, config: &'a TxBatchConfig) -> Self {
        Self { executor, config }
    }

    /// Submit every batch and report one outcome per batch, in order
    ///
    /// Never fails as a whole; per-batch errors end up in the outcomes.
    pub async fn submit(
        &self,
        batches: &[PackedBatch],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> SubmissionReport {
        match self.config.send_mode {
            SendMode::Sequential => self.submit_sequential(batches, payer, signers, false).await,
            SendMode::StopOnFailure => self.submit_sequential(batches, payer, signers, true).await,
            SendMode::Parallel => self.submit_parallel(batches, payer, signers).await,
        }
    }

    async fn submit_sequential(
        &self,
        batches: &[PackedBatch],
        payer: &Keypair,
        signers: &[&Keypair],
        stop_on_failure: bool,
    ) -> SubmissionReport {
        let mut outcomes = Vec::with_capacity(batches.len());
        let mut failed_at: Option<usize> = None;

        for (index, batch) in batches.iter().enumerate() {
            if let Some(failed) = failed_at {
                outcomes.push(SubmissionOutcome::failed(
                    format!("not sent after transaction {} failed", failed),
                    0,
                    batch.len(),
                ));
                continue;
            }

            info!(
                "Sending transaction {} of {} ({} instructions)",
                index + 1,
                batches.len(),
                batch.len()
            );
            let outcome = self.submit_batch(index, batch, payer, signers).await;
            if !outcome.success && stop_on_failure {
                warn!(
                    "Stopping after transaction {}; {} transactions not sent",
                    index + 1,
                    batches.len() - index - 1
                );
                failed_at = Some(index + 1);
            }
            outcomes.push(outcome);
        }

        SubmissionReport { outcomes }
    }

    async fn submit_parallel(
        &self,
        batches: &[PackedBatch],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> SubmissionReport {
        let chunk_size = self.config.max_parallel_sends.max(1);
        let chunk_count = batches.len().div_ceil(chunk_size);
        let mut outcomes = Vec::with_capacity(batches.len());

        for (chunk_idx, chunk) in batches.chunks(chunk_size).enumerate() {
            info!(
                "Sending batch {} of {} ({} transactions)",
                chunk_idx + 1,
                chunk_count,
                chunk.len()
            );

            let chunk_futures = chunk.iter().enumerate().map(|(tx_idx, batch)| {
                let overall_idx = chunk_idx * chunk_size + tx_idx;
                self.submit_batch(overall_idx, batch, payer, signers)
            });

            outcomes.extend(join_all(chunk_futures).await);
        }

        SubmissionReport { outcomes }
    }

    /// Submit one batch, resubmitting it whole while the failure is retryable
    async fn submit_batch(
        &self,
        index: usize,
        batch: &PackedBatch,
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> SubmissionOutcome {
        if batch.is_empty() {
            return SubmissionOutcome::empty();
        }

        let rounds = self.config.batch_retry_rounds.max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self
                .executor
                .execute(batch.instructions(), payer, signers)
                .await
            {
                Ok(signature) => {
                    return SubmissionOutcome::succeeded(signature, attempts, batch.len());
                }
                Err(e) if e.is_retryable() && attempts < rounds => {
                    warn!(
                        "Transaction {} failed on round {} of {}, resubmitting: {}",
                        index + 1,
                        attempts,
                        rounds,
                        e
                    );
                }
                Err(e) => {
                    warn!(
                        "Transaction {} failed after {} rounds: {}",
                        index + 1,
                        attempts,
                        e
                    );
                    return SubmissionOutcome::failed(e.to_string(), attempts, batch.len());
                }
            }
        }
    }
}

use crate::error::CliResult;
use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentConfig;
use space_batch_tx::{SendMode, TxBatchConfig};
use std::path::Path;

/// Batch sending settings file structure (YAML)
///
/// Every field is optional; missing fields keep the library defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchSettings {
    /// Retry attempts per transaction inside the RPC executor
    pub max_retries: usize,

    /// Maximum serialized transaction size in bytes
    pub max_transaction_size_bytes: usize,

    /// Envelope bytes counted before any instruction
    pub base_transaction_size_bytes: usize,

    pub send_mode: SendModeSetting,

    /// Transactions in flight at once in parallel mode
    pub max_parallel_sends: usize,

    /// Times a whole transaction may be resubmitted after a network failure
    pub batch_retry_rounds: usize,

    pub skip_preflight: bool,

    pub commitment: CommitmentSetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SendModeSetting {
    Sequential,
    Parallel,
    StopOnFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentSetting {
    Processed,
    Confirmed,
    Finalized,
}

impl Default for BatchSettings {
    fn default() -> Self {
        let defaults = TxBatchConfig::default();
        Self {
            max_retries: defaults.max_retries,
            max_transaction_size_bytes: defaults.max_transaction_size_bytes,
            base_transaction_size_bytes: defaults.base_transaction_size_bytes,
            send_mode: SendModeSetting::Sequential,
            max_parallel_sends: defaults.max_parallel_sends,
            batch_retry_rounds: defaults.batch_retry_rounds,
            skip_preflight: defaults.skip_preflight,
            commitment: CommitmentSetting::Confirmed,
        }
    }
}

impl BatchSettings {
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn into_config(self) -> TxBatchConfig {
        TxBatchConfig {
            max_retries: self.max_retries,
            max_transaction_size_bytes: self.max_transaction_size_bytes,
            base_transaction_size_bytes: self.base_transaction_size_bytes,
            send_mode: match self.send_mode {
                SendModeSetting::Sequential => SendMode::Sequential,
                SendModeSetting::Parallel => SendMode::Parallel,
                SendModeSetting::StopOnFailure => SendMode::StopOnFailure,
            },
            max_parallel_sends: self.max_parallel_sends,
            batch_retry_rounds: self.batch_retry_rounds,
            skip_preflight: self.skip_preflight,
            confirmation_commitment: match self.commitment {
                CommitmentSetting::Processed => CommitmentConfig::processed(),
                CommitmentSetting::Confirmed => CommitmentConfig::confirmed(),
                CommitmentSetting::Finalized => CommitmentConfig::finalized(),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: BatchSettings =
            serde_yaml::from_str("send_mode: stop-on-failure\nbatch_retry_rounds: 1\n").unwrap();

        assert_eq!(settings.send_mode, SendModeSetting::StopOnFailure);
        assert_eq!(settings.batch_retry_rounds, 1);
        assert_eq!(settings.max_transaction_size_bytes, 1232);

        let config = settings.into_config();
        assert_eq!(config.send_mode, SendMode::StopOnFailure);
        assert_eq!(config.confirmation_commitment, CommitmentConfig::confirmed());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: Result<BatchSettings, _> = serde_yaml::from_str("max_parallel: 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "send_mode: parallel").unwrap();
        writeln!(file, "max_parallel_sends: 8").unwrap();
        writeln!(file, "commitment: finalized").unwrap();

        let config = BatchSettings::load(file.path()).unwrap().into_config();
        assert_eq!(config.send_mode, SendMode::Parallel);
        assert_eq!(config.max_parallel_sends, 8);
        assert_eq!(config.confirmation_commitment, CommitmentConfig::finalized());
    }
}

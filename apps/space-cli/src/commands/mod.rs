pub mod accept_offers;
pub mod accept_rents;
pub mod change_colors;
pub mod change_offers;
pub mod send_all_nfts;
pub mod set_rents;

use crate::config::BatchSettings;
use crate::error::{CliError, CliResult};
use clap::Args;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::read_keypair_file};
use space_batch_tx::{BatchTxClient, PackedBatch, TxBatchConfig};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};
use tracing::debug;

/// getMultipleAccounts limit
const MAX_ACCOUNTS_PER_REQUEST: usize = 100;

/// Options shared by every command that sends transactions
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Wallet keypair file, also the fee payer
    #[arg(short, long)]
    pub keypair: PathBuf,

    /// Solana RPC URL
    #[arg(short, long, default_value = "https://api.devnet.solana.com")]
    pub rpc_url: String,

    /// Batch settings file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the transaction plan without sending anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Input of the commands acting on spaces
#[derive(Args, Debug)]
pub struct SpaceActionArgs {
    /// YAML list of actions
    #[arg(short, long)]
    pub file: PathBuf,

    /// Spaces base account
    #[arg(long, default_value_t = space_sdk::BASE)]
    pub base: Pubkey,
}

impl SendArgs {
    /// RPC client plus a batch client paying with the wallet keypair
    pub fn connect(&self) -> CliResult<(Arc<RpcClient>, BatchTxClient)> {
        let wallet = read_keypair_file(&self.keypair)
            .map_err(|e| CliError::Keypair(format!("{}: {}", self.keypair.display(), e)))?;

        let tx_config = match &self.config {
            Some(path) => BatchSettings::load(path)?.into_config(),
            None => TxBatchConfig::default(),
        };

        let rpc_client = Arc::new(RpcClient::new(self.rpc_url.clone()));
        let client = BatchTxClient::with_config(rpc_client.clone(), wallet, tx_config)?;
        Ok((rpc_client, client))
    }
}

pub fn load_entries<T: DeserializeOwned>(path: &Path) -> CliResult<Vec<T>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Base58 pubkey field in an actions file
pub fn deserialize_pubkey<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
    let value = String::deserialize(deserializer)?;
    Pubkey::from_str(&value).map_err(serde::de::Error::custom)
}

/// Data of the given accounts; closed or missing accounts are left out
pub async fn fetch_account_data(
    rpc_client: &RpcClient,
    addresses: &[Pubkey],
) -> CliResult<HashMap<Pubkey, Vec<u8>>> {
    let mut found = HashMap::with_capacity(addresses.len());
    for chunk in addresses.chunks(MAX_ACCOUNTS_PER_REQUEST) {
        let accounts = rpc_client.get_multiple_accounts(chunk).await?;
        for (address, account) in chunk.iter().zip(accounts) {
            if let Some(account) = account {
                found.insert(*address, account.data);
            }
        }
    }
    debug!("Fetched {} of {} accounts", found.len(), addresses.len());
    Ok(found)
}

/// Distinct addresses in first-seen order
pub fn distinct(addresses: impl IntoIterator<Item = Pubkey>) -> Vec<Pubkey> {
    let mut unique = Vec::new();
    for address in addresses {
        if !unique.contains(&address) {
            unique.push(address);
        }
    }
    unique
}

/// Print the packing plan on a dry run, otherwise send greedily and fail on partial success
pub async fn send_or_plan(
    client: &BatchTxClient,
    instructions: Vec<Instruction>,
    name: &str,
    dry_run: bool,
) -> CliResult<()> {
    if instructions.is_empty() {
        println!("Nothing to send");
        return Ok(());
    }

    if dry_run {
        let batches = client.pack(instructions)?;
        print_plan(&batches);
        return Ok(());
    }

    let report = client
        .send_instructions_greedy_batch(instructions, name, true)
        .await?;

    for signature in report.signatures() {
        println!("SIGNATURE {}", signature);
    }

    if !report.all_succeeded() {
        return Err(CliError::PartialFailure {
            succeeded: report.succeeded(),
            total: report.total(),
        });
    }
    Ok(())
}

fn print_plan(batches: &[PackedBatch]) {
    let total: usize = batches.iter().map(PackedBatch::len).sum();
    println!(
        "{} instructions would be sent in {} transactions",
        total,
        batches.len()
    );
    for (index, batch) in batches.iter().enumerate() {
        println!(
            "  #{:<4} {:>3} instructions {:>3} accounts {:>5} bytes",
            index + 1,
            batch.len(),
            batch.account_count(),
            batch.encoded_size()
        );
    }
}

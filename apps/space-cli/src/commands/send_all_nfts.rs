use super::{fetch_account_data, send_or_plan, SendArgs};
use crate::error::{CliError, CliResult};
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_request::TokenAccountsFilter};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use spl_token::{solana_program::program_pack::Pack, state::Account as TokenAccount};
use std::str::FromStr;
use tracing::info;

pub async fn execute(send: SendArgs, destination: Pubkey) -> CliResult<()> {
    let (rpc_client, client) = send.connect()?;
    let owner = client.payer_pubkey();

    let token_accounts = fetch_token_accounts(&rpc_client, &owner).await?;
    info!(
        "Found {} token accounts owned by {}",
        token_accounts.len(),
        owner
    );

    let instructions = nft_transfer_instructions(&owner, &destination, &token_accounts)?;
    println!("This account has {} NFTs", instructions.len() / 2);

    send_or_plan(&client, instructions, "Send all NFTs", send.dry_run).await
}

/// SPL token accounts owned by `owner`, decoded
async fn fetch_token_accounts(
    rpc_client: &RpcClient,
    owner: &Pubkey,
) -> CliResult<Vec<(Pubkey, TokenAccount)>> {
    let keyed_accounts = rpc_client
        .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(spl_token::id()))
        .await?;

    let addresses = keyed_accounts
        .iter()
        .map(|keyed| {
            Pubkey::from_str(&keyed.pubkey)
                .map_err(|e| CliError::InvalidAccountData(format!("{}: {}", keyed.pubkey, e)))
        })
        .collect::<CliResult<Vec<_>>>()?;

    // accounts closed since the owner query drop out
    let data = fetch_account_data(rpc_client, &addresses).await?;
    addresses
        .iter()
        .filter_map(|address| data.get(address).map(|bytes| (address, bytes)))
        .map(|(address, bytes)| {
            TokenAccount::unpack(bytes)
                .map(|account| (*address, account))
                .map_err(|e| CliError::InvalidAccountData(format!("{}: {}", address, e)))
        })
        .collect()
}

/// Two instructions per NFT: create the destination's associated token account
/// if missing, then move the single token into it
pub fn nft_transfer_instructions(
    owner: &Pubkey,
    destination: &Pubkey,
    token_accounts: &[(Pubkey, TokenAccount)],
) -> CliResult<Vec<Instruction>> {
    let mut instructions = Vec::new();

    let nfts = token_accounts
        .iter()
        .filter(|(_, account)| account.amount == 1 && !account.is_frozen());

    for (address, account) in nfts {
        let destination_ata = get_associated_token_address(destination, &account.mint);
        instructions.push(create_associated_token_account_idempotent(
            owner,
            destination,
            &account.mint,
            &spl_token::id(),
        ));
        instructions.push(
            spl_token::instruction::transfer(
                &spl_token::id(),
                address,
                &destination_ata,
                owner,
                &[],
                1,
            )
            .map_err(|e| CliError::Instruction(e.to_string()))?,
        );
    }

    Ok(instructions)
}

use clap::{Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use commands::{SendArgs, SpaceActionArgs};
use error::CliResult;

#[derive(Parser)]
#[command(name = "space")]
#[command(about = "Spaces CLI - batch Spaces instructions into Solana transactions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transfer every NFT held by a wallet to another wallet
    SendAllNfts {
        #[command(flatten)]
        send: SendArgs,

        /// Wallet receiving the NFTs
        #[arg(short, long)]
        destination: Pubkey,
    },

    /// Repaint spaces listed in a YAML file
    ChangeColors {
        #[command(flatten)]
        send: SendArgs,

        #[command(flatten)]
        action: SpaceActionArgs,
    },

    /// List or delist spaces for sale
    ChangeOffers {
        #[command(flatten)]
        send: SendArgs,

        #[command(flatten)]
        action: SpaceActionArgs,
    },

    /// Buy listed spaces
    AcceptOffers {
        #[command(flatten)]
        send: SendArgs,

        #[command(flatten)]
        action: SpaceActionArgs,
    },

    /// Offer spaces for rent
    SetRents {
        #[command(flatten)]
        send: SendArgs,

        #[command(flatten)]
        action: SpaceActionArgs,
    },

    /// Rent spaces offered by other players
    AcceptRents {
        #[command(flatten)]
        send: SendArgs,

        #[command(flatten)]
        action: SpaceActionArgs,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::SendAllNfts { send, destination } => {
            commands::send_all_nfts::execute(send, destination).await
        }
        Commands::ChangeColors { send, action } => {
            commands::change_colors::execute(send, action).await
        }
        Commands::ChangeOffers { send, action } => {
            commands::change_offers::execute(send, action).await
        }
        Commands::AcceptOffers { send, action } => {
            commands::accept_offers::execute(send, action).await
        }
        Commands::SetRents { send, action } => commands::set_rents::execute(send, action).await,
        Commands::AcceptRents { send, action } => {
            commands::accept_rents::execute(send, action).await
        }
    }
}

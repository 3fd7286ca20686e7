use solana_sdk::pubkey::Pubkey;

pub const SPACE_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("XSPCZghPXkWTWpvrfQ34Szpx3rwmUjsxebRFf5ckbMD");
pub const COLOR_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("XCLReS3yMKtcHWJxW8HX8yr6YmY8rwTaS5NUmVk21mM");
pub const RENT_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("XRNTtrxNf3Y2pAyi2bKkngYpuRxRouTkTQ1bNro3KGx");

/// Mainnet base account of the Spaces world
pub const BASE: Pubkey = solana_sdk::pubkey!("XBSEZzB7ojaKgXqfCSpNbPLnuMGk3JVtSKYjXYqg7Pn");

/// Spaces per neighborhood side
pub const NEIGHBORHOOD_SIZE: i64 = 200;

pub const SPACE_METADATA_SEED: &[u8] = b"space_metadata";
pub const SELL_DELEGATE_SEED: &[u8] = b"sell_delegate";
pub const NEIGHBORHOOD_METADATA_SEED: &[u8] = b"neighborhood_metadata";
pub const NEIGHBORHOOD_FRAME_BASE_SEED: &[u8] = b"neighborhood_frame_base";
pub const NEIGHBORHOOD_FRAME_POINTER_SEED: &[u8] = b"neighborhood_frame_pointer";
pub const RENT_ACCOUNT_SEED: &[u8] = b"rent_account";

use crate::{
    COLOR_PROGRAM_ID, NEIGHBORHOOD_FRAME_BASE_SEED, NEIGHBORHOOD_FRAME_POINTER_SEED,
    NEIGHBORHOOD_METADATA_SEED, NEIGHBORHOOD_SIZE, RENT_ACCOUNT_SEED, RENT_PROGRAM_ID,
    SELL_DELEGATE_SEED, SPACE_METADATA_SEED, SPACE_PROGRAM_ID,
};
use solana_sdk::pubkey::Pubkey;

/// Neighborhood containing space `(x, y)`, rounding towards negative infinity
pub fn neighborhood_of(x: i64, y: i64) -> (i64, i64) {
    (x.div_euclid(NEIGHBORHOOD_SIZE), y.div_euclid(NEIGHBORHOOD_SIZE))
}

pub fn find_space_metadata_address(base: &Pubkey, x: i64, y: i64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            base.as_ref(),
            SPACE_METADATA_SEED,
            &x.to_le_bytes(),
            &y.to_le_bytes(),
        ],
        &SPACE_PROGRAM_ID,
    )
}

pub fn find_sell_delegate_address(base: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[base.as_ref(), SELL_DELEGATE_SEED], &SPACE_PROGRAM_ID)
}

pub fn find_neighborhood_metadata_address(
    base: &Pubkey,
    neighborhood_x: i64,
    neighborhood_y: i64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            base.as_ref(),
            NEIGHBORHOOD_METADATA_SEED,
            &neighborhood_x.to_le_bytes(),
            &neighborhood_y.to_le_bytes(),
        ],
        &SPACE_PROGRAM_ID,
    )
}

pub fn find_neighborhood_frame_base_address(
    base: &Pubkey,
    neighborhood_x: i64,
    neighborhood_y: i64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            base.as_ref(),
            NEIGHBORHOOD_FRAME_BASE_SEED,
            &neighborhood_x.to_le_bytes(),
            &neighborhood_y.to_le_bytes(),
        ],
        &COLOR_PROGRAM_ID,
    )
}

/// Pointer from a neighborhood frame to the colour cluster holding its pixels
pub fn find_neighborhood_frame_pointer_address(
    base: &Pubkey,
    neighborhood_x: i64,
    neighborhood_y: i64,
    frame: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            base.as_ref(),
            NEIGHBORHOOD_FRAME_POINTER_SEED,
            &neighborhood_x.to_le_bytes(),
            &neighborhood_y.to_le_bytes(),
            &frame.to_le_bytes(),
        ],
        &COLOR_PROGRAM_ID,
    )
}

pub fn find_rent_account_address(base: &Pubkey, x: i64, y: i64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            base.as_ref(),
            RENT_ACCOUNT_SEED,
            &x.to_le_bytes(),
            &y.to_le_bytes(),
        ],
        &RENT_PROGRAM_ID,
    )
}

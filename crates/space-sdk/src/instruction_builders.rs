use crate::{
    find_neighborhood_frame_base_address, find_neighborhood_frame_pointer_address,
    find_neighborhood_metadata_address, find_rent_account_address, find_sell_delegate_address,
    find_space_metadata_address, neighborhood_of, SpaceSdkError, COLOR_PROGRAM_ID,
    RENT_PROGRAM_ID, SPACE_PROGRAM_ID,
};
use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};
use spl_associated_token_account::get_associated_token_address;

const CHANGE_COLOR_BRIEF_TAG: u8 = 2;
const CHANGE_OFFER_TAG: u8 = 3;
const ACCEPT_OFFER_TAG: u8 = 4;
const SET_RENT_TAG: u8 = 0;
const ACCEPT_RENT_TAG: u8 = 1;

/// Tag byte followed by the borsh-encoded arguments
fn instruction_data<T: BorshSerialize>(tag: u8, args: &T) -> Result<Vec<u8>, SpaceSdkError> {
    let mut data = vec![tag];
    args.serialize(&mut data)?;
    Ok(data)
}

#[derive(BorshSerialize)]
struct ChangeColorBriefData {
    space_x: i16,
    space_y: i16,
    frame: u8,
    r: u8,
    g: u8,
    b: u8,
}

#[derive(BorshSerialize)]
struct ChangeOfferData {
    space_x: i64,
    space_y: i64,
    price: u64,
    create: bool,
}

#[derive(BorshSerialize)]
struct AcceptOfferData {
    space_x: i64,
    space_y: i64,
    price: u64,
}

#[derive(BorshSerialize)]
struct SetRentData {
    space_x: i64,
    space_y: i64,
    price: u64,
    min_duration: u64,
    max_duration: u64,
    max_timestamp: u64,
    create: bool,
}

#[derive(BorshSerialize)]
struct AcceptRentData {
    space_x: i64,
    space_y: i64,
    price: u64,
    rent_time: u64,
}

/// Repaint one space in a given frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeColorArgs {
    pub x: i64,
    pub y: i64,
    pub frame: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub space_mint: Pubkey,
}

/// List (or delist, with `create: false`) a space for sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOfferArgs {
    pub x: i64,
    pub y: i64,
    pub mint: Pubkey,
    /// Lamports
    pub price: u64,
    pub create: bool,
}

/// Buy a listed space from `seller`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptOfferArgs {
    pub x: i64,
    pub y: i64,
    pub mint: Pubkey,
    /// Lamports
    pub price: u64,
    pub seller: Pubkey,
}

/// Offer a space for rent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRentArgs {
    pub x: i64,
    pub y: i64,
    pub mint: Pubkey,
    /// Lamports per second
    pub price: u64,
    pub min_duration: u64,
    pub max_duration: u64,
    /// Unix timestamp the rental must end by
    pub max_timestamp: u64,
    pub create: bool,
}

/// Rent a space offered by `seller`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptRentArgs {
    pub x: i64,
    pub y: i64,
    pub mint: Pubkey,
    pub price: u64,
    /// Seconds
    pub rent_time: u64,
    pub seller: Pubkey,
}

/// Colour program instruction repainting one space
///
/// `color_cluster` is the account the neighborhood frame pointer refers to
/// (see [`crate::frame_color_cluster`]). Coordinates travel as 16-bit values.
pub fn build_change_color_ix(
    wallet: &Pubkey,
    base: &Pubkey,
    color_cluster: &Pubkey,
    args: &ChangeColorArgs,
) -> Result<Instruction, SpaceSdkError> {
    let out_of_range = || SpaceSdkError::CoordinateOutOfRange {
        x: args.x,
        y: args.y,
    };
    let space_x = i16::try_from(args.x).map_err(|_| out_of_range())?;
    let space_y = i16::try_from(args.y).map_err(|_| out_of_range())?;

    let (neighborhood_x, neighborhood_y) = neighborhood_of(args.x, args.y);
    let (space_metadata, _) = find_space_metadata_address(base, args.x, args.y);
    let (frame_base, _) = find_neighborhood_frame_base_address(base, neighborhood_x, neighborhood_y);
    let (frame_pointer, _) = find_neighborhood_frame_pointer_address(
        base,
        neighborhood_x,
        neighborhood_y,
        u64::from(args.frame),
    );
    let (neighborhood_metadata, _) =
        find_neighborhood_metadata_address(base, neighborhood_x, neighborhood_y);
    let space_ata = get_associated_token_address(wallet, &args.space_mint);

    let data = instruction_data(
        CHANGE_COLOR_BRIEF_TAG,
        &ChangeColorBriefData {
            space_x,
            space_y,
            frame: args.frame,
            r: args.r,
            g: args.g,
            b: args.b,
        },
    )?;

    Ok(Instruction {
        program_id: COLOR_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*base, false),
            AccountMeta::new(*color_cluster, false),
            AccountMeta::new_readonly(frame_base, false),
            AccountMeta::new_readonly(frame_pointer, false),
            AccountMeta::new_readonly(neighborhood_metadata, false),
            AccountMeta::new_readonly(space_metadata, false),
            AccountMeta::new_readonly(*wallet, true),
            AccountMeta::new_readonly(space_ata, false),
        ],
        data,
    })
}

pub fn build_change_offer_ix(
    wallet: &Pubkey,
    base: &Pubkey,
    args: &ChangeOfferArgs,
) -> Result<Instruction, SpaceSdkError> {
    let (space_metadata, _) = find_space_metadata_address(base, args.x, args.y);
    let (sell_delegate, _) = find_sell_delegate_address(base);
    let owner_ata = get_associated_token_address(wallet, &args.mint);

    let data = instruction_data(
        CHANGE_OFFER_TAG,
        &ChangeOfferData {
            space_x: args.x,
            space_y: args.y,
            price: args.price,
            create: args.create,
        },
    )?;

    Ok(Instruction {
        program_id: SPACE_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*base, false),
            AccountMeta::new(space_metadata, false),
            AccountMeta::new_readonly(*wallet, true),
            AccountMeta::new(owner_ata, false),
            AccountMeta::new_readonly(sell_delegate, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data,
    })
}

/// Space program instruction buying a listed space
///
/// The marketplace fee goes to `neighborhood_creator` (see
/// [`crate::neighborhood_creator`]).
pub fn build_accept_offer_ix(
    wallet: &Pubkey,
    base: &Pubkey,
    neighborhood_creator: &Pubkey,
    args: &AcceptOfferArgs,
) -> Result<Instruction, SpaceSdkError> {
    let (neighborhood_x, neighborhood_y) = neighborhood_of(args.x, args.y);
    let (neighborhood_metadata, _) =
        find_neighborhood_metadata_address(base, neighborhood_x, neighborhood_y);
    let (space_metadata, _) = find_space_metadata_address(base, args.x, args.y);
    let (sell_delegate, _) = find_sell_delegate_address(base);
    let buyer_ata = get_associated_token_address(wallet, &args.mint);
    let seller_ata = get_associated_token_address(&args.seller, &args.mint);

    let data = instruction_data(
        ACCEPT_OFFER_TAG,
        &AcceptOfferData {
            space_x: args.x,
            space_y: args.y,
            price: args.price,
        },
    )?;

    Ok(Instruction {
        program_id: SPACE_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*base, false),
            AccountMeta::new_readonly(neighborhood_metadata, false),
            AccountMeta::new(*neighborhood_creator, false),
            AccountMeta::new(space_metadata, false),
            AccountMeta::new_readonly(args.mint, false),
            AccountMeta::new(*wallet, true),
            AccountMeta::new(buyer_ata, false),
            AccountMeta::new(args.seller, false),
            AccountMeta::new(seller_ata, false),
            AccountMeta::new_readonly(sell_delegate, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data,
    })
}

pub fn build_set_rent_ix(
    wallet: &Pubkey,
    base: &Pubkey,
    args: &SetRentArgs,
) -> Result<Instruction, SpaceSdkError> {
    let (space_metadata, _) = find_space_metadata_address(base, args.x, args.y);
    let (rent_account, _) = find_rent_account_address(base, args.x, args.y);
    let owner_ata = get_associated_token_address(wallet, &args.mint);

    let data = instruction_data(
        SET_RENT_TAG,
        &SetRentData {
            space_x: args.x,
            space_y: args.y,
            price: args.price,
            min_duration: args.min_duration,
            max_duration: args.max_duration,
            max_timestamp: args.max_timestamp,
            create: args.create,
        },
    )?;

    Ok(Instruction {
        program_id: RENT_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*base, false),
            AccountMeta::new_readonly(space_metadata, false),
            AccountMeta::new(rent_account, false),
            AccountMeta::new_readonly(*wallet, true),
            AccountMeta::new(owner_ata, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

pub fn build_accept_rent_ix(
    wallet: &Pubkey,
    base: &Pubkey,
    args: &AcceptRentArgs,
) -> Result<Instruction, SpaceSdkError> {
    let (space_metadata, _) = find_space_metadata_address(base, args.x, args.y);
    let (rent_account, _) = find_rent_account_address(base, args.x, args.y);
    let seller_ata = get_associated_token_address(&args.seller, &args.mint);

    let data = instruction_data(
        ACCEPT_RENT_TAG,
        &AcceptRentData {
            space_x: args.x,
            space_y: args.y,
            price: args.price,
            rent_time: args.rent_time,
        },
    )?;

    Ok(Instruction {
        program_id: RENT_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*base, false),
            AccountMeta::new_readonly(space_metadata, false),
            AccountMeta::new(rent_account, false),
            AccountMeta::new(*wallet, true),
            AccountMeta::new(args.seller, false),
            AccountMeta::new(seller_ata, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

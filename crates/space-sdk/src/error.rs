use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpaceSdkError {
    #[error("Failed to encode instruction data: {0}")]
    Encoding(#[from] std::io::Error),

    #[error("Space ({x}, {y}) does not fit a 16-bit colour change")]
    CoordinateOutOfRange { x: i64, y: i64 },

    #[error("{account} account data is {len} bytes, too short to decode")]
    AccountDataTooShort { account: &'static str, len: usize },
}

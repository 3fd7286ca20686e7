use crate::SpaceSdkError;
use solana_sdk::pubkey::Pubkey;

/// Both layouts lead with a one-byte bump seed
const KEY_OFFSET: usize = 1;

fn pubkey_at(data: &[u8], account: &'static str) -> Result<Pubkey, SpaceSdkError> {
    data.get(KEY_OFFSET..KEY_OFFSET + 32)
        .and_then(|bytes| Pubkey::try_from(bytes).ok())
        .ok_or(SpaceSdkError::AccountDataTooShort {
            account,
            len: data.len(),
        })
}

/// Creator of a neighborhood, read from its metadata account
pub fn neighborhood_creator(data: &[u8]) -> Result<Pubkey, SpaceSdkError> {
    pubkey_at(data, "neighborhood metadata")
}

/// Colour cluster a neighborhood frame pointer account refers to
pub fn frame_color_cluster(data: &[u8]) -> Result<Pubkey, SpaceSdkError> {
    pubkey_at(data, "frame pointer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_key_after_bump() {
        let creator = Pubkey::new_unique();
        let mut data = vec![254u8];
        data.extend_from_slice(creator.as_ref());
        data.extend_from_slice(&[0u8; 160]);

        assert_eq!(neighborhood_creator(&data).unwrap(), creator);
        assert_eq!(frame_color_cluster(&data[..33]).unwrap(), creator);
    }

    #[test]
    fn test_short_account_data_is_rejected() {
        let err = frame_color_cluster(&[1u8; 20]).unwrap_err();
        assert!(matches!(
            err,
            SpaceSdkError::AccountDataTooShort {
                account: "frame pointer",
                len: 20
            }
        ));
    }
}

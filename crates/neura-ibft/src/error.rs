use thiserror::Error;

/// Sentinel carried through `alloy_rlp::Error::Custom` when a nested signed
/// payload decodes cleanly but its signature does not recover to an address.
pub(crate) const AUTHENTICATION_FAILED: &str = "signed payload failed authentication";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IbftError {
    #[error("Message authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("RLP decoding failed: {0}")]
    RlpDecodingError(String),
    #[error("Invalid message type: {0}")]
    InvalidMessageType(u8),
    #[error("Block creation error: {0}")]
    BlockCreationError(String),
    #[error("Block import failed: {0}")]
    BlockImportFailed(String),
    #[error("Crypto operation failed: {0}")]
    CryptoError(String),
    #[error("No validators available to select proposer")]
    NoValidators,
    #[error("Validator set unavailable: {0}")]
    ValidatorSetUnavailable(String),
    #[error("Event queue is full")]
    EventQueueFull,
    #[error("Event queue is closed")]
    EventQueueClosed,
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl IbftError {
    /// Authentication and decode failures mean the input is discarded; they say
    /// nothing about the protocol state.
    pub fn is_discardable_input(&self) -> bool {
        matches!(
            self,
            IbftError::AuthenticationFailed(_)
                | IbftError::RlpDecodingError(_)
                | IbftError::InvalidMessageType(_)
        )
    }
}

impl From<alloy_rlp::Error> for IbftError {
    fn from(err: alloy_rlp::Error) -> Self {
        match err {
            alloy_rlp::Error::Custom(msg) if msg == AUTHENTICATION_FAILED => {
                IbftError::AuthenticationFailed(msg.to_string())
            }
            other => IbftError::RlpDecodingError(other.to_string()),
        }
    }
}

// Helper to convert k256::ecdsa::Error to IbftError
impl From<k256::ecdsa::Error> for IbftError {
    fn from(err: k256::ecdsa::Error) -> Self {
        IbftError::CryptoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_sentinel_maps_to_authentication_error() {
        let err: IbftError = alloy_rlp::Error::Custom(AUTHENTICATION_FAILED).into();
        assert!(matches!(err, IbftError::AuthenticationFailed(_)));
        assert!(err.is_discardable_input());
    }

    #[test]
    fn other_rlp_errors_map_to_decoding_error() {
        let err: IbftError = alloy_rlp::Error::InputTooShort.into();
        assert!(matches!(err, IbftError::RlpDecodingError(_)));
        assert!(!IbftError::BlockImportFailed("x".into()).is_discardable_input());
    }
}

use crate::error::IbftError;
use crate::types::IbftBlock;

pub trait BlockImporter: Send + Sync {
    /// Imports a sealed block into the blockchain.
    /// This should perform all necessary validation before import.
    fn import_block(&self, block: &IbftBlock) -> Result<(), IbftError>;
}

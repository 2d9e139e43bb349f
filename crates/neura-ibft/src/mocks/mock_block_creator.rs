use crate::error::IbftError;
use crate::types::{
    BlockCreator, ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader, IbftExtraData, EXPECTED_MIX_HASH,
};
use alloy_primitives::{Address, B256, B64, U256};
use std::sync::atomic::{AtomicBool, Ordering};

// --- MockBlockCreator ---
/// Builds empty blocks on top of the given parent, stamped with the round.
#[derive(Debug, Default)]
pub struct MockBlockCreator {
    beneficiary: Address,
    validators: Vec<Address>,
    fail: AtomicBool,
}

impl MockBlockCreator {
    pub fn new(beneficiary: Address, validators: Vec<Address>) -> Self {
        Self { beneficiary, validators, fail: AtomicBool::new(false) }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl BlockCreator for MockBlockCreator {
    fn create_block(
        &self,
        parent_header: &IbftBlockHeader,
        round_identifier: &ConsensusRoundIdentifier,
        timestamp_seconds: u64,
    ) -> Result<IbftBlock, IbftError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(IbftError::BlockCreationError("mock block creator set to fail".into()));
        }

        let header = IbftBlockHeader {
            parent_hash: parent_header.hash(),
            ommers_hash: B256::ZERO,
            beneficiary: self.beneficiary,
            state_root: B256::ZERO,
            transactions_root: B256::ZERO,
            receipts_root: B256::ZERO,
            logs_bloom: Default::default(),
            difficulty: U256::from(1),
            number: parent_header.number + 1,
            gas_limit: parent_header.gas_limit,
            gas_used: 0,
            timestamp: timestamp_seconds,
            extra_data: IbftExtraData::new(B256::ZERO, self.validators.clone(), None, round_identifier.round_number),
            mix_hash: EXPECTED_MIX_HASH,
            nonce: B64::ZERO,
        };
        log::debug!("MockBlockCreator: Created block {} for round {}", header.number, round_identifier);
        Ok(IbftBlock::new(header, Vec::new(), Vec::new()))
    }
}

//! Common helper functions and fixtures for validation and state machine tests.

use crate::mocks::AcceptAllBlockValidator;
use crate::payload::{MessageFactory, PreparedCertificate, ProposalPayload};
use crate::proposer_selector::ProposerSelector;
use crate::types::signed_data::{address_from_node_key, sign_hash};
use crate::types::{
    ConsensusRoundIdentifier, IbftBlock, IbftBlockHeader, IbftExtraData, NodeKey, RlpSignature, SignedData,
    ValidatorSet, EXPECTED_MIX_HASH,
};
use crate::validation::MessageValidatorFactory;
use alloy_primitives::{Address, B256, B64, U256};
use std::sync::Arc;

// --- Keys ---

pub fn deterministic_node_key(seed: u8) -> NodeKey {
    assert_ne!(seed, 0, "seed 0 is not a valid secret key");
    let mut bytes = [0u8; 32];
    bytes[0] = seed;
    let secret_key = k256::SecretKey::from_slice(&bytes).expect("Failed to create secret_key from slice");
    NodeKey::from(secret_key)
}

pub fn random_node_key() -> NodeKey {
    NodeKey::from(k256::SecretKey::random(&mut rand::thread_rng()))
}

pub fn address_from_key(key: &NodeKey) -> Address {
    address_from_node_key(key)
}

pub fn sign_digest(key: &NodeKey, digest: B256) -> RlpSignature {
    sign_hash(digest, key).expect("ECDSA recoverable signing failed")
}

// --- Block and Header Helpers ---

pub fn create_header(number: u64, round: u32, beneficiary: Address, validators: Vec<Address>) -> IbftBlockHeader {
    IbftBlockHeader {
        parent_hash: B256::ZERO,
        ommers_hash: B256::ZERO,
        beneficiary,
        state_root: B256::ZERO,
        transactions_root: B256::ZERO,
        receipts_root: B256::ZERO,
        logs_bloom: Default::default(),
        difficulty: U256::from(1),
        number,
        gas_limit: 30_000_000,
        gas_used: 0,
        timestamp: 1_000_000 + number,
        extra_data: IbftExtraData::new(B256::ZERO, validators, None, round),
        mix_hash: EXPECTED_MIX_HASH,
        nonce: B64::ZERO,
    }
}

pub fn create_parent_header(number: u64, proposer: Address) -> IbftBlockHeader {
    create_header(number, 0, proposer, vec![])
}

pub fn create_block(number: u64, round: u32) -> IbftBlock {
    IbftBlock::new(create_header(number, round, Address::ZERO, vec![]), vec![], vec![])
}

// --- Validator fixture ---

/// `count` validators deciding height 1 on top of a genesis parent, so the
/// proposer of round `r` is the validator at index `r % count`.
pub struct TestValidators {
    pub keys: Vec<Arc<NodeKey>>,
    pub factories: Vec<MessageFactory>,
    pub validators: Arc<ValidatorSet>,
    pub parent_header: IbftBlockHeader,
    pub proposer_selector: Arc<ProposerSelector>,
    pub validator_factory: MessageValidatorFactory,
}

impl TestValidators {
    pub const HEIGHT: u64 = 1;

    pub fn new(count: u8) -> Self {
        let mut keys: Vec<Arc<NodeKey>> = (1..=count).map(|seed| Arc::new(deterministic_node_key(seed))).collect();
        keys.sort_by_key(|key| address_from_key(key));

        let addresses = keys.iter().map(|key| address_from_key(key)).collect();
        let validators = Arc::new(ValidatorSet::new(addresses).expect("non-empty validator set"));
        let parent_header = create_header(0, 0, Address::ZERO, validators.as_slice().to_vec());
        let proposer_selector = Arc::new(ProposerSelector::new(validators.clone(), &parent_header));
        let validator_factory = MessageValidatorFactory::new(
            validators.clone(),
            proposer_selector.clone(),
            Arc::new(AcceptAllBlockValidator),
            Self::HEIGHT,
        );
        let factories = keys.iter().map(|key| MessageFactory::new(key.clone())).collect();

        Self { keys, factories, validators, parent_header, proposer_selector, validator_factory }
    }

    pub fn address(&self, index: usize) -> Address {
        self.factories[index].local_address()
    }

    pub fn round(&self, round_number: u32) -> ConsensusRoundIdentifier {
        ConsensusRoundIdentifier::new(Self::HEIGHT, round_number)
    }

    pub fn proposer_index(&self, round: &ConsensusRoundIdentifier) -> usize {
        let proposer = self.proposer_selector.select_proposer_for_round(round);
        self.validators.position(&proposer).expect("proposer is a validator")
    }

    pub fn proposer_factory(&self, round: &ConsensusRoundIdentifier) -> &MessageFactory {
        &self.factories[self.proposer_index(round)]
    }

    pub fn non_proposer_indices(&self, round: &ConsensusRoundIdentifier) -> Vec<usize> {
        let proposer = self.proposer_index(round);
        (0..self.factories.len()).filter(|i| *i != proposer).collect()
    }

    /// A block for this height whose extra data carries `round`.
    pub fn block_for_round(&self, round: &ConsensusRoundIdentifier) -> IbftBlock {
        IbftBlock::new(
            create_header(round.sequence_number, round.round_number, self.address(self.proposer_index(round)), vec![]),
            vec![],
            vec![],
        )
    }

    pub fn signed_proposal(&self, round: &ConsensusRoundIdentifier, block: IbftBlock) -> SignedData<ProposalPayload> {
        self.proposer_factory(round)
            .create_signed_proposal_payload(*round, block)
            .expect("Failed to sign proposal payload")
    }

    /// A prepared certificate for `block` at `round` with `prepare_count` prepares
    /// from non-proposers.
    pub fn prepared_certificate(
        &self,
        round: &ConsensusRoundIdentifier,
        block: IbftBlock,
        prepare_count: usize,
    ) -> PreparedCertificate {
        let proposal = self.signed_proposal(round, block);
        let digest = proposal.payload().digest;
        let prepares = self
            .non_proposer_indices(round)
            .into_iter()
            .take(prepare_count)
            .map(|i| {
                self.factories[i]
                    .create_prepare(*round, digest)
                    .expect("Failed to sign prepare payload")
                    .into_signed_payload()
            })
            .collect();
        PreparedCertificate::new(proposal, prepares)
    }
}

use crate::error::IbftError;
use crate::proposer_selector::ProposerSelector;
use crate::statemachine::block_height_manager::{BlockHeightManager, IbftBlockHeightManager};
use crate::statemachine::no_op_block_height_manager::NoOpBlockHeightManager;
use crate::types::{IbftBlockHeader, IbftFinalState, ValidatorSet};
use crate::validation::MessageValidatorFactory;
use std::sync::Arc;

/// Builds the manager for the height on top of a given parent.
#[derive(Clone)]
pub struct IbftBlockHeightManagerFactory {
    final_state: Arc<IbftFinalState>,
}

impl IbftBlockHeightManagerFactory {
    pub fn new(final_state: Arc<IbftFinalState>) -> Self {
        Self { final_state }
    }

    pub fn create(&self, parent_header: Arc<IbftBlockHeader>) -> Result<Box<dyn BlockHeightManager>, IbftError> {
        let validators = self.final_state.validator_set_provider().validators_after_block(&parent_header)?;
        let validators = Arc::new(ValidatorSet::new(validators)?);
        let chain_height = parent_header.number + 1;

        if !validators.contains(&self.final_state.local_address()) {
            log::info!("Local node is not a validator at height {}, following only", chain_height);
            return Ok(Box::new(NoOpBlockHeightManager::new(parent_header)));
        }

        let proposer_selector = Arc::new(ProposerSelector::new(validators.clone(), &parent_header));
        let validator_factory = MessageValidatorFactory::new(
            validators,
            proposer_selector,
            self.final_state.block_validator().clone(),
            chain_height,
        );
        Ok(Box::new(IbftBlockHeightManager::new(parent_header, self.final_state.clone(), validator_factory)))
    }
}

use crate::error::IbftError;
use crate::helpers::calculate_required_validator_quorum;
use alloy_primitives::Address;

/// The validators in force for one height, sorted ascending and deduplicated.
///
/// Built once from the chain state at the parent header and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSet {
    validators: Vec<Address>,
}

impl ValidatorSet {
    pub fn new(mut validators: Vec<Address>) -> Result<Self, IbftError> {
        validators.sort();
        validators.dedup();
        if validators.is_empty() {
            return Err(IbftError::NoValidators);
        }
        Ok(Self { validators })
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.validators.binary_search(address).is_ok()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn quorum_size(&self) -> usize {
        calculate_required_validator_quorum(self.validators.len())
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.validators
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.validators.iter()
    }

    pub fn position(&self, address: &Address) -> Option<usize> {
        self.validators.binary_search(address).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_deduplicates() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let set = ValidatorSet::new(vec![b, a, b]).expect("non-empty");
        assert_eq!(set.as_slice(), &[a, b]);
        assert!(set.contains(&a));
        assert_eq!(set.position(&b), Some(1));
        assert_eq!(set.quorum_size(), 2);
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(ValidatorSet::new(vec![]), Err(IbftError::NoValidators));
    }
}

//! Tests for NewRound validation, including certificate continuity.

use super::common_helpers::*;
use crate::helpers::replace_round_in_block;
use crate::messagewrappers::NewRound;
use crate::payload::{PreparedCertificate, RoundChangeCertificate, RoundChangePayload};
use crate::types::{ConsensusRoundIdentifier, IbftBlock, SignedData};

fn round_changes(
    tv: &TestValidators,
    target: &ConsensusRoundIdentifier,
    authors: &[usize],
    certificate: Option<(usize, PreparedCertificate)>,
) -> Vec<SignedData<RoundChangePayload>> {
    authors
        .iter()
        .map(|&i| {
            let cert = certificate.as_ref().filter(|(holder, _)| *holder == i).map(|(_, c)| c.clone());
            tv.factories[i].create_round_change(*target, cert).unwrap().signed_payload().clone()
        })
        .collect()
}

fn new_round(
    tv: &TestValidators,
    target: &ConsensusRoundIdentifier,
    author: usize,
    round_changes: Vec<SignedData<RoundChangePayload>>,
    block: IbftBlock,
) -> NewRound {
    let factory = &tv.factories[author];
    let proposal = factory.create_signed_proposal_payload(*target, block).unwrap();
    factory.create_new_round(*target, RoundChangeCertificate::new(round_changes), proposal).unwrap()
}

#[test]
fn test_valid_new_round_without_prepared_certificates() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let target = tv.round(1);
    let proposer = tv.proposer_index(&target);

    let msg = new_round(&tv, &target, proposer, round_changes(&tv, &target, &[0, 2, 3], None), tv.block_for_round(&target));
    assert!(validator.validate_new_round_message(&msg));
}

#[test]
fn test_new_round_from_non_proposer_is_invalid() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let target = tv.round(1);
    let other = tv.non_proposer_indices(&target)[0];

    let msg = new_round(&tv, &target, other, round_changes(&tv, &target, &[0, 2, 3], None), tv.block_for_round(&target));
    assert!(!validator.validate_new_round_message(&msg));
}

#[test]
fn test_new_round_targeting_round_zero_is_invalid() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let target = tv.round(0);
    let proposer = tv.proposer_index(&target);

    let msg = new_round(&tv, &target, proposer, round_changes(&tv, &target, &[1, 2, 3], None), tv.block_for_round(&target));
    assert!(!validator.validate_new_round_message(&msg));
}

#[test]
fn test_new_round_for_other_height_is_invalid() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let target = ConsensusRoundIdentifier::new(TestValidators::HEIGHT + 1, 1);
    let proposer = tv.proposer_index(&target);
    let block = IbftBlock::new(create_header(target.sequence_number, 1, tv.address(proposer), vec![]), vec![], vec![]);

    let msg = new_round(&tv, &target, proposer, round_changes(&tv, &target, &[0, 2, 3], None), block);
    assert!(!validator.validate_new_round_message(&msg));
}

#[test]
fn test_certificate_below_quorum_is_invalid() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let target = tv.round(1);
    let proposer = tv.proposer_index(&target);

    let msg = new_round(&tv, &target, proposer, round_changes(&tv, &target, &[0, 2], None), tv.block_for_round(&target));
    assert!(!validator.validate_new_round_message(&msg));
}

#[test]
fn test_certificate_with_duplicate_authors_is_invalid() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let target = tv.round(1);
    let proposer = tv.proposer_index(&target);

    let msg = new_round(&tv, &target, proposer, round_changes(&tv, &target, &[0, 2, 2], None), tv.block_for_round(&target));
    assert!(!validator.validate_new_round_message(&msg));
}

#[test]
fn test_certificate_entry_for_other_round_is_invalid() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let target = tv.round(1);
    let proposer = tv.proposer_index(&target);

    let mut rcs = round_changes(&tv, &target, &[0, 2], None);
    rcs.extend(round_changes(&tv, &tv.round(2), &[3], None));
    let msg = new_round(&tv, &target, proposer, rcs, tv.block_for_round(&target));
    assert!(!validator.validate_new_round_message(&msg));
}

#[test]
fn test_reproposal_of_prepared_block_passes_continuity_check() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let prepared_round = tv.round(0);
    let prepared_block = tv.block_for_round(&prepared_round);
    let cert = tv.prepared_certificate(&prepared_round, prepared_block.clone(), 2);

    let target = tv.round(1);
    let proposer = tv.proposer_index(&target);
    let rcs = round_changes(&tv, &target, &[0, 2, 3], Some((2, cert)));

    let msg = new_round(&tv, &target, proposer, rcs, replace_round_in_block(&prepared_block, target.round_number));
    assert!(validator.validate_new_round_message(&msg));
}

#[test]
fn test_new_block_instead_of_prepared_block_fails_continuity_check() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let prepared_round = tv.round(0);
    let cert = tv.prepared_certificate(&prepared_round, tv.block_for_round(&prepared_round), 2);

    let target = tv.round(1);
    let proposer = tv.proposer_index(&target);
    let rcs = round_changes(&tv, &target, &[0, 2, 3], Some((3, cert)));

    // Differs from the prepared block in more than its round.
    let mut tampered = tv.block_for_round(&target);
    tampered.header.gas_used = 21_000;
    let msg = new_round(&tv, &target, proposer, rcs, tampered);
    assert!(!validator.validate_new_round_message(&msg));
}

#[test]
fn test_prepared_certificate_with_altered_digest_fails_validation() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let prepared_round = tv.round(0);
    let prepared_block = tv.block_for_round(&prepared_round);
    let mut cert = tv.prepared_certificate(&prepared_round, prepared_block.clone(), 2);

    // The proposer re-signs the certificate's proposal over another block.
    let mut altered = prepared_block.clone();
    altered.header.gas_used = 21_000;
    cert.proposal = tv.signed_proposal(&prepared_round, altered);
    assert_ne!(cert.digest(), prepared_block.hash());

    let target = tv.round(1);
    let proposer = tv.proposer_index(&target);
    let rcs = round_changes(&tv, &target, &[0, 2, 3], Some((2, cert)));

    let msg = new_round(&tv, &target, proposer, rcs, replace_round_in_block(&prepared_block, target.round_number));
    assert!(!validator.validate_new_round_message(&msg));
}

#[test]
fn test_invalid_embedded_round_change_is_rejected() {
    let tv = TestValidators::new(4);
    let validator = tv.validator_factory.create_new_round_validator();
    let prepared_round = tv.round(0);
    // One prepare short of the quorum - 1 needed.
    let weak_cert = tv.prepared_certificate(&prepared_round, tv.block_for_round(&prepared_round), 1);
    let prepared_block = weak_cert.block().clone();

    let target = tv.round(1);
    let proposer = tv.proposer_index(&target);
    let rcs = round_changes(&tv, &target, &[0, 2, 3], Some((0, weak_cert)));

    let msg = new_round(&tv, &target, proposer, rcs, replace_round_in_block(&prepared_block, 1));
    assert!(!validator.validate_new_round_message(&msg));
}

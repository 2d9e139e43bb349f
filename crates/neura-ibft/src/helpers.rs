// crates/neura-ibft/src/helpers.rs

use crate::payload::{PreparedCertificate, RoundChangePayload};
use crate::types::{IbftBlock, RlpSignature, SignedData};

/// Number of validators that must agree for a decision: `ceil(2N / 3)`.
pub fn calculate_required_validator_quorum(validator_count: usize) -> usize {
    (2 * validator_count + 2) / 3
}

/// Prepares required for a round to be prepared. The proposal counts as the proposer's prepare.
pub fn prepare_message_count_for_quorum(quorum: usize) -> usize {
    quorum.saturating_sub(1)
}

/// Attaches commit seals to the block's extra data. The block hash is unchanged.
pub fn create_sealed_block(block: &IbftBlock, commit_seals: Vec<RlpSignature>) -> IbftBlock {
    let mut header = block.header.clone();
    header.extra_data = header.extra_data.with_seals(commit_seals);
    IbftBlock::new(header, block.body_transactions.clone(), block.body_ommers.clone())
}

/// Re-targets a block at another round. This changes the block hash.
pub fn replace_round_in_block(block: &IbftBlock, round_number: u32) -> IbftBlock {
    let mut header = block.header.clone();
    header.extra_data = header.extra_data.with_round(round_number);
    IbftBlock::new(header, block.body_transactions.clone(), block.body_ommers.clone())
}

/// Of all prepared certificates carried by `round_changes`, the one whose proposal
/// has the highest round. Ties go to the earliest entry.
pub fn find_latest_prepared_certificate<'a, I>(round_changes: I) -> Option<&'a PreparedCertificate>
where
    I: IntoIterator<Item = &'a SignedData<RoundChangePayload>>,
{
    round_changes.into_iter().filter_map(|rc| rc.payload().prepared_certificate.as_ref()).fold(
        None,
        |latest: Option<&'a PreparedCertificate>, cert| match latest {
            Some(current) if cert.proposal_round() <= current.proposal_round() => Some(current),
            _ => Some(cert),
        },
    )
}

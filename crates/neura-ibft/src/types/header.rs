use crate::types::extra_data::IbftExtraData;
use alloy_primitives::{b256, keccak256, Address, Bloom, Bytes, B256 as Hash, B64, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Error as RlpError, Header as RlpHeader};

/// Mix hash carried by every IBFT block: "Istanbul practical byzantine fault tolerance".
pub const EXPECTED_MIX_HASH: Hash =
    b256!("0x63746963616c2062797a616e74696e65206661756c7420746f6c6572616e6365");

/// Ethereum-style block header whose extra data is interpreted as [`IbftExtraData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbftBlockHeader {
    pub parent_hash: Hash,
    pub ommers_hash: Hash,
    /// Proposer of the block.
    pub beneficiary: Address,
    pub state_root: Hash,
    pub transactions_root: Hash,
    pub receipts_root: Hash,
    pub logs_bloom: Bloom,
    pub difficulty: U256,
    pub number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: IbftExtraData,
    pub mix_hash: Hash,
    pub nonce: B64,
}

impl IbftBlockHeader {
    /// The block hash.
    ///
    /// Commit seals are stripped from the extra data first, so the hash is the
    /// same before and after sealing and doubles as the data signed by commit seals.
    pub fn hash(&self) -> Hash {
        let unsealed_extra = self.extra_data.without_seals().encode_to_bytes();
        let mut rlp_buf = Vec::new();
        self.encode_with_extra(&unsealed_extra, &mut rlp_buf);
        keccak256(&rlp_buf)
    }

    pub fn round(&self) -> u32 {
        self.extra_data.round
    }

    fn encode_with_extra(&self, extra: &Bytes, out: &mut dyn BufMut) {
        RlpHeader { list: true, payload_length: self.rlp_payload_length(extra) }.encode(out);
        self.parent_hash.encode(out);
        self.ommers_hash.encode(out);
        self.beneficiary.encode(out);
        self.state_root.encode(out);
        self.transactions_root.encode(out);
        self.receipts_root.encode(out);
        self.logs_bloom.encode(out);
        self.difficulty.encode(out);
        self.number.encode(out);
        self.gas_limit.encode(out);
        self.gas_used.encode(out);
        self.timestamp.encode(out);
        extra.encode(out);
        self.mix_hash.encode(out);
        self.nonce.encode(out);
    }

    fn rlp_payload_length(&self, extra: &Bytes) -> usize {
        self.parent_hash.length()
            + self.ommers_hash.length()
            + self.beneficiary.length()
            + self.state_root.length()
            + self.transactions_root.length()
            + self.receipts_root.length()
            + self.logs_bloom.length()
            + self.difficulty.length()
            + self.number.length()
            + self.gas_limit.length()
            + self.gas_used.length()
            + self.timestamp.length()
            + extra.length()
            + self.mix_hash.length()
            + self.nonce.length()
    }
}

impl Encodable for IbftBlockHeader {
    fn encode(&self, out: &mut dyn BufMut) {
        self.encode_with_extra(&self.extra_data.encode_to_bytes(), out);
    }

    fn length(&self) -> usize {
        let payload_len = self.rlp_payload_length(&self.extra_data.encode_to_bytes());
        RlpHeader { list: true, payload_length: payload_len }.length() + payload_len
    }
}

impl Decodable for IbftBlockHeader {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let rlp_header = RlpHeader::decode(buf)?;
        if !rlp_header.list {
            return Err(RlpError::Custom("IbftBlockHeader RLP must be a list"));
        }
        let remaining_len_before = buf.len();

        let parent_hash = Decodable::decode(buf)?;
        let ommers_hash = Decodable::decode(buf)?;
        let beneficiary = Decodable::decode(buf)?;
        let state_root = Decodable::decode(buf)?;
        let transactions_root = Decodable::decode(buf)?;
        let receipts_root = Decodable::decode(buf)?;
        let logs_bloom = Decodable::decode(buf)?;
        let difficulty = Decodable::decode(buf)?;
        let number = Decodable::decode(buf)?;
        let gas_limit = Decodable::decode(buf)?;
        let gas_used = Decodable::decode(buf)?;
        let timestamp = Decodable::decode(buf)?;
        let extra_bytes = Bytes::decode(buf)?;
        let extra_data = IbftExtraData::decode_from_bytes(&extra_bytes)
            .map_err(|_| RlpError::Custom("IbftBlockHeader extra data is not IBFT extra data"))?;
        let mix_hash = Decodable::decode(buf)?;
        let nonce = Decodable::decode(buf)?;

        if remaining_len_before - buf.len() != rlp_header.payload_length {
            return Err(RlpError::UnexpectedLength);
        }
        Ok(Self {
            parent_hash,
            ommers_hash,
            beneficiary,
            state_root,
            transactions_root,
            receipts_root,
            logs_bloom,
            difficulty,
            number,
            gas_limit,
            gas_used,
            timestamp,
            extra_data,
            mix_hash,
            nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RlpSignature;
    use alloy_primitives::Signature;

    fn header() -> IbftBlockHeader {
        IbftBlockHeader {
            parent_hash: Hash::repeat_byte(1),
            ommers_hash: Hash::ZERO,
            beneficiary: Address::repeat_byte(2),
            state_root: Hash::ZERO,
            transactions_root: Hash::ZERO,
            receipts_root: Hash::ZERO,
            logs_bloom: Bloom::default(),
            difficulty: U256::from(1),
            number: 10,
            gas_limit: 30_000_000,
            gas_used: 0,
            timestamp: 1_700_000_000,
            extra_data: IbftExtraData::new(Hash::ZERO, vec![Address::repeat_byte(2)], None, 0),
            mix_hash: EXPECTED_MIX_HASH,
            nonce: B64::ZERO,
        }
    }

    #[test]
    fn sealing_does_not_change_the_hash() {
        let unsealed = header();
        let mut sealed = unsealed.clone();
        sealed.extra_data.seals = vec![RlpSignature(Signature::new(U256::from(3), U256::from(4), true))];
        assert_eq!(unsealed.hash(), sealed.hash());
    }

    #[test]
    fn round_is_covered_by_the_hash() {
        let round_zero = header();
        let mut round_one = round_zero.clone();
        round_one.extra_data.round = 1;
        assert_ne!(round_zero.hash(), round_one.hash());
    }

    #[test]
    fn decoded_header_keeps_its_hash() {
        let original = header();
        let mut encoded = Vec::new();
        original.encode(&mut encoded);
        assert_eq!(encoded.len(), original.length());
        let decoded = IbftBlockHeader::decode(&mut encoded.as_slice()).expect("decode");
        assert_eq!(decoded.hash(), original.hash());
    }
}

use crate::error::{IbftError, AUTHENTICATION_FAILED};
use crate::payload::IbftPayload;
use crate::types::{NodeKey, RlpSignature};
use alloy_primitives::{keccak256, Address, Signature, B256 as Hash, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};
use k256::ecdsa::{
    RecoveryId as K256RecoveryId, Signature as K256EcdsaSignature,
    VerifyingKey as K256VerifyingKey,
};

/// A payload together with its signature and the author recovered from it.
///
/// There is no way to build one from a claimed author: values come either from
/// [`SignedData::sign`] or from decoding, which recovers the author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedData<P: IbftPayload> {
    payload: P,
    author: Address,
    signature: RlpSignature,
}

impl<P: IbftPayload> SignedData<P> {
    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn author(&self) -> Address {
        self.author
    }

    pub fn signature(&self) -> &RlpSignature {
        &self.signature
    }

    pub fn sign(payload: P, signing_key: &NodeKey) -> Result<Self, IbftError> {
        let signature = sign_hash(hash_for_signature(&payload), signing_key)?;
        Ok(Self { payload, author: address_from_node_key(signing_key), signature })
    }

    /// Recovers the author of `payload` and binds the three together.
    pub fn from_signature(payload: P, signature: RlpSignature) -> Result<Self, IbftError> {
        let author = authenticate(&payload, &signature)?;
        Ok(Self { payload, author, signature })
    }
}

/// `keccak256(message_type ++ rlp(payload))`.
pub fn hash_for_signature<P: IbftPayload>(payload: &P) -> Hash {
    let mut preimage = Vec::with_capacity(1 + payload.length());
    preimage.push(payload.message_type());
    payload.encode(&mut preimage);
    keccak256(&preimage)
}

pub fn authenticate<P: IbftPayload>(payload: &P, signature: &RlpSignature) -> Result<Address, IbftError> {
    recover_address(hash_for_signature(payload), signature)
}

pub fn sign_hash(hash: Hash, signing_key: &NodeKey) -> Result<RlpSignature, IbftError> {
    let (k256_sig, recovery_id): (K256EcdsaSignature, K256RecoveryId) =
        signing_key.sign_prehash_recoverable(hash.as_slice())?;

    let r = U256::from_be_slice(&k256_sig.r().to_bytes());
    let s = U256::from_be_slice(&k256_sig.s().to_bytes());
    Ok(RlpSignature(Signature::new(r, s, recovery_id.is_y_odd())))
}

/// Recovers the address that produced `signature` over `hash`.
pub fn recover_address(hash: Hash, signature: &RlpSignature) -> Result<Address, IbftError> {
    let recovery_id = K256RecoveryId::new(signature.v(), false);
    let r_bytes: [u8; 32] = signature.r().to_be_bytes();
    let s_bytes: [u8; 32] = signature.s().to_be_bytes();

    let k256_sig = K256EcdsaSignature::from_scalars(r_bytes, s_bytes).map_err(|e| {
        IbftError::AuthenticationFailed(format!("malformed signature scalars: {}", e))
    })?;

    let verifying_key = K256VerifyingKey::recover_from_prehash(hash.as_slice(), &k256_sig, recovery_id)
        .map_err(|e| IbftError::AuthenticationFailed(format!("public key recovery failed: {}", e)))?;

    Ok(address_from_verifying_key(&verifying_key))
}

pub fn address_from_node_key(node_key: &NodeKey) -> Address {
    address_from_verifying_key(node_key.verifying_key())
}

fn address_from_verifying_key(verifying_key: &K256VerifyingKey) -> Address {
    let encoded_point = verifying_key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point prefix.
    let hashed_pk = keccak256(&encoded_point.as_bytes()[1..]);
    Address::from_slice(&hashed_pk[12..])
}

impl<P: IbftPayload> Encodable for SignedData<P> {
    fn encode(&self, out: &mut dyn BufMut) {
        let header = Header { list: true, payload_length: self.payload.length() + self.signature.length() };
        header.encode(out);
        self.payload.encode(out);
        self.signature.encode(out);
    }

    fn length(&self) -> usize {
        let payload_len = self.payload.length() + self.signature.length();
        Header { list: true, payload_length: payload_len }.length() + payload_len
    }
}

impl<P: IbftPayload> Decodable for SignedData<P> {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::Custom("SignedData RLP must be a list"));
        }
        let remaining_before_payload = buf.len();
        let payload = P::decode(buf)?;
        let signature = RlpSignature::decode(buf)?;
        if remaining_before_payload - buf.len() != header.payload_length {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }

        SignedData::from_signature(payload, signature).map_err(|e| {
            log::debug!("Discarding signed payload: {}", e);
            alloy_rlp::Error::Custom(AUTHENTICATION_FAILED)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PreparePayload;
    use crate::types::ConsensusRoundIdentifier;
    use crate::validation::tests::common_helpers::{deterministic_node_key, random_node_key};
    use alloy_primitives::b256;

    fn prepare_payload() -> PreparePayload {
        PreparePayload::new(
            ConsensusRoundIdentifier::new(3, 1),
            b256!("0x1111111111111111111111111111111111111111111111111111111111111111"),
        )
    }

    #[test]
    fn signed_author_matches_recovered_author() {
        let key = deterministic_node_key(1);
        let signed = SignedData::sign(prepare_payload(), &key).expect("signing");
        assert_eq!(signed.author(), address_from_node_key(&key));
        assert_eq!(authenticate(signed.payload(), signed.signature()).unwrap(), signed.author());
    }

    #[test]
    fn any_key_signs_recoverably() {
        let key = random_node_key();
        let signed = SignedData::sign(prepare_payload(), &key).expect("signing");
        assert_eq!(signed.author(), address_from_node_key(&key));
    }

    #[test]
    fn decoding_recovers_the_author() {
        let key = deterministic_node_key(2);
        let signed = SignedData::sign(prepare_payload(), &key).expect("signing");
        let mut encoded = Vec::new();
        signed.encode(&mut encoded);

        let decoded = SignedData::<PreparePayload>::decode(&mut encoded.as_slice()).expect("decode");
        assert_eq!(decoded, signed);
    }

    #[test]
    fn message_type_is_part_of_the_signed_hash() {
        let payload = prepare_payload();
        let mut plain = Vec::new();
        payload.encode(&mut plain);
        assert_ne!(hash_for_signature(&payload), keccak256(&plain));
    }

    #[test]
    fn tampered_payload_recovers_a_different_author() {
        let key = deterministic_node_key(3);
        let signed = SignedData::sign(prepare_payload(), &key).expect("signing");
        let tampered = PreparePayload::new(ConsensusRoundIdentifier::new(3, 2), signed.payload().digest);

        match SignedData::from_signature(tampered, *signed.signature()) {
            Ok(rebound) => assert_ne!(rebound.author(), signed.author()),
            Err(e) => assert!(matches!(e, IbftError::AuthenticationFailed(_))),
        }
    }

    #[test]
    fn zero_signature_fails_authentication() {
        let zero = RlpSignature(Signature::new(U256::ZERO, U256::ZERO, false));
        let err = SignedData::from_signature(prepare_payload(), zero).unwrap_err();
        assert!(matches!(err, IbftError::AuthenticationFailed(_)));

        let mut encoded = Vec::new();
        let payload = prepare_payload();
        Header { list: true, payload_length: payload.length() + zero.length() }.encode(&mut encoded);
        payload.encode(&mut encoded);
        zero.encode(&mut encoded);
        let decode_err = SignedData::<PreparePayload>::decode(&mut encoded.as_slice()).unwrap_err();
        assert!(matches!(IbftError::from(decode_err), IbftError::AuthenticationFailed(_)));
    }
}

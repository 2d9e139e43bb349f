use crate::messagewrappers::RoundChange;
use crate::validation::RoundChangePayloadValidator;

/// Validates RoundChange messages for the round-change manager.
#[derive(Clone)]
pub struct RoundChangeMessageValidator {
    round_change_payload_validator: RoundChangePayloadValidator,
}

impl RoundChangeMessageValidator {
    pub fn new(round_change_payload_validator: RoundChangePayloadValidator) -> Self {
        Self { round_change_payload_validator }
    }

    pub fn validate_message(&self, msg: &RoundChange) -> bool {
        self.round_change_payload_validator.validate_payload(msg.signed_payload())
    }
}

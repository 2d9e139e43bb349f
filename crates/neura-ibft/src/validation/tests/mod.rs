// Validator tests, one module per validator.

mod new_round_message_validator_tests;

pub mod common_helpers;

// State machine tests: round state, round changes, height management and the
// full controller.


pub mod common_helpers;

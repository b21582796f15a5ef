//! Report availability polling.

mod poll_state;

pub use poll_state::{PollPhase, PollState, PollStep, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_DELAY};

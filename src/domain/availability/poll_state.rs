//! Bounded-retry polling state for one report fetch lifecycle.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, ValidationError};

/// Default delay between attempts.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(2000);

/// Default attempt budget (about one minute at the default delay).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Lifecycle of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    #[default]
    Idle,
    Polling,
    Ready,
    Exhausted,
    Cancelled,
}

impl StateMachine for PollPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PollPhase::*;
        matches!(
            (self, target),
            (Idle, Polling)
                | (Idle, Cancelled)
                | (Polling, Ready)
                | (Polling, Exhausted)
                | (Polling, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PollPhase::*;
        match self {
            Idle => vec![Polling, Cancelled],
            Polling => vec![Ready, Exhausted, Cancelled],
            Ready | Exhausted | Cancelled => vec![],
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    RetryAfter(Duration),
    Exhausted,
}

/// Attempt counter and phase for one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    attempt: u32,
    max_attempts: u32,
    delay: Duration,
    phase: PollPhase,
}

impl PollState {
    /// Creates an idle poll. `max_attempts` must be at least one.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ValidationError> {
        if max_attempts == 0 {
            return Err(ValidationError::invalid_format(
                "max_attempts",
                "must be at least 1",
            ));
        }
        Ok(Self {
            attempt: 0,
            max_attempts,
            delay,
            phase: PollPhase::Idle,
        })
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    /// True while attempts may still run and their results still count.
    pub fn is_active(&self) -> bool {
        self.phase == PollPhase::Polling
    }

    /// Enters `Polling` at attempt zero.
    pub fn start(&mut self) -> Result<(), ValidationError> {
        self.phase = self.phase.transition_to(PollPhase::Polling)?;
        self.attempt = 0;
        Ok(())
    }

    /// Records a usable document.
    pub fn record_ready(&mut self) -> Result<(), ValidationError> {
        self.phase = self.phase.transition_to(PollPhase::Ready)?;
        Ok(())
    }

    /// Records a failed or not-ready attempt and decides what comes next.
    pub fn record_failure(&mut self) -> Result<PollStep, ValidationError> {
        if self.phase != PollPhase::Polling {
            return Err(ValidationError::invalid_transition(self.phase, PollPhase::Polling));
        }
        self.attempt += 1;
        if self.attempt < self.max_attempts {
            Ok(PollStep::RetryAfter(self.delay))
        } else {
            self.phase = PollPhase::Exhausted;
            Ok(PollStep::Exhausted)
        }
    }

    /// Stops the poll; later results are discarded. No-op once terminal.
    pub fn cancel(&mut self) {
        if self.phase.can_transition_to(&PollPhase::Cancelled) {
            self.phase = PollPhase::Cancelled;
        }
    }
}

impl Default for PollState {
    fn default() -> Self {
        Self {
            attempt: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_POLL_DELAY,
            phase: PollPhase::Idle,
        }
    }
}

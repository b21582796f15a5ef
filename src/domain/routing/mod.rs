//! Routing vocabulary: what a generator can say and what a turn decides.

mod decision;
mod reply;

pub use decision::{GeneratorOutcome, RouterDecision};
pub use reply::{
    classify_reply, escalation_sentinel, is_escalation_sentinel, ReplyShape, ESCALATION_KEY,
    ESCALATION_VALUE,
};

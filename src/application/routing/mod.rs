//! Query routing: one generator call folded into one decision.

mod router;

pub use router::{QueryRouter, RouterError};

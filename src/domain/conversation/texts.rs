//! Fixed user-visible texts.

/// Opening assistant message of every session.
pub const GREETING: &str = "Hello! I'm your real estate analysis assistant. I can help you understand market trends, pricing analysis, investment potential, neighborhood insights, and comparable sales from your report. What would you like to explore?";

/// Suggested questions shown until the first message is sent.
pub const SUGGESTED_QUESTIONS: [&str; 6] = [
    "What's the current market trend?",
    "Is this a good investment?",
    "How do prices compare to similar properties?",
    "What are the neighborhood highlights?",
    "What are the key risks to consider?",
    "When is the best time to buy?",
];

/// Shown for any failure during a turn.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Shown when a report never became available.
pub const STILL_PROCESSING: &str = "Your report is still being processed. Please start over and upload the document again.";

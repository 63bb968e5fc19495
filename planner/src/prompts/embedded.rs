//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Customer questions for a product nobody has asked about yet
pub const QUESTIONS_FIRST: &str = include_str!("../../prompts/questions-first.pmt");

/// Customer questions that build on earlier answers
pub const QUESTIONS_FOLLOWUP: &str = include_str!("../../prompts/questions-followup.pmt");

/// Content strategist idea generation
pub const IDEAS: &str = include_str!("../../prompts/ideas.pmt");

/// Salesman answer
pub const SALESMAN: &str = include_str!("../../prompts/salesman.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "questions-first" => Some(QUESTIONS_FIRST),
        "questions-followup" => Some(QUESTIONS_FOLLOWUP),
        "ideas" => Some(IDEAS),
        "salesman" => Some(SALESMAN),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

//! AI Response Validation
//!
//! Repair layer for LLM JSON output. Structural validation of the terminal
//! outline schema lives with the domain types; this module only gets a
//! malformed response into parseable shape.

mod json_repair;

pub use json_repair::{JsonRepairer, extract_json_from_response};

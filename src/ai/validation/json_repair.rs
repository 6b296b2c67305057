//! JSON Repair Mechanism
//!
//! Unified JSON extraction and repair for LLM responses.
//!
//! Handles common LLM JSON output issues:
//! - Markdown code fence wrapping (```json ... ```)
//! - Trailing commas
//! - Missing closing braces/brackets
//! - JSON embedded in explanatory prose

use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::pipeline::MAX_JSON_REPAIR_ATTEMPTS;
use crate::types::{LoomError, Result};

// =============================================================================
// Convenience Functions
// =============================================================================

/// Extract and parse JSON from an LLM response
///
/// This is the primary entry point for parsing LLM JSON output.
/// Handles markdown code blocks, embedded JSON, and common formatting issues.
pub fn extract_json_from_response(content: &str) -> Result<Value> {
    let repairer = JsonRepairer::new();
    repairer.parse_or_repair(content).map(|(value, _)| value)
}

// =============================================================================
// JsonRepairer
// =============================================================================

/// JSON repair strategies
pub struct JsonRepairer {
    max_repair_attempts: usize,
}

impl Default for JsonRepairer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRepairer {
    pub fn new() -> Self {
        Self {
            max_repair_attempts: MAX_JSON_REPAIR_ATTEMPTS,
        }
    }

    /// Parse JSON, attempting repair if initial parse fails
    ///
    /// Returns (Value, was_repaired)
    pub fn parse_or_repair(&self, raw: &str) -> Result<(Value, bool)> {
        let cleaned = self.preprocess(raw);

        if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
            return Ok((value, false));
        }

        debug!("Initial JSON parse failed, attempting repair");

        for attempt in 1..=self.max_repair_attempts {
            let repaired = self.repair_attempt(&cleaned, attempt);

            if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
                warn!("JSON repaired on attempt {}", attempt);
                return Ok((value, true));
            }
        }

        // Final attempt: extract JSON from mixed content
        if let Some(extracted) = self.extract_from_mixed(&cleaned)
            && let Ok(value) = serde_json::from_str::<Value>(&extracted)
        {
            warn!("JSON extracted from mixed content");
            return Ok((value, true));
        }

        Err(LoomError::schema(
            "<response>",
            format!(
                "failed to parse or repair JSON after {} attempts. Content preview: {}...",
                self.max_repair_attempts,
                &cleaned.chars().take(200).collect::<String>()
            ),
        ))
    }

    /// Strip code fences, BOM, and surrounding whitespace
    fn preprocess(&self, raw: &str) -> String {
        let mut s = raw.trim();
        s = s.trim_start_matches('\u{feff}');

        if s.starts_with("```") {
            if let Some(first_newline) = s.find('\n') {
                s = &s[first_newline + 1..];
            }
            s = s.strip_suffix("```").unwrap_or(s);
        }

        s.trim().to_string()
    }

    /// Attempt repair with increasing aggressiveness
    fn repair_attempt(&self, s: &str, level: usize) -> String {
        let mut result = self.fix_trailing_commas(s);
        if level >= 2 {
            result = self.remove_control_chars(&result);
        }
        self.balance_brackets(&result)
    }

    /// Fix trailing commas before ] or }
    fn fix_trailing_commas(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut result = String::with_capacity(s.len());

        let mut i = 0;
        while i < chars.len() {
            if chars[i] == ',' {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == ']' || chars[j] == '}') {
                    i += 1;
                    continue;
                }
            }
            result.push(chars[i]);
            i += 1;
        }

        result
    }

    /// Balance brackets by adding missing closers, innermost first
    fn balance_brackets(&self, s: &str) -> String {
        let mut result = s.to_string();

        let mut open_stack: Vec<char> = Vec::new();
        let mut in_string = false;
        let mut escape = false;

        for ch in result.chars() {
            if escape {
                escape = false;
                continue;
            }
            match ch {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                '{' | '[' if !in_string => open_stack.push(ch),
                '}' if !in_string => {
                    if open_stack.last() == Some(&'{') {
                        open_stack.pop();
                    }
                }
                ']' if !in_string => {
                    if open_stack.last() == Some(&'[') {
                        open_stack.pop();
                    }
                }
                _ => {}
            }
        }

        if in_string {
            result.push('"');
        }
        while let Some(opener) = open_stack.pop() {
            result.push(if opener == '{' { '}' } else { ']' });
        }

        result
    }

    /// Remove control characters that break JSON parsing
    fn remove_control_chars(&self, s: &str) -> String {
        s.chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
            .collect()
    }

    /// Extract JSON from mixed content (e.g., LLM explanations around JSON)
    fn extract_from_mixed(&self, s: &str) -> Option<String> {
        let start = s.find(['{', '['])?;

        let mut brace_depth = 0;
        let mut bracket_depth = 0;
        let mut in_string = false;
        let mut escape = false;

        for (i, ch) in s[start..].char_indices() {
            if escape {
                escape = false;
                continue;
            }
            match ch {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                '{' if !in_string => brace_depth += 1,
                '}' if !in_string => brace_depth -= 1,
                '[' if !in_string => bracket_depth += 1,
                ']' if !in_string => bracket_depth -= 1,
                _ => {}
            }
            if !in_string && brace_depth == 0 && bracket_depth == 0 && matches!(ch, '}' | ']') {
                return Some(s[start..start + i + 1].to_string());
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid_json() {
        let repairer = JsonRepairer::new();
        let (_, repaired) = repairer.parse_or_repair(r#"{"queries": []}"#).unwrap();
        assert!(!repaired);
    }

    #[test]
    fn test_strip_code_fences() {
        let input = "```json\n{\"topic\": \"SQL\"}\n```";
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["topic"], "SQL");
    }

    #[test]
    fn test_fix_trailing_comma() {
        let repairer = JsonRepairer::new();
        let input = r#"{"queries": [{"topic": "SQL"},]}"#;
        let (value, repaired) = repairer.parse_or_repair(input).unwrap();
        assert!(repaired);
        assert!(value["queries"].is_array());
    }

    #[test]
    fn test_extract_from_prose() {
        let input = "Here is the plan you asked for:\n{\"queries\": [{\"topic\": \"SQL\", \"query\": \"sql textbook\"}]}\nLet me know if you need more.";
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["queries"][0]["query"], "sql textbook");
    }

    #[test]
    fn test_truncated_object_repaired() {
        let input = r#"{"queries": [{"topic": "SQL", "query": "sql textbook""#;
        let value = extract_json_from_response(input).unwrap();
        assert!(value["queries"].is_array());
        assert_eq!(value["queries"][0]["topic"], "SQL");
    }

    #[test]
    fn test_closers_appended_in_nesting_order() {
        let input = r#"{"topics": [{"topic": "SQL", "ilos": ["Write joins""#;
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["topics"][0]["ilos"][0], "Write joins");
    }

    #[test]
    fn test_unparseable_prose_is_schema_error() {
        let err = extract_json_from_response("I could not generate any queries today.").unwrap_err();
        assert!(matches!(err, LoomError::Schema { .. }));
    }

    proptest! {
        // Any JSON object survives fence wrapping and surrounding prose.
        #[test]
        fn prop_fenced_json_always_parses(key in "[a-z]{1,8}", value in "[a-zA-Z0-9 ]{0,20}") {
            let json = serde_json::json!({ key.clone(): value.clone() }).to_string();
            let wrapped = format!("Sure, here you go:\n```json\n{}\n```", json);
            let parsed = extract_json_from_response(&wrapped).unwrap();
            prop_assert_eq!(&parsed[&key], &serde_json::Value::String(value));
        }
    }
}

//! Decoding the generative service's reply.
//!
//! Models like to wrap JSON in a markdown fence even when told not to, so the
//! fence is stripped before decoding. Anything that still fails to decode
//! counts as a generation failure.

use oracle_client::GenerationError;
use serde::Deserialize;

/// The structured reply the prompt asks for. Extra or missing keys are a
/// decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OracleReply {
    pub chosen_sign_name: String,
    pub prophecy: String,
    pub symbolism: String,
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` line and a trailing
/// ```` ``` ````, if present. Text without a fence is returned trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag, if any, up to the end of the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Strip any fence and decode the reply.
pub fn parse_reply(raw: &str) -> Result<OracleReply, GenerationError> {
    let cleaned = strip_code_fence(raw);
    if cleaned.is_empty() {
        return Err(GenerationError::EmptyReply);
    }
    serde_json::from_str(cleaned).map_err(|e| GenerationError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str =
        r#"{"chosen_sign_name": "Lunar Elevator Muzak", "prophecy": "P", "symbolism": "S"}"#;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence(BODY), BODY);
        assert_eq!(strip_code_fence(&format!("```json\n{BODY}\n```")), BODY);
        assert_eq!(strip_code_fence(&format!("```\n{BODY}\n```\n")), BODY);
        assert_eq!(strip_code_fence(&format!("  ```JSON\n{BODY}```  ")), BODY);
        assert_eq!(strip_code_fence(&format!("```json{BODY}```")), BODY);
    }

    #[test]
    fn test_strip_code_fence_without_closing_fence() {
        assert_eq!(strip_code_fence(&format!("```json\n{BODY}")), BODY);
    }

    #[test]
    fn test_parse_reply_fenced() {
        let reply = parse_reply(&format!("```json\n{BODY}\n```")).unwrap();
        assert_eq!(reply.chosen_sign_name, "Lunar Elevator Muzak");
        assert_eq!(reply.prophecy, "P");
        assert_eq!(reply.symbolism, "S");
    }

    #[test]
    fn test_parse_reply_rejects_missing_field() {
        let err = parse_reply(r#"{"chosen_sign_name": "X", "prophecy": "P"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[test]
    fn test_parse_reply_rejects_extra_field() {
        let err = parse_reply(
            r#"{"chosen_sign_name": "X", "prophecy": "P", "symbolism": "S", "mood": "M"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[test]
    fn test_parse_reply_rejects_prose_and_empty() {
        assert!(matches!(
            parse_reply("The stars say you are a lounge singer."),
            Err(GenerationError::Decode(_))
        ));
        assert!(matches!(parse_reply("```\n```"), Err(GenerationError::EmptyReply)));
    }
}

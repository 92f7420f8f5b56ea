//! Shape checks on the decoded `/report` body.

use serde_json::{Map, Value};

use crate::error::RelayError;
use crate::models::IncomingReport;
use crate::sanitize::coerce_entry;

pub const MAX_BRAINROTS: usize = 25;
pub const BRAINROT_MAX_LEN: usize = 100;

/// Decodes the raw body. Empty, non-JSON and non-object bodies are all
/// `InvalidBody`.
pub fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, RelayError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(RelayError::InvalidBody);
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(RelayError::InvalidBody),
    }
}

/// Checks `brainrots` and keeps the non-blank entries among the first 25,
/// sanitized, in their original order.
pub fn validate(mut body: Map<String, Value>) -> Result<IncomingReport, RelayError> {
    let brainrots = match body.remove("brainrots") {
        Some(Value::Array(items)) => items,
        _ => return Err(RelayError::InvalidBrainrots),
    };

    let brainrots = brainrots
        .iter()
        .take(MAX_BRAINROTS)
        .map(|item| coerce_entry(item, BRAINROT_MAX_LEN))
        .filter(|entry| !entry.trim().is_empty())
        .collect();

    Ok(IncomingReport {
        brainrots,
        player_count: body.remove("playerCount"),
        private_server_link: body.remove("privateServerLink"),
        player_name: body.remove("playerName"),
        username: body.remove("username"),
        title: body.remove("title"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn rejects_non_object_bodies() {
        let bodies: [&[u8]; 7] = [b"", b"   ", b"not json", b"[1,2]", b"\"text\"", b"null", b"42"];
        for body in bodies {
            assert!(matches!(parse_body(body), Err(RelayError::InvalidBody)));
        }
        assert!(parse_body(b"{}").is_ok());
    }

    #[test]
    fn rejects_missing_or_non_array_brainrots() {
        assert!(matches!(validate(object(json!({}))), Err(RelayError::InvalidBrainrots)));
        assert!(matches!(
            validate(object(json!({"brainrots": "Los Tralaleritos"}))),
            Err(RelayError::InvalidBrainrots)
        ));
        assert!(matches!(
            validate(object(json!({"brainrots": null}))),
            Err(RelayError::InvalidBrainrots)
        ));
    }

    #[test]
    fn drops_blank_entries_and_keeps_order() {
        let report = validate(object(json!({
            "brainrots": ["b", "  ", "\n", "", null, " a\t", 3],
            "playerName": "X"
        })))
        .unwrap();
        // kept entries are forwarded as sanitized, not trimmed
        assert_eq!(report.brainrots, vec!["b", " a", "3"]);
        assert_eq!(report.player_name, Some(json!("X")));
    }

    #[test]
    fn truncates_to_first_twenty_five() {
        let items: Vec<String> = (0..30).map(|i| format!("item-{i}")).collect();
        let report = validate(object(json!({ "brainrots": items }))).unwrap();
        assert_eq!(report.brainrots.len(), MAX_BRAINROTS);
        assert_eq!(report.brainrots.first().unwrap(), "item-0");
        assert_eq!(report.brainrots.last().unwrap(), "item-24");
    }

    #[test]
    fn truncation_counts_dropped_entries() {
        let mut items = vec![json!(""); 25];
        items.push(json!("late"));
        let report = validate(object(json!({ "brainrots": items }))).unwrap();
        assert!(report.brainrots.is_empty());
    }

    #[test]
    fn caps_entry_length() {
        let report = validate(object(json!({ "brainrots": ["z".repeat(250)] }))).unwrap();
        assert_eq!(report.brainrots[0].chars().count(), BRAINROT_MAX_LEN);
    }
}

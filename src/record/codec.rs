//! Consent record codec and structural validator
//!
//! `decode` is deliberately lenient at the decision level: a structurally
//! invalid decision entry is dropped rather than failing the whole record,
//! provided at least one valid decision remains. Top-level structure is
//! strict: `sessionId`, `decisions`, `lastUpdated` and `version` must all be
//! present and well-formed.
//!
//! `encode` is the exact structural inverse for any record this crate
//! produces (round-trip law, see the tests).

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::errors::{CodecError, CodecResult};
use super::types::{ConsentDecision, ConsentRecord, ConsentStatus};

/// A decoded record plus how many decision entries were dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    /// The validated record
    pub record: ConsentRecord,
    /// Decision entries discarded as structurally invalid or duplicated
    pub dropped_decisions: usize,
}

/// Decodes and validates a persisted consent payload.
///
/// # Errors
///
/// - `CodecError::Malformed` when the payload is not a JSON object
/// - `CodecError::MissingField` when a required top-level field is absent
///   or of the wrong shape
/// - `CodecError::NoValidDecisions` when zero decision entries survive
///   validation
pub fn decode(raw: &str) -> CodecResult<DecodedRecord> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CodecError::Malformed(e.to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| CodecError::Malformed("payload is not an object".to_string()))?;

    let session_id = obj
        .get("sessionId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(CodecError::MissingField("sessionId"))?;

    let version = obj
        .get("version")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField("version"))?;

    let last_updated = obj
        .get("lastUpdated")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .ok_or(CodecError::MissingField("lastUpdated"))?;

    let raw_decisions = obj
        .get("decisions")
        .and_then(Value::as_array)
        .ok_or(CodecError::MissingField("decisions"))?;

    let mut decisions: Vec<ConsentDecision> = Vec::with_capacity(raw_decisions.len());
    let mut dropped = 0usize;

    for entry in raw_decisions {
        match decode_decision(entry) {
            // First decision per category wins; later duplicates are dropped.
            Some(d) if decisions.iter().all(|e| e.category_id != d.category_id) => {
                decisions.push(d)
            }
            _ => dropped += 1,
        }
    }

    if decisions.is_empty() {
        return Err(CodecError::NoValidDecisions);
    }

    let mut record = ConsentRecord::new(session_id, decisions, version, last_updated);
    record.user_id = optional_string(obj, "userId");
    record.ip_address = optional_string(obj, "ipAddress");
    record.user_agent = optional_string(obj, "userAgent");

    Ok(DecodedRecord {
        record,
        dropped_decisions: dropped,
    })
}

/// Serializes a consent record to its persisted JSON form.
pub fn encode(record: &ConsentRecord) -> CodecResult<String> {
    serde_json::to_string(record).map_err(|e| CodecError::EncodeFailed(e.to_string()))
}

fn decode_decision(entry: &Value) -> Option<ConsentDecision> {
    let obj = entry.as_object()?;

    let category_id = obj
        .get("categoryId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;
    let status = obj
        .get("status")
        .and_then(Value::as_str)
        .and_then(ConsentStatus::parse)?;
    let timestamp = obj
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;
    let version = obj.get("version").and_then(Value::as_str)?;

    Some(ConsentDecision::new(category_id, status, timestamp, version))
}

/// Normalizes an RFC 3339 timestamp to UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn optional_string(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

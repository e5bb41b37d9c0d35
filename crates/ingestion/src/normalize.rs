//! Record normalization: raw JSON object -> canonical `Record`.
//!
//! One shared coercion function handles every numeric-or-string field. A
//! field that fails to coerce is absent, never zero: zero is a valid
//! measurement and must stay distinguishable from "not provided".

use std::collections::BTreeMap;

use contracts::{Event, Record, RelayError, Sample, ScalarValue, SourceId};
use serde_json::Value;

/// Keys owned by the record envelope; never copied into an event's extras.
const RESERVED_KEYS: [&str; 4] = ["kind", "source", "event", "ts"];

/// Coerce a JSON value to a finite f64, or absent.
///
/// Accepts numbers and numeric strings. `NaN`, infinities, empty strings and
/// anything else coerce to `None`.
pub fn coerce_finite(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Validate and coerce a raw inbound object into a `Record`.
///
/// An object carrying a non-empty string `event` becomes an `Event` with its
/// remaining scalar fields preserved verbatim. Anything else must carry a
/// coercible `pitch` and becomes a `Sample`; optional numeric fields are
/// coerced independently and omitted when not coercible. `ts` falls back to
/// `now_ms` when absent or non-numeric.
///
/// # Errors
/// `RelayError::Validation` when neither an event string nor a coercible
/// pitch is present. No other field failure is fatal.
pub fn normalize(raw: &Value, source: SourceId, now_ms: i64) -> Result<Record, RelayError> {
    let ts = coerce_finite(raw.get("ts"))
        .map(|t| t as i64)
        .unwrap_or(now_ms);

    if let Some(event) = raw.get("event").and_then(Value::as_str) {
        if !event.is_empty() {
            return Ok(Record::Event(Event {
                source,
                event: event.to_string(),
                ts,
                extra: collect_extras(raw),
            }));
        }
    }

    let pitch = coerce_finite(raw.get("pitch"))
        .ok_or_else(|| RelayError::validation("pitch must be a number"))?;

    Ok(Record::Sample(Sample {
        source,
        pitch,
        ax: coerce_finite(raw.get("ax")),
        ay: coerce_finite(raw.get("ay")),
        az: coerce_finite(raw.get("az")),
        pitch_smooth: coerce_finite(raw.get("pitch_smooth")),
        roll: coerce_finite(raw.get("roll")),
        a_mag: coerce_finite(raw.get("a_mag")),
        dpitch: coerce_finite(raw.get("dpitch")),
        baseline_pitch: coerce_finite(raw.get("baseline_pitch")),
        button: coerce_finite(raw.get("button")),
        button_click: coerce_finite(raw.get("button_click")),
        ts,
    }))
}

/// Pass-through scalar fields of an event object. Nulls, arrays and nested
/// objects are dropped; numbers, strings and booleans survive verbatim.
fn collect_extras(raw: &Value) -> BTreeMap<String, ScalarValue> {
    let Some(object) = raw.as_object() else {
        return BTreeMap::new();
    };

    object
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let scalar = match value {
                Value::Bool(b) => ScalarValue::Bool(*b),
                Value::Number(n) => ScalarValue::Number(n.as_f64()?),
                Value::String(s) => ScalarValue::Text(s.clone()),
                _ => return None,
            };
            Some((key.clone(), scalar))
        })
        .collect()
}

//! Record - the canonical telemetry record
//!
//! Every accepted record is exactly one of two shapes: a `Sample` (numeric
//! posture measurement) or an `Event` (discrete occurrence). Records are
//! immutable once accepted; they are stored, appended, and broadcast as a
//! single snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::SourceId;

/// Canonical telemetry record, tagged by `kind`.
///
/// Serializes as one self-describing JSON object:
/// `{"kind":"sample",...}` or `{"kind":"event",...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// Numeric posture measurement
    Sample(Sample),

    /// Discrete occurrence (e.g. a calibration trigger)
    Event(Event),
}

impl Record {
    /// Originating source.
    pub fn source(&self) -> SourceId {
        match self {
            Record::Sample(s) => s.source,
            Record::Event(e) => e.source,
        }
    }

    /// Record timestamp (milliseconds since epoch).
    pub fn ts(&self) -> i64 {
        match self {
            Record::Sample(s) => s.ts,
            Record::Event(e) => e.ts,
        }
    }

    /// The `kind` tag as a static string (for logs/metrics labels).
    pub fn kind_str(&self) -> &'static str {
        match self {
            Record::Sample(_) => "sample",
            Record::Event(_) => "event",
        }
    }

    /// Borrow the sample payload, if this is a sample.
    pub fn as_sample(&self) -> Option<&Sample> {
        match self {
            Record::Sample(s) => Some(s),
            Record::Event(_) => None,
        }
    }
}

/// Posture measurement sample.
///
/// `pitch` is the only required measurement. Optional fields are omitted from
/// JSON when absent; "not measured" is distinguishable from "measured as zero".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Originating source
    pub source: SourceId,

    /// Pitch angle (degrees)
    pub pitch: f64,

    /// Raw acceleration, x axis (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ax: Option<f64>,

    /// Raw acceleration, y axis (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ay: Option<f64>,

    /// Raw acceleration, z axis (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub az: Option<f64>,

    /// Low-pass filtered pitch (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_smooth: Option<f64>,

    /// Roll angle (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,

    /// Acceleration magnitude (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_mag: Option<f64>,

    /// Pitch rate of change (degrees per sample)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpitch: Option<f64>,

    /// Calibrated baseline pitch (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_pitch: Option<f64>,

    /// Button state flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<f64>,

    /// Button click flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_click: Option<f64>,

    /// Milliseconds since epoch
    pub ts: i64,
}

/// Discrete event record.
///
/// Carries a pass-through bag of caller-supplied scalar fields; only `event`
/// itself is schema-validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Originating source
    pub source: SourceId,

    /// Event identifier (non-empty)
    pub event: String,

    /// Milliseconds since epoch
    pub ts: i64,

    /// Caller-supplied scalar fields, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, ScalarValue>,
}

/// Permitted scalar types for event pass-through fields.
///
/// Nulls, arrays, and nested objects are not representable; the normalizer
/// drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Ingest acknowledgment returned to producers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    /// Successful acknowledgment.
    pub const fn accepted() -> Self {
        Self { ok: true }
    }
}

//! Vital-sign samples — the fundamental unit of the telemetry store.
//!
//! A sample is an immutable observation of a subject's vitals at a point in
//! time. Samples are never updated or deleted; id assignment by the store is
//! the sole mutation point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque numeric identifier of a person. Resolving an id to a profile is
/// the job of the out-of-scope user directory.
pub type SubjectId = i64;

/// Store-assigned sample identifier. Strictly increasing across the whole
/// store (not per subject), so `after_id` comparisons stay meaningful even
/// across subjects sharing a dispatcher pool.
pub type SampleId = i64;

// ─── Vitals ──────────────────────────────────────────────────────────────────

/// One set of vital-sign readings.
///
/// Every field defaults to zero when absent from input: devices with a
/// partial sensor set may submit whatever readings they have. Wire names
/// (`blood_pressure_sys`, `blood_pressure_dia`) follow the device protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
  #[serde(default)]
  pub heart_rate:   i64,
  #[serde(default, rename = "blood_pressure_sys")]
  pub bp_systolic:  i64,
  #[serde(default, rename = "blood_pressure_dia")]
  pub bp_diastolic: i64,
  #[serde(default)]
  pub oxygen_level: i64,
  #[serde(default)]
  pub temperature:  f64,
  #[serde(default)]
  pub sugar_level:  f64,
}

// ─── Sample ──────────────────────────────────────────────────────────────────

/// An immutable vital-sign observation. Once stored, no field ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
  pub id:          SampleId,
  #[serde(rename = "user_id")]
  pub subject_id:  SubjectId,
  #[serde(flatten)]
  pub vitals:      Vitals,
  /// Store-assigned timestamp; never changes after creation.
  #[serde(rename = "timestamp")]
  pub captured_at: DateTime<Utc>,
}

// ─── NewSample ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::TelemetryStore::append`].
/// `id` and `captured_at` are always set by the store; they are not accepted
/// from callers.
#[derive(Debug, Clone)]
pub struct NewSample {
  pub subject_id: SubjectId,
  pub vitals:     Vitals,
}

//! SOS and medication alerts — low-volume event streams independent of the
//! telemetry path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sample::SubjectId;

/// Identifier of an SOS alert row.
pub type AlertId = i64;

/// Identifier of a medication-alert row.
pub type MedicationId = i64;

// ─── SOS ─────────────────────────────────────────────────────────────────────

/// Lifecycle of an SOS alert. The only transition is active → dismissed;
/// re-raising inserts a new alert rather than mutating an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SosStatus {
  Active,
  Dismissed,
}

impl SosStatus {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }
}

/// A patient-raised emergency event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosAlert {
  pub id:         AlertId,
  pub patient_id: SubjectId,
  pub status:     SosStatus,
  pub raised_at:  DateTime<Utc>,
}

// ─── Medication ──────────────────────────────────────────────────────────────

/// A scheduled dose awaiting acknowledgement.
///
/// `taken` only ever flips false → true; the core never reverses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationAlert {
  pub id:             MedicationId,
  #[serde(rename = "user_id")]
  pub subject_id:     SubjectId,
  pub med_name:       String,
  pub dosage:         String,
  /// Wall-clock time of day the dose is due, e.g. `"08:00"`.
  pub scheduled_time: String,
  pub taken:          bool,
}

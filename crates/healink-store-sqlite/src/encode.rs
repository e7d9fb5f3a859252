//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; SOS status as a lowercase
//! keyword; everything else is a native integer or real column.

use chrono::{DateTime, Utc};
use healink_core::{
  alert::{MedicationAlert, SosAlert, SosStatus},
  sample::{Sample, Vitals},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── SosStatus ───────────────────────────────────────────────────────────────

pub fn encode_sos_status(s: SosStatus) -> &'static str {
  match s {
    SosStatus::Active => "active",
    SosStatus::Dismissed => "dismissed",
  }
}

pub fn decode_sos_status(s: &str) -> Result<SosStatus> {
  match s {
    "active" => Ok(SosStatus::Active),
    "dismissed" => Ok(SosStatus::Dismissed),
    other => Err(Error::Core(healink_core::Error::UnknownSosStatus(
      other.to_string(),
    ))),
  }
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A `samples` row as read from SQLite, before timestamp decoding.
pub struct RawSample {
  pub id:           i64,
  pub subject_id:   i64,
  pub heart_rate:   i64,
  pub bp_systolic:  i64,
  pub bp_diastolic: i64,
  pub oxygen_level: i64,
  pub temperature:  f64,
  pub sugar_level:  f64,
  pub captured_at:  String,
}

impl RawSample {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      subject_id:   row.get(1)?,
      heart_rate:   row.get(2)?,
      bp_systolic:  row.get(3)?,
      bp_diastolic: row.get(4)?,
      oxygen_level: row.get(5)?,
      temperature:  row.get(6)?,
      sugar_level:  row.get(7)?,
      captured_at:  row.get(8)?,
    })
  }

  pub fn into_sample(self) -> Result<Sample> {
    Ok(Sample {
      id:          self.id,
      subject_id:  self.subject_id,
      vitals:      Vitals {
        heart_rate:   self.heart_rate,
        bp_systolic:  self.bp_systolic,
        bp_diastolic: self.bp_diastolic,
        oxygen_level: self.oxygen_level,
        temperature:  self.temperature,
        sugar_level:  self.sugar_level,
      },
      captured_at: decode_dt(&self.captured_at)?,
    })
  }
}

/// An `sos_alerts` row as read from SQLite.
pub struct RawSosAlert {
  pub id:         i64,
  pub patient_id: i64,
  pub status:     String,
  pub raised_at:  String,
}

impl RawSosAlert {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      patient_id: row.get(1)?,
      status:     row.get(2)?,
      raised_at:  row.get(3)?,
    })
  }

  pub fn into_alert(self) -> Result<SosAlert> {
    Ok(SosAlert {
      id:         self.id,
      patient_id: self.patient_id,
      status:     decode_sos_status(&self.status)?,
      raised_at:  decode_dt(&self.raised_at)?,
    })
  }
}

/// A `medication_alerts` row as read from SQLite.
pub struct RawMedicationAlert {
  pub id:             i64,
  pub subject_id:     i64,
  pub med_name:       String,
  pub dosage:         String,
  pub scheduled_time: String,
  pub taken:          i64,
}

impl RawMedicationAlert {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      subject_id:     row.get(1)?,
      med_name:       row.get(2)?,
      dosage:         row.get(3)?,
      scheduled_time: row.get(4)?,
      taken:          row.get(5)?,
    })
  }

  pub fn into_alert(self) -> MedicationAlert {
    MedicationAlert {
      id:             self.id,
      subject_id:     self.subject_id,
      med_name:       self.med_name,
      dosage:         self.dosage,
      scheduled_time: self.scheduled_time,
      taken:          self.taken != 0,
    }
  }
}

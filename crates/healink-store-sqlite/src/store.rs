//! [`SqliteStore`] — the SQLite implementation of the core store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use healink_core::{
  alert::{AlertId, MedicationAlert, MedicationId, SosAlert, SosStatus},
  sample::{NewSample, Sample, SampleId, SubjectId},
  store::{AlertStore, AssociationDirectory, TelemetryStore},
};

use crate::{
  Error, Result,
  encode::{RawMedicationAlert, RawSample, RawSosAlert, encode_dt, encode_sos_status},
  schema::SCHEMA,
};

const SAMPLE_COLS: &str =
  "id, subject_id, heart_rate, bp_systolic, bp_diastolic, oxygen_level, \
   temperature, sugar_level, captured_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Healink store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All writes
/// funnel through the one connection (single-writer append); WAL mode keeps
/// the concurrent live-feed pollers reading without blocking it.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Admin-collaborator surface ────────────────────────────────────────────
  //
  // Association rows and medication schedules are created by the admin
  // screens, which live outside this subsystem. The core traits only ever
  // read them; these inherent methods exist for that collaborator (and for
  // tests).

  /// Grant `monitor_id` visibility into `patient_id`. Idempotent.
  pub async fn grant(&self, monitor_id: SubjectId, patient_id: SubjectId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO associations (monitor_id, patient_id) VALUES (?1, ?2)",
          rusqlite::params![monitor_id, patient_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Remove the grant, if present.
  pub async fn revoke(&self, monitor_id: SubjectId, patient_id: SubjectId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM associations WHERE monitor_id = ?1 AND patient_id = ?2",
          rusqlite::params![monitor_id, patient_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Create a medication alert awaiting acknowledgement.
  pub async fn schedule_medication(
    &self,
    subject_id: SubjectId,
    med_name: &str,
    dosage: &str,
    scheduled_time: &str,
  ) -> Result<MedicationAlert> {
    let med_name = med_name.to_owned();
    let dosage = dosage.to_owned();
    let scheduled_time = scheduled_time.to_owned();

    let (id, med_name, dosage, scheduled_time) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO medication_alerts (subject_id, med_name, dosage, scheduled_time)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![subject_id, med_name, dosage, scheduled_time],
        )?;
        Ok((conn.last_insert_rowid(), med_name, dosage, scheduled_time))
      })
      .await?;

    Ok(MedicationAlert {
      id,
      subject_id,
      med_name,
      dosage,
      scheduled_time,
      taken: false,
    })
  }
}

// ─── TelemetryStore impl ─────────────────────────────────────────────────────

impl TelemetryStore for SqliteStore {
  type Error = Error;

  async fn append(&self, input: NewSample) -> Result<Sample> {
    let captured_at = Utc::now();
    let at_str = encode_dt(captured_at);
    let subject_id = input.subject_id;
    let v = input.vitals;

    let id: SampleId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO samples (
             subject_id, heart_rate, bp_systolic, bp_diastolic,
             oxygen_level, temperature, sugar_level, captured_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            subject_id,
            v.heart_rate,
            v.bp_systolic,
            v.bp_diastolic,
            v.oxygen_level,
            v.temperature,
            v.sugar_level,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Sample {
      id,
      subject_id,
      vitals: v,
      captured_at,
    })
  }

  async fn latest_after(
    &self,
    subject_id: SubjectId,
    after_id: SampleId,
  ) -> Result<Option<Sample>> {
    let raw: Option<RawSample> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SAMPLE_COLS} FROM samples
                 WHERE subject_id = ?1 AND id > ?2
                 ORDER BY id DESC LIMIT 1"
              ),
              rusqlite::params![subject_id, after_id],
              RawSample::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSample::into_sample).transpose()
  }

  async fn recent(&self, subject_id: SubjectId, limit: usize) -> Result<Vec<Sample>> {
    let limit = limit as i64;

    let raws: Vec<RawSample> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SAMPLE_COLS} FROM samples
           WHERE subject_id = ?1
           ORDER BY id DESC LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![subject_id, limit], RawSample::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Most-recent-first from the query; re-order oldest-first for delivery.
    let mut samples: Vec<Sample> = raws
      .into_iter()
      .map(RawSample::into_sample)
      .collect::<Result<_>>()?;
    samples.reverse();
    Ok(samples)
  }
}

// ─── AlertStore impl ─────────────────────────────────────────────────────────

impl AlertStore for SqliteStore {
  type Error = Error;

  async fn raise_sos(&self, patient_id: SubjectId) -> Result<SosAlert> {
    let raised_at = Utc::now();
    let at_str = encode_dt(raised_at);
    let status = encode_sos_status(SosStatus::Active).to_owned();

    let id: AlertId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sos_alerts (patient_id, status, raised_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![patient_id, status, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(SosAlert {
      id,
      patient_id,
      status: SosStatus::Active,
      raised_at,
    })
  }

  async fn get_sos(&self, alert_id: AlertId) -> Result<Option<SosAlert>> {
    let raw: Option<RawSosAlert> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, patient_id, status, raised_at FROM sos_alerts WHERE id = ?1",
              rusqlite::params![alert_id],
              RawSosAlert::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSosAlert::into_alert).transpose()
  }

  async fn dismiss_sos(&self, alert_id: AlertId) -> Result<bool> {
    let dismissed = encode_sos_status(SosStatus::Dismissed).to_owned();

    // Unconditional UPDATE keeps the call idempotent: re-dismissing an
    // already-dismissed alert writes the same terminal state again.
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE sos_alerts SET status = ?1 WHERE id = ?2",
          rusqlite::params![dismissed, alert_id],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn sos_active(&self, patient_id: SubjectId) -> Result<bool> {
    let active = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM sos_alerts WHERE patient_id = ?1 AND status = 'active' LIMIT 1",
              rusqlite::params![patient_id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(active)
  }

  async fn list_active_sos(&self) -> Result<Vec<SosAlert>> {
    let raws: Vec<RawSosAlert> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, patient_id, status, raised_at FROM sos_alerts
           WHERE status = 'active'
           ORDER BY id DESC",
        )?;
        let rows = stmt
          .query_map([], RawSosAlert::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSosAlert::into_alert).collect()
  }

  async fn acknowledge_medication(&self, med_id: MedicationId) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE medication_alerts SET taken = 1 WHERE id = ?1",
          rusqlite::params![med_id],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn pending_medications(&self, subject_id: SubjectId) -> Result<Vec<MedicationAlert>> {
    let raws: Vec<RawMedicationAlert> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, subject_id, med_name, dosage, scheduled_time, taken
           FROM medication_alerts
           WHERE subject_id = ?1 AND taken = 0
           ORDER BY scheduled_time ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject_id], RawMedicationAlert::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawMedicationAlert::into_alert).collect())
  }
}

// ─── AssociationDirectory impl ───────────────────────────────────────────────

impl AssociationDirectory for SqliteStore {
  type Error = Error;

  async fn is_associated(
    &self,
    monitor_id: SubjectId,
    patient_id: SubjectId,
  ) -> Result<bool> {
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM associations WHERE monitor_id = ?1 AND patient_id = ?2",
              rusqlite::params![monitor_id, patient_id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(found)
  }
}

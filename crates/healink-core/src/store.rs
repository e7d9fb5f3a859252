//! Store traits implemented by storage backends (e.g.
//! `healink-store-sqlite`).
//!
//! Higher layers (`healink-api`) depend on these abstractions, not on any
//! concrete backend. The telemetry log is append-only: no update or delete
//! is ever issued against stored samples.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  alert::{AlertId, MedicationAlert, MedicationId, SosAlert},
  sample::{NewSample, Sample, SampleId, SubjectId},
};

// ─── Telemetry ───────────────────────────────────────────────────────────────

/// Durable append-only log of vital-sign samples, queryable by recency.
///
/// The store must support concurrent readers and single-writer-at-a-time
/// appends: all active live-feed pollers read it while ingestion writes.
pub trait TelemetryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append one sample and return it with its assigned id and timestamp.
  ///
  /// The only mutation on the log. Ids come from a store-wide
  /// strictly-increasing sequence.
  fn append(
    &self,
    input: NewSample,
  ) -> impl Future<Output = Result<Sample, Self::Error>> + Send + '_;

  /// The newest sample for `subject_id` with `id > after_id`, if any.
  ///
  /// Deliberately skips any older undelivered samples: the live feed is
  /// "latest value", not "complete history".
  fn latest_after(
    &self,
    subject_id: SubjectId,
    after_id: SampleId,
  ) -> impl Future<Output = Result<Option<Sample>, Self::Error>> + Send + '_;

  /// The most recent `limit` samples for `subject_id`, re-ordered
  /// oldest-first for delivery.
  fn recent(
    &self,
    subject_id: SubjectId,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Sample>, Self::Error>> + Send + '_;
}

// ─── Alerts ──────────────────────────────────────────────────────────────────

/// SOS alerts and medication-reminder acknowledgements.
pub trait AlertStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a new active alert for `patient_id`.
  ///
  /// Always inserts, even while another alert for the same patient is still
  /// active. Missing a real emergency is worse than a duplicate, so there
  /// is no dedup.
  fn raise_sos(
    &self,
    patient_id: SubjectId,
  ) -> impl Future<Output = Result<SosAlert, Self::Error>> + Send + '_;

  /// Retrieve an alert by id. Returns `None` if not found.
  fn get_sos(
    &self,
    alert_id: AlertId,
  ) -> impl Future<Output = Result<Option<SosAlert>, Self::Error>> + Send + '_;

  /// Transition an alert to dismissed. Returns whether the alert existed.
  ///
  /// Idempotent: dismissing an already-dismissed alert is a no-op. Who may
  /// dismiss is enforced by the caller, not here.
  fn dismiss_sos(
    &self,
    alert_id: AlertId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Whether at least one active alert exists for `patient_id`. Polled by
  /// monitors for urgency indicators.
  fn sos_active(
    &self,
    patient_id: SubjectId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All currently-active alerts, newest first.
  fn list_active_sos(
    &self,
  ) -> impl Future<Output = Result<Vec<SosAlert>, Self::Error>> + Send + '_;

  /// Mark a dose as taken. Returns whether the row existed. Idempotent:
  /// re-acknowledging a taken dose is a no-op.
  fn acknowledge_medication(
    &self,
    med_id: MedicationId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Untaken doses for `subject_id`, ordered by scheduled time.
  fn pending_medications(
    &self,
    subject_id: SubjectId,
  ) -> impl Future<Output = Result<Vec<MedicationAlert>, Self::Error>> + Send + '_;
}

// ─── Associations ────────────────────────────────────────────────────────────

/// Read-only view of the monitor → patient grant relation.
///
/// Rows are created and deleted by an out-of-scope admin collaborator; the
/// core only ever reads them.
pub trait AssociationDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether an association row `(monitor_id, patient_id)` exists.
  fn is_associated(
    &self,
    monitor_id: SubjectId,
    patient_id: SubjectId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

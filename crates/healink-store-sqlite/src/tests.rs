//! Integration tests for `SqliteStore` against an in-memory database.

use healink_core::{
  alert::SosStatus,
  sample::{NewSample, Vitals},
  store::{AlertStore, AssociationDirectory, TelemetryStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn sample(subject_id: i64, heart_rate: i64) -> NewSample {
  NewSample {
    subject_id,
    vitals: Vitals {
      heart_rate,
      ..Default::default()
    },
  }
}

// ─── Telemetry ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_assigns_increasing_ids() {
  let s = store().await;

  let a = s.append(sample(1, 70)).await.unwrap();
  let b = s.append(sample(1, 71)).await.unwrap();
  // Ids come from a store-wide sequence, so another subject's append still
  // advances it.
  let c = s.append(sample(2, 90)).await.unwrap();
  let d = s.append(sample(1, 72)).await.unwrap();

  assert!(a.id < b.id);
  assert!(b.id < c.id);
  assert!(c.id < d.id);
}

#[tokio::test]
async fn append_preserves_vitals_and_defaults() {
  let s = store().await;

  let stored = s
    .append(NewSample {
      subject_id: 7,
      vitals:     Vitals {
        heart_rate: 72,
        ..Default::default()
      },
    })
    .await
    .unwrap();

  assert_eq!(stored.subject_id, 7);
  assert_eq!(stored.vitals.heart_rate, 72);
  assert_eq!(stored.vitals.bp_systolic, 0);
  assert_eq!(stored.vitals.bp_diastolic, 0);
  assert_eq!(stored.vitals.oxygen_level, 0);
  assert_eq!(stored.vitals.temperature, 0.0);
  assert_eq!(stored.vitals.sugar_level, 0.0);

  let fetched = s.recent(7, 50).await.unwrap();
  assert_eq!(fetched.len(), 1);
  assert_eq!(fetched[0].id, stored.id);
  assert_eq!(fetched[0].vitals, stored.vitals);
}

#[tokio::test]
async fn latest_after_returns_only_the_newest() {
  let s = store().await;

  let first = s.append(sample(3, 60)).await.unwrap();
  s.append(sample(3, 61)).await.unwrap();
  let third = s.append(sample(3, 62)).await.unwrap();

  // Two samples arrived since the cursor; only the latest comes back and
  // the middle one is skipped.
  let got = s.latest_after(3, first.id).await.unwrap().unwrap();
  assert_eq!(got.id, third.id);
  assert_eq!(got.vitals.heart_rate, 62);

  assert!(s.latest_after(3, third.id).await.unwrap().is_none());
}

#[tokio::test]
async fn latest_after_never_crosses_subjects() {
  let s = store().await;

  s.append(sample(1, 70)).await.unwrap();
  let other = s.append(sample(2, 90)).await.unwrap();

  let got = s.latest_after(2, 0).await.unwrap().unwrap();
  assert_eq!(got.id, other.id);
  assert_eq!(got.subject_id, 2);

  assert!(s.latest_after(3, 0).await.unwrap().is_none());
}

#[tokio::test]
async fn recent_is_oldest_first_and_capped() {
  let s = store().await;

  for hr in 0..60 {
    s.append(sample(5, hr)).await.unwrap();
  }

  let recent = s.recent(5, 50).await.unwrap();
  assert_eq!(recent.len(), 50);
  // The 10 oldest fell off the window; what remains is oldest-first.
  assert_eq!(recent.first().unwrap().vitals.heart_rate, 10);
  assert_eq!(recent.last().unwrap().vitals.heart_rate, 59);
  assert!(recent.windows(2).all(|w| w[0].id < w[1].id));
}

// ─── SOS alerts ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn raise_sos_twice_keeps_both_rows_active() {
  let s = store().await;

  let first = s.raise_sos(3).await.unwrap();
  let second = s.raise_sos(3).await.unwrap();

  assert_ne!(first.id, second.id);
  assert!(s.sos_active(3).await.unwrap());

  let active = s.list_active_sos().await.unwrap();
  let for_patient: Vec<_> = active.iter().filter(|a| a.patient_id == 3).collect();
  assert_eq!(for_patient.len(), 2);
  assert!(for_patient.iter().all(|a| a.status.is_active()));
}

#[tokio::test]
async fn dismiss_is_idempotent() {
  let s = store().await;

  let alert = s.raise_sos(4).await.unwrap();
  assert!(s.dismiss_sos(alert.id).await.unwrap());
  assert!(s.dismiss_sos(alert.id).await.unwrap());

  let stored = s.get_sos(alert.id).await.unwrap().unwrap();
  assert_eq!(stored.status, SosStatus::Dismissed);
  assert!(!s.sos_active(4).await.unwrap());
}

#[tokio::test]
async fn dismiss_unknown_alert_reports_absence() {
  let s = store().await;
  assert!(!s.dismiss_sos(999).await.unwrap());
}

#[tokio::test]
async fn dismissing_one_alert_leaves_others_active() {
  let s = store().await;

  let first = s.raise_sos(8).await.unwrap();
  s.raise_sos(8).await.unwrap();

  s.dismiss_sos(first.id).await.unwrap();
  assert!(s.sos_active(8).await.unwrap());
}

// ─── Medication alerts ───────────────────────────────────────────────────────

#[tokio::test]
async fn acknowledge_medication_is_idempotent() {
  let s = store().await;

  let med = s
    .schedule_medication(6, "Metformin", "500mg", "08:00")
    .await
    .unwrap();
  assert!(!med.taken);

  assert!(s.acknowledge_medication(med.id).await.unwrap());
  assert!(s.acknowledge_medication(med.id).await.unwrap());

  assert!(s.pending_medications(6).await.unwrap().is_empty());
}

#[tokio::test]
async fn acknowledge_unknown_medication_reports_absence() {
  let s = store().await;
  assert!(!s.acknowledge_medication(42).await.unwrap());
}

#[tokio::test]
async fn pending_medications_ordered_by_time() {
  let s = store().await;

  s.schedule_medication(6, "Amlodipine", "5mg", "20:00")
    .await
    .unwrap();
  s.schedule_medication(6, "Metformin", "500mg", "08:00")
    .await
    .unwrap();
  let taken = s
    .schedule_medication(6, "Aspirin", "75mg", "12:00")
    .await
    .unwrap();
  s.acknowledge_medication(taken.id).await.unwrap();

  let pending = s.pending_medications(6).await.unwrap();
  assert_eq!(pending.len(), 2);
  assert_eq!(pending[0].med_name, "Metformin");
  assert_eq!(pending[1].med_name, "Amlodipine");
}

// ─── Associations ────────────────────────────────────────────────────────────

#[tokio::test]
async fn grant_and_revoke_roundtrip() {
  let s = store().await;

  assert!(!s.is_associated(2, 9).await.unwrap());

  s.grant(2, 9).await.unwrap();
  s.grant(2, 9).await.unwrap(); // idempotent
  assert!(s.is_associated(2, 9).await.unwrap());
  // Directed relation: the reverse pair is not granted.
  assert!(!s.is_associated(9, 2).await.unwrap());

  s.revoke(2, 9).await.unwrap();
  assert!(!s.is_associated(2, 9).await.unwrap());
}

//! SOS and medication-acknowledgement handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/trigger_sos` | Caller raises an alert for themself |
//! | `GET`  | `/api/check_sos` | `?patient_id` required; guard-checked |
//! | `POST` | `/api/dismiss_sos` | `?id` required; monitor/admin only |
//! | `GET`  | `/api/active_sos` | Admin urgency board |
//! | `GET`  | `/api/meds` | `?user_id` required; pending doses |
//! | `GET`  | `/api/meds_update` | `?id` required; acknowledge a dose |

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use healink_core::{
  alert::{AlertId, MedicationAlert, MedicationId, SosAlert},
  guard,
  identity::Role,
  sample::SubjectId,
  store::{AlertStore, AssociationDirectory},
};

use crate::{AppState, auth::Viewer, error::ApiError};

// ─── Raise ───────────────────────────────────────────────────────────────────

/// `GET /api/trigger_sos` — raise an emergency for the calling patient.
///
/// Always inserts a fresh alert, even if one is already active: dedup is an
/// explicit non-goal because missing a real emergency is worse than a
/// duplicate row.
pub async fn trigger_sos<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
) -> Result<Json<Value>, ApiError>
where
  S: AlertStore + Clone + Send + Sync + 'static,
{
  let identity = viewer.require()?;

  state
    .store
    .raise_sos(identity.user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "success": true })))
}

// ─── Check ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckSosParams {
  pub patient_id: Option<SubjectId>,
}

/// `GET /api/check_sos?patient_id=` — whether any alert is active.
///
/// An anonymous caller gets 403 here, not 401 — that is the wire contract
/// monitors already poll against.
pub async fn check_sos<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  Query(params): Query<CheckSosParams>,
) -> Result<Json<Value>, ApiError>
where
  S: AlertStore + AssociationDirectory + Clone + Send + Sync + 'static,
{
  let identity = viewer.identity().ok_or(ApiError::Forbidden)?;
  let patient_id = params
    .patient_id
    .ok_or_else(|| ApiError::BadRequest("Missing patient_id".to_string()))?;

  let permitted = guard::can_view(state.store.as_ref(), identity, patient_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !permitted {
    return Err(ApiError::Forbidden);
  }

  let active = state
    .store
    .sos_active(patient_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "active": active })))
}

// ─── Dismiss ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DismissSosParams {
  pub id: Option<AlertId>,
}

/// `POST /api/dismiss_sos?id=` — stand an alert down.
///
/// Monitor/admin-triggered: a monitor needs an association with the
/// alert's patient. Idempotent — dismissing an already-dismissed alert
/// succeeds and changes nothing.
pub async fn dismiss_sos<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  Query(params): Query<DismissSosParams>,
) -> Result<Json<Value>, ApiError>
where
  S: AlertStore + AssociationDirectory + Clone + Send + Sync + 'static,
{
  let identity = viewer.require()?;
  let alert_id = params
    .id
    .ok_or_else(|| ApiError::BadRequest("Missing id".to_string()))?;

  let alert = state
    .store
    .get_sos(alert_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("sos alert {alert_id} not found")))?;

  let permitted = identity.role == Role::Admin
    || (identity.role.is_monitor()
      && state
        .store
        .is_associated(identity.user_id, alert.patient_id)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?);
  if !permitted {
    return Err(ApiError::Forbidden);
  }

  state
    .store
    .dismiss_sos(alert_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "status": "success" })))
}

// ─── Admin board ─────────────────────────────────────────────────────────────

/// `GET /api/active_sos` — all active alerts, newest first. Admin only.
pub async fn active_sos<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
) -> Result<Json<Vec<SosAlert>>, ApiError>
where
  S: AlertStore + Clone + Send + Sync + 'static,
{
  let identity = viewer.require()?;
  if identity.role != Role::Admin {
    return Err(ApiError::Forbidden);
  }

  let alerts = state
    .store
    .list_active_sos()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(alerts))
}

// ─── Medication ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MedsParams {
  pub user_id: Option<SubjectId>,
}

/// `GET /api/meds?user_id=` — untaken doses for a subject, by time of day.
pub async fn pending_meds<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  Query(params): Query<MedsParams>,
) -> Result<Json<Vec<MedicationAlert>>, ApiError>
where
  S: AlertStore + AssociationDirectory + Clone + Send + Sync + 'static,
{
  let subject_id = params
    .user_id
    .ok_or_else(|| ApiError::BadRequest("Missing user_id".to_string()))?;

  let identity = viewer.require()?;
  let permitted = guard::can_view(state.store.as_ref(), identity, subject_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !permitted {
    return Err(ApiError::Forbidden);
  }

  let meds = state
    .store
    .pending_medications(subject_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(meds))
}

#[derive(Debug, Deserialize)]
pub struct MedsUpdateParams {
  pub id: Option<MedicationId>,
}

/// `GET /api/meds_update?id=` — acknowledge a dose. Idempotent.
pub async fn meds_update<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<MedsUpdateParams>,
) -> Result<Json<Value>, ApiError>
where
  S: AlertStore + Clone + Send + Sync + 'static,
{
  let med_id = params
    .id
    .ok_or_else(|| ApiError::BadRequest("Missing id".to_string()))?;

  let found = state
    .store
    .acknowledge_medication(med_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !found {
    return Err(ApiError::NotFound(format!(
      "medication alert {med_id} not found"
    )));
  }

  Ok(Json(json!({ "status": "success" })))
}

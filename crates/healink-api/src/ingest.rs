//! Handler for `POST /api/update` — the single write path for samples.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Deserialize;
use serde_json::{Value, json};

use healink_core::{
  sample::{NewSample, SubjectId, Vitals},
  store::TelemetryStore,
};

use crate::{AppState, error::ApiError};

/// JSON body accepted by `POST /api/update`.
///
/// The credential may ride in the body instead of the `X-API-Key` header;
/// vitals the device cannot measure are simply omitted and default to 0.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub api_key: Option<String>,
  pub user_id: Option<SubjectId>,
  #[serde(flatten)]
  pub vitals:  Vitals,
}

/// `POST /api/update` — validate and append one sample.
///
/// Duplicate submits create duplicate samples on purpose: vitals are
/// commutative observations, so retry-on-failure belongs to the device and
/// the server needs no idempotency key.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: String,
) -> Result<Json<Value>, ApiError>
where
  S: TelemetryStore + Clone + Send + Sync + 'static,
{
  // The credential check comes first and ignores payload validity: a caller
  // without the secret learns nothing about what a well-formed body looks
  // like.
  let parsed: Option<UpdateBody> = serde_json::from_str(&body).ok();

  let header_ok = headers
    .get("x-api-key")
    .and_then(|v| v.to_str().ok())
    .is_some_and(|k| state.auth.matches(k));
  let body_ok = parsed
    .as_ref()
    .and_then(|b| b.api_key.as_deref())
    .is_some_and(|k| state.auth.matches(k));

  if !header_ok && !body_ok {
    return Err(ApiError::Unauthorized("Unauthorized: Invalid API Key"));
  }

  let payload =
    parsed.ok_or_else(|| ApiError::BadRequest("Invalid JSON body".to_string()))?;
  let subject_id = payload
    .user_id
    .ok_or_else(|| ApiError::BadRequest("Missing user_id".to_string()))?;

  state
    .store
    .append(NewSample {
      subject_id,
      vitals: payload.vitals,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "status": "success", "message": "Data updated" })))
}

//! Handler for `GET /api/history` — recent samples for one subject.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;

use healink_core::{
  guard,
  sample::{Sample, SubjectId},
  store::{AssociationDirectory, TelemetryStore},
};

use crate::{AppState, auth::Viewer, error::ApiError};

/// How far back the history window reaches.
const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub user_id: Option<SubjectId>,
}

/// `GET /api/history?user_id=` — the 50 most recent samples, oldest first.
pub async fn history<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Sample>>, ApiError>
where
  S: TelemetryStore + AssociationDirectory + Clone + Send + Sync + 'static,
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

  let samples = state
    .store
    .recent(subject_id, HISTORY_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(samples))
}

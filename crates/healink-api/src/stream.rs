//! The live-feed dispatcher — `GET /api/stream`.
//!
//! Each subscription runs an independent polling task holding its own
//! cursor; there is no shared cursor state across viewers and no
//! deduplication of identical store queries. Acceptable for an advisory,
//! low-rate domain; the natural hardening direction is a publish-capable
//! log with blocking reads instead of fixed-interval polling.

use std::{sync::Arc, time::Duration};

use axum::{
  extract::{Query, State},
  response::sse::{Event, KeepAlive, Sse},
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt as _, wrappers::ReceiverStream};

use healink_core::{
  guard,
  sample::{Sample, SampleId, SubjectId},
  store::{AssociationDirectory, TelemetryStore},
};

use crate::{AppState, auth::Viewer, error::ApiError};

/// Samples buffered between the poller and a slow SSE transport before the
/// poller stops advancing its cursor.
const FEED_BUFFER: usize = 16;

#[derive(Debug, Deserialize)]
pub struct StreamParams {
  pub user_id: Option<SubjectId>,
}

/// `GET /api/stream?user_id=` — subscribe to a subject's live feed.
///
/// Authorization happens once, here, at subscribe time. The stream is then
/// unbounded: it ends only when the client closes the transport, which
/// tears the polling task down within one poll interval.
pub async fn subscribe<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  Query(params): Query<StreamParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError>
where
  S: TelemetryStore + AssociationDirectory + Clone + Send + Sync + 'static,
{
  // An explicit ?user_id= names the subject; otherwise the caller watches
  // their own feed.
  let identity = viewer.require()?;
  let subject_id = params.user_id.unwrap_or(identity.user_id);

  let permitted = guard::can_view(state.store.as_ref(), identity, subject_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !permitted {
    return Err(ApiError::Forbidden);
  }

  let rx = spawn_feed(
    state.store.clone(),
    subject_id,
    state.config.poll_interval(),
  );

  let stream =
    ReceiverStream::new(rx).map(|sample| Event::default().json_data(&sample));
  Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Spawn the per-subscription polling task and hand back its output.
///
/// Cursor-based long-poll: each tick delivers at most the single newest
/// sample with an id above the cursor. Samples arriving faster than the
/// tick are skipped on purpose — the feed is "latest value", not
/// "complete history".
///
/// The task notices the subscriber going away within one poll interval:
/// the sleep races the channel's closed-notification, and a failed send
/// exits immediately. Delivered ids are strictly increasing per
/// subscription because the cursor only ever advances.
fn spawn_feed<S>(
  store: Arc<S>,
  subject_id: SubjectId,
  interval: Duration,
) -> mpsc::Receiver<Sample>
where
  S: TelemetryStore + Clone + Send + Sync + 'static,
{
  let (tx, rx) = mpsc::channel(FEED_BUFFER);

  tokio::spawn(async move {
    let mut last_delivered: SampleId = 0;
    loop {
      match store.latest_after(subject_id, last_delivered).await {
        Ok(Some(sample)) => {
          last_delivered = sample.id;
          if tx.send(sample).await.is_err() {
            break;
          }
        }
        Ok(None) => {}
        // One failed poll must not kill an otherwise-healthy feed.
        Err(e) => {
          tracing::warn!(subject_id, error = %e, "live-feed poll failed");
        }
      }

      tokio::select! {
        _ = tx.closed() => break,
        _ = tokio::time::sleep(interval) => {}
      }
    }
    tracing::debug!(subject_id, "live-feed subscription closed");
  });

  rx
}

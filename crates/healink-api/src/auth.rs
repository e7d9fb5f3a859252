//! Device-credential verification and the viewer-identity extractor.
//!
//! Two kinds of caller reach this API: field devices, which present a
//! pre-shared secret, and human viewers, whose session is resolved by an
//! out-of-scope collaborator that injects `X-User-Id` / `X-Role` headers.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use sha2::{Digest as _, Sha256};

use healink_core::identity::Identity;

use crate::error::ApiError;

// ─── Device credential ───────────────────────────────────────────────────────

/// The pre-shared device secret accepted by the ingest endpoint.
pub struct DeviceKey(String);

impl DeviceKey {
  pub fn new(secret: impl Into<String>) -> Self { Self(secret.into()) }

  /// Whether `candidate` matches the configured secret.
  ///
  /// Compares SHA-256 digests rather than the strings themselves, so the
  /// comparison does not stop at the first differing byte and leak the
  /// match length through timing.
  pub fn matches(&self, candidate: &str) -> bool {
    Sha256::digest(self.0.as_bytes()) == Sha256::digest(candidate.as_bytes())
  }
}

// ─── Viewer identity ─────────────────────────────────────────────────────────

/// The caller's identity, if the session collaborator supplied one.
///
/// Extraction never rejects: each handler decides between 401 and 403 for
/// an absent identity, since the endpoints disagree on that status code.
pub struct Viewer(Option<Identity>);

impl Viewer {
  pub fn identity(&self) -> Option<Identity> { self.0 }

  /// The identity, or 401 for anonymous callers.
  pub fn require(&self) -> Result<Identity, ApiError> {
    self.0.ok_or(ApiError::Unauthorized("Unauthorized"))
  }
}

fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
  let user_id = headers.get("x-user-id")?.to_str().ok()?.parse().ok()?;
  let role = headers.get("x-role")?.to_str().ok()?.parse().ok()?;
  Some(Identity { user_id, role })
}

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    Ok(Self(identity_from_headers(&parts.headers)))
  }
}

//! The access guard — the single predicate deciding whether a viewer may
//! observe a subject's telemetry and alerts.

use crate::{
  identity::{Identity, Role},
  sample::SubjectId,
  store::AssociationDirectory,
};

/// Whether `viewer` may read samples and alerts for `subject_id`.
///
/// Admins and the subject themself pass immediately; anyone else needs an
/// association row `(monitor_id = viewer, patient_id = subject)`.
///
/// The directory is consulted on every call. Associations change between
/// requests, and a cached answer would keep leaking data after a
/// revocation.
pub async fn can_view<D>(
  directory: &D,
  viewer: Identity,
  subject_id: SubjectId,
) -> Result<bool, D::Error>
where
  D: AssociationDirectory,
{
  if viewer.role == Role::Admin || viewer.user_id == subject_id {
    return Ok(true);
  }
  directory.is_associated(viewer.user_id, subject_id).await
}

//! Caller identity — who is asking, and in what role.
//!
//! Resolving a session cookie to an identity is the job of an out-of-scope
//! collaborator; the core only consumes the result.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, sample::SubjectId};

/// The closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Admin,
  Patient,
  HomeNurse,
  MigrantWorker,
  Caregiver,
}

impl Role {
  /// Roles that observe other subjects' telemetry through associations.
  pub fn is_monitor(self) -> bool {
    matches!(self, Self::HomeNurse | Self::MigrantWorker | Self::Caregiver)
  }
}

impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "admin" => Ok(Self::Admin),
      "patient" => Ok(Self::Patient),
      "home_nurse" => Ok(Self::HomeNurse),
      "migrant_worker" => Ok(Self::MigrantWorker),
      "caregiver" => Ok(Self::Caregiver),
      other => Err(Error::UnknownRole(other.to_string())),
    }
  }
}

/// An authenticated caller, as resolved by the session collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
  pub user_id: SubjectId,
  pub role:    Role,
}

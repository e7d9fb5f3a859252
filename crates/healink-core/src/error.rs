//! Error types for `healink-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("unknown sos status: {0:?}")]
  UnknownSosStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

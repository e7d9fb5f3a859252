//! SQL schema for the Healink SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The telemetry log is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table. The AUTOINCREMENT
-- primary key doubles as the store-wide monotonic sample sequence.
CREATE TABLE IF NOT EXISTS samples (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id    INTEGER NOT NULL,
    heart_rate    INTEGER NOT NULL DEFAULT 0,
    bp_systolic   INTEGER NOT NULL DEFAULT 0,
    bp_diastolic  INTEGER NOT NULL DEFAULT 0,
    oxygen_level  INTEGER NOT NULL DEFAULT 0,
    temperature   REAL    NOT NULL DEFAULT 0,
    sugar_level   REAL    NOT NULL DEFAULT 0,
    captured_at   TEXT    NOT NULL     -- ISO 8601 UTC; server-assigned
);

-- Re-raising an SOS inserts a new row; the only mutation is
-- status 'active' -> 'dismissed'.
CREATE TABLE IF NOT EXISTS sos_alerts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id  INTEGER NOT NULL,
    status      TEXT    NOT NULL DEFAULT 'active',  -- 'active' | 'dismissed'
    raised_at   TEXT    NOT NULL
);

-- The only mutation is taken 0 -> 1.
CREATE TABLE IF NOT EXISTS medication_alerts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id      INTEGER NOT NULL,
    med_name        TEXT    NOT NULL,
    dosage          TEXT    NOT NULL,
    scheduled_time  TEXT    NOT NULL,
    taken           INTEGER NOT NULL DEFAULT 0
);

-- Monitor -> patient grant relation; rows are managed by the admin
-- surface and read-only to the core.
CREATE TABLE IF NOT EXISTS associations (
    monitor_id  INTEGER NOT NULL,
    patient_id  INTEGER NOT NULL,
    PRIMARY KEY (monitor_id, patient_id)
);

CREATE INDEX IF NOT EXISTS samples_subject_idx    ON samples(subject_id, id);
CREATE INDEX IF NOT EXISTS sos_patient_status_idx ON sos_alerts(patient_id, status);
CREATE INDEX IF NOT EXISTS meds_subject_idx       ON medication_alerts(subject_id, taken);

PRAGMA user_version = 1;
";

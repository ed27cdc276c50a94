//! # Clinica Core
//!
//! Core logic for the clinic appointment console:
//! - Record codec for the delimited flat-file format (`codec`)
//! - Entity records and their row mapping (`records`)
//! - In-memory store loaded from and flushed to four files (`store`)
//! - Double-booking detection (`scheduler`)
//! - Bounded-attempt login (`access`)
//! - First-run storage bootstrap (`bootstrap`)
//!
//! **No console concerns**: prompting, menus and output formatting belong in the
//! `clinica` binary.

pub mod access;
pub mod bootstrap;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod records;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use access::{AccessDecision, AccessGate, CredentialSource, LoginAttempt};
pub use config::CoreConfig;
pub use error::{ClinicError, ClinicResult, RecordKind};
pub use records::{Appointment, AppointmentTime, Credential, Doctor, Patient, Record};
pub use store::{AppointmentFilter, Store};

//! In-memory collections backed by flat files.
//!
//! The [`Store`] owns the four collections for one run of the program. They are
//! read once by [`Store::load`] and written back on demand, each collection to its
//! own file, always as a full rewrite in insertion order.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//!   admins.csv       # admin_id,nombre,password
//!   doctores.csv     # doctor_id,nombre,especialidad
//!   pacientes.csv    # paciente_id,nombre
//!   citas.csv        # cita_id,fecha_hora,motivo,doctor_id,paciente_id
//! ```
//!
//! ## Failure model
//!
//! Loading never fails: unreadable files load as empty collections and malformed
//! rows are skipped with a warning. Saving replaces the target file atomically
//! through a temporary file in the same directory. A failed save leaves the
//! in-memory collections as they are so the operator can retry.

use crate::codec;
use crate::config::CoreConfig;
use crate::records::{
    parse_date, Appointment, AppointmentTime, Credential, Doctor, Patient, Record,
};
use crate::scheduler;
use crate::validation::require_field;
use crate::{ClinicError, ClinicResult};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Selection applied when listing appointments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentFilter {
    All,
    OnDate(NaiveDate),
    Doctor(String),
    Patient(String),
}

impl AppointmentFilter {
    /// Builds a date filter from `YYYY-MM-DD` input.
    pub fn on_date(date: &str) -> ClinicResult<Self> {
        parse_date(date).map(AppointmentFilter::OnDate)
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        match self {
            AppointmentFilter::All => true,
            AppointmentFilter::OnDate(date) => appointment.date_time.date() == *date,
            AppointmentFilter::Doctor(id) => appointment.doctor_id.as_deref() == Some(id.as_str()),
            AppointmentFilter::Patient(id) => {
                appointment.patient_id.as_deref() == Some(id.as_str())
            }
        }
    }
}

/// Decodes one record into `T`, rejecting a blank identifier.
fn parse_row<T: Record>(record: &str) -> ClinicResult<T> {
    let parsed = T::from_fields(&codec::decode(record))?;
    if parsed.id().trim().is_empty() {
        return Err(ClinicError::MalformedInput(format!(
            "{} row has no id",
            T::KIND
        )));
    }
    Ok(parsed)
}

/// Reads one collection from `path`.
///
/// The first record is the header and is skipped, as are blank records. Rows with
/// too few fields, an empty identifier, an identifier already seen, or a value the
/// record type cannot parse are skipped with a warning. Extra trailing fields are
/// ignored. If the file cannot be read the collection is empty.
///
/// A record spanning several physical lines is kept only if it parses as a whole.
/// Otherwise (a quote opened by hand and never closed, or too few fields) each of
/// its lines is read on its own, so one bad line never hides the rows after it.
pub fn load_collection<T: Record>(path: &Path) -> Vec<T> {
    let bytes = match fs::read(path).map_err(ClinicError::FileRead) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "{} collection starts empty",
                T::KIND
            );
            return Vec::new();
        }
    };
    let text = String::from_utf8_lossy(&bytes);

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    let mut keep = |row: usize, parsed: ClinicResult<T>| {
        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    row,
                    error = %e,
                    "skipping malformed {} row",
                    T::KIND
                );
                return;
            }
        };
        if seen.insert(parsed.id().to_string()) {
            rows.push(parsed);
        } else {
            tracing::warn!(
                path = %path.display(),
                row,
                id = parsed.id(),
                "skipping duplicate {} id",
                T::KIND
            );
        }
    };

    for (index, record) in codec::split_records(&text).into_iter().enumerate().skip(1) {
        if record.trim().is_empty() {
            continue;
        }
        let row = index + 1;
        if !record.contains('\n') {
            keep(row, parse_row::<T>(record));
            continue;
        }

        let whole = if codec::has_open_quote(record) {
            Err(ClinicError::MalformedInput("quoted field is never closed".into()))
        } else {
            parse_row::<T>(record)
        };
        match whole {
            Ok(parsed) => keep(row, Ok(parsed)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    row,
                    error = %e,
                    "reading multi-line {} record line by line",
                    T::KIND
                );
                for line in record.lines().filter(|line| !line.trim().is_empty()) {
                    keep(row, parse_row::<T>(line));
                }
            }
        }
    }

    tracing::debug!(path = %path.display(), count = rows.len(), "loaded {} collection", T::KIND);
    rows
}

/// Writes `rows` to `path` as the header followed by one encoded line per row.
///
/// # Errors
///
/// Returns `ClinicError::FileWrite` if the temporary file cannot be written or
/// cannot replace `path`. The previous file content is intact in that case.
pub fn save_collection<T: Record>(path: &Path, rows: &[T]) -> ClinicResult<()> {
    let mut contents = String::with_capacity(T::HEADER.len() + 1 + rows.len() * 32);
    contents.push_str(T::HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(&codec::encode(&row.to_fields()));
        contents.push('\n');
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(ClinicError::FileWrite)?;
    // Temp files are created owner-only; keep whatever mode the target already has.
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(ClinicError::FileWrite)?;
    }
    tmp.write_all(contents.as_bytes())
        .map_err(ClinicError::FileWrite)?;
    tmp.as_file().sync_all().map_err(ClinicError::FileWrite)?;
    tmp.persist(path).map_err(|e| ClinicError::FileWrite(e.error))?;

    tracing::debug!(path = %path.display(), count = rows.len(), "saved {} collection", T::KIND);
    Ok(())
}

/// Appends `candidate` unless its identifier is already present.
///
/// # Errors
///
/// Returns `ClinicError::DuplicateId` and leaves `collection` unchanged if the
/// identifier is taken.
pub fn register<T: Record>(collection: &mut Vec<T>, candidate: T) -> ClinicResult<()> {
    if collection.iter().any(|existing| existing.id() == candidate.id()) {
        return Err(ClinicError::DuplicateId {
            kind: T::KIND,
            id: candidate.id().to_string(),
        });
    }
    collection.push(candidate);
    Ok(())
}

/// The clinic's data for one run of the program.
#[derive(Debug)]
pub struct Store {
    cfg: Arc<CoreConfig>,
    admins: Vec<Credential>,
    doctors: Vec<Doctor>,
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
}

impl Store {
    /// Loads all four collections from the files named by `cfg`.
    pub fn load(cfg: Arc<CoreConfig>) -> Self {
        let admins = load_collection(&cfg.admins_path());
        let doctors = load_collection(&cfg.doctors_path());
        let patients = load_collection(&cfg.patients_path());
        let appointments = load_collection(&cfg.appointments_path());

        tracing::info!(
            admins = admins.len(),
            doctors = doctors.len(),
            patients = patients.len(),
            appointments = appointments.len(),
            "store loaded"
        );

        Self {
            cfg,
            admins,
            doctors,
            patients,
            appointments,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn admins(&self) -> &[Credential] {
        &self.admins
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn doctor(&self, id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// Registers a doctor and persists the doctors file.
    ///
    /// # Errors
    ///
    /// - `MalformedInput` if any field is blank
    /// - `DuplicateId` if the identifier is taken
    /// - `FileWrite` if persisting fails (the doctor stays registered in memory)
    pub fn register_doctor(&mut self, id: &str, name: &str, specialty: &str) -> ClinicResult<()> {
        let doctor = Doctor {
            id: require_field("doctor id", id)?,
            name: require_field("name", name)?,
            specialty: require_field("specialty", specialty)?,
        };
        register(&mut self.doctors, doctor)?;
        save_collection(&self.cfg.doctors_path(), &self.doctors)
    }

    /// Registers a patient and persists the patients file.
    pub fn register_patient(&mut self, id: &str, name: &str) -> ClinicResult<()> {
        let patient = Patient {
            id: require_field("patient id", id)?,
            name: require_field("name", name)?,
        };
        register(&mut self.patients, patient)?;
        save_collection(&self.cfg.patients_path(), &self.patients)
    }

    /// Creates an unassigned appointment from console input and persists the
    /// appointments file.
    ///
    /// # Errors
    ///
    /// - `MalformedInput` if a field is blank or the date/time does not parse
    /// - `DuplicateId` if the identifier is taken
    /// - `FileWrite` if persisting fails
    pub fn create_appointment(
        &mut self,
        id: &str,
        date: &str,
        time: &str,
        reason: &str,
    ) -> ClinicResult<()> {
        let id = require_field("appointment id", id)?;
        let date = require_field("date", date)?;
        let time = require_field("time", time)?;
        let reason = require_field("reason", reason)?;

        if self.appointment(&id).is_some() {
            return Err(ClinicError::DuplicateId {
                kind: Appointment::KIND,
                id,
            });
        }
        let date_time = AppointmentTime::from_date_and_time(&date, &time)?;

        register(
            &mut self.appointments,
            Appointment::unassigned(id, date_time, reason),
        )?;
        save_collection(&self.cfg.appointments_path(), &self.appointments)
    }

    /// Assigns a doctor and a patient to an existing appointment.
    ///
    /// The appointment being updated is excluded from the conflict check, so
    /// re-linking it to the same doctor and patient succeeds.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no appointment has `appointment_id`
    /// - `InvalidDoctor` / `InvalidPatient` if a reference does not exist
    /// - `ScheduleConflict` if the doctor or patient is already booked at that time
    /// - `FileWrite` if persisting fails (the link stays in memory)
    pub fn link_appointment(
        &mut self,
        appointment_id: &str,
        doctor_id: &str,
        patient_id: &str,
    ) -> ClinicResult<()> {
        let appointment_id = appointment_id.trim();
        let doctor_id = doctor_id.trim();
        let patient_id = patient_id.trim();

        let index = self
            .appointments
            .iter()
            .position(|a| a.id == appointment_id)
            .ok_or_else(|| ClinicError::NotFound(appointment_id.to_string()))?;
        if self.doctor(doctor_id).is_none() {
            return Err(ClinicError::InvalidDoctor(doctor_id.to_string()));
        }
        if self.patient(patient_id).is_none() {
            return Err(ClinicError::InvalidPatient(patient_id.to_string()));
        }

        let date_time = self.appointments[index].date_time;
        if let Some(existing) = scheduler::find_conflict(
            &self.appointments,
            date_time,
            Some(doctor_id),
            Some(patient_id),
            Some(appointment_id),
        ) {
            return Err(ClinicError::ScheduleConflict {
                date_time: date_time.to_string(),
                conflicting_id: existing.id.clone(),
            });
        }

        let appointment = &mut self.appointments[index];
        appointment.doctor_id = Some(doctor_id.to_string());
        appointment.patient_id = Some(patient_id.to_string());
        tracing::info!(appointment_id, doctor_id, patient_id, "appointment linked");

        save_collection(&self.cfg.appointments_path(), &self.appointments)
    }

    /// Appointments selected by `filter`, ordered by date-time.
    ///
    /// Appointments at the same date-time keep their insertion order. The stored
    /// collection is not reordered.
    pub fn appointments_matching(&self, filter: &AppointmentFilter) -> Vec<&Appointment> {
        let mut selected: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|a| filter.matches(a))
            .collect();
        selected.sort_by_key(|a| a.date_time);
        selected
    }

    /// Persists all four collections.
    ///
    /// Every file is attempted even if an earlier one fails; the first failure is
    /// returned.
    pub fn save_all(&self) -> ClinicResult<()> {
        let results = [
            save_collection(&self.cfg.admins_path(), &self.admins),
            save_collection(&self.cfg.doctors_path(), &self.doctors),
            save_collection(&self.cfg.patients_path(), &self.patients),
            save_collection(&self.cfg.appointments_path(), &self.appointments),
        ];

        let mut first_error = None;
        for result in results {
            if let Err(e) = result {
                tracing::error!(error = %e, "failed to save collection");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                tracing::info!(data_dir = %self.cfg.data_dir().display(), "all collections saved");
                Ok(())
            }
        }
    }
}

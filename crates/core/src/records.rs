//! Entity records and their mapping to delimited rows.
//!
//! Each entity implements [`Record`], which ties it to its header line and to the
//! ordered list of fields it occupies in its file. Field order is part of the
//! on-disk contract.

use crate::constants::{
    ADMINS_HEADER, APPOINTMENTS_HEADER, APPOINTMENT_TIME_FORMAT, DATE_FORMAT, DOCTORS_HEADER,
    PATIENTS_HEADER, TIME_FORMAT,
};
use crate::error::RecordKind;
use crate::{ClinicError, ClinicResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::str::FromStr;

/// A row type stored in one flat file.
pub trait Record: Sized {
    const KIND: RecordKind;
    const HEADER: &'static str;
    /// Minimum number of fields a row must carry to be readable.
    const FIELD_COUNT: usize;

    fn id(&self) -> &str;

    fn to_fields(&self) -> Vec<String>;

    /// Builds a record from a decoded row.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::MalformedInput` if the row holds fewer than
    /// `FIELD_COUNT` fields or a field cannot be parsed.
    fn from_fields(fields: &[String]) -> ClinicResult<Self>;
}

/// Rejects rows too short for `T`.
fn check_field_count<T: Record>(fields: &[String]) -> ClinicResult<()> {
    if fields.len() < T::FIELD_COUNT {
        return Err(ClinicError::MalformedInput(format!(
            "{} row has {} fields, expected {}",
            T::KIND,
            fields.len(),
            T::FIELD_COUNT
        )));
    }
    Ok(())
}

/// Appointment date-time at minute precision, without timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppointmentTime(NaiveDateTime);

impl AppointmentTime {
    /// Combines a `YYYY-MM-DD` date and an `HH:mm` time as entered at the console.
    pub fn from_date_and_time(date: &str, time: &str) -> ClinicResult<Self> {
        let date = parse_date(date)?;
        let time = NaiveTime::parse_from_str(time.trim(), TIME_FORMAT)
            .map_err(|e| ClinicError::MalformedInput(format!("invalid time {time:?}: {e}")))?;
        Ok(Self(date.and_time(time)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

impl FromStr for AppointmentTime {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s.trim(), APPOINTMENT_TIME_FORMAT)
            .map(Self)
            .map_err(|e| ClinicError::MalformedInput(format!("invalid date-time {s:?}: {e}")))
    }
}

impl std::fmt::Display for AppointmentTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(APPOINTMENT_TIME_FORMAT))
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(date: &str) -> ClinicResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|e| ClinicError::MalformedInput(format!("invalid date {date:?}: {e}")))
}

/// An operator allowed through the access gate. Secrets are stored in plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: String,
    pub display_name: String,
    pub secret: String,
}

impl Record for Credential {
    const KIND: RecordKind = RecordKind::Credential;
    const HEADER: &'static str = ADMINS_HEADER;
    const FIELD_COUNT: usize = 3;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.display_name.clone(),
            self.secret.clone(),
        ]
    }

    fn from_fields(fields: &[String]) -> ClinicResult<Self> {
        check_field_count::<Self>(fields)?;
        Ok(Self {
            id: fields[0].clone(),
            display_name: fields[1].clone(),
            secret: fields[2].clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
}

impl Record for Doctor {
    const KIND: RecordKind = RecordKind::Doctor;
    const HEADER: &'static str = DOCTORS_HEADER;
    const FIELD_COUNT: usize = 3;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.specialty.clone()]
    }

    fn from_fields(fields: &[String]) -> ClinicResult<Self> {
        check_field_count::<Self>(fields)?;
        Ok(Self {
            id: fields[0].clone(),
            name: fields[1].clone(),
            specialty: fields[2].clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: String,
    pub name: String,
}

impl Record for Patient {
    const KIND: RecordKind = RecordKind::Patient;
    const HEADER: &'static str = PATIENTS_HEADER;
    const FIELD_COUNT: usize = 2;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }

    fn from_fields(fields: &[String]) -> ClinicResult<Self> {
        check_field_count::<Self>(fields)?;
        Ok(Self {
            id: fields[0].clone(),
            name: fields[1].clone(),
        })
    }
}

/// A booked time slot. Created unassigned; doctor and patient are attached later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: String,
    pub date_time: AppointmentTime,
    pub reason: String,
    pub doctor_id: Option<String>,
    pub patient_id: Option<String>,
}

impl Appointment {
    pub fn unassigned(id: String, date_time: AppointmentTime, reason: String) -> Self {
        Self {
            id,
            date_time,
            reason,
            doctor_id: None,
            patient_id: None,
        }
    }
}

fn optional_reference(field: &str) -> Option<String> {
    if field.trim().is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

impl Record for Appointment {
    const KIND: RecordKind = RecordKind::Appointment;
    const HEADER: &'static str = APPOINTMENTS_HEADER;
    const FIELD_COUNT: usize = 5;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date_time.to_string(),
            self.reason.clone(),
            self.doctor_id.clone().unwrap_or_default(),
            self.patient_id.clone().unwrap_or_default(),
        ]
    }

    fn from_fields(fields: &[String]) -> ClinicResult<Self> {
        check_field_count::<Self>(fields)?;
        Ok(Self {
            id: fields[0].clone(),
            date_time: fields[1].parse()?,
            reason: fields[2].clone(),
            doctor_id: optional_reference(&fields[3]),
            patient_id: optional_reference(&fields[4]),
        })
    }
}

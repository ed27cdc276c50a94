//! Double-booking detection.
//!
//! Two appointments collide when their date-times are exactly equal and they share
//! the same doctor or the same patient. Durations are not modelled: only identical
//! start times are compared.

use crate::records::{Appointment, AppointmentTime};

fn same_reference(candidate: Option<&str>, existing: Option<&String>) -> bool {
    match candidate {
        Some(id) if !id.is_empty() => existing.is_some_and(|e| e == id),
        _ => false,
    }
}

/// Returns the first appointment that would be double-booked by assigning
/// `doctor_id` and `patient_id` at `date_time`.
///
/// The appointment whose identifier equals `exclude_id` is ignored, so an appointment
/// being re-linked never conflicts with itself. Empty or absent identifiers never match.
pub fn find_conflict<'a>(
    appointments: &'a [Appointment],
    date_time: AppointmentTime,
    doctor_id: Option<&str>,
    patient_id: Option<&str>,
    exclude_id: Option<&str>,
) -> Option<&'a Appointment> {
    appointments.iter().find(|existing| {
        if exclude_id.is_some_and(|id| id == existing.id) {
            return false;
        }
        existing.date_time == date_time
            && (same_reference(doctor_id, existing.doctor_id.as_ref())
                || same_reference(patient_id, existing.patient_id.as_ref()))
    })
}

/// True when [`find_conflict`] finds a collision.
pub fn conflicts(
    appointments: &[Appointment],
    date_time: AppointmentTime,
    doctor_id: Option<&str>,
    patient_id: Option<&str>,
    exclude_id: Option<&str>,
) -> bool {
    find_conflict(appointments, date_time, doctor_id, patient_id, exclude_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> AppointmentTime {
        s.parse().unwrap()
    }

    fn linked(id: &str, time: &str, doctor: Option<&str>, patient: Option<&str>) -> Appointment {
        Appointment {
            id: id.into(),
            date_time: at(time),
            reason: "checkup".into(),
            doctor_id: doctor.map(Into::into),
            patient_id: patient.map(Into::into),
        }
    }

    #[test]
    fn test_same_time_same_doctor_conflicts() {
        let appts = vec![linked("A", "2024-01-10T09:00", Some("D1"), Some("P1"))];
        let hit = find_conflict(&appts, at("2024-01-10T09:00"), Some("D1"), Some("P2"), Some("B"));
        assert_eq!(hit.map(|a| a.id.as_str()), Some("A"));
    }

    #[test]
    fn test_same_time_same_patient_conflicts() {
        let appts = vec![linked("A", "2024-01-10T09:00", Some("D1"), Some("P1"))];
        assert!(conflicts(&appts, at("2024-01-10T09:00"), Some("D2"), Some("P1"), Some("B")));
    }

    #[test]
    fn test_same_time_other_doctor_and_patient_is_free() {
        let appts = vec![linked("A", "2024-01-10T09:00", Some("D1"), Some("P1"))];
        assert!(!conflicts(&appts, at("2024-01-10T09:00"), Some("D2"), Some("P2"), Some("B")));
    }

    #[test]
    fn test_adjacent_minute_is_not_a_conflict() {
        let appts = vec![linked("A", "2024-01-10T09:00", Some("D1"), Some("P1"))];
        assert!(!conflicts(&appts, at("2024-01-10T09:01"), Some("D1"), Some("P1"), None));
    }

    #[test]
    fn test_excluded_appointment_never_conflicts_with_itself() {
        let appts = vec![linked("A", "2024-01-10T09:00", Some("D1"), Some("P1"))];
        assert!(!conflicts(&appts, at("2024-01-10T09:00"), Some("D1"), Some("P1"), Some("A")));
    }

    #[test]
    fn test_unassigned_appointments_never_match() {
        let appts = vec![linked("A", "2024-01-10T09:00", None, None)];
        assert!(!conflicts(&appts, at("2024-01-10T09:00"), Some("D1"), Some("P1"), None));
    }

    #[test]
    fn test_empty_candidate_ids_never_match() {
        let appts = vec![linked("A", "2024-01-10T09:00", Some(""), Some(""))];
        assert!(!conflicts(&appts, at("2024-01-10T09:00"), Some(""), None, None));
    }
}

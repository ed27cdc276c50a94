//! End-to-end run against a real data directory: bootstrap, login, book, reload.

use clinica_core::bootstrap::ensure_storage;
use clinica_core::{
    AccessDecision, AccessGate, AppointmentFilter, ClinicError, CoreConfig, CredentialSource,
    LoginAttempt, Store,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

struct Fixed(Vec<LoginAttempt>);

impl CredentialSource for Fixed {
    fn next_attempt(&mut self, _attempt: u32) -> Option<LoginAttempt> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }

    fn reject(&mut self, _attempt: u32) {}
}

#[test]
fn test_first_run_login_book_and_reload() {
    let temp = TempDir::new().unwrap();
    let cfg = Arc::new(CoreConfig::new(temp.path().join("db"), 5).unwrap());
    ensure_storage(&cfg).unwrap();

    let mut store = Store::load(cfg.clone());
    let gate = AccessGate::new(cfg.max_login_attempts());
    let decision = gate.authenticate(
        store.admins(),
        &mut Fixed(vec![LoginAttempt::new("admin", "admin")]),
    );
    assert_eq!(
        decision,
        AccessDecision::Granted {
            admin_id: "admin".into()
        }
    );

    store.register_doctor("D1", "Ana Ruiz", "Cardiologia").unwrap();
    store.register_doctor("D2", "Luis Gomez", "Pediatria").unwrap();
    store.register_patient("P1", "Maria Lopez").unwrap();
    store.register_patient("P2", "Jose Diaz").unwrap();
    store
        .create_appointment("A", "2024-01-10", "09:00", "control")
        .unwrap();
    store
        .create_appointment("B", "2024-01-10", "09:00", "revision")
        .unwrap();
    store.link_appointment("A", "D1", "P1").unwrap();
    assert!(matches!(
        store.link_appointment("B", "D1", "P2"),
        Err(ClinicError::ScheduleConflict { .. })
    ));
    store.link_appointment("B", "D2", "P2").unwrap();
    store.save_all().unwrap();

    let reloaded = Store::load(cfg.clone());
    assert_eq!(reloaded.appointments(), store.appointments());
    let for_d2 = reloaded.appointments_matching(&AppointmentFilter::Doctor("D2".into()));
    assert_eq!(for_d2.len(), 1);
    assert_eq!(for_d2[0].id, "B");

    let citas = fs::read_to_string(cfg.appointments_path()).unwrap();
    assert_eq!(
        citas,
        "cita_id,fecha_hora,motivo,doctor_id,paciente_id\n\
         A,2024-01-10T09:00,control,D1,P1\n\
         B,2024-01-10T09:00,revision,D2,P2\n"
    );
}

#[test]
fn test_denied_after_five_bad_attempts() {
    let temp = TempDir::new().unwrap();
    let cfg = Arc::new(CoreConfig::new(temp.path().join("db"), 5).unwrap());
    ensure_storage(&cfg).unwrap();
    let store = Store::load(cfg);

    let attempts = (0..5).map(|_| LoginAttempt::new("x", "y")).collect();
    let decision = AccessGate::new(5).authenticate(store.admins(), &mut Fixed(attempts));

    assert_eq!(decision, AccessDecision::Denied);
}

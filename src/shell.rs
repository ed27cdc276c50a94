//! Interactive menu loop.
//!
//! The shell is generic over its input and output so a whole session can be
//! scripted in tests. Every line read is trimmed. Errors from the store are
//! printed and the loop carries on; only console I/O failures end the session
//! early.

use std::io::{self, BufRead, Write};

use clinica_core::{
    AccessGate, AppointmentFilter, ClinicError, ClinicResult, CredentialSource, LoginAttempt,
    Store,
};

const UNASSIGNED: &str = "(unassigned)";

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The operator chose exit (or input ended); all collections were saved.
    Exited,
    /// Login attempts ran out; nothing was saved.
    AccessDenied,
}

pub struct Shell<R, W> {
    store: Store,
    input: R,
    out: W,
    input_closed: bool,
}

/// Reads one line, trimmed. `None` at end of input.
fn read_trimmed(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Login prompts on the shell's console.
struct ConsoleLogin<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
    error: Option<io::Error>,
}

impl<R: BufRead, W: Write> ConsoleLogin<'_, R, W> {
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        read_trimmed(&mut *self.input)
    }

    fn read_pair(&mut self) -> io::Result<Option<LoginAttempt>> {
        let Some(user) = self.ask("Username")? else {
            return Ok(None);
        };
        let Some(password) = self.ask("Password")? else {
            return Ok(None);
        };
        Ok(Some(LoginAttempt::new(user, password)))
    }
}

impl<R: BufRead, W: Write> CredentialSource for ConsoleLogin<'_, R, W> {
    fn next_attempt(&mut self, _attempt: u32) -> Option<LoginAttempt> {
        match self.read_pair() {
            Ok(attempt) => attempt,
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }

    fn reject(&mut self, _attempt: u32) {
        if let Err(e) = writeln!(self.out, "[ERROR] Invalid credentials.\n") {
            self.error.get_or_insert(e);
        }
    }
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(store: Store, input: R, out: W) -> Self {
        Self {
            store,
            input,
            out,
            input_closed: false,
        }
    }

    #[cfg(test)]
    pub fn into_store(self) -> Store {
        self.store
    }

    /// Runs the login gate and then the menu until the operator exits.
    pub fn run(&mut self) -> io::Result<SessionEnd> {
        writeln!(
            self.out,
            "== Clinic Appointments (data in {}) ==",
            self.store.config().data_dir().display()
        )?;

        if !self.login()? {
            writeln!(self.out, "Too many attempts. Exiting.")?;
            return Ok(SessionEnd::AccessDenied);
        }
        writeln!(self.out, "[OK] Access granted.")?;

        loop {
            self.print_menu()?;
            let choice = self.ask("Choose an option")?;
            if self.input_closed {
                self.save_all()?;
                break;
            }
            match choice.as_str() {
                "1" => self.register_doctor()?,
                "2" => self.register_patient()?,
                "3" => self.create_appointment()?,
                "4" => self.link_appointment()?,
                "5" => self.list_appointments()?,
                "6" => self.save_all()?,
                "7" => {
                    self.save_all()?;
                    break;
                }
                _ => writeln!(self.out, "[WARN] Invalid option.")?,
            }
        }

        writeln!(self.out, "Goodbye.")?;
        tracing::info!(input_closed = self.input_closed, "session ended");
        Ok(SessionEnd::Exited)
    }

    fn login(&mut self) -> io::Result<bool> {
        let Self {
            store, input, out, ..
        } = self;
        let gate = AccessGate::new(store.config().max_login_attempts());
        tracing::debug!(max_attempts = gate.max_attempts(), "login started");
        let mut console = ConsoleLogin {
            input,
            out,
            error: None,
        };
        let decision = gate.authenticate(store.admins(), &mut console);
        if let Some(e) = console.error {
            tracing::error!("console failed during login: {e}");
            return Err(e);
        }
        if !decision.is_granted() {
            tracing::warn!(
                data_dir = %store.config().data_dir().display(),
                "access denied"
            );
        }
        Ok(decision.is_granted())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n--- Menu ---")?;
        writeln!(self.out, "1) Register doctor")?;
        writeln!(self.out, "2) Register patient")?;
        writeln!(self.out, "3) Create appointment")?;
        writeln!(self.out, "4) Link appointment (doctor/patient)")?;
        writeln!(self.out, "5) List appointments")?;
        writeln!(self.out, "6) Save all")?;
        writeln!(self.out, "7) Exit")
    }

    /// Prompts for one value. Returns an empty string once input has ended.
    fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        match read_trimmed(&mut self.input)? {
            Some(line) => Ok(line),
            None => {
                self.input_closed = true;
                Ok(String::new())
            }
        }
    }

    fn report(&mut self, result: ClinicResult<()>, ok: &str) -> io::Result<()> {
        match result {
            Ok(()) => writeln!(self.out, "[OK] {ok}"),
            Err(e) => self.report_error(&e),
        }
    }

    fn report_error(&mut self, e: &ClinicError) -> io::Result<()> {
        if e.is_io() {
            writeln!(self.out, "[ERROR] {e}")
        } else {
            writeln!(self.out, "[WARN] {e}")
        }
    }

    fn register_doctor(&mut self) -> io::Result<()> {
        let id = self.ask("Doctor ID")?;
        let name = self.ask("Name")?;
        let specialty = self.ask("Specialty")?;
        let result = self.store.register_doctor(&id, &name, &specialty);
        self.report(result, "Doctor saved.")
    }

    fn register_patient(&mut self) -> io::Result<()> {
        let id = self.ask("Patient ID")?;
        let name = self.ask("Name")?;
        let result = self.store.register_patient(&id, &name);
        self.report(result, "Patient saved.")
    }

    fn create_appointment(&mut self) -> io::Result<()> {
        let id = self.ask("Appointment ID")?;
        let date = self.ask("Date (YYYY-MM-DD)")?;
        let time = self.ask("Time (HH:mm)")?;
        let reason = self.ask("Reason")?;
        let result = self.store.create_appointment(&id, &date, &time, &reason);
        self.report(result, "Appointment created (unassigned).")
    }

    fn link_appointment(&mut self) -> io::Result<()> {
        let id = self.ask("Appointment ID")?;
        let doctor_id = self.ask("Doctor ID")?;
        let patient_id = self.ask("Patient ID")?;
        let result = self.store.link_appointment(&id, &doctor_id, &patient_id);
        self.report(result, "Appointment linked.")
    }

    fn list_appointments(&mut self) -> io::Result<()> {
        writeln!(self.out, "List by: 1) All  2) Date  3) Doctor  4) Patient")?;
        let choice = self.ask("Option")?;
        let filter = match choice.as_str() {
            "2" => {
                let date = self.ask("Date (YYYY-MM-DD)")?;
                match AppointmentFilter::on_date(&date) {
                    Ok(filter) => filter,
                    Err(e) => return self.report_error(&e),
                }
            }
            "3" => AppointmentFilter::Doctor(self.ask("Doctor ID")?),
            "4" => AppointmentFilter::Patient(self.ask("Patient ID")?),
            _ => AppointmentFilter::All,
        };

        let Self { store, out, .. } = self;
        let selected = store.appointments_matching(&filter);
        if selected.is_empty() {
            return writeln!(out, "(no results)");
        }
        for appointment in selected {
            let doctor = appointment
                .doctor_id
                .as_deref()
                .and_then(|id| store.doctor(id))
                .map_or(UNASSIGNED, |d| d.name.as_str());
            let patient = appointment
                .patient_id
                .as_deref()
                .and_then(|id| store.patient(id))
                .map_or(UNASSIGNED, |p| p.name.as_str());
            writeln!(
                out,
                "Appointment[{}] {} | Dr: {} | Patient: {} | Reason: {}",
                appointment.id, appointment.date_time, doctor, patient, appointment.reason
            )?;
        }
        Ok(())
    }

    fn save_all(&mut self) -> io::Result<()> {
        let result = self.store.save_all();
        if let Err(e) = &result {
            tracing::error!("save all failed: {e}");
        }
        self.report(result, "All changes saved.")
    }
}

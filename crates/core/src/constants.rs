//! Constants used throughout the clinica core crate.
//!
//! File names and header lines are part of the on-disk contract: existing data
//! directories are read with exactly these names and headers.

/// Default directory for the flat files when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "db";

/// Filename for the admin credentials collection.
pub const ADMINS_FILENAME: &str = "admins.csv";

/// Filename for the doctors collection.
pub const DOCTORS_FILENAME: &str = "doctores.csv";

/// Filename for the patients collection.
pub const PATIENTS_FILENAME: &str = "pacientes.csv";

/// Filename for the appointments collection.
pub const APPOINTMENTS_FILENAME: &str = "citas.csv";

pub const ADMINS_HEADER: &str = "admin_id,nombre,password";
pub const DOCTORS_HEADER: &str = "doctor_id,nombre,especialidad";
pub const PATIENTS_HEADER: &str = "paciente_id,nombre";
pub const APPOINTMENTS_HEADER: &str = "cita_id,fecha_hora,motivo,doctor_id,paciente_id";

/// Row written to a freshly created admins file.
pub const DEFAULT_ADMIN_ROW: &str = "admin,Administrador,admin";

/// Persisted and displayed format of an appointment date-time.
pub const APPOINTMENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format of the date part entered at the console.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the time part entered at the console.
pub const TIME_FORMAT: &str = "%H:%M";

/// Login attempts allowed before access is denied.
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Field delimiter of the record codec.
pub const FIELD_DELIMITER: char = ',';

/// Quote character of the record codec.
pub const QUOTE: char = '"';

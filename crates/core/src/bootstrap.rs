//! First-run preparation of the data directory.

use crate::config::CoreConfig;
use crate::constants::{
    ADMINS_HEADER, APPOINTMENTS_HEADER, DEFAULT_ADMIN_ROW, DOCTORS_HEADER, PATIENTS_HEADER,
};
use crate::{ClinicError, ClinicResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Creates the data directory and any missing data file.
///
/// The admins file is seeded with the default admin row; the other files get only
/// their header. Existing files are never touched, so calling this repeatedly is safe.
///
/// # Errors
///
/// Returns `ClinicError::StorageDirCreation` if the directory cannot be created and
/// `ClinicError::FileWrite` if a missing file cannot be written.
pub fn ensure_storage(cfg: &CoreConfig) -> ClinicResult<()> {
    fs::create_dir_all(cfg.data_dir()).map_err(ClinicError::StorageDirCreation)?;

    let seeds = [
        (cfg.admins_path(), format!("{ADMINS_HEADER}\n{DEFAULT_ADMIN_ROW}\n")),
        (cfg.doctors_path(), format!("{DOCTORS_HEADER}\n")),
        (cfg.patients_path(), format!("{PATIENTS_HEADER}\n")),
        (cfg.appointments_path(), format!("{APPOINTMENTS_HEADER}\n")),
    ];
    for (path, contents) in &seeds {
        create_if_missing(path, contents)?;
    }
    Ok(())
}

fn create_if_missing(path: &Path, contents: &str) -> ClinicResult<()> {
    // `create_new` fails on an existing file instead of truncating it.
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(contents.as_bytes())
                .map_err(ClinicError::FileWrite)?;
            tracing::info!(path = %path.display(), "created missing data file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(ClinicError::FileWrite(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cfg(dir: &Path) -> CoreConfig {
        CoreConfig::new(dir.join("db"), 5).unwrap()
    }

    #[test]
    fn test_ensure_storage_seeds_missing_files() {
        let temp = TempDir::new().unwrap();
        let cfg = test_cfg(temp.path());

        ensure_storage(&cfg).unwrap();

        assert_eq!(
            fs::read_to_string(cfg.admins_path()).unwrap(),
            "admin_id,nombre,password\nadmin,Administrador,admin\n"
        );
        assert_eq!(
            fs::read_to_string(cfg.doctors_path()).unwrap(),
            "doctor_id,nombre,especialidad\n"
        );
        assert_eq!(
            fs::read_to_string(cfg.patients_path()).unwrap(),
            "paciente_id,nombre\n"
        );
        assert_eq!(
            fs::read_to_string(cfg.appointments_path()).unwrap(),
            "cita_id,fecha_hora,motivo,doctor_id,paciente_id\n"
        );
    }

    #[test]
    fn test_ensure_storage_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let cfg = test_cfg(temp.path());
        fs::create_dir_all(cfg.data_dir()).unwrap();
        fs::write(cfg.doctors_path(), "doctor_id,nombre,especialidad\nD1,Ana,Cardio\n").unwrap();

        ensure_storage(&cfg).unwrap();
        ensure_storage(&cfg).unwrap();

        assert_eq!(
            fs::read_to_string(cfg.doctors_path()).unwrap(),
            "doctor_id,nombre,especialidad\nD1,Ana,Cardio\n"
        );
        assert!(cfg.admins_path().is_file());
    }

    #[test]
    fn test_ensure_storage_fails_when_data_dir_is_a_file() {
        let temp = TempDir::new().unwrap();
        let cfg = test_cfg(temp.path());
        fs::write(cfg.data_dir(), "not a directory").unwrap();

        let err = ensure_storage(&cfg).unwrap_err();
        assert!(err.is_io());
    }
}

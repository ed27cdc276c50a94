//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup (flags, environment, `.env`) and
//! then passed into the store. Nothing in this crate reads environment variables.

use crate::constants::{
    ADMINS_FILENAME, APPOINTMENTS_FILENAME, DEFAULT_DATA_DIR, DEFAULT_MAX_LOGIN_ATTEMPTS,
    DOCTORS_FILENAME, PATIENTS_FILENAME,
};
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    max_login_attempts: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InvalidConfig` if `data_dir` is empty or
    /// `max_login_attempts` is zero.
    pub fn new(data_dir: PathBuf, max_login_attempts: u32) -> ClinicResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(ClinicError::InvalidConfig(
                "data directory cannot be empty".into(),
            ));
        }
        if max_login_attempts == 0 {
            return Err(ClinicError::InvalidConfig(
                "at least one login attempt must be allowed".into(),
            ));
        }

        Ok(Self {
            data_dir,
            max_login_attempts,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn max_login_attempts(&self) -> u32 {
        self.max_login_attempts
    }

    pub fn admins_path(&self) -> PathBuf {
        self.data_dir.join(ADMINS_FILENAME)
    }

    pub fn doctors_path(&self) -> PathBuf {
        self.data_dir.join(DOCTORS_FILENAME)
    }

    pub fn patients_path(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_FILENAME)
    }

    pub fn appointments_path(&self) -> PathBuf {
        self.data_dir.join(APPOINTMENTS_FILENAME)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_config_rejects_empty_data_dir() {
        let err = CoreConfig::new(PathBuf::new(), 5).unwrap_err();
        assert!(matches!(err, ClinicError::InvalidConfig(_)));
    }

    #[test]
    fn test_core_config_rejects_zero_attempts() {
        let err = CoreConfig::new(PathBuf::from("db"), 0).unwrap_err();
        assert!(matches!(err, ClinicError::InvalidConfig(_)));
    }

    #[test]
    fn test_core_config_paths_live_under_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/tmp/clinic"), 3).unwrap();

        assert_eq!(cfg.admins_path(), PathBuf::from("/tmp/clinic/admins.csv"));
        assert_eq!(cfg.doctors_path(), PathBuf::from("/tmp/clinic/doctores.csv"));
        assert_eq!(cfg.patients_path(), PathBuf::from("/tmp/clinic/pacientes.csv"));
        assert_eq!(cfg.appointments_path(), PathBuf::from("/tmp/clinic/citas.csv"));
        assert_eq!(cfg.max_login_attempts(), 3);
    }

    #[test]
    fn test_core_config_default_uses_db_dir() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.data_dir(), Path::new("db"));
        assert_eq!(cfg.max_login_attempts(), 5);
    }
}

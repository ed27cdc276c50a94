/// Kind of collection a record belongs to, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Credential,
    Doctor,
    Patient,
    Appointment,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordKind::Credential => "admin",
            RecordKind::Doctor => "doctor",
            RecordKind::Patient => "patient",
            RecordKind::Appointment => "appointment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: RecordKind, id: String },
    #[error("appointment not found: {0}")]
    NotFound(String),
    #[error("doctor does not exist: {0}")]
    InvalidDoctor(String),
    #[error("patient does not exist: {0}")]
    InvalidPatient(String),
    #[error("schedule conflict at {date_time} with appointment {conflicting_id}")]
    ScheduleConflict {
        date_time: String,
        conflicting_id: String,
    },
    #[error("invalid input: {0}")]
    MalformedInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read data file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write data file: {0}")]
    FileWrite(std::io::Error),
}

impl ClinicError {
    /// True for failures of the underlying storage rather than of the operator's input.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ClinicError::StorageDirCreation(_)
                | ClinicError::FileRead(_)
                | ClinicError::FileWrite(_)
        )
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;

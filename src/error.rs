use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("invalid allocator configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed availability token '{0}'")]
    MalformedToken(String),

    #[error("slot {day}-{period} is outside the weekly calendar")]
    SlotOutOfCalendar { day: u8, period: u8 },

    #[error("student not found: {0}")]
    StudentNotFound(u32),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RosterError>;

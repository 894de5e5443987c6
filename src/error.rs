use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Station {station_id} not found")]
    StationNotFound { station_id: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid data format at line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    /// Attach a 1-based line number to a format error raised by a line parser.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            ProcessingError::InvalidFormat(message) => {
                ProcessingError::InvalidLine { line, message }
            }
            other => other,
        }
    }
}

use crate::record::RecordError;

/// Error type
#[derive(Debug)]
pub enum Error {
    /// An IO error.
    Io(std::io::Error),

    /// Error in the TSV reader.
    Csv(csv::Error),

    /// An unrecognized granularity name was used.
    UnknownGranularity(String),

    /// A record violated the throughput/message invariant.
    InvalidRecord(RecordError),

    /// An input line carried fewer fields than a record needs.
    TruncatedLine {
        /// 1-based line number in the input file.
        line: u64,

        /// The offending line, verbatim.
        text: String,
    },

    /// An input field could not be parsed.
    InvalidField {
        /// Name of the field that failed to parse.
        field: &'static str,

        /// 1-based line number in the input file.
        line: u64,

        /// The offending line, verbatim.
        text: String,
    },
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<RecordError> for Error {
    fn from(value: RecordError) -> Self {
        Self::InvalidRecord(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => {
                write!(f, "{e}",)
            }
            Self::Csv(e) => {
                write!(f, "{e}",)
            }
            Self::UnknownGranularity(name) => {
                write!(
                    f,
                    "unknown granularity {name:?}, expected Day, Hour, Minute or Second",
                )
            }
            Self::InvalidRecord(e) => {
                write!(f, "{e}",)
            }
            Self::TruncatedLine { line, text } => {
                write!(f, "line {line}: record has fewer than 3 fields: {text}",)
            }
            Self::InvalidField { field, line, text } => {
                write!(f, "line {line}: invalid {field}: {text}",)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result helper type
pub type Result<T> = std::result::Result<T, Error>;

use crate::{Timestamp, Value};

/// A single network measurement.
///
/// A record is an error measurement when its throughput is negative; error
/// records must carry a message, success records must not. A message that
/// is blank (empty or whitespace only) counts as no message at all.
/// [`Record::outcome`] checks that invariant; building a `Record` does not.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// When the measurement was taken, in its original UTC offset.
    pub timestamp: Timestamp,

    /// How long the measurement took, in milliseconds.
    pub duration: u64,

    /// Measured throughput in mbps; negative marks an error measurement.
    pub throughput: Value,

    /// Error message, if any.
    pub message: Option<String>,
}

impl Record {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        timestamp: Timestamp,
        duration: u64,
        throughput: Value,
        message: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            duration,
            throughput,
            message,
        }
    }

    /// Classifies the record as success or error measurement.
    ///
    /// # Errors
    ///
    /// Returns an error if the record violates the throughput/message
    /// invariant.
    pub fn outcome(&self) -> Result<Outcome, RecordError> {
        let has_message = self
            .message
            .as_deref()
            .is_some_and(|msg| !msg.trim().is_empty());

        // NOTE: NaN is not negative, so it classifies as success
        if self.throughput < 0.0 {
            if has_message {
                Ok(Outcome::Error)
            } else {
                Err(RecordError::ErrorWithoutMessage)
            }
        } else if has_message {
            Err(RecordError::SuccessWithMessage)
        } else {
            Ok(Outcome::Success)
        }
    }
}

/// Classification of a valid record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Non-negative throughput, no message.
    Success,

    /// Negative throughput, with a message.
    Error,
}

/// A record that violates the throughput/message invariant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordError {
    /// Negative throughput without a message.
    ErrorWithoutMessage,

    /// Non-negative throughput with a message.
    SuccessWithMessage,
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ErrorWithoutMessage => {
                write!(f, "Error without a message",)
            }
            Self::SuccessWithMessage => {
                write!(f, "Success with a message",)
            }
        }
    }
}

impl std::error::Error for RecordError {}

use chrono::{Local, NaiveDateTime};

use crate::MemberID;

#[derive(thiserror::Error, strum::IntoStaticStr, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("member with ID {0} not found")]
    MemberNotFound(MemberID),
    #[error("member with ID {0} is already registered")]
    DuplicateMember(MemberID),
    #[error("invalid data for {field}: {reason}")]
    InvalidData { field: String, reason: String },
    #[error("{0}")]
    MembershipState(String),
    #[error("{0}")]
    Report(String),
    #[error("{0}")]
    Attendance(String),
    #[error("{0}")]
    Measurement(String),
}

/// Error raised by any gym operation, stamped with its creation time.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{kind}")]
pub struct GymError {
    kind: ErrorKind,
    timestamp: NaiveDateTime,
}

impl GymError {
    pub fn invalid_data(field: &str, reason: impl Into<String>) -> Self {
        ErrorKind::InvalidData {
            field: field.to_string(),
            reason: reason.into(),
        }
        .into()
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Name of the error kind, e.g. `MemberNotFound`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        (&self.kind).into()
    }

    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl From<ErrorKind> for GymError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            timestamp: Local::now().naive_local(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        ErrorKind::MemberNotFound(MemberID::new("U001").unwrap()),
        "MemberNotFound",
        "member with ID U001 not found"
    )]
    #[case(
        ErrorKind::DuplicateMember(MemberID::new("U001").unwrap()),
        "DuplicateMember",
        "member with ID U001 is already registered"
    )]
    #[case(
        ErrorKind::InvalidData { field: "email".to_string(), reason: "invalid format".to_string() },
        "InvalidData",
        "invalid data for email: invalid format"
    )]
    #[case(
        ErrorKind::MembershipState("already frozen".to_string()),
        "MembershipState",
        "already frozen"
    )]
    #[case(ErrorKind::Report("bad month".to_string()), "Report", "bad month")]
    #[case(ErrorKind::Attendance("inactive".to_string()), "Attendance", "inactive")]
    #[case(ErrorKind::Measurement("negative".to_string()), "Measurement", "negative")]
    fn test_gym_error(#[case] kind: ErrorKind, #[case] name: &str, #[case] message: &str) {
        let error = GymError::from(kind.clone());
        assert_eq!(error.kind(), &kind);
        assert_eq!(error.name(), name);
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn test_gym_error_timestamp() {
        let before = Local::now().naive_local();
        let error = GymError::invalid_data("name", "too short");
        assert!(error.timestamp() >= before);
        assert!(error.timestamp() <= Local::now().naive_local());
    }
}
